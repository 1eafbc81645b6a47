use crate::error::Error;

const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

/// Render an error as valid markdown with bold headings and print to stderr.
pub fn print_error(e: &Error) {
    let md = render_error(e);
    for line in md.lines() {
        if line.starts_with('#') {
            eprintln!("{BOLD}{line}{RESET}");
        } else {
            eprintln!("{line}");
        }
    }
}

/// Render an error as a structured markdown diagnostic.
///
/// Each block says what happened and how to fix it. All docpage failures
/// stem from static content, so every fix is an edit to the documentation
/// text or the index, never a retry.
pub fn render_error(e: &Error) -> String {
    match e {
        Error::CategoryMismatch { expected, found, reference } => format!(
            "\
# Error: Reference Category Mismatch

The tag around `{reference}` declares a {expected}, but it resolved to {found}.

## Fix

Use the tag form matching the entity's category, or correct the reference.
"
        ),

        Error::DocstringMismatch { declared, documented, type_name } => format!(
            "\
# Error: Documented Fields Out Of Sync

`{type_name}` documents [{}] but declares [{}].

## Fix

Update the documentation comment of `{type_name}` so its parameter list
matches the declared fields exactly.
",
            documented.join(", "),
            declared.join(", ")
        ),

        Error::DuplicateModule { name } => format!(
            "\
# Error: Duplicate Module

Module `{name}` appears more than once across the given index files.
"
        ),

        Error::IndexNotFound { path } => format!(
            "\
# Error: Index Not Found

`{}` does not exist.

## Fix

Point `--index` at a module index file or a directory containing them.
",
            path.display()
        ),

        Error::UnknownModule { name } => format!(
            "\
# Error: Unknown Module

Module `{name}` was requested but is not present in the loaded index.
"
        ),

        Error::UnresolvedReference { context, reference } => format!(
            "\
# Error: Unresolved Reference

`{reference}` is not defined in the context of {context}.

## Fix

Correct the reference in the documentation comment, or index the module
that defines it.
"
        ),

        Error::Io(e) => format!(
            "\
# Error: I/O

{e}
"
        ),

        Error::TomlDe(e) => format!(
            "\
# Error: Invalid TOML

{e}
"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::render_error;
    use crate::error::Error;

    #[test]
    fn unresolved_reference_diagnostic_names_the_context() {
        let e = Error::UnresolvedReference {
            context: "class `Foo` in module `pkg.mod`".to_string(),
            reference: "Undefined".to_string(),
        };
        let md = render_error(&e);
        assert!(md.contains("`Undefined`"));
        assert!(md.contains("class `Foo` in module `pkg.mod`"));
        assert!(md.contains("## Fix"));
    }

    #[test]
    fn every_diagnostic_opens_with_a_heading() {
        let e = Error::UnknownModule { name: "pkg.gone".to_string() };
        assert!(render_error(&e).starts_with("# Error:"));
    }
}
