//! Anchor and path naming: markdown-safe display names, stable heading
//! anchors, and relative paths between generated pages. All functions here
//! are pure; anchors derive solely from qualified names so links never rot
//! between runs.

use std::path::PathBuf;
use std::sync::OnceLock;

use regex::Regex;

use crate::config::AnchorStyle;

/// Path segment substituted for the entry-point module, whose literal name
/// would be hidden or mangled by common site generators.
const MAIN_MODULE: &str = "__main__";
const MAIN_SENTINEL: &str = "main";

/// Marker prefixed to anchor segments that start with a double underscore,
/// which collides with reserved-prefix rules of the anchor syntax.
const RESERVED_PREFIX_MARKER: &str = "sp";

/// Build a page-unique anchor identifier from a dotted qualified name.
/// Segments starting with `__` get the reserved-prefix marker; display text
/// is never altered here.
pub fn anchor_id(qualified_name: &str) -> String {
    qualified_name
        .split('.')
        .map(|segment| {
            if segment.starts_with("__") {
                format!("{RESERVED_PREFIX_MARKER}{segment}")
            } else {
                segment.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(".")
}

/// Build a markdown link to an anchor. `rel_path` is `None` for a same-page
/// target, which yields a pure `#anchor` link.
pub fn anchor_link(display: &str, anchor: &str, rel_path: Option<&str>) -> String {
    match rel_path {
        Some(path) => format!("[{display}]({path}#{anchor})"),
        None => format!("[{display}](#{anchor})"),
    }
}

/// Escape underscore runs touching a word boundary, so the rendering target
/// does not treat them as emphasis markup. Underscores fully inside a word
/// are left alone.
///
/// # Panics
///
/// Panics if the hardcoded escape regex is invalid (compile-time invariant).
pub fn escape_markdown(name: &str) -> String {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    let regex = PATTERN.get_or_init(|| Regex::new(r"(\b_+|_+\b)").expect("valid regex"));
    regex
        .replace_all(name, |caps: &regex::Captures<'_>| {
            caps[0].replace('_', "\\_")
        })
        .into_owned()
}

/// Render a heading with its anchor in the configured syntax.
pub fn heading_anchor(style: AnchorStyle, anchor: &str, text: &str) -> String {
    match style {
        AnchorStyle::GitBook => format!("{text} {{#{anchor}}}"),
        AnchorStyle::GitHub => format!("<a name=\"{anchor}\"></a> {text}"),
    }
}

/// Filesystem path of a module's page relative to the output root:
/// dots become separators, `.md` is appended, and the entry-point module
/// name is replaced by the sentinel.
pub fn page_file_path(module_name: &str) -> PathBuf {
    let mut path: PathBuf = page_segments(module_name).collect();
    path.set_extension("md");
    path
}

/// Relative link path from the page of `source_module` to the page of
/// `target_module`. Same-directory targets carry no directory prefix;
/// targets in sibling or ancestor directories get the `../` chain.
pub fn relative_page_path(target_module: &str, source_module: &str) -> String {
    let target: Vec<String> = page_segments(target_module).collect();
    let source: Vec<String> = page_segments(source_module).collect();

    let target_dirs = &target[..target.len().saturating_sub(1)];
    let source_dirs = &source[..source.len().saturating_sub(1)];

    let common = target_dirs
        .iter()
        .zip(source_dirs.iter())
        .take_while(|(t, s)| t == s)
        .count();

    let mut parts: Vec<String> = Vec::new();
    parts.resize(source_dirs.len() - common, "..".to_string());
    parts.extend(target_dirs[common..].iter().cloned());
    match target.last() {
        Some(file) => parts.push(format!("{file}.md")),
        None => return String::new(),
    }

    parts.join("/")
}

fn page_segments(module_name: &str) -> impl Iterator<Item = String> + '_ {
    module_name.split('.').map(|segment| {
        if segment == MAIN_MODULE {
            MAIN_SENTINEL.to_string()
        } else {
            segment.to_string()
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundary_underscores_are_escaped() {
        assert_eq!(escape_markdown("_private_name_"), "\\_private_name\\_");
    }

    #[test]
    fn underscore_runs_escape_every_character() {
        assert_eq!(escape_markdown("__init__"), "\\_\\_init\\_\\_");
    }

    #[test]
    fn interior_underscores_are_left_alone() {
        assert_eq!(escape_markdown("snake_case_name"), "snake_case_name");
    }

    #[test]
    fn anchor_marks_reserved_segments() {
        assert_eq!(anchor_id("pkg.mod.Foo"), "pkg.mod.Foo");
        assert_eq!(anchor_id("pkg.__main__.run"), "pkg.sp__main__.run");
    }

    #[test]
    fn heading_anchor_styles() {
        assert_eq!(
            heading_anchor(AnchorStyle::GitHub, "a.b", "a.b"),
            "<a name=\"a.b\"></a> a.b"
        );
        assert_eq!(heading_anchor(AnchorStyle::GitBook, "a.b", "a.b"), "a.b {#a.b}");
    }

    #[test]
    fn same_directory_has_no_prefix() {
        assert_eq!(relative_page_path("pkg.b", "pkg.a"), "b.md");
        assert_eq!(relative_page_path("pkg.a", "pkg.a"), "a.md");
    }

    #[test]
    fn sibling_directory_walks_up() {
        assert_eq!(relative_page_path("pkg.b.x", "pkg.a.y"), "../b/x.md");
    }

    #[test]
    fn ancestor_target_is_reachable() {
        assert_eq!(relative_page_path("pkg", "pkg.sub.mod"), "../../pkg.md");
    }

    #[test]
    fn descendant_target_descends() {
        assert_eq!(relative_page_path("pkg.sub.mod", "pkg"), "pkg/sub/mod.md");
    }

    #[test]
    fn entry_point_module_uses_sentinel() {
        assert_eq!(page_file_path("pkg.__main__"), PathBuf::from("pkg/main.md"));
        assert_eq!(relative_page_path("pkg.__main__", "pkg.a"), "main.md");
    }

    #[test]
    fn same_page_link_has_only_an_anchor() {
        assert_eq!(anchor_link("Foo", "pkg.a.Foo", None), "[Foo](#pkg.a.Foo)");
        assert_eq!(
            anchor_link("Foo", "pkg.b.Foo", Some("b.md")),
            "[Foo](b.md#pkg.b.Foo)"
        );
    }
}
