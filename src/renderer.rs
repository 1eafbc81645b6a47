//! Entity rendering: one routine per entity category, sharing the
//! description pipeline (URL autolinking, then reference-tag substitution
//! through the resolver). Rendering an entity never depends on another
//! entity having been rendered; only the shared known-module set and the
//! read-only registry are consulted.

use std::sync::OnceLock;

use regex::Regex;

use crate::autolink;
use crate::config::Config;
use crate::docstring;
use crate::error::Error;
use crate::naming;
use crate::resolver::{Resolver, Scope};
use crate::symbols::{ClassDef, Entity, EnumDef, FunctionDef, Module, Registry, Resolved};
use crate::typefmt::TypeFormatter;

/// Collects the lines of one markdown document.
#[derive(Debug, Default)]
pub struct MarkdownWriter {
    /// Output lines in order, joined with newlines at write time.
    lines: Vec<String>,
}

impl MarkdownWriter {
    /// Create an empty writer.
    pub fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// The accumulated lines.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Append an empty line.
    pub fn blank(&mut self) {
        self.lines.push(String::new());
    }

    /// Append one line.
    pub fn print(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }
}

/// Renders the documentable entities of one module into markdown lines.
pub struct PageRenderer<'a> {
    /// Generation options.
    config: &'a Config,
    /// Snapshot of all loaded modules, for reference resolution.
    registry: &'a Registry,
    /// The known-module set: link targets outside it render as plain text.
    requested: &'a [String],
}

impl<'a> PageRenderer<'a> {
    /// Build a renderer over the given registry and known-module set.
    pub fn new(registry: &'a Registry, requested: &'a [String], config: &'a Config) -> Self {
        Self { config, registry, requested }
    }

    /// Render a full module section: heading, module description, then one
    /// sub-section per documentable entity in declaration order.
    ///
    /// # Errors
    ///
    /// Fails on the first unresolved reference, category mismatch, or
    /// docstring inconsistency; the page must not be written in that case.
    pub fn render_module(&self, module: &Module, w: &mut MarkdownWriter) -> Result<(), Error> {
        let fmt = TypeFormatter::new(self.registry, self.requested, self.config, &module.name);

        let anchor = naming::anchor_id(&module.name);
        w.print(format!(
            "# {}",
            naming::heading_anchor(self.config.anchor_style, &anchor, &module.name)
        ));
        w.blank();

        if let Some(doc) = &module.doc {
            let text = self.transform_text(doc, Scope::Module(module), &fmt)?;
            w.print(text);
            w.blank();
        }

        for entity in &module.entities {
            if entity.is_private() && !self.config.include_private {
                continue;
            }
            self.render_entity(module, entity, &fmt, w)?;
        }

        Ok(())
    }

    fn render_entity(
        &self,
        module: &Module,
        entity: &Entity,
        fmt: &TypeFormatter<'_>,
        w: &mut MarkdownWriter,
    ) -> Result<(), Error> {
        let anchor = naming::anchor_id(&format!("{}.{}", module.name, entity.name()));
        let title = match entity {
            Entity::Function(f) => signature_title(f, fmt),
            _ => naming::escape_markdown(entity.local_name()),
        };
        w.print(format!(
            "## {}",
            naming::heading_anchor(self.config.anchor_style, &anchor, &title)
        ));
        w.blank();

        match entity {
            Entity::Class(class) => self.render_class(module, class, false, w, fmt),
            Entity::Enum(enumeration) => self.render_enum(module, enumeration, w, fmt),
            Entity::Function(function) => self.render_free_function(module, function, w, fmt),
            Entity::Record(class) => self.render_class(module, class, true, w, fmt),
        }
    }

    /// Classes and records share everything except the strict field check
    /// and the Properties list.
    fn render_class(
        &self,
        module: &Module,
        class: &ClassDef,
        is_record: bool,
        w: &mut MarkdownWriter,
        fmt: &TypeFormatter<'_>,
    ) -> Result<(), Error> {
        if is_record {
            docstring::check_fields(&module.name, class)?;
        }

        self.render_bases(class, w, fmt);

        let scope = Scope::Type { module, type_name: &class.name };
        if let Some(description) = &class.doc.description {
            w.print(self.transform_text(description, scope, fmt)?);
            w.blank();
        }

        if is_record && !class.doc.params.is_empty() {
            w.print("**Properties:**");
            w.blank();
            for param in &class.doc.params {
                let member_scope = Scope::Member {
                    member_name: &param.name,
                    module,
                    type_name: &class.name,
                };
                let description = self.transform_text(&param.description, member_scope, fmt)?;
                w.print(format!(
                    "* **{}** ({}) - {description}",
                    naming::escape_markdown(&param.name),
                    fmt.format(&param.ty)
                ));
            }
            w.blank();
        }

        self.render_methods(module, class, w, fmt)?;
        Ok(())
    }

    /// "Bases:" line listing every direct base other than the universal
    /// root, each as a resolved link when known.
    fn render_bases(&self, class: &ClassDef, w: &mut MarkdownWriter, fmt: &TypeFormatter<'_>) {
        let bases: Vec<String> = class
            .bases
            .iter()
            .filter(|b| !matches!(b, crate::symbols::TypeRef::Named(n) if n == "object"))
            .map(|b| fmt.format(b))
            .collect();
        if !bases.is_empty() {
            w.print(format!("**Bases:** {}", bases.join(", ")));
            w.blank();
        }
    }

    fn render_enum(
        &self,
        module: &Module,
        enumeration: &EnumDef,
        w: &mut MarkdownWriter,
        fmt: &TypeFormatter<'_>,
    ) -> Result<(), Error> {
        let scope = Scope::Type { module, type_name: &enumeration.name };
        if let Some(description) = &enumeration.doc.description {
            w.print(self.transform_text(description, scope, fmt)?);
            w.blank();
        }

        w.print("**Members:**");
        w.blank();
        for member in &enumeration.members {
            let definition = format!(
                "* **{}** = `{}`",
                naming::escape_markdown(&member.name),
                member.value
            );
            match &member.label {
                Some(label) => w.print(format!("{definition} - {label}")),
                None => w.print(definition),
            }
        }
        w.blank();
        Ok(())
    }

    fn render_free_function(
        &self,
        module: &Module,
        function: &FunctionDef,
        w: &mut MarkdownWriter,
        fmt: &TypeFormatter<'_>,
    ) -> Result<(), Error> {
        let scope = Scope::Module(module);
        if let Some(description) = &function.doc.description {
            w.print(self.transform_text(description, scope, fmt)?);
            w.blank();
        }
        self.render_params(module, None, function, w, fmt)
    }

    /// Each declared method carrying a non-empty description becomes a
    /// `###`-level section with its signature, description, and parameters.
    fn render_methods(
        &self,
        module: &Module,
        class: &ClassDef,
        w: &mut MarkdownWriter,
        fmt: &TypeFormatter<'_>,
    ) -> Result<(), Error> {
        for method in &class.methods {
            let Some(description) = &method.doc.description else {
                continue;
            };

            let anchor =
                naming::anchor_id(&format!("{}.{}.{}", module.name, class.name, method.name));
            let title = signature_title(method, fmt);
            w.print(format!(
                "### {}",
                naming::heading_anchor(self.config.anchor_style, &anchor, &title)
            ));
            w.blank();

            let scope = Scope::Type { module, type_name: &class.name };
            w.print(self.transform_text(description, scope, fmt)?);
            w.blank();

            self.render_params(module, Some(&class.name), method, w, fmt)?;
        }
        Ok(())
    }

    /// Parameter bullet list; each description is resolved under a
    /// Function-scope context.
    fn render_params(
        &self,
        module: &Module,
        type_name: Option<&str>,
        function: &FunctionDef,
        w: &mut MarkdownWriter,
        fmt: &TypeFormatter<'_>,
    ) -> Result<(), Error> {
        if function.doc.params.is_empty() {
            return Ok(());
        }

        w.print("**Parameters:**");
        w.blank();
        for param in &function.doc.params {
            let scope = match type_name {
                Some(type_name) => Scope::Function {
                    func_name: &function.name,
                    module,
                    type_name,
                },
                None => Scope::FreeFunction { func_name: &function.name, module },
            };
            let description = self.transform_text(&param.description, scope, fmt)?;
            w.print(format!(
                "* **{}** ({}) - {description}",
                naming::escape_markdown(&param.name),
                fmt.format(&param.ty)
            ));
        }
        w.blank();
        Ok(())
    }

    /// Description post-processing shared by every entity category:
    /// trim, autolink URLs, then substitute the three reference-tag forms.
    fn transform_text(
        &self,
        text: &str,
        scope: Scope<'_>,
        fmt: &TypeFormatter<'_>,
    ) -> Result<String, Error> {
        let text = autolink::replace_links(text.trim());
        let resolver = Resolver::new(self.registry, scope);

        let text = substitute_tags(&text, mod_tag(), |reference| {
            match resolver.resolve(reference)? {
                Resolved::Module(target) => Ok(fmt.module_link(&target.name)),
                other => Err(Error::CategoryMismatch {
                    expected: "module reference",
                    found: other.describe(),
                    reference: reference.to_string(),
                }),
            }
        })?;

        let text = substitute_tags(&text, class_tag(), |reference| {
            match resolver.resolve(reference)? {
                Resolved::Type { module, qual_name } => {
                    Ok(fmt.entity_link(&module.name, &qual_name))
                },
                other => Err(Error::CategoryMismatch {
                    expected: "class reference",
                    found: other.describe(),
                    reference: reference.to_string(),
                }),
            }
        })?;

        let text = substitute_tags(&text, meth_tag(), |reference| {
            match resolver.resolve(reference)? {
                Resolved::Function { module, qual_name } => {
                    Ok(fmt.entity_link(&module.name, &qual_name))
                },
                other => Err(Error::CategoryMismatch {
                    expected: "function reference",
                    found: other.describe(),
                    reference: reference.to_string(),
                }),
            }
        })?;

        Ok(text)
    }
}

/// Heading title for a function or method: `name ( a: T, b: U ) → R`.
fn signature_title(function: &FunctionDef, fmt: &TypeFormatter<'_>) -> String {
    let params: Vec<String> = function
        .doc
        .params
        .iter()
        .map(|p| format!("{}: {}", p.name, fmt.format(&p.ty)))
        .collect();
    let returns = function
        .doc
        .returns
        .as_ref()
        .map(|r| format!(" → {}", fmt.format(r)))
        .unwrap_or_default();
    let local = function.name.rsplit('.').next().unwrap_or(&function.name);
    format!(
        "{} ( {} ){returns}",
        naming::escape_markdown(local),
        params.join(", ")
    )
}

/// Replace every occurrence of a reference tag, propagating the first error.
/// The replacement closure receives the bare reference string inside the tag.
fn substitute_tags(
    text: &str,
    pattern: &Regex,
    replace: impl Fn(&str) -> Result<String, Error>,
) -> Result<String, Error> {
    let mut out = String::with_capacity(text.len());
    let mut last_end = 0;

    for caps in pattern.captures_iter(text) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        out.push_str(text.get(last_end..whole.start()).unwrap_or(""));
        out.push_str(&replace(&caps[1])?);
        last_end = whole.end();
    }

    out.push_str(text.get(last_end..).unwrap_or(""));
    Ok(out)
}

fn class_tag() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r":class:`([^`]+)`").expect("valid regex"))
}

fn meth_tag() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r":meth:`([^`]+)`").expect("valid regex"))
}

fn mod_tag() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r":mod:`([^`]+)`").expect("valid regex"))
}
