//! Shared type-to-text formatter: renders declared type references as
//! markdown, linking types that belong to the known-module set and falling
//! back to plain escaped names for external ones. Also the single place
//! where known-vs-external link decisions are made for modules and entities.

use crate::config::{Config, Layout};
use crate::naming;
use crate::symbols::{Registry, TypeRef};

/// Base URL for standard-library type links, used when `stdlib_links` is on.
const STDLIB_DOCS: &str = "https://docs.python.org/3/library";

/// Formats type references and entity links in the context of one page.
pub struct TypeFormatter<'a> {
    /// Generation options (labels, layout, stdlib links).
    config: &'a Config,
    /// Dotted name of the module whose page is being rendered.
    context: &'a str,
    /// Snapshot of all loaded modules.
    registry: &'a Registry,
    /// The known-module set: modules included in this generation run.
    requested: &'a [String],
}

impl<'a> TypeFormatter<'a> {
    /// Build a formatter for the page of module `context`.
    pub fn new(
        registry: &'a Registry,
        requested: &'a [String],
        config: &'a Config,
        context: &'a str,
    ) -> Self {
        Self { config, context, registry, requested }
    }

    /// Link to an entity if its module is part of the known set, otherwise
    /// its plain escaped local name. External entities are never rendered as
    /// broken links.
    pub fn entity_link(&self, module_name: &str, qual_name: &str) -> String {
        let local = qual_name.rsplit('.').next().unwrap_or(qual_name);
        let display = naming::escape_markdown(local);
        if !self.is_known(module_name) {
            return display;
        }
        let anchor = naming::anchor_id(&format!("{module_name}.{qual_name}"));
        naming::anchor_link(&display, &anchor, self.page_path(module_name).as_deref())
    }

    /// Render a type reference, with union alternatives joined by `|`.
    pub fn format(&self, ty: &TypeRef) -> String {
        match ty {
            TypeRef::Named(name) => self.format_named(name),
            TypeRef::Union(parts) => parts
                .iter()
                .map(|p| self.format(p))
                .collect::<Vec<_>>()
                .join(" | "),
        }
    }

    /// Link to a module page if the module is part of the known set,
    /// otherwise its plain escaped dotted name.
    pub fn module_link(&self, module_name: &str) -> String {
        if !self.is_known(module_name) {
            return naming::escape_markdown(module_name);
        }
        let anchor = naming::anchor_id(module_name);
        naming::anchor_link(module_name, &anchor, self.page_path(module_name).as_deref())
    }

    fn format_named(&self, name: &str) -> String {
        // The special-label map wins over everything else.
        if let Some(label) = self.config.labels.get(name) {
            return label.clone();
        }

        // A type owned by a loaded module: link when the module is known.
        for module in self.registry.modules() {
            let prefix = format!("{}.", module.name);
            if let Some(qual_name) = name.strip_prefix(&prefix) {
                return self.entity_link(&module.name, qual_name);
            }
        }

        if self.config.stdlib_links {
            if let Some(url) = stdlib_url(name) {
                return format!("[{name}]({url})");
            }
        }

        naming::escape_markdown(name.rsplit('.').next().unwrap_or(name))
    }

    fn is_known(&self, module_name: &str) -> bool {
        self.requested.iter().any(|m| m == module_name)
    }

    /// Relative page path for a link target, or `None` for a same-page link.
    /// Single-file layout puts every module on one page.
    fn page_path(&self, target_module: &str) -> Option<String> {
        if self.config.layout == Layout::SingleFile || target_module == self.context {
            None
        } else {
            Some(naming::relative_page_path(target_module, self.context))
        }
    }
}

/// External documentation URL for a builtin type name.
fn stdlib_url(name: &str) -> Option<String> {
    match name {
        "bool" | "bytes" | "dict" | "float" | "int" | "list" | "set" | "str" | "tuple" => {
            Some(format!("{STDLIB_DOCS}/functions.html#{name}"))
        },
        "None" => Some(format!("{STDLIB_DOCS}/constants.html#None")),
        _ => None,
    }
}
