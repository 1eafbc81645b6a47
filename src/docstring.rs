//! Parsed documentation comments, as produced by the external comment parser
//! and shipped in the module index. This crate never parses raw comment text;
//! it only consumes the structured result and enforces the strict-mode
//! consistency check for records.

use crate::error::Error;
use crate::symbols::{ClassDef, TypeRef};

/// One documented parameter (or record field) from the parameter table.
#[derive(Debug, Clone)]
pub struct DocParam {
    /// Free-form description, subject to reference resolution.
    pub description: String,
    /// Parameter or field name.
    pub name: String,
    /// Declared type.
    pub ty: TypeRef,
}

/// Structured documentation comment: description plus parameter table.
#[derive(Debug, Clone, Default)]
pub struct Docstring {
    /// Full description text, if any.
    pub description: Option<String>,
    /// Documented parameters in documentation order.
    pub params: Vec<DocParam>,
    /// Declared return type, if any.
    pub returns: Option<TypeRef>,
}

/// Strict-mode consistency check: a record's documented field list must match
/// its declared fields exactly. Inconsistency is fatal, never a warning —
/// the remediation is fixing the documentation comment at the source.
///
/// # Errors
///
/// Returns `Error::DocstringMismatch` when the two field sets differ.
pub fn check_fields(module_name: &str, class: &ClassDef) -> Result<(), Error> {
    let documented: Vec<String> = class.doc.params.iter().map(|p| p.name.clone()).collect();

    let mut documented_sorted = documented.clone();
    documented_sorted.sort();
    let mut declared_sorted = class.fields.clone();
    declared_sorted.sort();

    if documented_sorted == declared_sorted {
        Ok(())
    } else {
        Err(Error::DocstringMismatch {
            declared: class.fields.clone(),
            documented,
            type_name: format!("{module_name}.{}", class.name),
        })
    }
}
