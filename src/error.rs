/// Crate-level error types for docpage generation.
use std::path::PathBuf;

/// All errors in docpage carry enough context to point at the documentation
/// text or index entry that must be fixed. Nothing here is retried: every
/// failure stems from static content, so re-running changes nothing.
#[allow(clippy::error_impl_error, reason = "crate-internal error type in binary")]
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A reference tag resolved, but to an entity of the wrong category.
    #[error("expected: {expected}; got: {found} (reference `{reference}`)")]
    CategoryMismatch {
        /// The category the tag promised, e.g. "module reference".
        expected: &'static str,
        /// Description of what the reference actually resolved to.
        found: String,
        /// The reference string inside the tag.
        reference: String,
    },

    /// A record's documented field list does not match its declared fields.
    #[error(
        "documented fields of `{type_name}` do not match declaration: documented [{}], declared [{}]",
        documented.join(", "),
        declared.join(", ")
    )]
    DocstringMismatch {
        /// Field names declared on the record, in declaration order.
        declared: Vec<String>,
        /// Field names present in the documentation comment.
        documented: Vec<String>,
        /// Fully-qualified name of the record type.
        type_name: String,
    },

    /// Two index files (or one file twice) declare the same module name.
    #[error("duplicate module in index: `{name}`")]
    DuplicateModule {
        /// Dotted module name that was registered more than once.
        name: String,
    },

    /// A given index path does not exist on disk.
    #[error("index not found: {}", path.display())]
    IndexNotFound {
        /// Path to the missing index file or directory.
        path: PathBuf,
    },

    /// Underlying I/O error from the filesystem.
    #[error("io: {0}")]
    Io(
        /// The wrapped I/O error.
        #[from]
        std::io::Error,
    ),

    /// TOML deserialization failed while reading an index or config file.
    #[error("toml deserialize: {0}")]
    TomlDe(
        /// The wrapped TOML deserialization error.
        #[from]
        toml::de::Error,
    ),

    /// A module requested on the command line is not present in the index.
    #[error("unknown module: `{name}`")]
    UnknownModule {
        /// Dotted module name that was requested but never indexed.
        name: String,
    },

    /// A documentation reference could not be resolved in any scope.
    #[error("`{reference}` is not defined in the context of {context}")]
    UnresolvedReference {
        /// Human-readable description of the resolution context,
        /// e.g. "class `Foo` in module `pkg.mod`".
        context: String,
        /// The reference string that failed to resolve.
        reference: String,
    },
}
