//! Page generation: derives output paths from dotted module names, renders
//! every requested module, and writes each page in one shot. A run either
//! completes or fails fast on the first resolution error or write failure;
//! pages already written for earlier modules are left in place.

use std::path::Path;

use crate::config::{Config, Layout};
use crate::error::Error;
use crate::naming;
use crate::renderer::{MarkdownWriter, PageRenderer};
use crate::symbols::Registry;

/// File name of the combined page in single-file layout.
const COMBINED_PAGE: &str = "index.md";

/// Generate pages for every requested module, in the order supplied.
/// Returns the number of pages written.
///
/// # Errors
///
/// Returns `Error::UnknownModule` if a requested module is not in the
/// registry, any rendering error (unresolved reference, category mismatch,
/// docstring inconsistency), or `Error::Io` on a write failure.
pub fn generate(
    registry: &Registry,
    requested: &[String],
    config: &Config,
    out_dir: &Path,
) -> Result<usize, Error> {
    let renderer = PageRenderer::new(registry, requested, config);

    match config.layout {
        Layout::PerModule => {
            for name in requested {
                let module = registry.get(name).ok_or_else(|| Error::UnknownModule {
                    name: name.clone(),
                })?;

                let mut w = MarkdownWriter::new();
                renderer.render_module(module, &mut w)?;

                let path = out_dir.join(naming::page_file_path(name));
                if let Some(parent) = path.parent() {
                    std::fs::create_dir_all(parent)?;
                }
                std::fs::write(&path, w.lines().join("\n"))?;
                log::debug!("wrote {}", path.display());
            }
            Ok(requested.len())
        },
        Layout::SingleFile => {
            let mut w = MarkdownWriter::new();
            for name in requested {
                let module = registry.get(name).ok_or_else(|| Error::UnknownModule {
                    name: name.clone(),
                })?;
                renderer.render_module(module, &mut w)?;
            }

            std::fs::create_dir_all(out_dir)?;
            let path = out_dir.join(COMBINED_PAGE);
            std::fs::write(&path, w.lines().join("\n"))?;
            log::debug!("wrote {}", path.display());
            Ok(1)
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docstring::Docstring;
    use crate::symbols::{ClassDef, Entity, Module};

    fn registry() -> Registry {
        let mut registry = Registry::new();
        for name in ["pkg.util", "pkg.sub.inner"] {
            registry
                .register(Module {
                    name: name.to_string(),
                    doc: Some("Module description.".to_string()),
                    entities: vec![Entity::Class(ClassDef {
                        bases: Vec::new(),
                        doc: Docstring::default(),
                        fields: Vec::new(),
                        methods: Vec::new(),
                        name: "Thing".to_string(),
                    })],
                })
                .unwrap();
        }
        registry
    }

    #[test]
    fn pages_land_at_paths_derived_from_dotted_names() {
        let registry = registry();
        let requested = vec!["pkg.util".to_string(), "pkg.sub.inner".to_string()];
        let config = Config::default();
        let out = tempfile::tempdir().unwrap();

        let count = generate(&registry, &requested, &config, out.path()).unwrap();
        assert_eq!(count, 2);
        assert!(out.path().join("pkg/util.md").is_file());
        assert!(out.path().join("pkg/sub/inner.md").is_file());
    }

    #[test]
    fn single_file_layout_writes_one_combined_page() {
        let registry = registry();
        let requested = vec!["pkg.util".to_string(), "pkg.sub.inner".to_string()];
        let config = Config { layout: Layout::SingleFile, ..Config::default() };
        let out = tempfile::tempdir().unwrap();

        let count = generate(&registry, &requested, &config, out.path()).unwrap();
        assert_eq!(count, 1);
        let content = std::fs::read_to_string(out.path().join("index.md")).unwrap();
        assert!(content.contains("pkg.util"));
        assert!(content.contains("pkg.sub.inner"));
    }

    #[test]
    fn unknown_requested_module_is_an_error() {
        let registry = registry();
        let requested = vec!["pkg.missing".to_string()];
        let config = Config::default();
        let out = tempfile::tempdir().unwrap();

        let err = generate(&registry, &requested, &config, out.path()).unwrap_err();
        assert!(matches!(err, Error::UnknownModule { .. }));
    }

    #[test]
    fn generation_is_idempotent() {
        let registry = registry();
        let requested = vec!["pkg.util".to_string()];
        let config = Config::default();
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();

        generate(&registry, &requested, &config, first.path()).unwrap();
        generate(&registry, &requested, &config, second.path()).unwrap();

        let a = std::fs::read(first.path().join("pkg/util.md")).unwrap();
        let b = std::fs::read(second.path().join("pkg/util.md")).unwrap();
        assert_eq!(a, b);
    }
}
