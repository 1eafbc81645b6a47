//! Module index loading. The index is the static symbol table produced by an
//! external indexing pass over parsed declarations: docpage never inspects
//! source code or live namespaces, it only consumes this file format.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use walkdir::WalkDir;

use crate::docstring::{DocParam, Docstring};
use crate::error::Error;
use crate::symbols::{
    ClassDef, Entity, EnumDef, EnumMember, FunctionDef, Module, Registry, TypeRef,
};

/// One index file: a list of module tables.
#[derive(Deserialize)]
struct IndexFile {
    #[serde(default)]
    module: Vec<ModuleIndex>,
}

/// A module entry in an index file.
#[derive(Deserialize)]
struct ModuleIndex {
    doc: Option<String>,
    #[serde(default)]
    entity: Vec<EntityIndex>,
    name: String,
}

/// A documentable entity entry. Which optional tables apply depends on
/// `kind`; irrelevant ones are ignored.
#[derive(Deserialize)]
struct EntityIndex {
    #[serde(default)]
    bases: Vec<String>,
    doc: Option<String>,
    #[serde(default)]
    field: Vec<String>,
    kind: EntityKind,
    #[serde(default)]
    member: Vec<MemberIndex>,
    #[serde(default)]
    method: Vec<FunctionIndex>,
    name: String,
    #[serde(default)]
    param: Vec<ParamIndex>,
    returns: Option<String>,
}

/// Entity category tag in the index.
#[derive(Deserialize, Clone, Copy)]
#[serde(rename_all = "lowercase")]
enum EntityKind {
    Class,
    Enum,
    Function,
    Record,
}

/// A method entry under a class or record.
#[derive(Deserialize)]
struct FunctionIndex {
    doc: Option<String>,
    name: String,
    #[serde(default)]
    param: Vec<ParamIndex>,
    returns: Option<String>,
}

/// An enumeration member entry. The optional label is the trailing string
/// literal the indexer found after the member's assignment.
#[derive(Deserialize)]
struct MemberIndex {
    label: Option<String>,
    name: String,
    value: String,
}

/// A documented parameter or record field entry.
#[derive(Deserialize)]
struct ParamIndex {
    doc: Option<String>,
    name: String,
    #[serde(rename = "type")]
    ty: String,
}

/// Load every index file named by `paths` (directories are walked for
/// `.toml` files in sorted order) and register all modules. File order and
/// in-file order define registration order, which the resolver's global
/// pass depends on.
///
/// # Errors
///
/// Returns `Error::IndexNotFound` for a missing path, `Error::TomlDe` for a
/// malformed file, `Error::DuplicateModule` for a repeated module name, or
/// `Error::Io` on read failures.
pub fn load_registry(paths: &[PathBuf]) -> Result<Registry, Error> {
    let mut registry = Registry::new();

    for path in paths {
        if path.is_dir() {
            for entry in WalkDir::new(path)
                .sort_by_file_name()
                .into_iter()
                .filter_map(Result::ok)
                .filter(|e| e.path().extension().is_some_and(|ext| ext == "toml"))
            {
                load_file(&mut registry, entry.path())?;
            }
        } else if path.is_file() {
            load_file(&mut registry, path)?;
        } else {
            return Err(Error::IndexNotFound { path: path.clone() });
        }
    }

    Ok(registry)
}

/// Parse one index file and register its modules.
fn load_file(registry: &mut Registry, path: &Path) -> Result<(), Error> {
    let content = std::fs::read_to_string(path)?;
    let index: IndexFile = toml::from_str(&content)?;
    for module in index.module {
        registry.register(convert_module(module))?;
    }
    log::debug!("loaded index {}", path.display());
    Ok(())
}

fn convert_docstring(
    doc: Option<String>,
    params: Vec<ParamIndex>,
    returns: Option<String>,
) -> Docstring {
    Docstring {
        description: non_blank(doc),
        params: params
            .into_iter()
            .map(|p| DocParam {
                description: p.doc.unwrap_or_default(),
                name: p.name,
                ty: TypeRef::parse(&p.ty),
            })
            .collect(),
        returns: returns.as_deref().map(TypeRef::parse),
    }
}

fn convert_entity(entity: EntityIndex) -> Entity {
    match entity.kind {
        EntityKind::Class | EntityKind::Record => {
            let class = ClassDef {
                bases: entity.bases.iter().map(|b| TypeRef::parse(b)).collect(),
                doc: convert_docstring(entity.doc, entity.param, None),
                fields: entity.field,
                methods: entity.method.into_iter().map(convert_function).collect(),
                name: entity.name,
            };
            match entity.kind {
                EntityKind::Record => Entity::Record(class),
                _ => Entity::Class(class),
            }
        },
        EntityKind::Enum => Entity::Enum(EnumDef {
            doc: convert_docstring(entity.doc, Vec::new(), None),
            members: entity
                .member
                .into_iter()
                .map(|m| EnumMember {
                    label: m.label,
                    name: m.name,
                    value: m.value,
                })
                .collect(),
            name: entity.name,
        }),
        EntityKind::Function => Entity::Function(FunctionDef {
            doc: convert_docstring(entity.doc, entity.param, entity.returns),
            name: entity.name,
        }),
    }
}

fn convert_function(function: FunctionIndex) -> FunctionDef {
    FunctionDef {
        doc: convert_docstring(function.doc, function.param, function.returns),
        name: function.name,
    }
}

fn convert_module(module: ModuleIndex) -> Module {
    Module {
        doc: non_blank(module.doc),
        entities: module.entity.into_iter().map(convert_entity).collect(),
        name: module.name,
    }
}

/// An empty or whitespace-only doc string in the index means no description.
fn non_blank(doc: Option<String>) -> Option<String> {
    doc.filter(|text| !text.trim().is_empty())
}
