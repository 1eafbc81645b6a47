//! Static symbol table: modules, documentable entities, and attribute lookup.
//!
//! The table is built once by the index loader and never mutated during
//! generation. Attribute lookup is restricted to dot-separated identifier
//! paths and fails closed on anything outside that grammar.

use crate::docstring::Docstring;
use crate::error::Error;

/// A class or record declaration. Records are classes whose declared fields
/// are known; plain classes keep `fields` empty.
#[derive(Debug, Clone)]
pub struct ClassDef {
    /// Direct base types, excluding the universal root.
    pub bases: Vec<TypeRef>,
    /// Parsed documentation comment.
    pub doc: Docstring,
    /// Declared field names in declaration order (records only).
    pub fields: Vec<String>,
    /// Methods in declaration order.
    pub methods: Vec<FunctionDef>,
    /// Dotted path within the owning module, e.g. `Outer.Inner`.
    pub name: String,
}

/// An enumeration declaration.
#[derive(Debug, Clone)]
pub struct EnumDef {
    /// Parsed documentation comment.
    pub doc: Docstring,
    /// Members in declaration order.
    pub members: Vec<EnumMember>,
    /// Dotted path within the owning module.
    pub name: String,
}

/// A single enumeration member.
#[derive(Debug, Clone)]
pub struct EnumMember {
    /// Trailing string literal following the member in the declaration body,
    /// captured by the indexing pass (not recoverable from the value alone).
    pub label: Option<String>,
    /// Member name.
    pub name: String,
    /// Literal value as written in the declaration, e.g. `'red'` or `1`.
    pub value: String,
}

/// A documentable entity declared directly in a module.
#[derive(Debug, Clone)]
pub enum Entity {
    /// A plain class with methods.
    Class(ClassDef),
    /// An enumeration.
    Enum(EnumDef),
    /// A free function.
    Function(FunctionDef),
    /// A data-holding type with named fields.
    Record(ClassDef),
}

impl Entity {
    /// True when the entity's own name marks it non-public.
    pub fn is_private(&self) -> bool {
        self.local_name().starts_with('_')
    }

    /// Last segment of the qualified name.
    pub fn local_name(&self) -> &str {
        self.name().rsplit('.').next().unwrap_or_else(|| self.name())
    }

    /// Dotted path of the entity within its owning module.
    pub fn name(&self) -> &str {
        match self {
            Entity::Class(c) | Entity::Record(c) => &c.name,
            Entity::Enum(e) => &e.name,
            Entity::Function(f) => &f.name,
        }
    }
}

/// A function or method declaration. Parameter names, types, and descriptions
/// come from the parsed documentation comment.
#[derive(Debug, Clone)]
pub struct FunctionDef {
    /// Parsed documentation comment, including the parameter table.
    pub doc: Docstring,
    /// Dotted path within the owning module (bare name for free functions).
    pub name: String,
}

/// One loaded code unit and the entities declared directly in it.
#[derive(Debug, Clone)]
pub struct Module {
    /// Module-level description, if any.
    pub doc: Option<String>,
    /// Documentable entities in declaration order.
    pub entities: Vec<Entity>,
    /// Unique dotted name, e.g. `pkg.mod`.
    pub name: String,
}

impl Module {
    /// Evaluate a dot-separated attribute path against this module's
    /// namespace. Matches an entity by its qualified name, or a method as
    /// `Type.path.method`. Fails closed on non-identifier paths.
    pub fn lookup(&self, path: &str) -> Option<Resolved<'_>> {
        if !is_identifier_path(path) {
            return None;
        }

        for entity in &self.entities {
            if entity.name() == path {
                return Some(resolved_entity(self, entity));
            }
        }

        // A trailing segment may name a method of a class or record.
        let (parent, member) = path.rsplit_once('.')?;
        for entity in &self.entities {
            let (Entity::Class(class) | Entity::Record(class)) = entity else {
                continue;
            };
            if class.name == parent && class.methods.iter().any(|m| m.name == member) {
                return Some(Resolved::Function {
                    module: self,
                    qual_name: path.to_string(),
                });
            }
        }

        None
    }

    /// Evaluate a path against a type's own namespace: its directly declared
    /// methods and nested types, not inherited members.
    pub fn lookup_in_type(&self, type_name: &str, path: &str) -> Option<Resolved<'_>> {
        if !is_identifier_path(path) {
            return None;
        }

        let qualified = format!("{type_name}.{path}");
        let has_method = self.entities.iter().any(|entity| {
            let (Entity::Class(class) | Entity::Record(class)) = entity else {
                return false;
            };
            class.name == type_name && class.methods.iter().any(|m| m.name == path)
        });
        if has_method {
            return Some(Resolved::Function {
                module: self,
                qual_name: qualified,
            });
        }

        self.entities
            .iter()
            .find(|e| e.name() == qualified)
            .map(|e| resolved_entity(self, e))
    }
}

/// Immutable snapshot of all loaded modules. Iteration follows registration
/// order, which is the documented deterministic order for the resolver's
/// global pass.
#[derive(Debug, Default)]
pub struct Registry {
    /// Modules in registration order.
    modules: Vec<Module>,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self { modules: Vec::new() }
    }

    /// Find a module by its exact dotted name.
    pub fn get(&self, name: &str) -> Option<&Module> {
        self.modules.iter().find(|m| m.name == name)
    }

    /// All modules in registration order.
    pub fn modules(&self) -> &[Module] {
        &self.modules
    }

    /// Register a module.
    ///
    /// # Errors
    ///
    /// Returns `Error::DuplicateModule` if a module with the same dotted name
    /// is already registered.
    pub fn register(&mut self, module: Module) -> Result<(), Error> {
        if self.get(&module.name).is_some() {
            return Err(Error::DuplicateModule { name: module.name });
        }
        self.modules.push(module);
        Ok(())
    }
}

/// Outcome of attribute-path lookup: a module, a type, or a function.
#[derive(Debug, Clone)]
pub enum Resolved<'a> {
    /// A free function or a method, with its qualified name in the module.
    Function {
        /// Owning module.
        module: &'a Module,
        /// Dotted path within the module.
        qual_name: String,
    },
    /// A whole module.
    Module(&'a Module),
    /// A class, record, or enumeration.
    Type {
        /// Owning module.
        module: &'a Module,
        /// Dotted path within the module.
        qual_name: String,
    },
}

impl Resolved<'_> {
    /// Category-and-name description used in mismatch diagnostics.
    pub fn describe(&self) -> String {
        match self {
            Resolved::Function { module, qual_name } => {
                format!("function `{}.{qual_name}`", module.name)
            },
            Resolved::Module(m) => format!("module `{}`", m.name),
            Resolved::Type { module, qual_name } => {
                format!("type `{}.{qual_name}`", module.name)
            },
        }
    }
}

/// A declared type reference: a plain dotted name or a union of alternatives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeRef {
    /// A builtin or fully-qualified dotted type name.
    Named(String),
    /// A union of two or more alternatives, rendered with the `|` operator.
    Union(Vec<TypeRef>),
}

impl TypeRef {
    /// Parse a declared type string. Unions are written with `|`; everything
    /// else is treated as an opaque name.
    pub fn parse(text: &str) -> Self {
        let parts: Vec<&str> = text.split('|').map(str::trim).collect();
        if parts.len() > 1 {
            TypeRef::Union(
                parts
                    .into_iter()
                    .map(|p| TypeRef::Named(p.to_string()))
                    .collect(),
            )
        } else {
            TypeRef::Named(text.trim().to_string())
        }
    }
}

/// Check that a path is a dot-separated sequence of identifiers.
/// Anything else (calls, subscripts, operators) is outside the documented
/// reference grammar and must not resolve.
fn is_identifier_path(path: &str) -> bool {
    !path.is_empty()
        && path.split('.').all(|segment| {
            let mut chars = segment.chars();
            let Some(first) = chars.next() else {
                return false;
            };
            (first.is_alphabetic() || first == '_')
                && chars.all(|c| c.is_alphanumeric() || c == '_')
        })
}

fn resolved_entity<'a>(module: &'a Module, entity: &'a Entity) -> Resolved<'a> {
    match entity {
        Entity::Function(f) => Resolved::Function {
            module,
            qual_name: f.name.clone(),
        },
        Entity::Class(c) | Entity::Record(c) => Resolved::Type {
            module,
            qual_name: c.name.clone(),
        },
        Entity::Enum(e) => Resolved::Type {
            module,
            qual_name: e.name.clone(),
        },
    }
}
