//! Reference resolution: turns a bare textual symbol reference found in a
//! documentation comment into a concrete entity, searching three nested
//! lexical scopes in a fixed precedence order.

use crate::error::Error;
use crate::symbols::{Module, Registry, Resolved};

/// Lexical context in which a reference string is searched. The global and
/// enclosing-module passes behave identically for every variant; only the
/// Type/Member/Function variants add the enclosing-type pass.
#[derive(Clone, Copy)]
pub enum Scope<'a> {
    /// Inside a free function's documentation at module level.
    FreeFunction {
        /// Function name, used in failure messages.
        func_name: &'a str,
        /// Owning module.
        module: &'a Module,
    },
    /// Inside a method's documentation within a type.
    Function {
        /// Method name, used in failure messages.
        func_name: &'a str,
        /// Owning module.
        module: &'a Module,
        /// Enclosing type's path within the module.
        type_name: &'a str,
    },
    /// Inside a member property's documentation within a type.
    Member {
        /// Member name, used in failure messages.
        member_name: &'a str,
        /// Owning module.
        module: &'a Module,
        /// Enclosing type's path within the module.
        type_name: &'a str,
    },
    /// Inside a module-level documentation comment.
    Module(&'a Module),
    /// Inside a type-level documentation comment.
    Type {
        /// Owning module.
        module: &'a Module,
        /// Enclosing type's path within the module.
        type_name: &'a str,
    },
}

impl<'a> Scope<'a> {
    /// Human-readable context description embedded in resolution errors.
    fn describe(&self) -> String {
        match self {
            Scope::FreeFunction { func_name, module } => {
                format!("function `{func_name}` in module `{}`", module.name)
            },
            Scope::Function { func_name, module, type_name } => format!(
                "function `{func_name}` in class `{type_name}` in module `{}`",
                module.name
            ),
            Scope::Member { member_name, module, type_name } => format!(
                "member `{member_name}` in class `{type_name}` in module `{}`",
                module.name
            ),
            Scope::Module(module) => format!("module `{}`", module.name),
            Scope::Type { module, type_name } => {
                format!("class `{type_name}` in module `{}`", module.name)
            },
        }
    }

    /// The module owning this scope.
    fn module(&self) -> &'a Module {
        match self {
            Scope::FreeFunction { module, .. }
            | Scope::Function { module, .. }
            | Scope::Member { module, .. }
            | Scope::Type { module, .. } => module,
            Scope::Module(module) => module,
        }
    }

    /// The enclosing type namespace, when the scope has one.
    fn type_name(&self) -> Option<&'a str> {
        match self {
            Scope::Function { type_name, .. }
            | Scope::Member { type_name, .. }
            | Scope::Type { type_name, .. } => Some(type_name),
            Scope::FreeFunction { .. } | Scope::Module(_) => None,
        }
    }
}

/// Translates string references to entities within a lexical context.
/// Holds a read-only view of every loaded module for the global pass.
pub struct Resolver<'a> {
    /// Snapshot of all loaded modules, iterated in registration order.
    registry: &'a Registry,
    /// The lexical context references are evaluated in.
    scope: Scope<'a>,
}

impl<'a> Resolver<'a> {
    /// Build a resolver for one lexical context.
    pub fn new(registry: &'a Registry, scope: Scope<'a>) -> Self {
        Self { registry, scope }
    }

    /// Resolve a reference, first hit wins: global pass, enclosing-module
    /// pass, then enclosing-type pass where the scope has a type.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnresolvedReference` naming the reference and the
    /// full context when no pass yields a match. This is a hard stop for the
    /// page being generated: the documentation comment is broken at the
    /// source and re-trying changes nothing.
    pub fn resolve(&self, reference: &str) -> Result<Resolved<'a>, Error> {
        if let Some(hit) = self.resolve_global(reference) {
            return Ok(hit);
        }

        if let Some(hit) = self.scope.module().lookup(reference) {
            return Ok(hit);
        }

        if let Some(type_name) = self.scope.type_name() {
            if let Some(hit) = self.scope.module().lookup_in_type(type_name, reference) {
                return Ok(hit);
            }
        }

        Err(Error::UnresolvedReference {
            context: self.scope.describe(),
            reference: reference.to_string(),
        })
    }

    /// Global pass: exact module-name match, then every registered module
    /// tried as a fully-qualified root. Registration order is the documented
    /// tie-break when a reference is a valid path under more than one root.
    fn resolve_global(&self, reference: &str) -> Option<Resolved<'a>> {
        for module in self.registry.modules() {
            if reference == module.name {
                return Some(Resolved::Module(module));
            }
            let prefix = format!("{}.", module.name);
            if let Some(rest) = reference.strip_prefix(&prefix) {
                if let Some(hit) = module.lookup(rest) {
                    return Some(hit);
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docstring::Docstring;
    use crate::symbols::{ClassDef, Entity, FunctionDef};

    fn class(name: &str, methods: &[&str]) -> ClassDef {
        ClassDef {
            bases: Vec::new(),
            doc: Docstring::default(),
            fields: Vec::new(),
            methods: methods
                .iter()
                .map(|m| FunctionDef {
                    doc: Docstring::default(),
                    name: (*m).to_string(),
                })
                .collect(),
            name: name.to_string(),
        }
    }

    fn registry() -> Registry {
        let mut registry = Registry::new();
        registry
            .register(Module {
                name: "pkg.mod".to_string(),
                doc: None,
                entities: vec![
                    Entity::Class(class("Foo", &["run"])),
                    Entity::Function(FunctionDef {
                        doc: Docstring::default(),
                        name: "helper".to_string(),
                    }),
                ],
            })
            .unwrap();
        registry
            .register(Module {
                name: "pkg.other".to_string(),
                doc: None,
                entities: vec![Entity::Class(class("Bar", &[]))],
            })
            .unwrap();
        registry
    }

    #[test]
    fn exact_module_name_resolves_globally() {
        let registry = registry();
        let module = registry.get("pkg.mod").unwrap();
        let resolver = Resolver::new(&registry, Scope::Module(module));
        assert!(matches!(
            resolver.resolve("pkg.other").unwrap(),
            Resolved::Module(m) if m.name == "pkg.other"
        ));
    }

    #[test]
    fn fully_qualified_reference_resolves_globally() {
        let registry = registry();
        let module = registry.get("pkg.mod").unwrap();
        let resolver = Resolver::new(&registry, Scope::Module(module));
        assert!(matches!(
            resolver.resolve("pkg.other.Bar").unwrap(),
            Resolved::Type { qual_name, .. } if qual_name == "Bar"
        ));
    }

    #[test]
    fn module_local_reference_resolves() {
        let registry = registry();
        let module = registry.get("pkg.mod").unwrap();
        let resolver = Resolver::new(&registry, Scope::Module(module));
        assert!(matches!(
            resolver.resolve("Foo").unwrap(),
            Resolved::Type { qual_name, .. } if qual_name == "Foo"
        ));
    }

    #[test]
    fn type_local_reference_resolves_in_type_scope() {
        let registry = registry();
        let module = registry.get("pkg.mod").unwrap();
        let resolver = Resolver::new(&registry, Scope::Type { module, type_name: "Foo" });
        assert!(matches!(
            resolver.resolve("run").unwrap(),
            Resolved::Function { qual_name, .. } if qual_name == "Foo.run"
        ));
    }

    #[test]
    fn module_hits_are_identical_in_nested_scopes() {
        // Monotonic widening: a reference resolving at module scope must
        // resolve identically under a nested type or member scope.
        let registry = registry();
        let module = registry.get("pkg.mod").unwrap();

        for reference in ["helper", "pkg.other.Bar", "Foo"] {
            let at_module = Resolver::new(&registry, Scope::Module(module))
                .resolve(reference)
                .unwrap();
            let at_member = Resolver::new(
                &registry,
                Scope::Member { member_name: "x", module, type_name: "Foo" },
            )
            .resolve(reference)
            .unwrap();
            assert_eq!(at_module.describe(), at_member.describe());
        }
    }

    #[test]
    fn registration_order_breaks_global_ties() {
        // "pkg" is registered before "pkg.sub", and declares an entity named
        // "sub". The reference "pkg.sub" is a valid path under both roots;
        // the earlier registration wins.
        let mut registry = Registry::new();
        registry
            .register(Module {
                name: "pkg".to_string(),
                doc: None,
                entities: vec![Entity::Class(class("sub", &[]))],
            })
            .unwrap();
        registry
            .register(Module {
                name: "pkg.sub".to_string(),
                doc: None,
                entities: Vec::new(),
            })
            .unwrap();

        let module = registry.get("pkg").unwrap();
        let resolver = Resolver::new(&registry, Scope::Module(module));
        assert!(matches!(
            resolver.resolve("pkg.sub").unwrap(),
            Resolved::Type { qual_name, .. } if qual_name == "sub"
        ));
    }

    #[test]
    fn failure_names_the_reference_and_full_context() {
        let registry = registry();
        let module = registry.get("pkg.mod").unwrap();
        let resolver = Resolver::new(&registry, Scope::Type { module, type_name: "Foo" });
        let message = resolver.resolve("Undefined").unwrap_err().to_string();
        assert!(message.contains("Undefined"));
        assert!(message.contains("Foo"));
        assert!(message.contains("pkg.mod"));
    }

    #[test]
    fn free_function_scope_failure_names_the_function() {
        let registry = registry();
        let module = registry.get("pkg.mod").unwrap();
        let resolver = Resolver::new(
            &registry,
            Scope::FreeFunction { func_name: "helper", module },
        );
        let message = resolver.resolve("Missing").unwrap_err().to_string();
        assert!(message.contains("helper"));
        assert!(message.contains("pkg.mod"));
    }

    #[test]
    fn member_scope_failure_names_the_member() {
        let registry = registry();
        let module = registry.get("pkg.mod").unwrap();
        let resolver = Resolver::new(
            &registry,
            Scope::Member { member_name: "weight", module, type_name: "Foo" },
        );
        let message = resolver.resolve("Missing").unwrap_err().to_string();
        assert!(message.contains("weight"));
        assert!(message.contains("Foo"));
        assert!(message.contains("pkg.mod"));
    }
}
