// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Name-based type registry with structural interning.
//!
//! # Architecture
//!
//! ```text
//! TypeRegistry
//! +-- types: RwLock<HashMap<name, TypePtr>>      (builtins + registered + template instances)
//! +-- templates: DashMap<name, TemplateDeclaration>
//! ```
//!
//! # Thread Safety
//!
//! Lookups take the read lock only. Registration and template instantiation
//! re-check under the write lock, so concurrent registration of one name
//! always resolves to a single interned instance.

use super::template::pair_template;
use super::{
    builtin_types, parse_type_name, ClassBuilder, ParsedTypeName, TemplateDeclaration, Type,
    TypePtr,
};
use crate::error::{Error, Result};
use dashmap::DashMap;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

static GLOBAL_REGISTRY: OnceLock<TypeRegistry> = OnceLock::new();

/// Resolver from type names to interned types.
pub struct TypeRegistry {
    types: RwLock<HashMap<Arc<str>, TypePtr>>,
    templates: DashMap<Arc<str>, Arc<TemplateDeclaration>>,
}

impl TypeRegistry {
    /// Create a registry holding the builtin types and templates only.
    pub fn new() -> Self {
        let registry = Self {
            types: RwLock::new(HashMap::new()),
            templates: DashMap::new(),
        };
        registry.seed();
        registry
    }

    /// The process-wide registry, created on first access.
    pub fn global() -> &'static TypeRegistry {
        GLOBAL_REGISTRY.get_or_init(TypeRegistry::new)
    }

    fn seed(&self) {
        let mut types = self.types.write();
        for ty in builtin_types() {
            types.insert(ty.shared_name(), ty);
        }
        let pair = pair_template();
        self.templates
            .insert(Arc::from(pair.name()), Arc::new(pair));
    }

    /// Drop every non-builtin type and template.
    ///
    /// Types still referenced elsewhere stay alive but are no longer resolvable by name.
    pub fn clear(&self) {
        let dropped = {
            let mut types = self.types.write();
            let count = types.len();
            types.clear();
            count
        };
        self.templates.clear();
        self.seed();
        log::debug!("[registry] cleared ({} entries dropped)", dropped);
    }

    /// Intern `ty` under its name.
    ///
    /// Returns the already registered instance when it is structurally
    /// identical, fails with `TypeRedefinition` otherwise.
    pub fn register(&self, ty: Type) -> Result<TypePtr> {
        self.register_shared(Arc::new(ty))
    }

    /// Intern an already shared type (see [`register`](Self::register)).
    pub fn register_shared(&self, ty: TypePtr) -> Result<TypePtr> {
        let mut types = self.types.write();
        if let Some(existing) = types.get(ty.name()) {
            if existing.structurally_equal(&ty) {
                return Ok(existing.clone());
            }
            log::warn!("[registry] conflicting definition for {}", ty.name());
            return Err(Error::TypeRedefinition(ty.name().to_string()));
        }
        log::debug!("[registry] registered {}", ty.name());
        types.insert(ty.shared_name(), ty.clone());
        Ok(ty)
    }

    /// Create and register an empty dynamic class.
    pub fn create_dynamic_class(&self, name: &str, base: Option<&TypePtr>) -> Result<TypePtr> {
        let mut builder = ClassBuilder::new(name).dynamic();
        if let Some(base) = base {
            builder = builder.base(base);
        }
        self.register(builder.build()?)
    }

    /// Remove a type from the name index.
    pub fn unregister(&self, name: &str) -> Option<TypePtr> {
        self.types.write().remove(name)
    }

    /// Registered type with exactly this name (no template parsing).
    pub fn find_type(&self, name: &str) -> Option<TypePtr> {
        self.types.read().get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.read().contains_key(name)
    }

    /// Resolve a type by name, instantiating templates on demand.
    pub fn get_type(&self, name: &str) -> Result<TypePtr> {
        if let Some(ty) = self.find_type(name) {
            return Ok(ty);
        }
        let parsed = parse_type_name(name)?;
        if !parsed.is_template_instance() {
            // Tolerate surrounding whitespace in plain names.
            return self
                .find_type(&parsed.name)
                .ok_or_else(|| Error::UnknownType(name.to_string()));
        }
        self.resolve(&parsed)
    }

    fn resolve(&self, parsed: &ParsedTypeName) -> Result<TypePtr> {
        if !parsed.is_template_instance() {
            return self
                .find_type(&parsed.name)
                .ok_or_else(|| Error::UnknownType(parsed.name.clone()));
        }
        let args = parsed
            .arguments
            .iter()
            .map(|arg| self.resolve(arg))
            .collect::<Result<Vec<_>>>()?;
        self.instantiate(&parsed.name, &args)
    }

    /// Declare a template; instances are created by [`instantiate`](Self::instantiate)
    /// or by `get_type("Name<...>")`.
    pub fn declare_template(&self, declaration: TemplateDeclaration) -> Result<()> {
        let name: Arc<str> = Arc::from(declaration.name());
        match self.templates.entry(name) {
            dashmap::mapref::entry::Entry::Occupied(entry) => {
                Err(Error::TypeRedefinition(entry.key().to_string()))
            }
            dashmap::mapref::entry::Entry::Vacant(entry) => {
                log::debug!("[registry] template {} declared", entry.key());
                entry.insert(Arc::new(declaration));
                Ok(())
            }
        }
    }

    pub fn has_template(&self, name: &str) -> bool {
        self.templates.contains_key(name)
    }

    /// Interned instance of `template` for `args`.
    pub fn instantiate(&self, template: &str, args: &[TypePtr]) -> Result<TypePtr> {
        let declaration = self
            .templates
            .get(template)
            .map(|d| d.value().clone())
            .ok_or_else(|| Error::UnknownType(template.to_string()))?;

        let name = declaration.instance_name(args);
        if let Some(existing) = self.find_type(&name) {
            return Ok(existing);
        }

        let instance = Arc::new(declaration.instantiate(args)?);
        let mut types = self.types.write();
        let interned = types
            .entry(instance.shared_name())
            .or_insert_with(|| instance.clone())
            .clone();
        if Arc::ptr_eq(&interned, &instance) {
            log::debug!("[registry] instantiated {}", name);
        }
        Ok(interned)
    }

    /// Number of resolvable names.
    pub fn len(&self) -> usize {
        self.types.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.read().is_empty()
    }

    /// Registered names, sorted for determinism.
    pub fn type_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.types.read().keys().map(|k| k.to_string()).collect();
        names.sort();
        names
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolve a type through the global registry.
pub fn get_type(name: &str) -> Result<TypePtr> {
    TypeRegistry::global().get_type(name)
}
