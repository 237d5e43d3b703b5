// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Runtime type descriptions.
//!
//! Every value handled by the core is tagged with a [`Type`]. Types form a
//! single-inheritance chain rooted at the builtin `Variable` type:
//!
//! ```text
//! Variable
//! +-- Boolean
//! +-- Integer -- PositiveInteger
//! +-- Double  -- Probability
//! +-- String
//! +-- <enumerations>
//! +-- Object  -- <classes, template instances, dynamic classes>
//! ```
//!
//! Types are shared as [`TypePtr`] (`Arc<Type>`) and interned by name in a
//! [`TypeRegistry`], so identity comparison is a pointer comparison.

mod builtin;
mod class;
mod enumeration;
mod registry;
mod template;

pub use builtin::{
    any_type, boolean_type, builtin_types, double_type, integer_type, object_type,
    positive_integer_type, probability_type, string_type,
};
pub use class::{Class, ClassBuilder, Member, ObjectConstructor};
pub use enumeration::{Enumeration, EnumerationBuilder, EnumerationElement};
pub use registry::{get_type, TypeRegistry};
pub use template::{parse_type_name, ParsedTypeName, TemplateDeclaration};

use crate::error::{Error, Result};
use crate::object::{DynamicObject, ObjectPtr};
use crate::variable::Variable;
use std::fmt;
use std::sync::Arc;

/// Shared handle on a type.
pub type TypePtr = Arc<Type>;

/// Primitive payload kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Boolean,
    Integer,
    Double,
    String,
}

/// How values of a type are stored inside a `Variable`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKind {
    /// The root type: accepts any payload.
    Any,
    Boolean,
    Integer,
    Double,
    String,
    Enumeration,
    Object,
}

/// Type kind.
#[derive(Debug)]
pub enum TypeKind {
    /// Universal root type.
    Any,
    /// Scalar or string type.
    Primitive(PrimitiveKind),
    /// Fixed ordered set of labels.
    Enumeration(Enumeration),
    /// Composite object layout.
    Class(Class),
}

/// A named, possibly template-instantiated, type.
pub struct Type {
    name: Arc<str>,
    base: Option<TypePtr>,
    template_args: Vec<TypePtr>,
    kind: TypeKind,
}

impl Type {
    pub(crate) fn new_raw(
        name: impl Into<Arc<str>>,
        base: Option<TypePtr>,
        template_args: Vec<TypePtr>,
        kind: TypeKind,
    ) -> Self {
        Self {
            name: name.into(),
            base,
            template_args,
            kind,
        }
    }

    /// Create a primitive type deriving from another primitive type.
    ///
    /// The new type stores its values exactly like `base`.
    pub fn derived_primitive(name: impl Into<Arc<str>>, base: &TypePtr) -> Result<Self> {
        match base.kind {
            TypeKind::Primitive(kind) => Ok(Self::new_raw(
                name,
                Some(base.clone()),
                Vec::new(),
                TypeKind::Primitive(kind),
            )),
            _ => Err(Error::TypeMismatch {
                expected: "primitive".into(),
                found: base.name.to_string(),
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn shared_name(&self) -> Arc<str> {
        self.name.clone()
    }

    /// Parent type; `None` only for the root `Variable` type.
    pub fn base(&self) -> Option<&TypePtr> {
        self.base.as_ref()
    }

    /// Template arguments, empty for non-generic types.
    pub fn template_args(&self) -> &[TypePtr] {
        &self.template_args
    }

    pub fn kind(&self) -> &TypeKind {
        &self.kind
    }

    pub fn storage_kind(&self) -> StorageKind {
        match &self.kind {
            TypeKind::Any => StorageKind::Any,
            TypeKind::Primitive(PrimitiveKind::Boolean) => StorageKind::Boolean,
            TypeKind::Primitive(PrimitiveKind::Integer) => StorageKind::Integer,
            TypeKind::Primitive(PrimitiveKind::Double) => StorageKind::Double,
            TypeKind::Primitive(PrimitiveKind::String) => StorageKind::String,
            TypeKind::Enumeration(_) => StorageKind::Enumeration,
            TypeKind::Class(_) => StorageKind::Object,
        }
    }

    pub fn as_enumeration(&self) -> Option<&Enumeration> {
        match &self.kind {
            TypeKind::Enumeration(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_class(&self) -> Option<&Class> {
        match &self.kind {
            TypeKind::Class(c) => Some(c),
            _ => None,
        }
    }

    pub fn is_class(&self) -> bool {
        matches!(self.kind, TypeKind::Class(_))
    }

    pub fn is_enumeration(&self) -> bool {
        matches!(self.kind, TypeKind::Enumeration(_))
    }

    /// True for classes whose member list may still grow.
    pub fn is_dynamic_class(&self) -> bool {
        self.as_class().is_some_and(Class::is_dynamic)
    }

    /// True iff `other` is `self` or one of its ancestors.
    pub fn inherits_from(&self, other: &Type) -> bool {
        let mut current = Some(self);
        while let Some(ty) = current {
            if std::ptr::eq(ty, other) {
                return true;
            }
            current = ty.base.as_deref();
        }
        false
    }

    /// The missing-value variable of this type.
    pub fn create(self: &Arc<Self>) -> Variable {
        Variable::missing(self)
    }

    /// Create an object of this class, every member missing.
    ///
    /// Classes carrying an [`ObjectConstructor`] build their native
    /// implementation, all others get a [`DynamicObject`].
    pub fn create_object(self: &Arc<Self>) -> Result<ObjectPtr> {
        let class = self.class_or_err()?;
        match class.constructor() {
            Some(constructor) => Ok((**constructor)(self)),
            None => Ok(Arc::new(DynamicObject::new(self.clone()))),
        }
    }

    fn class_or_err(&self) -> Result<&Class> {
        self.as_class()
            .ok_or_else(|| Error::NotAClass(self.name.to_string()))
    }

    // ------------------------------------------------------------------
    // Class member access
    // ------------------------------------------------------------------

    /// Number of members, inherited ones included; `0` for non-class types.
    pub fn num_members(&self) -> usize {
        self.as_class().map_or(0, Class::num_members)
    }

    pub fn member(&self, index: usize) -> Result<Member> {
        self.class_or_err()?.member(index)
    }

    pub fn member_type(&self, index: usize) -> Result<TypePtr> {
        self.class_or_err()?.member_type(index)
    }

    pub fn member_name(&self, index: usize) -> Result<Arc<str>> {
        self.class_or_err()?.member_name(index)
    }

    pub fn member_index(&self, name: &str) -> Option<usize> {
        self.as_class()?.member_index(name)
    }

    /// True when clones keep this member's object by reference.
    pub fn is_shared_member(&self, index: usize) -> bool {
        self.as_class().is_some_and(|c| c.is_shared_member(index))
    }

    /// Append a member to a dynamic class, returning its index.
    ///
    /// Fails with `LayoutFrozen` once another class has been derived from
    /// this one.
    pub fn add_member(&self, ty: &TypePtr, name: &str) -> Result<usize> {
        self.add_member_with(Member::new(ty, name))
    }

    /// Append a member whose object value is shared between clones.
    pub fn add_shared_member(&self, ty: &TypePtr, name: &str) -> Result<usize> {
        self.add_member_with(Member::new(ty, name).into_shared())
    }

    fn add_member_with(&self, member: Member) -> Result<usize> {
        let class = self.class_or_err()?;
        if !class.is_dynamic() {
            return Err(Error::SealedClass(self.name.to_string()));
        }
        // Members pointing back at this class are stored as weak links.
        let member = match member.strong_type() {
            Some(ty) if ty.reaches(self) => member.into_back_reference(),
            _ => member,
        };
        let index = class.push_member(&self.name, member)?;
        log::debug!("[types] {}: member #{} added", self.name, index);
        Ok(index)
    }

    /// True when `target` is reachable from `self` through owned member types.
    fn reaches(&self, target: &Type) -> bool {
        let mut visited: Vec<*const Type> = Vec::new();
        let mut stack: Vec<TypePtr> = Vec::new();
        if std::ptr::eq(self, target) {
            return true;
        }
        if let Some(class) = self.as_class() {
            stack.extend(class.owned_member_types());
        }
        while let Some(ty) = stack.pop() {
            if std::ptr::eq(ty.as_ref(), target) {
                return true;
            }
            let ptr = Arc::as_ptr(&ty);
            if visited.contains(&ptr) {
                continue;
            }
            visited.push(ptr);
            if let Some(class) = ty.as_class() {
                stack.extend(class.owned_member_types());
            }
        }
        false
    }

    /// Structural identity: same name, base, template arguments and layout.
    ///
    /// Member types are compared by name, so self-referential classes do not recurse.
    pub fn structurally_equal(&self, other: &Type) -> bool {
        if std::ptr::eq(self, other) {
            return true;
        }
        if self.name != other.name
            || self.base.as_ref().map(|b| b.name.clone()) != other.base.as_ref().map(|b| b.name.clone())
            || self.template_args.len() != other.template_args.len()
        {
            return false;
        }
        let same_args = self
            .template_args
            .iter()
            .zip(&other.template_args)
            .all(|(a, b)| a.name == b.name);
        if !same_args {
            return false;
        }
        match (&self.kind, &other.kind) {
            (TypeKind::Any, TypeKind::Any) => true,
            (TypeKind::Primitive(a), TypeKind::Primitive(b)) => a == b,
            (TypeKind::Enumeration(a), TypeKind::Enumeration(b)) => a == b,
            (TypeKind::Class(a), TypeKind::Class(b)) => a.same_layout(b),
            _ => false,
        }
    }
}

impl fmt::Debug for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match &self.kind {
            TypeKind::Any => "any",
            TypeKind::Primitive(_) => "primitive",
            TypeKind::Enumeration(_) => "enumeration",
            TypeKind::Class(c) if c.is_dynamic() => "dynamic class",
            TypeKind::Class(_) => "class",
        };
        f.debug_struct("Type")
            .field("name", &self.name)
            .field("kind", &kind)
            .field("base", &self.base.as_ref().map(|b| b.name()))
            .finish()
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
