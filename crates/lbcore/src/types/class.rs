// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Class layouts: ordered member declarations with positional inheritance.

use super::{object_type, Type, TypeKind, TypePtr};
use crate::error::{Error, Result};
use crate::object::ObjectPtr;
use parking_lot::RwLock;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

/// Factory for classes implemented natively instead of by `DynamicObject`.
pub type ObjectConstructor = Arc<dyn Fn(&TypePtr) -> ObjectPtr + Send + Sync>;

#[derive(Clone)]
enum MemberTypeLink {
    Owned(TypePtr),
    /// Non-owning link used for members whose type contains the class itself.
    Back { target: Weak<Type>, name: Arc<str> },
}

/// A `(type, name)` member declaration.
#[derive(Clone)]
pub struct Member {
    name: Arc<str>,
    ty: MemberTypeLink,
    shared: bool,
}

impl Member {
    pub fn new(ty: &TypePtr, name: &str) -> Self {
        Self {
            name: Arc::from(name),
            ty: MemberTypeLink::Owned(ty.clone()),
            shared: false,
        }
    }

    /// Mark the member as shared: clones keep its object by reference.
    #[must_use]
    pub fn into_shared(mut self) -> Self {
        self.shared = true;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn shared_name(&self) -> Arc<str> {
        self.name.clone()
    }

    /// Declared type of the member.
    pub fn ty(&self) -> Result<TypePtr> {
        match &self.ty {
            MemberTypeLink::Owned(ty) => Ok(ty.clone()),
            MemberTypeLink::Back { target, name } => target
                .upgrade()
                .ok_or_else(|| Error::DanglingType(name.to_string())),
        }
    }

    /// Name of the declared type; available even for a dangling back-reference.
    pub fn type_name(&self) -> &str {
        match &self.ty {
            MemberTypeLink::Owned(ty) => ty.name(),
            MemberTypeLink::Back { name, .. } => name,
        }
    }

    pub fn is_shared(&self) -> bool {
        self.shared
    }

    pub fn is_back_reference(&self) -> bool {
        matches!(self.ty, MemberTypeLink::Back { .. })
    }

    pub(crate) fn strong_type(&self) -> Option<&TypePtr> {
        match &self.ty {
            MemberTypeLink::Owned(ty) => Some(ty),
            MemberTypeLink::Back { .. } => None,
        }
    }

    pub(crate) fn into_back_reference(mut self) -> Self {
        if let MemberTypeLink::Owned(ty) = &self.ty {
            self.ty = MemberTypeLink::Back {
                target: Arc::downgrade(ty),
                name: ty.shared_name(),
            };
        }
        self
    }
}

impl fmt::Debug for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Member")
            .field("name", &self.name)
            .field("type", &self.type_name())
            .field("shared", &self.shared)
            .finish()
    }
}

/// Flattened member table of a class.
///
/// Inherited members come first, in the base's order; a member keeps its
/// index for the lifetime of the class. Once a class has been derived from,
/// its layout is frozen so indices stay valid across the inheritance chain.
pub struct Class {
    members: RwLock<Vec<Member>>,
    num_inherited: usize,
    dynamic: bool,
    derived: AtomicBool,
    constructor: Option<ObjectConstructor>,
}

impl Class {
    pub(crate) fn empty() -> Self {
        Self {
            members: RwLock::new(Vec::new()),
            num_inherited: 0,
            dynamic: false,
            derived: AtomicBool::new(false),
            constructor: None,
        }
    }

    pub fn num_members(&self) -> usize {
        self.members.read().len()
    }

    /// Members copied from the base class at construction.
    pub fn num_inherited_members(&self) -> usize {
        self.num_inherited
    }

    pub fn is_dynamic(&self) -> bool {
        self.dynamic
    }

    /// True once another class has been built on top of this one.
    pub fn has_derived_classes(&self) -> bool {
        self.derived.load(Ordering::Acquire)
    }

    pub fn member(&self, index: usize) -> Result<Member> {
        let members = self.members.read();
        members.get(index).cloned().ok_or(Error::IndexOutOfRange {
            index,
            len: members.len(),
        })
    }

    pub fn member_type(&self, index: usize) -> Result<TypePtr> {
        self.member(index)?.ty()
    }

    pub fn member_name(&self, index: usize) -> Result<Arc<str>> {
        Ok(self.member(index)?.shared_name())
    }

    pub fn member_index(&self, name: &str) -> Option<usize> {
        self.members.read().iter().position(|m| &*m.name == name)
    }

    pub fn is_shared_member(&self, index: usize) -> bool {
        self.members.read().get(index).is_some_and(Member::is_shared)
    }

    /// Snapshot of the member table.
    pub fn members(&self) -> Vec<Member> {
        self.members.read().clone()
    }

    pub(crate) fn constructor(&self) -> Option<&ObjectConstructor> {
        self.constructor.as_ref()
    }

    pub(crate) fn push_member(&self, class_name: &str, member: Member) -> Result<usize> {
        let mut members = self.members.write();
        if self.has_derived_classes() {
            return Err(Error::LayoutFrozen(class_name.to_string()));
        }
        if members.iter().any(|m| m.name == member.name) {
            return Err(Error::DuplicateMemberName {
                class: class_name.to_string(),
                name: member.name.to_string(),
            });
        }
        members.push(member);
        Ok(members.len() - 1)
    }

    /// Flattened layout of a class derived from this one: the current
    /// members followed by `own`.
    ///
    /// Freezes this layout on success. Runs under the member write lock so a
    /// concurrent `push_member` either lands before the copy or fails.
    pub(crate) fn derive_layout(
        &self,
        class_name: &str,
        own: Vec<Member>,
    ) -> Result<Vec<Member>> {
        let guard = self.members.write();
        let mut members = guard.clone();
        for member in own {
            if members.iter().any(|m| m.name == member.name) {
                return Err(Error::DuplicateMemberName {
                    class: class_name.to_string(),
                    name: member.name.to_string(),
                });
            }
            members.push(member);
        }
        self.derived.store(true, Ordering::Release);
        Ok(members)
    }

    pub(crate) fn owned_member_types(&self) -> Vec<TypePtr> {
        self.members
            .read()
            .iter()
            .filter_map(|m| m.strong_type().cloned())
            .collect()
    }

    pub(crate) fn same_layout(&self, other: &Class) -> bool {
        let (a, b) = (self.members.read(), other.members.read());
        a.len() == b.len()
            && a.iter().zip(b.iter()).all(|(x, y)| {
                x.name == y.name && x.type_name() == y.type_name() && x.shared == y.shared
            })
    }
}

impl fmt::Debug for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Class")
            .field("members", &*self.members.read())
            .field("num_inherited", &self.num_inherited)
            .field("dynamic", &self.dynamic)
            .field("derived", &self.has_derived_classes())
            .field("native", &self.constructor.is_some())
            .finish()
    }
}

/// Fluent builder for class types.
///
/// # Example
///
/// ```rust
/// use lbcore::types::{double_type, ClassBuilder};
///
/// let point = ClassBuilder::new("Point2D")
///     .member(&double_type(), "x")
///     .member(&double_type(), "y")
///     .build()
///     .unwrap();
/// assert_eq!(point.num_members(), 2);
/// ```
pub struct ClassBuilder {
    name: String,
    base: Option<TypePtr>,
    members: Vec<Member>,
    dynamic: bool,
    constructor: Option<ObjectConstructor>,
    template_args: Vec<TypePtr>,
}

impl ClassBuilder {
    /// Start a class deriving from the builtin `Object` class.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base: None,
            members: Vec::new(),
            dynamic: false,
            constructor: None,
            template_args: Vec::new(),
        }
    }

    /// Derive from another class; its members are inherited positionally.
    pub fn base(mut self, base: &TypePtr) -> Self {
        self.base = Some(base.clone());
        self
    }

    pub fn member(mut self, ty: &TypePtr, name: &str) -> Self {
        self.members.push(Member::new(ty, name));
        self
    }

    /// Member whose object value is shared, not deep-copied, by `clone_object`.
    pub fn shared_member(mut self, ty: &TypePtr, name: &str) -> Self {
        self.members.push(Member::new(ty, name).into_shared());
        self
    }

    /// Allow members to be appended after construction.
    pub fn dynamic(mut self) -> Self {
        self.dynamic = true;
        self
    }

    /// Build instances with a native implementation.
    pub fn constructor<F>(mut self, constructor: F) -> Self
    where
        F: Fn(&TypePtr) -> ObjectPtr + Send + Sync + 'static,
    {
        self.constructor = Some(Arc::new(constructor));
        self
    }

    pub(crate) fn template_args(mut self, args: Vec<TypePtr>) -> Self {
        self.template_args = args;
        self
    }

    /// Flatten the base members and validate names.
    pub fn build(self) -> Result<Type> {
        let base = self.base.unwrap_or_else(object_type);
        let base_class = base
            .as_class()
            .ok_or_else(|| Error::NotAClass(base.name().to_string()))?;

        let num_own = self.members.len();
        let members = base_class.derive_layout(&self.name, self.members)?;
        let num_inherited = members.len() - num_own;

        let class = Class {
            members: RwLock::new(members),
            num_inherited,
            dynamic: self.dynamic,
            derived: AtomicBool::new(false),
            constructor: self.constructor,
        };
        Ok(Type::new_raw(
            self.name,
            Some(base),
            self.template_args,
            TypeKind::Class(class),
        ))
    }
}
