// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Reflective composite values.
//!
//! [`Object`] is the interface every composite value implements: indexed
//! member access boxed through [`Variable`], deep cloning, ordering and XML
//! persistence. Every method except member get/set has a default built on top
//! of those two, so a native class only implements storage.
//!
//! [`DynamicObject`] is the generic implementation backing classes that carry
//! no native constructor.

mod dynamic_object;

pub use dynamic_object::DynamicObject;

use crate::error::{Error, Result};
use crate::types::TypePtr;
use crate::variable::{Variable, VariableValue};
use crate::xml::{XmlElement, XmlExporter, XmlImporter};
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

/// Shared handle on an object.
pub type ObjectPtr = Arc<dyn Object>;

/// Reflectable composite value.
///
/// Implementations use interior mutability for [`set_variable`](Object::set_variable);
/// concurrent writers must still synchronize externally to keep multi-member
/// updates consistent.
pub trait Object: Send + Sync + fmt::Debug {
    /// Class describing the member layout.
    fn class(&self) -> &TypePtr;

    /// Number of members, equal to the class member count.
    fn num_variables(&self) -> usize {
        self.class().num_members()
    }

    /// Value of member `index`; the member type's missing sentinel when unset.
    fn variable(&self, index: usize) -> Result<Variable>;

    /// Store `value` into member `index`.
    ///
    /// Fails with `TypeMismatch` unless `value` is an instance of the declared
    /// member type.
    fn set_variable(&self, index: usize, value: Variable) -> Result<()>;

    /// Deep copy; member objects are cloned unless declared shared.
    fn clone_object(&self) -> Result<ObjectPtr> {
        clone_members(self)
    }

    /// Member-wise ordering.
    ///
    /// Members are compared in declaration order and the first difference
    /// decides; a missing member sorts before a present one. Classes must be
    /// in the same inheritance line or share the same layout (the same class
    /// loaded into another registry), otherwise this fails with
    /// `IncomparableTypes`.
    fn compare(&self, other: &dyn Object) -> Result<Ordering> {
        compare_members(self, other)
    }

    /// `Class{member=value, ...}` over present members.
    fn to_display_string(&self) -> String {
        render(self, false)
    }

    /// Compact form, present member values only.
    fn to_short_string(&self) -> String {
        render(self, true)
    }

    /// Write the members into `element`.
    fn save_to_xml(&self, exporter: &mut XmlExporter, element: &mut XmlElement) -> Result<()> {
        exporter.write_members(self, element)
    }

    /// Read members from `element`; members without an entry stay missing.
    fn load_from_xml(&self, importer: &mut XmlImporter<'_>, element: &XmlElement) -> Result<()> {
        importer.read_members(self, element)
    }
}

fn clone_members<O: Object + ?Sized>(this: &O) -> Result<ObjectPtr> {
    let class = this.class();
    let copy = class.create_object()?;
    for index in 0..this.num_variables() {
        let value = this.variable(index)?;
        if !value.exists() {
            continue;
        }
        let value = if class.is_shared_member(index) {
            value
        } else {
            value.deep_clone()?
        };
        copy.set_variable(index, value)?;
    }
    Ok(copy)
}

fn compare_members<O: Object + ?Sized>(this: &O, other: &dyn Object) -> Result<Ordering> {
    let (left, right) = (this.class(), other.class());
    let related = left.inherits_from(right)
        || right.inherits_from(left)
        || left.structurally_equal(right);
    if !related {
        return Err(Error::IncomparableTypes {
            left: left.name().to_string(),
            right: right.name().to_string(),
        });
    }
    let (n_left, n_right) = (this.num_variables(), other.num_variables());
    for index in 0..n_left.max(n_right) {
        let a = if index < n_left {
            Some(this.variable(index)?)
        } else {
            None
        };
        let b = if index < n_right {
            Some(other.variable(index)?)
        } else {
            None
        };
        let a_present = a.as_ref().is_some_and(Variable::exists);
        let b_present = b.as_ref().is_some_and(Variable::exists);
        let ordering = match (a, b) {
            (Some(a), Some(b)) if a_present && b_present => a.compare(&b),
            _ => a_present.cmp(&b_present),
        };
        if ordering != Ordering::Equal {
            return Ok(ordering);
        }
    }
    Ok(Ordering::Equal)
}

fn render<O: Object + ?Sized>(this: &O, short: bool) -> String {
    let class = this.class();
    let entries: Vec<String> = this
        .variables()
        .map(|(index, value)| {
            if short {
                value.to_short_string()
            } else {
                let name = class
                    .member_name(index)
                    .map_or_else(|_| index.to_string(), |n| n.to_string());
                format!("{}={}", name, value)
            }
        })
        .collect();
    if short {
        format!("{{{}}}", entries.join(", "))
    } else {
        format!("{}{{{}}}", class.name(), entries.join(", "))
    }
}

/// Lazy iterator over the present members of an object, in ascending index.
///
/// Members that cannot be read are skipped; the iterator never fails.
pub struct PresentVariables<'a, O: ?Sized> {
    object: &'a O,
    next: usize,
    end: usize,
}

impl<O: Object + ?Sized> Iterator for PresentVariables<'_, O> {
    type Item = (usize, Variable);

    fn next(&mut self) -> Option<Self::Item> {
        while self.next < self.end {
            let index = self.next;
            self.next += 1;
            match self.object.variable(index) {
                Ok(value) if value.exists() => return Some((index, value)),
                _ => {}
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.end - self.next))
    }
}

/// Convenience accessors available on every [`Object`].
pub trait ObjectExt: Object {
    /// Present members as `(index, value)`; each call restarts from index 0.
    fn variables(&self) -> PresentVariables<'_, Self> {
        PresentVariables {
            object: self,
            next: 0,
            end: self.num_variables(),
        }
    }

    fn num_present_variables(&self) -> usize {
        self.variables().count()
    }

    fn variable_by_name(&self, name: &str) -> Result<Variable> {
        let index = member_index_or_err(self.class(), name)?;
        self.variable(index)
    }

    fn set_variable_by_name(&self, name: &str, value: Variable) -> Result<()> {
        let index = member_index_or_err(self.class(), name)?;
        self.set_variable(index, value)
    }

    /// Member `index` as an object, `None` when missing or not an object.
    fn object_variable(&self, index: usize) -> Result<Option<ObjectPtr>> {
        Ok(match self.variable(index)?.into_value() {
            VariableValue::Object(object) => Some(object),
            _ => None,
        })
    }
}

impl<O: Object + ?Sized> ObjectExt for O {}

fn member_index_or_err(class: &TypePtr, name: &str) -> Result<usize> {
    class.member_index(name).ok_or_else(|| Error::UnknownMember {
        class: class.name().to_string(),
        name: name.to_string(),
    })
}
