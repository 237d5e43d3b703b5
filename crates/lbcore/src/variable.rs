// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type-tagged dynamic values.
//!
//! A [`Variable`] pairs a [`VariableValue`] payload with its declared
//! [`Type`](crate::types::Type). The payload tag always agrees with the type's
//! [`StorageKind`]; the only exception is [`VariableValue::Missing`], which any
//! type accepts.
//!
//! Cloning a `Variable` shares referenced objects. Use
//! [`Variable::deep_clone`] to copy them.

use crate::config::RuntimeConfig;
use crate::error::{Error, Result};
use crate::object::ObjectPtr;
use crate::types::{
    boolean_type, double_type, integer_type, string_type, StorageKind, Type, TypePtr,
};
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

/// Payload of a [`Variable`].
#[derive(Debug, Clone)]
pub enum VariableValue {
    /// No value; the missing sentinel of every type.
    Missing,
    Boolean(bool),
    Integer(i64),
    Double(f64),
    /// Element index, always below the enumeration's element count.
    Enumeration(usize),
    String(Arc<str>),
    /// Shared reference to an object.
    Object(ObjectPtr),
}

impl VariableValue {
    fn storage_kind(&self) -> Option<StorageKind> {
        match self {
            Self::Missing => None,
            Self::Boolean(_) => Some(StorageKind::Boolean),
            Self::Integer(_) => Some(StorageKind::Integer),
            Self::Double(_) => Some(StorageKind::Double),
            Self::Enumeration(_) => Some(StorageKind::Enumeration),
            Self::String(_) => Some(StorageKind::String),
            Self::Object(_) => Some(StorageKind::Object),
        }
    }

    /// Order between payloads of unrelated kinds.
    fn rank(&self) -> u8 {
        match self {
            Self::Missing => 0,
            Self::Boolean(_) => 1,
            Self::Integer(_) | Self::Double(_) => 2,
            Self::Enumeration(_) => 3,
            Self::String(_) => 4,
            Self::Object(_) => 5,
        }
    }
}

/// A value tagged with its type.
///
/// # Example
///
/// ```rust
/// use lbcore::Variable;
///
/// let a = Variable::double(1.5);
/// let b = Variable::missing(a.ty());
/// assert!(a.exists());
/// assert!(!b.exists());
/// assert!(b < a);
/// ```
#[derive(Clone)]
pub struct Variable {
    ty: TypePtr,
    value: VariableValue,
}

impl Variable {
    // ------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------

    /// Missing sentinel of `ty`.
    pub fn missing(ty: &TypePtr) -> Self {
        Self {
            ty: ty.clone(),
            value: VariableValue::Missing,
        }
    }

    pub fn boolean(value: bool) -> Self {
        Self {
            ty: boolean_type(),
            value: VariableValue::Boolean(value),
        }
    }

    pub fn integer(value: i64) -> Self {
        Self {
            ty: integer_type(),
            value: VariableValue::Integer(value),
        }
    }

    pub fn double(value: f64) -> Self {
        Self {
            ty: double_type(),
            value: VariableValue::Double(value),
        }
    }

    pub fn string(value: impl Into<Arc<str>>) -> Self {
        Self {
            ty: string_type(),
            value: VariableValue::String(value.into()),
        }
    }

    /// Enumeration value; `index == num_elements` yields the missing sentinel.
    pub fn enumeration(ty: &TypePtr, index: usize) -> Result<Self> {
        Self::with_value(ty, VariableValue::Enumeration(index))
    }

    /// Object variable typed by the object's own class.
    pub fn object(object: ObjectPtr) -> Self {
        Self {
            ty: object.class().clone(),
            value: VariableValue::Object(object),
        }
    }

    /// Object variable with an explicit declared type.
    ///
    /// The class check runs only when `check_object_classes` is enabled in the
    /// runtime configuration (the default in debug builds).
    pub fn object_as(object: ObjectPtr, declared: &TypePtr) -> Result<Self> {
        let storable = matches!(
            declared.storage_kind(),
            StorageKind::Object | StorageKind::Any
        );
        let checked = RuntimeConfig::global().check_object_classes();
        if !storable || (checked && !object.class().inherits_from(declared)) {
            return Err(Error::TypeMismatch {
                expected: declared.name().to_string(),
                found: object.class().name().to_string(),
            });
        }
        Ok(Self {
            ty: declared.clone(),
            value: VariableValue::Object(object),
        })
    }

    /// Build a variable from a raw payload, checking it against `ty`'s storage.
    pub fn with_value(ty: &TypePtr, value: VariableValue) -> Result<Self> {
        let storage = ty.storage_kind();
        let value = match value {
            VariableValue::Enumeration(index) if storage == StorageKind::Enumeration => {
                let len = ty.as_enumeration().map_or(0, |e| e.num_elements());
                let value = match index.cmp(&len) {
                    Ordering::Less => VariableValue::Enumeration(index),
                    Ordering::Equal => VariableValue::Missing,
                    Ordering::Greater => {
                        return Err(Error::InvalidEnumerationIndex {
                            enumeration: ty.name().to_string(),
                            index,
                            len,
                        })
                    }
                };
                return Ok(Self {
                    ty: ty.clone(),
                    value,
                });
            }
            VariableValue::Object(object) if storage == StorageKind::Object => {
                return Self::object_as(object, ty);
            }
            value => value,
        };

        // An enumeration index is meaningless without its enumeration type.
        let consistent = match value.storage_kind() {
            None => true,
            Some(StorageKind::Enumeration) => false,
            Some(_) if storage == StorageKind::Any => true,
            Some(kind) => kind == storage,
        };
        if !consistent {
            return Err(Error::TypeMismatch {
                expected: ty.name().to_string(),
                found: value_kind_name(&value).to_string(),
            });
        }
        Ok(Self {
            ty: ty.clone(),
            value,
        })
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// Declared type.
    pub fn ty(&self) -> &TypePtr {
        &self.ty
    }

    pub fn value(&self) -> &VariableValue {
        &self.value
    }

    pub fn into_value(self) -> VariableValue {
        self.value
    }

    /// False only for the missing sentinel.
    pub fn exists(&self) -> bool {
        !matches!(self.value, VariableValue::Missing)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self.value {
            VariableValue::Boolean(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self.value {
            VariableValue::Integer(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_double(&self) -> Option<f64> {
        match self.value {
            VariableValue::Double(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match &self.value {
            VariableValue::String(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_enumeration(&self) -> Option<usize> {
        match self.value {
            VariableValue::Enumeration(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&ObjectPtr> {
        match &self.value {
            VariableValue::Object(v) => Some(v),
            _ => None,
        }
    }

    /// Label of an enumeration value.
    ///
    /// A missing enumeration value has no label and fails with `IndexOutOfRange`.
    pub fn enumeration_label(&self) -> Result<&str> {
        let enumeration = self.ty.as_enumeration().ok_or_else(|| Error::TypeMismatch {
            expected: "enumeration".into(),
            found: self.ty.name().to_string(),
        })?;
        let index = self.as_enumeration().unwrap_or(enumeration.missing_index());
        enumeration.element_name(index)
    }

    /// True when the value may be stored where `ty` is declared.
    ///
    /// Object values are checked through their dynamic class.
    pub fn is_instance_of(&self, ty: &Type) -> bool {
        match &self.value {
            VariableValue::Object(object) => object.class().inherits_from(ty),
            _ => self.ty.inherits_from(ty),
        }
    }

    // ------------------------------------------------------------------
    // Copy, conversion and comparison
    // ------------------------------------------------------------------

    /// Copy with referenced objects cloned recursively.
    pub fn deep_clone(&self) -> Result<Self> {
        match &self.value {
            VariableValue::Object(object) => Ok(Self {
                ty: self.ty.clone(),
                value: VariableValue::Object(object.clone_object()?),
            }),
            _ => Ok(self.clone()),
        }
    }

    /// Convert to `target`.
    ///
    /// Supported: retagging to an ancestor or to a type with the same storage,
    /// integer to double, boolean or enumeration to integer, and object
    /// downcasts checked against the object's class. Missing converts to the
    /// missing sentinel of `target`.
    pub fn convert_to(&self, target: &TypePtr) -> Result<Self> {
        if !self.exists() {
            return Ok(Self::missing(target));
        }
        if target.storage_kind() == StorageKind::Any {
            return Ok(self.clone());
        }
        let retag = |value: VariableValue| Self {
            ty: target.clone(),
            value,
        };
        let storage = target.storage_kind();
        match (&self.value, storage) {
            (VariableValue::Integer(v), StorageKind::Double) => {
                Ok(retag(VariableValue::Double(*v as f64)))
            }
            (VariableValue::Boolean(v), StorageKind::Integer) => {
                Ok(retag(VariableValue::Integer(i64::from(*v))))
            }
            (VariableValue::Enumeration(v), StorageKind::Integer) => {
                Ok(retag(VariableValue::Integer(*v as i64)))
            }
            (VariableValue::Object(object), StorageKind::Object) => {
                if object.class().inherits_from(target) {
                    Ok(retag(self.value.clone()))
                } else {
                    Err(self.mismatch(target))
                }
            }
            (VariableValue::Enumeration(_), StorageKind::Enumeration) => {
                if self.ty.inherits_from(target) {
                    Ok(retag(self.value.clone()))
                } else {
                    Err(self.mismatch(target))
                }
            }
            (value, storage) if value.storage_kind() == Some(storage) => {
                Ok(retag(value.clone()))
            }
            _ => Err(self.mismatch(target)),
        }
    }

    fn mismatch(&self, target: &TypePtr) -> Error {
        Error::TypeMismatch {
            expected: target.name().to_string(),
            found: self.ty.name().to_string(),
        }
    }

    /// Total order over variables.
    ///
    /// Missing sorts first and all missing values are equal. Numbers compare
    /// by value across integer and double, objects through
    /// [`Object::compare`](crate::Object::compare). Objects of unrelated
    /// classes and payloads of different kinds fall back to a fixed order.
    pub fn compare(&self, other: &Variable) -> Ordering {
        use VariableValue as V;
        match (&self.value, &other.value) {
            (V::Missing, V::Missing) => Ordering::Equal,
            (V::Missing, _) => Ordering::Less,
            (_, V::Missing) => Ordering::Greater,
            (V::Boolean(a), V::Boolean(b)) => a.cmp(b),
            (V::Integer(a), V::Integer(b)) => a.cmp(b),
            (V::Double(a), V::Double(b)) => a.total_cmp(b),
            (V::Integer(a), V::Double(b)) => compare_integer_double(*a, *b),
            (V::Double(a), V::Integer(b)) => compare_integer_double(*b, *a).reverse(),
            (V::Enumeration(a), V::Enumeration(b)) => a
                .cmp(b)
                .then_with(|| self.ty.name().cmp(other.ty.name())),
            (V::String(a), V::String(b)) => a.cmp(b),
            (V::Object(a), V::Object(b)) => {
                if Arc::ptr_eq(a, b) {
                    return Ordering::Equal;
                }
                match a.compare(&**b) {
                    Ok(ordering) => ordering,
                    Err(_) => a
                        .class()
                        .name()
                        .cmp(b.class().name())
                        .then_with(|| Arc::as_ptr(a).cast::<()>().cmp(&Arc::as_ptr(b).cast::<()>())),
                }
            }
            (a, b) => a.rank().cmp(&b.rank()),
        }
    }

    /// Compact rendering: `?` for missing, one-letter codes for enumerations.
    pub fn to_short_string(&self) -> String {
        match &self.value {
            VariableValue::Missing => "?".to_string(),
            VariableValue::Enumeration(index) => self
                .ty
                .as_enumeration()
                .and_then(|e| e.element(*index).ok())
                .map_or_else(|| index.to_string(), |e| e.short_name()),
            VariableValue::Object(object) => object.to_short_string(),
            _ => self.to_string(),
        }
    }
}

/// Exact comparison of an integer with a double.
fn compare_integer_double(a: i64, b: f64) -> Ordering {
    let approx = (a as f64).total_cmp(&b);
    if approx != Ordering::Equal {
        return approx;
    }
    // b is integral here; 2^63 itself is above every i64.
    if b >= 9_223_372_036_854_775_808.0 {
        return Ordering::Less;
    }
    a.cmp(&(b as i64))
}

fn value_kind_name(value: &VariableValue) -> &'static str {
    match value {
        VariableValue::Missing => "Missing",
        VariableValue::Boolean(_) => "Boolean",
        VariableValue::Integer(_) => "Integer",
        VariableValue::Double(_) => "Double",
        VariableValue::Enumeration(_) => "Enumeration",
        VariableValue::String(_) => "String",
        VariableValue::Object(_) => "Object",
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            VariableValue::Missing => f.write_str("Missing"),
            VariableValue::Boolean(v) => write!(f, "{}", v),
            VariableValue::Integer(v) => write!(f, "{}", v),
            VariableValue::Double(v) => write!(f, "{}", v),
            VariableValue::Enumeration(index) => {
                match self.ty.as_enumeration().and_then(|e| e.element_name(*index).ok()) {
                    Some(name) => f.write_str(name),
                    None => write!(f, "#{}", index),
                }
            }
            VariableValue::String(v) => f.write_str(v),
            VariableValue::Object(object) => f.write_str(&object.to_display_string()),
        }
    }
}

impl fmt::Debug for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Variable")
            .field("type", &self.ty.name())
            .field("value", &self.value)
            .finish()
    }
}

impl PartialEq for Variable {
    fn eq(&self, other: &Self) -> bool {
        self.compare(other) == Ordering::Equal
    }
}

impl Eq for Variable {}

impl PartialOrd for Variable {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.compare(other))
    }
}

impl Ord for Variable {
    fn cmp(&self, other: &Self) -> Ordering {
        self.compare(other)
    }
}

impl From<bool> for Variable {
    fn from(value: bool) -> Self {
        Self::boolean(value)
    }
}

impl From<i64> for Variable {
    fn from(value: i64) -> Self {
        Self::integer(value)
    }
}

impl From<i32> for Variable {
    fn from(value: i32) -> Self {
        Self::integer(i64::from(value))
    }
}

impl From<f64> for Variable {
    fn from(value: f64) -> Self {
        Self::double(value)
    }
}

impl From<&str> for Variable {
    fn from(value: &str) -> Self {
        Self::string(value)
    }
}

impl From<String> for Variable {
    fn from(value: String) -> Self {
        Self::string(value)
    }
}

impl From<ObjectPtr> for Variable {
    fn from(value: ObjectPtr) -> Self {
        Self::object(value)
    }
}
