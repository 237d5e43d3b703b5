// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Enumeration types.

use super::{any_type, Type, TypeKind};
use crate::error::{Error, Result};
use crate::names::NameTable;
use std::sync::Arc;

/// Enumeration element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumerationElement {
    name: Arc<str>,
    one_letter_code: Option<char>,
}

impl EnumerationElement {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn one_letter_code(&self) -> Option<char> {
        self.one_letter_code
    }

    /// One-letter code when present, full name otherwise.
    pub fn short_name(&self) -> String {
        match self.one_letter_code {
            Some(code) => code.to_string(),
            None => self.name.to_string(),
        }
    }
}

/// Ordered, fixed set of labels.
///
/// Element `i` is encoded as `i`; the value `num_elements()` is reserved as
/// the missing marker.
#[derive(Debug)]
pub struct Enumeration {
    elements: Vec<EnumerationElement>,
    names: NameTable,
}

impl Enumeration {
    pub fn num_elements(&self) -> usize {
        self.elements.len()
    }

    /// Index encoding "missing" for this enumeration.
    pub fn missing_index(&self) -> usize {
        self.elements.len()
    }

    /// Element at `index`; the missing index has no label.
    pub fn element(&self, index: usize) -> Result<&EnumerationElement> {
        self.elements.get(index).ok_or(Error::IndexOutOfRange {
            index,
            len: self.elements.len(),
        })
    }

    pub fn element_name(&self, index: usize) -> Result<&str> {
        self.element(index).map(EnumerationElement::name)
    }

    pub fn elements(&self) -> &[EnumerationElement] {
        &self.elements
    }

    /// Look up an element by full name, then by one-letter code.
    pub fn find_element(&self, name: &str) -> Option<usize> {
        if let Some(index) = self.names.index_of(name) {
            return Some(index);
        }
        let mut chars = name.chars();
        match (chars.next(), chars.next()) {
            (Some(code), None) => self
                .elements
                .iter()
                .position(|e| e.one_letter_code == Some(code)),
            _ => None,
        }
    }
}

impl PartialEq for Enumeration {
    fn eq(&self, other: &Self) -> bool {
        self.elements == other.elements
    }
}

/// Builder for enumeration types.
///
/// # Example
///
/// ```rust
/// use lbcore::types::EnumerationBuilder;
///
/// let color = EnumerationBuilder::new("Color")
///     .element("Red")
///     .element_with_code("Green", 'g')
///     .element("Blue")
///     .build()
///     .unwrap();
/// let e = color.as_enumeration().unwrap();
/// assert_eq!(e.find_element("g"), Some(1));
/// assert_eq!(e.missing_index(), 3);
/// ```
pub struct EnumerationBuilder {
    name: String,
    elements: Vec<(String, Option<char>)>,
}

impl EnumerationBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            elements: Vec::new(),
        }
    }

    pub fn element(mut self, name: &str) -> Self {
        self.elements.push((name.to_string(), None));
        self
    }

    pub fn element_with_code(mut self, name: &str, code: char) -> Self {
        self.elements.push((name.to_string(), Some(code)));
        self
    }

    pub fn build(self) -> Result<Type> {
        let mut names = NameTable::new();
        let mut elements = Vec::with_capacity(self.elements.len());
        for (name, code) in self.elements {
            if names.index_of(&name).is_some() {
                return Err(Error::DuplicateMemberName {
                    class: self.name,
                    name,
                });
            }
            let index = names.intern(&name);
            elements.push(EnumerationElement {
                name: names.shared_name(index).unwrap_or_else(|| Arc::from(name.as_str())),
                one_letter_code: code,
            });
        }
        Ok(Type::new_raw(
            self.name,
            Some(any_type()),
            Vec::new(),
            TypeKind::Enumeration(Enumeration { elements, names }),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn color() -> Type {
        EnumerationBuilder::new("Color")
            .element_with_code("Red", 'r')
            .element_with_code("Green", 'g')
            .element("Blue")
            .build()
            .expect("color")
    }

    #[test]
    fn test_lookup_by_index_and_name() {
        let ty = color();
        let e = ty.as_enumeration().expect("enumeration");
        assert_eq!(e.num_elements(), 3);
        assert_eq!(e.element_name(2).expect("blue"), "Blue");
        assert_eq!(e.find_element("Green"), Some(1));
        assert_eq!(e.find_element("r"), Some(0));
        assert_eq!(e.find_element("Purple"), None);
    }

    #[test]
    fn test_missing_index_has_no_label() {
        let ty = color();
        let e = ty.as_enumeration().expect("enumeration");
        assert_eq!(e.missing_index(), 3);
        assert!(matches!(
            e.element_name(3),
            Err(Error::IndexOutOfRange { index: 3, len: 3 })
        ));
    }

    #[test]
    fn test_short_name() {
        let ty = color();
        let e = ty.as_enumeration().expect("enumeration");
        assert_eq!(e.element(0).expect("red").short_name(), "r");
        assert_eq!(e.element(2).expect("blue").short_name(), "Blue");
    }

    #[test]
    fn test_duplicate_element_rejected() {
        let err = EnumerationBuilder::new("Dup")
            .element("A")
            .element("A")
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateMemberName { .. }));
    }
}
