// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Error type shared by the registry, variables, objects and XML layers.

/// Errors returned by `lbcore` operations.
///
/// # Example
///
/// ```rust
/// use lbcore::{Error, TypeRegistry};
///
/// let registry = TypeRegistry::new();
/// match registry.get_type("NoSuchType") {
///     Err(Error::UnknownType(name)) => assert_eq!(name, "NoSuchType"),
///     other => panic!("unexpected: {:?}", other),
/// }
/// ```
#[derive(Debug)]
pub enum Error {
    // ========================================================================
    // Registry Errors
    // ========================================================================
    /// Name does not resolve to a registered type or a parseable template instance.
    UnknownType(String),
    /// A different type is already registered under this name.
    TypeRedefinition(String),
    /// Member name already declared by the class or one of its bases.
    DuplicateMemberName { class: String, name: String },
    /// Members can only be appended to dynamic classes.
    SealedClass(String),
    /// Members cannot be appended to a class that already has derived classes.
    LayoutFrozen(String),
    /// No member with this name in the class.
    UnknownMember { class: String, name: String },
    /// Object operation requested on a type that is not a class.
    NotAClass(String),
    /// A non-owning type back-reference outlived its target.
    DanglingType(String),

    // ========================================================================
    // Value Errors
    // ========================================================================
    /// Value type does not inherit from the expected type.
    TypeMismatch { expected: String, found: String },
    /// Member or element index outside the declared range.
    IndexOutOfRange { index: usize, len: usize },
    /// Enumeration index above the missing marker.
    InvalidEnumerationIndex {
        enumeration: String,
        index: usize,
        len: usize,
    },
    /// Comparison between objects of unrelated class lineages.
    IncomparableTypes { left: String, right: String },

    // ========================================================================
    // Serialization Errors
    // ========================================================================
    /// Malformed schema or data during load.
    SerializationFormat(String),
    /// I/O error with underlying cause.
    Io(std::io::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // Registry
            Error::UnknownType(name) => write!(f, "Unknown type: {}", name),
            Error::TypeRedefinition(name) => write!(f, "Type redefinition: {}", name),
            Error::DuplicateMemberName { class, name } => {
                write!(f, "Duplicate member name '{}' in class {}", name, class)
            }
            Error::SealedClass(name) => write!(f, "Class {} is not dynamic", name),
            Error::LayoutFrozen(name) => {
                write!(f, "Class {} has derived classes, its layout is frozen", name)
            }
            Error::UnknownMember { class, name } => {
                write!(f, "Class {} has no member '{}'", class, name)
            }
            Error::NotAClass(name) => write!(f, "Type {} is not a class", name),
            Error::DanglingType(name) => write!(f, "Type {} is no longer alive", name),
            // Value
            Error::TypeMismatch { expected, found } => {
                write!(f, "Type mismatch: expected {}, found {}", expected, found)
            }
            Error::IndexOutOfRange { index, len } => {
                write!(f, "Index out of range: {} >= {}", index, len)
            }
            Error::InvalidEnumerationIndex {
                enumeration,
                index,
                len,
            } => write!(
                f,
                "Invalid index {} for enumeration {} ({} elements)",
                index, enumeration, len
            ),
            Error::IncomparableTypes { left, right } => {
                write!(f, "Cannot compare {} with {}", left, right)
            }
            // Serialization
            Error::SerializationFormat(msg) => write!(f, "Serialization format error: {}", msg),
            Error::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

/// Convenient alias for API results using the crate `Error` type.
pub type Result<T> = core::result::Result<T, Error>;
