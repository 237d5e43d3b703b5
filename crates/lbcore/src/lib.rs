// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # lbcore - dynamic type, object and variable system
//!
//! Runtime reflection layer for learning components: heterogeneous values are
//! carried as type-tagged [`Variable`]s, composite values implement
//! [`Object`], and record types can be declared at runtime as dynamic classes.
//! Values and schemas persist to XML.
//!
//! ## Quick Start
//!
//! ```rust
//! use lbcore::types::{double_type, EnumerationBuilder};
//! use lbcore::{xml, ObjectExt, Result, TypeRegistry, Variable};
//!
//! fn main() -> Result<()> {
//!     let registry = TypeRegistry::new();
//!     let color = registry.register(
//!         EnumerationBuilder::new("Color")
//!             .element("Red")
//!             .element("Green")
//!             .element("Blue")
//!             .build()?,
//!     )?;
//!
//!     let point = registry.create_dynamic_class("Point", None)?;
//!     point.add_member(&double_type(), "x")?;
//!     point.add_member(&double_type(), "y")?;
//!     point.add_member(&color, "color")?;
//!
//!     let object = point.create_object()?;
//!     object.set_variable_by_name("x", Variable::double(1.5))?;
//!
//!     let document = xml::save_to_string(&Variable::object(object))?;
//!     let loaded = xml::load_from_str(&registry, &document)?;
//!     let loaded = loaded.as_object().expect("object value");
//!     assert_eq!(loaded.variable(0)?.as_double(), Some(1.5));
//!     assert!(!loaded.variable(1)?.exists());
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! +---------------------------------------------------------------+
//! |  xml       XmlExporter / XmlImporter, documents, files         |
//! +---------------------------------------------------------------+
//! |  object    Object trait, DynamicObject slot storage            |
//! +---------------------------------------------------------------+
//! |  variable  Variable = Type + tagged payload                    |
//! +---------------------------------------------------------------+
//! |  types     Type, Class, Enumeration, templates, TypeRegistry   |
//! +---------------------------------------------------------------+
//! |  names     NameTable string interning                          |
//! +---------------------------------------------------------------+
//! ```
//!
//! ## Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`TypeRegistry`] | Resolves type names, interns classes and template instances |
//! | [`Type`] | Named type: primitive, enumeration or class |
//! | [`Variable`] | Value tagged with its type; may be missing |
//! | [`Object`] | Reflectable composite value |
//! | [`DynamicObject`] | Object storage for runtime-declared classes |
//! | [`xml::XmlExporter`] | Writes variables and schemas |
//! | [`xml::XmlImporter`] | Reads them back |

pub mod config;
pub mod error;
pub mod logging;
pub mod names;
pub mod object;
pub mod types;
pub mod variable;
pub mod xml;

pub use config::{CoreConfig, LoadMode, RuntimeConfig};
pub use error::{Error, Result};
pub use names::NameTable;
pub use object::{DynamicObject, Object, ObjectExt, ObjectPtr, PresentVariables};
pub use types::{get_type, Type, TypeKind, TypePtr, TypeRegistry};
pub use variable::{Variable, VariableValue};
