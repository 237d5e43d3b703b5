// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! XML persistence for variables and class schemas.
//!
//! - [`XmlExporter`] / [`XmlImporter`]: tree-level conversion
//! - [`save_to_string`] / [`load_from_str`]: whole documents
//! - [`save_to_file`] / [`load_from_file`]: the same, through the filesystem
//!
//! Template brackets in type names are stored as `[` / `]` inside attributes
//! (`Pair<Integer,Color>` is written `Pair[Integer,Color]`).

mod callback;
mod element;
mod exporter;
mod importer;

pub use callback::{CollectingCallback, LogCallback, MessageCallback};
pub use element::XmlElement;
pub use exporter::XmlExporter;
pub use importer::XmlImporter;

use crate::config::{ENCODED_TEMPLATE_CLOSE, ENCODED_TEMPLATE_OPEN, TEMPLATE_CLOSE, TEMPLATE_OPEN};
use crate::error::Result;
use crate::types::{TypePtr, TypeRegistry};
use crate::variable::Variable;
use std::fs;
use std::path::Path;

const XML_DECLARATION: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>";

/// Replace template brackets so the name fits the attribute convention.
pub fn encode_type_name(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            TEMPLATE_OPEN => ENCODED_TEMPLATE_OPEN,
            TEMPLATE_CLOSE => ENCODED_TEMPLATE_CLOSE,
            c => c,
        })
        .collect()
}

/// Inverse of [`encode_type_name`].
pub fn decode_type_name(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            ENCODED_TEMPLATE_OPEN => TEMPLATE_OPEN,
            ENCODED_TEMPLATE_CLOSE => TEMPLATE_CLOSE,
            c => c,
        })
        .collect()
}

pub(crate) fn to_document(element: &XmlElement, indent: usize) -> String {
    format!("{}\n{}\n", XML_DECLARATION, element.render(indent))
}

/// Serialize `variable` as a complete document.
pub fn save_to_string(variable: &Variable) -> Result<String> {
    let mut exporter = XmlExporter::new();
    let element = exporter.export_variable(variable)?;
    Ok(exporter.to_document(&element))
}

/// Parse a document written by [`save_to_string`].
pub fn load_from_str(registry: &TypeRegistry, input: &str) -> Result<Variable> {
    let element = XmlElement::parse(input)?;
    XmlImporter::new(registry).import_variable(&element)
}

pub fn save_to_file<P: AsRef<Path>>(variable: &Variable, path: P) -> Result<()> {
    crate::trace_fn!("xml::save_to_file");
    let document = save_to_string(variable)?;
    fs::write(path.as_ref(), document)?;
    log::debug!("[xml] variable saved to {}", path.as_ref().display());
    Ok(())
}

pub fn load_from_file<P: AsRef<Path>>(registry: &TypeRegistry, path: P) -> Result<Variable> {
    crate::trace_fn!("xml::load_from_file");
    let content = fs::read_to_string(path.as_ref())?;
    load_from_str(registry, &content)
}

/// Serialize the schema of a class as a standalone document.
pub fn save_class_to_string(ty: &TypePtr) -> Result<String> {
    let mut exporter = XmlExporter::new();
    let element = exporter.class_schema(ty)?;
    Ok(exporter.to_document(&element))
}

/// Rebuild and intern a class from a standalone schema document.
pub fn load_class_from_str(registry: &TypeRegistry, input: &str) -> Result<TypePtr> {
    let element = XmlElement::parse(input)?;
    XmlImporter::new(registry).load_class(&element)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{double_type, ClassBuilder};
    use std::sync::Arc;

    #[test]
    fn test_name_encoding_is_reversible() {
        let name = "Pair<Integer,Pair<Double,Color>>";
        let encoded = encode_type_name(name);
        assert_eq!(encoded, "Pair[Integer,Pair[Double,Color]]");
        assert_eq!(decode_type_name(&encoded), name);
    }

    #[test]
    fn test_document_has_declaration() {
        let document = save_to_string(&Variable::integer(3)).expect("save");
        assert!(document.starts_with(XML_DECLARATION));
        let registry = TypeRegistry::new();
        let v = load_from_str(&registry, &document).expect("load");
        assert_eq!(v.as_integer(), Some(3));
    }

    #[test]
    fn test_class_schema_document() {
        let source = TypeRegistry::new();
        let class = source
            .register(
                ClassBuilder::new("Sample")
                    .member(&double_type(), "weight")
                    .dynamic()
                    .build()
                    .expect("sample"),
            )
            .expect("register");
        let document = save_class_to_string(&class).expect("save");

        let target = TypeRegistry::new();
        let loaded = load_class_from_str(&target, &document).expect("load");
        assert!(loaded.structurally_equal(&class));
        assert!(!Arc::ptr_eq(&loaded, &class));

        // Loading into the defining registry returns the interned class.
        let again = load_class_from_str(&source, &document).expect("reload");
        assert!(Arc::ptr_eq(&again, &class));
    }
}
