// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Variable, object and schema export.
//!
//! # Wire format
//!
//! ```text
//! <variable type="Double">1.5</variable>
//!
//! <variable>
//!   <class name="Point" base="Object">          dynamic class: schema inlined once
//!     <variable name="x" type="Double"/>
//!     <variable name="color" type="Color"/>
//!   </class>
//!   <member index="0" name="x">1.5</member>     present members only
//! </variable>
//!
//! <variable type="Pair[Point,Integer]">         dynamic template arguments:
//!   <class name="Point" base="Object">...</class>   schemas precede the name
//!   <member index="0" name="first">...</member>
//! </variable>
//! ```
//!
//! Type information on a member entry is written only when the value's type
//! differs from the declared member type.

use super::{encode_type_name, to_document, XmlElement};
use crate::config::{
    CoreConfig, RuntimeConfig, ATTR_BASE, ATTR_INDEX, ATTR_MISSING, ATTR_NAME, ATTR_SHARED,
    ATTR_TYPE, TAG_CLASS, TAG_MEMBER, TAG_VARIABLE,
};
use crate::error::{Error, Result};
use crate::object::{Object, ObjectExt};
use crate::types::{boolean_type, double_type, integer_type, string_type, StorageKind, TypePtr};
use crate::variable::{Variable, VariableValue};
use std::collections::HashMap;
use std::sync::Arc;

/// Builds XML trees from variables and class schemas.
///
/// A dynamic class schema is inlined the first time the class is referenced;
/// later references in the same exporter use its name. Use one exporter per
/// document, or call [`reset`](Self::reset) between documents.
pub struct XmlExporter {
    config: CoreConfig,
    /// Keyed by address; holding the type keeps the address from being reused.
    written_classes: HashMap<usize, TypePtr>,
}

impl XmlExporter {
    /// Exporter using the process-wide defaults.
    pub fn new() -> Self {
        Self::with_config(RuntimeConfig::global().get())
    }

    pub fn with_config(config: CoreConfig) -> Self {
        Self {
            config,
            written_classes: HashMap::new(),
        }
    }

    pub fn config(&self) -> &CoreConfig {
        &self.config
    }

    /// Forget which schemas were already written.
    pub fn reset(&mut self) {
        self.written_classes.clear();
    }

    /// Root `<variable>` element for `variable`.
    pub fn export_variable(&mut self, variable: &Variable) -> Result<XmlElement> {
        crate::trace_fn!("XmlExporter::export_variable");
        let mut element = XmlElement::new(TAG_VARIABLE);
        self.write_variable(&mut element, variable, None)?;
        Ok(element)
    }

    /// Full `<class>` schema of `ty`, whether or not it is dynamic.
    pub fn class_schema(&mut self, ty: &TypePtr) -> Result<XmlElement> {
        crate::trace_fn!("XmlExporter::class_schema");
        self.write_class(ty)
    }

    /// Render `element` as a complete document.
    pub fn to_document(&self, element: &XmlElement) -> String {
        to_document(element, self.config.indent)
    }

    /// Write `variable` into `element`.
    ///
    /// `declared` is the type the reader already knows for this slot; type
    /// information is omitted when the value's type is exactly that type.
    pub fn write_variable(
        &mut self,
        element: &mut XmlElement,
        variable: &Variable,
        declared: Option<&TypePtr>,
    ) -> Result<()> {
        let effective = effective_type(variable);
        if !declared.is_some_and(|d| Arc::ptr_eq(d, &effective)) {
            self.write_type_reference(element, &effective)?;
        }

        match variable.value() {
            VariableValue::Missing => element.set_attribute(ATTR_MISSING, "true"),
            VariableValue::Boolean(v) => element.set_text(if *v { "true" } else { "false" }),
            VariableValue::Integer(v) => element.set_text(v.to_string()),
            // Debug formatting is the shortest string that parses back exactly.
            VariableValue::Double(v) => element.set_text(format!("{:?}", v)),
            VariableValue::Enumeration(index) => {
                let label = effective
                    .as_enumeration()
                    .and_then(|e| e.element_name(*index).ok())
                    .map_or_else(|| index.to_string(), str::to_string);
                element.set_text(label);
            }
            VariableValue::String(v) => element.set_text(v.to_string()),
            VariableValue::Object(object) => object.save_to_xml(self, element)?,
        }
        Ok(())
    }

    /// Append one `<member>` entry per present member of `object`.
    pub fn write_members<O: Object + ?Sized>(
        &mut self,
        object: &O,
        element: &mut XmlElement,
    ) -> Result<()> {
        let class = object.class();
        for (index, value) in object.variables() {
            let mut entry =
                XmlElement::new(TAG_MEMBER).with_attribute(ATTR_INDEX, index.to_string());
            if self.config.write_member_names {
                entry.set_attribute(ATTR_NAME, &*class.member_name(index)?);
            }
            let declared = class.member_type(index)?;
            self.write_variable(&mut entry, &value, Some(&declared))?;
            element.add_child(entry);
        }
        Ok(())
    }

    fn write_type_reference(&mut self, element: &mut XmlElement, ty: &TypePtr) -> Result<()> {
        self.write_type_attribute(element, ty, ATTR_TYPE)
    }

    /// `attr` naming `ty`, or an inline schema for a dynamic class not written yet.
    ///
    /// Schemas of dynamic template arguments are inlined ahead of the name.
    fn write_type_attribute(
        &mut self,
        element: &mut XmlElement,
        ty: &TypePtr,
        attr: &str,
    ) -> Result<()> {
        if ty.is_dynamic_class() && !self.is_written(ty) {
            let schema = self.write_class(ty)?;
            element.add_child(schema);
            return Ok(());
        }
        self.write_argument_schemas(element, ty)?;
        element.set_attribute(attr, encode_type_name(ty.name()));
        Ok(())
    }

    fn write_argument_schemas(&mut self, element: &mut XmlElement, ty: &TypePtr) -> Result<()> {
        for arg in ty.template_args() {
            if arg.is_dynamic_class() && !self.is_written(arg) {
                let schema = self.write_class(arg)?;
                element.add_child(schema);
            } else {
                self.write_argument_schemas(element, arg)?;
            }
        }
        Ok(())
    }

    fn write_class(&mut self, ty: &TypePtr) -> Result<XmlElement> {
        let class = ty
            .as_class()
            .ok_or_else(|| Error::NotAClass(ty.name().to_string()))?;
        // Marked before the members so self-references are written by name.
        self.written_classes.insert(class_key(ty), ty.clone());

        let mut element =
            XmlElement::new(TAG_CLASS).with_attribute(ATTR_NAME, encode_type_name(ty.name()));
        if let Some(base) = ty.base() {
            self.write_type_attribute(&mut element, base, ATTR_BASE)?;
        }

        for member in class
            .members()
            .into_iter()
            .skip(class.num_inherited_members())
        {
            let mut entry = XmlElement::new(TAG_VARIABLE).with_attribute(ATTR_NAME, member.name());
            let member_type = member.ty()?;
            self.write_type_reference(&mut entry, &member_type)?;
            if member.is_shared() {
                entry.set_attribute(ATTR_SHARED, "true");
            }
            element.add_child(entry);
        }
        log::debug!("[xml] schema of {} written", ty.name());
        Ok(element)
    }

    fn is_written(&self, ty: &TypePtr) -> bool {
        self.written_classes.contains_key(&class_key(ty))
    }
}

impl Default for XmlExporter {
    fn default() -> Self {
        Self::new()
    }
}

fn class_key(ty: &TypePtr) -> usize {
    Arc::as_ptr(ty) as usize
}

/// Type that describes the payload on the wire.
///
/// Objects are described by their own class; payloads held by the root
/// `Variable` type by the builtin type of their storage.
fn effective_type(variable: &Variable) -> TypePtr {
    let ty = variable.ty();
    match variable.value() {
        VariableValue::Object(object) => object.class().clone(),
        value if ty.storage_kind() == StorageKind::Any => match value {
            VariableValue::Boolean(_) => boolean_type(),
            VariableValue::Integer(_) => integer_type(),
            VariableValue::Double(_) => double_type(),
            VariableValue::String(_) => string_type(),
            _ => ty.clone(),
        },
        _ => ty.clone(),
    }
}
