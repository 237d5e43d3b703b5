// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Variable, object and schema import.
//!
//! Type names are resolved through a [`TypeRegistry`]. Inline class schemas
//! are rebuilt as dynamic classes and interned in that registry, so data
//! carrying its own schema loads even when the class was never declared on
//! the reading side.
//!
//! In [`LoadMode::Tolerant`] a malformed member or schema entry is reported to
//! the [`MessageCallback`] and skipped; the surrounding object keeps the
//! members that did load.

use super::{decode_type_name, LogCallback, MessageCallback, XmlElement};
use crate::config::{
    CoreConfig, LoadMode, RuntimeConfig, ATTR_BASE, ATTR_INDEX, ATTR_MISSING, ATTR_NAME,
    ATTR_SHARED, ATTR_TYPE, TAG_CLASS, TAG_MEMBER, TAG_VARIABLE,
};
use crate::error::{Error, Result};
use crate::object::Object;
use crate::types::{
    object_type, parse_type_name, ClassBuilder, ParsedTypeName, StorageKind, TypePtr,
    TypeRegistry,
};
use crate::variable::{Variable, VariableValue};
use std::collections::HashMap;
use std::sync::Arc;

/// Rebuilds variables and class schemas from XML trees.
pub struct XmlImporter<'r> {
    registry: &'r TypeRegistry,
    config: CoreConfig,
    callback: Arc<dyn MessageCallback>,
    error_count: usize,
    /// Classes whose schema is being read, for self-references.
    pending: HashMap<String, TypePtr>,
}

impl<'r> XmlImporter<'r> {
    /// Importer using the process-wide defaults and the log sink.
    pub fn new(registry: &'r TypeRegistry) -> Self {
        Self {
            registry,
            config: RuntimeConfig::global().get(),
            callback: Arc::new(LogCallback),
            error_count: 0,
            pending: HashMap::new(),
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: CoreConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn with_load_mode(mut self, load_mode: LoadMode) -> Self {
        self.config.load_mode = load_mode;
        self
    }

    #[must_use]
    pub fn with_callback(mut self, callback: Arc<dyn MessageCallback>) -> Self {
        self.callback = callback;
        self
    }

    pub fn registry(&self) -> &'r TypeRegistry {
        self.registry
    }

    /// Errors reported so far.
    pub fn error_count(&self) -> usize {
        self.error_count
    }

    /// Rebuild a variable from a root `<variable>` element.
    pub fn import_variable(&mut self, element: &XmlElement) -> Result<Variable> {
        crate::trace_fn!("XmlImporter::import_variable");
        if element.name() != TAG_VARIABLE {
            let error = Error::SerializationFormat(format!(
                "expected <{}>, found <{}>",
                TAG_VARIABLE,
                element.name()
            ));
            return Err(self.report_fatal(element.name(), error));
        }
        let result = self
            .read_type_reference(element, None)
            .and_then(|ty| self.read_value(element, &ty));
        result.map_err(|e| self.report_fatal(TAG_VARIABLE, e))
    }

    /// Rebuild a class from a `<class>` schema and intern it.
    ///
    /// A class already registered with the same layout is returned as is;
    /// a different layout under the same name fails with `TypeRedefinition`.
    pub fn load_class(&mut self, element: &XmlElement) -> Result<TypePtr> {
        crate::trace_fn!("XmlImporter::load_class");
        let location = element.attribute(ATTR_NAME).unwrap_or(TAG_CLASS).to_string();
        self.read_class(element)
            .map_err(|e| self.report_fatal(&location, e))
    }

    /// Read the `<member>` entries of `element` into `object`.
    pub fn read_members<O: Object + ?Sized>(
        &mut self,
        object: &O,
        element: &XmlElement,
    ) -> Result<()> {
        let class = object.class().clone();
        for entry in element.children_named(TAG_MEMBER) {
            if let Err(error) = self.read_member(object, &class, entry) {
                let member = entry
                    .attribute(ATTR_NAME)
                    .or_else(|| entry.attribute(ATTR_INDEX))
                    .unwrap_or("?");
                self.recover(&format!("{}.{}", class.name(), member), error)?;
            }
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Values
    // ------------------------------------------------------------------

    fn read_member<O: Object + ?Sized>(
        &mut self,
        object: &O,
        class: &TypePtr,
        entry: &XmlElement,
    ) -> Result<()> {
        let index = match (entry.attribute(ATTR_INDEX), entry.attribute(ATTR_NAME)) {
            (Some(index), _) => index.trim().parse::<usize>().map_err(|_| {
                Error::SerializationFormat(format!("invalid member index '{}'", index))
            })?,
            (None, Some(name)) => class.member_index(name).ok_or_else(|| Error::UnknownMember {
                class: class.name().to_string(),
                name: name.to_string(),
            })?,
            (None, None) => {
                return Err(Error::SerializationFormat(
                    "member entry without index or name".into(),
                ))
            }
        };
        let expected = class.member_name(index);
        if let (Some(name), Ok(expected)) = (entry.attribute(ATTR_NAME), expected) {
            if name != &*expected {
                return Err(Error::SerializationFormat(format!(
                    "member #{} of {} is '{}', found '{}'",
                    index,
                    class.name(),
                    expected,
                    name
                )));
            }
        }

        let declared = class.member_type(index)?;
        let ty = self.read_type_reference(entry, Some(&declared))?;
        let value = self.read_value(entry, &ty)?;
        object.set_variable(index, value)
    }

    /// Type of the value held by `element`: `type=`, inline schema, or `declared`.
    fn read_type_reference(
        &mut self,
        element: &XmlElement,
        declared: Option<&TypePtr>,
    ) -> Result<TypePtr> {
        self.read_type_attribute(element, ATTR_TYPE, declared)
    }

    /// Type named by `attr`, after loading every inline `<class>` child.
    ///
    /// Inline schemas define the dynamic classes the name refers to, template
    /// arguments included. Without the attribute the last schema is the type.
    fn read_type_attribute(
        &mut self,
        element: &XmlElement,
        attr: &str,
        declared: Option<&TypePtr>,
    ) -> Result<TypePtr> {
        let mut inline = None;
        for schema in element.children_named(TAG_CLASS) {
            inline = Some(self.read_class(schema)?);
        }
        if let Some(name) = element.attribute(attr) {
            return self.resolve_type(&decode_type_name(name));
        }
        inline.or_else(|| declared.cloned()).ok_or_else(|| {
            Error::SerializationFormat(format!("<{}> carries no type", element.name()))
        })
    }

    fn resolve_type(&self, name: &str) -> Result<TypePtr> {
        if let Some(ty) = self.pending.get(name) {
            return Ok(ty.clone());
        }
        let parsed = parse_type_name(name)?;
        if !parsed.is_template_instance() {
            return self.registry.get_type(name);
        }
        self.resolve_template(&parsed)
    }

    /// Template instance whose arguments may still be pending.
    ///
    /// Interned arguments win over pending ones: a pending class that already
    /// exists in the registry resolves to the interned instance when it completes.
    fn resolve_template(&self, parsed: &ParsedTypeName) -> Result<TypePtr> {
        if !parsed.is_template_instance() {
            return match self.registry.find_type(&parsed.name) {
                Some(ty) => Ok(ty),
                None => self
                    .pending
                    .get(&parsed.name)
                    .cloned()
                    .ok_or_else(|| Error::UnknownType(parsed.name.clone())),
            };
        }
        let args = parsed
            .arguments
            .iter()
            .map(|arg| self.resolve_template(arg))
            .collect::<Result<Vec<_>>>()?;
        self.registry.instantiate(&parsed.name, &args)
    }

    fn read_value(&mut self, element: &XmlElement, ty: &TypePtr) -> Result<Variable> {
        if element.attribute(ATTR_MISSING) == Some("true") {
            return Ok(Variable::missing(ty));
        }
        let text = element.text().unwrap_or("");
        let value = match ty.storage_kind() {
            StorageKind::Boolean => match text.trim() {
                "true" => VariableValue::Boolean(true),
                "false" => VariableValue::Boolean(false),
                other => return Err(bad_value(ty, other)),
            },
            StorageKind::Integer => text
                .trim()
                .parse::<i64>()
                .map(VariableValue::Integer)
                .map_err(|_| bad_value(ty, text))?,
            StorageKind::Double => text
                .trim()
                .parse::<f64>()
                .map(VariableValue::Double)
                .map_err(|_| bad_value(ty, text))?,
            StorageKind::String => VariableValue::String(Arc::from(text)),
            StorageKind::Enumeration => {
                let label = text.trim();
                let index = ty
                    .as_enumeration()
                    .and_then(|e| e.find_element(label))
                    .or_else(|| label.parse::<usize>().ok())
                    .ok_or_else(|| bad_value(ty, label))?;
                VariableValue::Enumeration(index)
            }
            StorageKind::Object => {
                let object = ty.create_object()?;
                object.load_from_xml(self, element)?;
                VariableValue::Object(object)
            }
            StorageKind::Any => {
                return Err(Error::SerializationFormat(format!(
                    "value of abstract type {} cannot be read",
                    ty.name()
                )))
            }
        };
        Variable::with_value(ty, value)
    }

    // ------------------------------------------------------------------
    // Schemas
    // ------------------------------------------------------------------

    fn read_class(&mut self, element: &XmlElement) -> Result<TypePtr> {
        let name = element
            .attribute(ATTR_NAME)
            .map(decode_type_name)
            .ok_or_else(|| Error::SerializationFormat("<class> without name".into()))?;
        if let Some(pending) = self.pending.get(&name) {
            return Ok(pending.clone());
        }

        let base = self.read_type_attribute(element, ATTR_BASE, Some(&object_type()))?;
        let candidate: TypePtr = Arc::new(
            ClassBuilder::new(name.clone())
                .base(&base)
                .dynamic()
                .build()?,
        );

        self.pending.insert(name.clone(), candidate.clone());
        let members = self.read_class_members(&candidate, element);
        self.pending.remove(&name);
        members?;

        let interned = self.registry.register_shared(candidate)?;
        log::debug!("[xml] class {} loaded", name);
        Ok(interned)
    }

    fn read_class_members(&mut self, class: &TypePtr, element: &XmlElement) -> Result<()> {
        for entry in element.children_named(TAG_VARIABLE) {
            if let Err(error) = self.read_class_member(class, entry) {
                let member = entry.attribute(ATTR_NAME).unwrap_or("?");
                self.recover(&format!("{}.{}", class.name(), member), error)?;
            }
        }
        Ok(())
    }

    fn read_class_member(&mut self, class: &TypePtr, entry: &XmlElement) -> Result<()> {
        let name = entry
            .attribute(ATTR_NAME)
            .ok_or_else(|| Error::SerializationFormat("member declaration without name".into()))?;
        let ty = self.read_type_reference(entry, None)?;
        if entry.attribute(ATTR_SHARED) == Some("true") {
            class.add_shared_member(&ty, name)?;
        } else {
            class.add_member(&ty, name)?;
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Error handling
    // ------------------------------------------------------------------

    /// Tolerant mode: report and continue. Strict mode: propagate.
    ///
    /// Strict errors are reported once, by the public entry point.
    fn recover(&mut self, location: &str, error: Error) -> Result<()> {
        match self.config.load_mode {
            LoadMode::Strict => Err(error),
            LoadMode::Tolerant => {
                self.error_count += 1;
                self.callback.error_message(location, &error.to_string());
                Ok(())
            }
        }
    }

    fn report_fatal(&mut self, location: &str, error: Error) -> Error {
        self.error_count += 1;
        self.callback.error_message(location, &error.to_string());
        error
    }
}

fn bad_value(ty: &TypePtr, text: &str) -> Error {
    Error::SerializationFormat(format!("invalid {} value '{}'", ty.name(), text))
}
