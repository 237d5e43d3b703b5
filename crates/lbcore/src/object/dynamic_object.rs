// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Generic object storage driven by a class layout.

use super::Object;
use crate::error::{Error, Result};
use crate::types::TypePtr;
use crate::variable::Variable;
use parking_lot::RwLock;
use std::fmt;

/// Object whose storage is a growable slot array.
///
/// Slot `i` holds member `i`. Slots are allocated on first write; reads of
/// unallocated members return the member type's missing sentinel without
/// growing storage. Members appended to a dynamic class after the object was
/// created become readable immediately.
pub struct DynamicObject {
    class: TypePtr,
    slots: RwLock<Vec<Variable>>,
}

impl DynamicObject {
    /// Create an object with no allocated slot.
    pub fn new(class: TypePtr) -> Self {
        Self {
            class,
            slots: RwLock::new(Vec::new()),
        }
    }

    /// Number of slots allocated so far.
    pub fn allocated_slots(&self) -> usize {
        self.slots.read().len()
    }

    fn check_index(&self, index: usize) -> Result<()> {
        let len = self.class.num_members();
        if index >= len {
            return Err(Error::IndexOutOfRange { index, len });
        }
        Ok(())
    }
}

impl Object for DynamicObject {
    fn class(&self) -> &TypePtr {
        &self.class
    }

    fn variable(&self, index: usize) -> Result<Variable> {
        self.check_index(index)?;
        if let Some(value) = self.slots.read().get(index) {
            return Ok(value.clone());
        }
        Ok(Variable::missing(&self.class.member_type(index)?))
    }

    fn set_variable(&self, index: usize, value: Variable) -> Result<()> {
        self.check_index(index)?;
        let declared = self.class.member_type(index)?;
        if !value.is_instance_of(&declared) {
            return Err(Error::TypeMismatch {
                expected: declared.name().to_string(),
                found: value.ty().name().to_string(),
            });
        }

        let mut slots = self.slots.write();
        while slots.len() < index {
            let gap = self.class.member_type(slots.len())?;
            slots.push(Variable::missing(&gap));
        }
        if index < slots.len() {
            slots[index] = value;
        } else {
            slots.push(value);
        }
        Ok(())
    }
}

impl fmt::Debug for DynamicObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DynamicObject")
            .field("class", &self.class.name())
            .field("slots", &*self.slots.read())
            .finish()
    }
}
