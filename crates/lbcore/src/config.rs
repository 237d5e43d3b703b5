// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Global configuration for the type core.
//!
//! # Architecture
//!
//! - **Level 1 (Static)**: wire constants (XML tag and attribute names, name substitution)
//! - **Level 2 (Dynamic)**: `RuntimeConfig` holding the process-wide `CoreConfig` defaults
//!
//! Exporters and importers copy the current snapshot when they are created, so a
//! concurrent `RuntimeConfig::set` never changes a serialization in progress.
//!
//! ```ignore
//! use lbcore::config::{RuntimeConfig, LoadMode};
//!
//! let mut config = RuntimeConfig::global().get();
//! config.load_mode = LoadMode::Tolerant;
//! RuntimeConfig::global().set(config);
//! ```

use arc_swap::ArcSwap;
use std::sync::{Arc, OnceLock};

// =======================================================================
// Wire constants
// =======================================================================

/// Root element written by `xml::save_to_string`.
pub const TAG_VARIABLE: &str = "variable";
/// Class schema element.
pub const TAG_CLASS: &str = "class";
/// Present member entry inside object data.
pub const TAG_MEMBER: &str = "member";

pub const ATTR_NAME: &str = "name";
pub const ATTR_BASE: &str = "base";
pub const ATTR_TYPE: &str = "type";
pub const ATTR_INDEX: &str = "index";
pub const ATTR_MISSING: &str = "missing";
pub const ATTR_SHARED: &str = "shared";

/// Template brackets are stored as `[` / `]` inside attributes.
pub const TEMPLATE_OPEN: char = '<';
pub const TEMPLATE_CLOSE: char = '>';
pub const ENCODED_TEMPLATE_OPEN: char = '[';
pub const ENCODED_TEMPLATE_CLOSE: char = ']';

/// Spaces per nesting level in exported documents.
pub const DEFAULT_INDENT: usize = 2;

// =======================================================================
// Runtime configuration
// =======================================================================

/// How the importer reacts to malformed entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadMode {
    /// First error aborts the load.
    #[default]
    Strict,
    /// Errors are reported to the message callback, the offending entry is
    /// skipped and loading continues.
    Tolerant,
}

/// Serialization and checking settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    /// Spaces per nesting level; `0` writes a single line.
    pub indent: usize,
    pub load_mode: LoadMode,
    /// Emit `name=` alongside `index=` on member entries.
    pub write_member_names: bool,
    /// Verify `objectClass.inherits_from(declared)` when building object variables.
    pub check_object_classes: bool,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            indent: DEFAULT_INDENT,
            load_mode: LoadMode::Strict,
            write_member_names: true,
            check_object_classes: cfg!(debug_assertions),
        }
    }
}

/// Process-wide configuration store.
///
/// Reads are lock-free (`ArcSwap`), writes replace the whole snapshot.
pub struct RuntimeConfig {
    core: ArcSwap<CoreConfig>,
}

static RUNTIME_CONFIG: OnceLock<RuntimeConfig> = OnceLock::new();

impl RuntimeConfig {
    /// Create a configuration store holding the defaults.
    pub fn new() -> Self {
        Self {
            core: ArcSwap::from_pointee(CoreConfig::default()),
        }
    }

    /// The process-wide instance, created on first access.
    pub fn global() -> &'static RuntimeConfig {
        RUNTIME_CONFIG.get_or_init(RuntimeConfig::new)
    }

    /// Current defaults.
    pub fn get(&self) -> CoreConfig {
        CoreConfig::clone(&self.core.load())
    }

    /// Whether object variables verify their class, read without copying the snapshot.
    pub fn check_object_classes(&self) -> bool {
        self.core.load().check_object_classes
    }

    /// Replace the defaults.
    pub fn set(&self, config: CoreConfig) {
        log::debug!("[config] defaults updated: {:?}", config);
        self.core.store(Arc::new(config));
    }

    /// Restore the built-in defaults.
    pub fn reset(&self) {
        self.core.store(Arc::new(CoreConfig::default()));
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self::new()
    }
}
