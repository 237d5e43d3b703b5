// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Logging helpers.
//!
//! The crate logs through the `log` facade with a bracketed component prefix
//! (`[registry]`, `[xml]`, ...); the host application picks the backend.
//!
//! `trace_fn!` marks function entry for call stack instrumentation. It is only
//! active with the `trace` feature and otherwise compiles to nothing.
//!
//! ```ignore
//! fn load_class(&mut self, element: &XmlElement) -> Result<TypePtr> {
//!     trace_fn!("XmlImporter::load_class");
//!     // ...
//! }
//! ```

/// Function entry trace marker (`[ENTER:FNC] name`).
#[macro_export]
#[cfg(feature = "trace")]
macro_rules! trace_fn {
    ($fn_name:expr) => {
        log::trace!("[ENTER:FNC] {}", $fn_name);
    };
}

/// No-op trace macro (when trace feature disabled).
#[macro_export]
#[cfg(not(feature = "trace"))]
macro_rules! trace_fn {
    ($fn_name:expr) => {};
}
