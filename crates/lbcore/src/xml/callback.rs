// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Error reporting sinks used while importing.

use parking_lot::Mutex;

/// Receives problems found during an import.
pub trait MessageCallback: Send + Sync {
    fn error_message(&self, location: &str, message: &str);

    fn warning_message(&self, location: &str, message: &str) {
        log::warn!("[xml] {}: {}", location, message);
    }
}

/// Default sink: forwards to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogCallback;

impl MessageCallback for LogCallback {
    fn error_message(&self, location: &str, message: &str) {
        log::error!("[xml] {}: {}", location, message);
    }
}

/// Sink keeping every message, for callers that inspect them after a load.
#[derive(Debug, Default)]
pub struct CollectingCallback {
    errors: Mutex<Vec<String>>,
    warnings: Mutex<Vec<String>>,
}

impl CollectingCallback {
    pub fn new() -> Self {
        Self::default()
    }

    /// Errors as `location: message`.
    pub fn errors(&self) -> Vec<String> {
        self.errors.lock().clone()
    }

    pub fn warnings(&self) -> Vec<String> {
        self.warnings.lock().clone()
    }

    pub fn clear(&self) {
        self.errors.lock().clear();
        self.warnings.lock().clear();
    }
}

impl MessageCallback for CollectingCallback {
    fn error_message(&self, location: &str, message: &str) {
        self.errors.lock().push(format!("{}: {}", location, message));
    }

    fn warning_message(&self, location: &str, message: &str) {
        self.warnings
            .lock()
            .push(format!("{}: {}", location, message));
    }
}
