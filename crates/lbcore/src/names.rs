// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Bidirectional string interning.

use std::collections::HashMap;
use std::sync::Arc;

/// Interns strings to stable, dense indices.
///
/// Index `i` always maps back to the `i`-th distinct string added; entries are
/// never removed.
#[derive(Debug, Clone, Default)]
pub struct NameTable {
    names: Vec<Arc<str>>,
    indices: HashMap<Arc<str>, usize>,
}

impl NameTable {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the index of `name`, adding it if absent.
    pub fn intern(&mut self, name: &str) -> usize {
        if let Some(&index) = self.indices.get(name) {
            return index;
        }
        let name: Arc<str> = Arc::from(name);
        let index = self.names.len();
        self.names.push(name.clone());
        self.indices.insert(name, index);
        index
    }

    /// Index of an already interned string.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.indices.get(name).copied()
    }

    /// String stored at `index`.
    pub fn name(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(|n| &**n)
    }

    /// Shared handle on the string stored at `index`.
    pub fn shared_name(&self, index: usize) -> Option<Arc<str>> {
        self.names.get(index).cloned()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Iterate `(index, name)` in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> {
        self.names.iter().enumerate().map(|(i, n)| (i, &**n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intern_is_stable() {
        let mut table = NameTable::new();
        assert_eq!(table.intern("alpha"), 0);
        assert_eq!(table.intern("beta"), 1);
        assert_eq!(table.intern("alpha"), 0);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_bidirectional_lookup() {
        let mut table = NameTable::new();
        table.intern("x");
        table.intern("y");
        assert_eq!(table.index_of("y"), Some(1));
        assert_eq!(table.name(0), Some("x"));
        assert_eq!(table.name(2), None);
        assert_eq!(table.index_of("z"), None);
    }

    #[test]
    fn test_iter_order() {
        let mut table = NameTable::new();
        for name in ["c", "a", "b"] {
            table.intern(name);
        }
        let names: Vec<&str> = table.iter().map(|(_, n)| n).collect();
        assert_eq!(names, vec!["c", "a", "b"]);
    }
}
