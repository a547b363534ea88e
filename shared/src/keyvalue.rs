//! Key-value editor helpers
//!
//! The label editor works on an ordered list of name/value rows, the API on
//! a keyed map. These convert between the two.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One row of a key-value editor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Entry {
    pub name: String,
    pub value: String,
}

impl Entry {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Entry {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn is_complete(&self) -> bool {
        !self.name.is_empty() && !self.value.is_empty()
    }
}

/// Drops rows missing either a name or a value.
pub fn compact_entries(entries: &[Entry]) -> Vec<Entry> {
    entries.iter().filter(|e| e.is_complete()).cloned().collect()
}

/// Rows to a map, later rows win on duplicate names.
pub fn map_entries(entries: &[Entry]) -> BTreeMap<String, String> {
    entries
        .iter()
        .map(|e| (e.name.clone(), e.value.clone()))
        .collect()
}

pub fn entries_from_map(map: &BTreeMap<String, String>) -> Vec<Entry> {
    map.iter().map(|(k, v)| Entry::new(k, v)).collect()
}
