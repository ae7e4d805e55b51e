//! Key-value store contract used for everything the game persists.
//!
//! The game only needs string-keyed get/set/remove over four value kinds.
//! Keys are independent: no write groups several keys, so a crash between
//! two writes leaves each key well-formed on its own. Typed getters return
//! `None` when the stored kind does not match, and callers treat that the
//! same as a missing key.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// A single persisted value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StoredValue {
    Text(String),
    Flag(bool),
    Ints(Vec<i64>),
    Texts(Vec<String>),
}

/// String-keyed synchronous store.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<StoredValue>;

    fn set(&mut self, key: &str, value: StoredValue) -> Result<(), StoreError>;

    fn remove(&mut self, key: &str) -> Result<(), StoreError>;

    fn get_text(&self, key: &str) -> Option<String> {
        match self.get(key)? {
            StoredValue::Text(s) => Some(s),
            _ => None,
        }
    }

    fn get_flag(&self, key: &str) -> Option<bool> {
        match self.get(key)? {
            StoredValue::Flag(b) => Some(b),
            _ => None,
        }
    }

    fn get_ints(&self, key: &str) -> Option<Vec<i64>> {
        match self.get(key)? {
            StoredValue::Ints(v) => Some(v),
            _ => None,
        }
    }

    fn get_texts(&self, key: &str) -> Option<Vec<String>> {
        match self.get(key)? {
            StoredValue::Texts(v) => Some(v),
            _ => None,
        }
    }
}

/// Log a failed write instead of failing the game action that caused it.
pub(crate) fn log_write_failure(key: &str, result: Result<(), StoreError>) {
    if let Err(e) = result {
        log::warn!("Failed to persist '{}': {}", key, e);
    }
}

/// In-memory store. Ordered so snapshots compare deterministically.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStore {
    entries: BTreeMap<String, StoredValue>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<StoredValue> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: StoredValue) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.entries.remove(key);
        Ok(())
    }
}
