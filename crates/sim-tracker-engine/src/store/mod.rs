use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A value held by the external variable store. The store only distinguishes
/// numbers from text; structured values travel as serialized JSON text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StoredValue {
    Number(f64),
    Text(String),
}

impl StoredValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            StoredValue::Number(n) => Some(*n),
            StoredValue::Text(s) => s.trim().parse().ok(),
        }
    }
}

impl From<f64> for StoredValue {
    fn from(n: f64) -> Self {
        StoredValue::Number(n)
    }
}

impl From<String> for StoredValue {
    fn from(s: String) -> Self {
        StoredValue::Text(s)
    }
}

impl From<&str> for StoredValue {
    fn from(s: &str) -> Self {
        StoredValue::Text(s.to_string())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("variable store failure: {0}")]
    Backend(String),
}

/// Narrow interface over the host's persisted-variable collaborator.
///
/// Variables are keyed `{characterName}_{fieldName}` (or
/// `worldData_{fieldName}`); the pipeline depends only on get/set-by-name
/// semantics, never on storage mechanics. Implementations are injected, so
/// tests run against [`MemoryStore`].
pub trait Store {
    fn get(&self, name: &str) -> Result<Option<StoredValue>, StoreError>;
    fn set(&mut self, name: &str, value: StoredValue) -> Result<(), StoreError>;
}

/// In-memory store, used by tests and hosts without their own backend.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: BTreeMap<String, StoredValue>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<StoredValue>,
    {
        Self {
            values: entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Store for MemoryStore {
    fn get(&self, name: &str) -> Result<Option<StoredValue>, StoreError> {
        Ok(self.values.get(name).cloned())
    }

    fn set(&mut self, name: &str, value: StoredValue) -> Result<(), StoreError> {
        self.values.insert(name.to_string(), value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn memory_store_round_trip() {
        let mut store = MemoryStore::new();
        store.set("Bob_hp", StoredValue::Number(42.0)).unwrap();
        assert_eq!(store.get("Bob_hp").unwrap(), Some(StoredValue::Number(42.0)));
        assert_eq!(store.get("Bob_mp").unwrap(), None);
    }

    #[test]
    fn stored_text_parses_to_number_when_numeric() {
        assert_eq!(StoredValue::Text("12.5".to_string()).as_number(), Some(12.5));
        assert_eq!(StoredValue::Text("sword".to_string()).as_number(), None);
        assert_eq!(StoredValue::Number(3.0).as_number(), Some(3.0));
    }
}
