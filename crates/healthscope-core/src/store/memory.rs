//! In-process key-value backend

use std::collections::HashMap;
use std::sync::RwLock;

use super::{KeyValueStore, KvWrite};
use crate::error::{Error, Result};

/// Key-value map that lives as long as the process
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.values.read().map(|v| v.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let values = self
            .values
            .read()
            .map_err(|_| Error::InvalidData("Failed to acquire store lock".into()))?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut values = self
            .values
            .write()
            .map_err(|_| Error::InvalidData("Failed to acquire store lock".into()))?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut values = self
            .values
            .write()
            .map_err(|_| Error::InvalidData("Failed to acquire store lock".into()))?;
        values.remove(key);
        Ok(())
    }

    fn write_batch(&self, writes: &[KvWrite]) -> Result<()> {
        let mut values = self
            .values
            .write()
            .map_err(|_| Error::InvalidData("Failed to acquire store lock".into()))?;
        for write in writes {
            match write {
                KvWrite::Set { key, value } => {
                    values.insert(key.clone(), value.clone());
                }
                KvWrite::Remove { key } => {
                    values.remove(key);
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_remove() {
        let store = MemoryStore::new();
        assert!(store.is_empty());

        store.set("a", "1").unwrap();
        store.set("a", "2").unwrap();
        assert_eq!(store.get("a").unwrap().as_deref(), Some("2"));
        assert_eq!(store.len(), 1);

        store.remove("a").unwrap();
        store.remove("a").unwrap();
        assert_eq!(store.get("a").unwrap(), None);
    }

    #[test]
    fn test_write_batch() {
        let store = MemoryStore::new();
        store.set("stale", "x").unwrap();

        store
            .write_batch(&[
                KvWrite::set("a", "1"),
                KvWrite::remove("stale"),
                KvWrite::set("a", "2"),
            ])
            .unwrap();

        assert_eq!(store.get("a").unwrap().as_deref(), Some("2"));
        assert_eq!(store.get("stale").unwrap(), None);
        assert_eq!(store.len(), 1);
    }
}
