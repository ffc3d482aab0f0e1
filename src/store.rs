//! Completion flag persistence
//!
//! The tour only needs a tiny key-value boundary (the browser's localStorage
//! on the web). `MemoryStore` serves tests and one-shot sessions;
//! `JsonFileStore` keeps the flags in a JSON object on disk.

use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, TourError};

/// String key-value store
pub trait FlagStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}

impl<S: FlagStore + ?Sized> FlagStore for Box<S> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}

/// In-memory store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FlagStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.values.remove(key);
        Ok(())
    }
}

/// Store persisted as a flat JSON object of strings
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    values: Map<String, Value>,
}

impl JsonFileStore {
    /// Open the store, starting empty if the file does not exist yet
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let values = if path.exists() {
            let content = fs::read_to_string(&path)?;
            if content.trim().is_empty() {
                Map::new()
            } else {
                match serde_json::from_str::<Value>(&content)? {
                    Value::Object(map) => map,
                    _ => {
                        return Err(TourError::store(format!(
                            "{} does not hold a JSON object",
                            path.display()
                        )));
                    }
                }
            }
        } else {
            Map::new()
        };

        Ok(Self { path, values })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(&self.values)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

impl FlagStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        match self.values.get(key)? {
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values
            .insert(key.to_string(), Value::String(value.to_string()));
        self.flush()
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        if self.values.remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }
}

/// Persisted "tour completed" boolean stored under a fixed key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionFlag {
    key: String,
}

impl CompletionFlag {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Any non-empty value counts as set
    pub fn is_set<S: FlagStore + ?Sized>(&self, store: &S) -> bool {
        store.get(&self.key).is_some_and(|v| !v.is_empty())
    }

    pub fn mark<S: FlagStore + ?Sized>(&self, store: &mut S) -> Result<()> {
        store.set(&self.key, "true")
    }

    pub fn clear<S: FlagStore + ?Sized>(&self, store: &mut S) -> Result<()> {
        store.remove(&self.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_roundtrip() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get("tourCompleted"), None);
        store.set("tourCompleted", "true").unwrap();
        assert_eq!(store.get("tourCompleted").as_deref(), Some("true"));
        store.remove("tourCompleted").unwrap();
        assert_eq!(store.get("tourCompleted"), None);
    }

    #[test]
    fn test_completion_flag() {
        let mut store = MemoryStore::new();
        let flag = CompletionFlag::new("tourCompleted");
        assert!(!flag.is_set(&store));
        flag.mark(&mut store).unwrap();
        assert!(flag.is_set(&store));
        assert_eq!(store.get("tourCompleted").as_deref(), Some("true"));

        store.set("tourCompleted", "").unwrap();
        assert!(!flag.is_set(&store));

        flag.mark(&mut store).unwrap();
        flag.clear(&mut store).unwrap();
        assert!(!flag.is_set(&store));
    }

    #[test]
    fn test_json_file_store_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("state.json");

        let mut store = JsonFileStore::open(&path).unwrap();
        store.set("tourCompleted", "true").unwrap();
        drop(store);

        let reopened = JsonFileStore::open(&path).unwrap();
        assert_eq!(reopened.get("tourCompleted").as_deref(), Some("true"));
    }

    #[test]
    fn test_json_file_store_rejects_non_object() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        fs::write(&path, "[1, 2]").unwrap();
        assert!(matches!(
            JsonFileStore::open(&path),
            Err(TourError::Store(_))
        ));
    }
}
