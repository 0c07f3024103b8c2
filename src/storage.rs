//! Durable client-side key/value storage.
//!
//! Mirrors the browser local-storage contract the front-end relies on: a flat
//! map of string keys to string values that survives restarts. Reads never
//! fail (a missing or corrupt store reads as empty); writes report errors so
//! callers can log them and carry on with their in-memory state.

use anyhow::{Context, Result};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::warn;

/// Key under which the selected locale code is persisted.
pub const LANGUAGE_KEY: &str = "fixnet_language";

/// Key under which locally recorded tickets are persisted (JSON array).
pub const TICKETS_KEY: &str = "fixnet_tickets";

/// A durable string-keyed store.
pub trait KeyValueStore {
    /// Read a value. Returns `None` when absent or when the store is unreadable.
    fn get(&self, key: &str) -> Option<String>;

    /// Write a value, replacing any previous one.
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// Store backed by a single JSON object on disk.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Map<String, Value> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Map::new(),
            Err(e) => {
                warn!("Failed to read store at {}: {}", self.path.display(), e);
                return Map::new();
            }
        };

        match serde_json::from_str::<Value>(&content) {
            Ok(Value::Object(map)) => map,
            Ok(_) | Err(_) => {
                warn!(
                    "Store at {} is not a JSON object, treating as empty",
                    self.path.display()
                );
                Map::new()
            }
        }
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        match self.read_all().remove(key)? {
            Value::String(value) => Some(value),
            _ => None,
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut map = self.read_all();
        map.insert(key.to_string(), Value::String(value.to_string()));

        let content = serde_json::to_string_pretty(&Value::Object(map))
            .context("Failed to serialize store")?;
        std::fs::write(&self.path, content)
            .context(format!("Failed to write store at {}", self.path.display()))?;
        Ok(())
    }
}

/// In-memory store. Clones share the same underlying map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.lock().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut values = self
            .values
            .lock()
            .map_err(|_| anyhow::anyhow!("Memory store lock poisoned"))?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
