//! Durable client-side key-value storage.

use std::{
    collections::HashMap,
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::Mutex,
};

use tracing::debug;

use super::error::InfraError;
use super::lock::mutex_lock;

pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, InfraError>;
    fn set(&self, key: &str, value: &str) -> Result<(), InfraError>;
    fn remove(&self, key: &str) -> Result<(), InfraError>;
}

/// String entries persisted as a flat TOML table. A missing file reads as empty.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_table(&self) -> Result<toml::Table, InfraError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(toml::Table::new()),
            Err(err) => return Err(err.into()),
        };
        text.parse::<toml::Table>()
            .map_err(|err| InfraError::corrupt_store(&self.path, err.to_string()))
    }

    fn write_table(&self, table: &toml::Table) -> Result<(), InfraError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let text = toml::to_string(table).map_err(|err| InfraError::storage(err.to_string()))?;
        let staging = self.path.with_extension("tmp");
        fs::write(&staging, text)?;
        fs::rename(&staging, &self.path)?;
        debug!(path = %self.path.display(), entries = table.len(), "store flushed");
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, InfraError> {
        let table = self.read_table()?;
        Ok(table
            .get(key)
            .and_then(toml::Value::as_str)
            .map(str::to_string))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), InfraError> {
        let mut table = self.read_table()?;
        table.insert(key.to_string(), toml::Value::String(value.to_string()));
        self.write_table(&table)
    }

    fn remove(&self, key: &str) -> Result<(), InfraError> {
        let mut table = self.read_table()?;
        if table.remove(key).is_some() {
            self.write_table(&table)?;
        }
        Ok(())
    }
}

/// Process-local store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    #[must_use]
    pub fn with_entry(key: &str, value: &str) -> Self {
        let store = Self::default();
        mutex_lock(&store.entries, "infra::storage", "memory.seed")
            .insert(key.to_string(), value.to_string());
        store
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, InfraError> {
        Ok(mutex_lock(&self.entries, "infra::storage", "memory.get")
            .get(key)
            .cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), InfraError> {
        mutex_lock(&self.entries, "infra::storage", "memory.set")
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), InfraError> {
        mutex_lock(&self.entries, "infra::storage", "memory.remove").remove(key);
        Ok(())
    }
}
