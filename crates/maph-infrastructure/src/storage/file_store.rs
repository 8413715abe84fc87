//! `session.toml`-backed key-value store.

use super::atomic_toml::AtomicTomlFile;
use async_trait::async_trait;
use maph_core::session::KeyValueStore;
use maph_core::{MaphError, Result};
use std::collections::BTreeMap;
use std::path::PathBuf;

type Entries = BTreeMap<String, String>;

/// Stores every key as a top-level string in one TOML file.
///
/// File work runs on the blocking pool; each mutation is a locked
/// read-modify-write of the whole document.
#[derive(Debug, Clone)]
pub struct FileKeyValueStore {
    file: AtomicTomlFile<Entries>,
}

impl FileKeyValueStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            file: AtomicTomlFile::new(path),
        }
    }

    async fn blocking<F, R>(&self, f: F) -> Result<R>
    where
        F: FnOnce(AtomicTomlFile<Entries>) -> Result<R> + Send + 'static,
        R: Send + 'static,
    {
        let file = self.file.clone();
        tokio::task::spawn_blocking(move || f(file))
            .await
            .map_err(|e| MaphError::internal(format!("storage task failed: {}", e)))?
    }
}

#[async_trait]
impl KeyValueStore for FileKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let key = key.to_string();
        self.blocking(move |file| Ok(file.load()?.and_then(|mut entries| entries.remove(&key))))
            .await
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let (key, value) = (key.to_string(), value.to_string());
        self.blocking(move |file| {
            file.update(Entries::new, |entries| {
                entries.insert(key, value);
            })?;
            Ok(())
        })
        .await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let key = key.to_string();
        self.blocking(move |file| {
            if file.load()?.is_none() {
                return Ok(());
            }
            file.update(Entries::new, |entries| {
                entries.remove(&key);
            })?;
            Ok(())
        })
        .await
    }
}
