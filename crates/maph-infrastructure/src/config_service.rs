//! Loads `config.toml`, creating it with defaults on first run.

use crate::storage::AtomicTomlFile;
use maph_core::Result;
use maph_core::config::ClientConfig;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct ConfigService {
    file: AtomicTomlFile<ClientConfig>,
}

impl ConfigService {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            file: AtomicTomlFile::new(path),
        }
    }

    /// Reads the file, then applies `MAPH_*` environment overrides.
    pub fn load(&self) -> Result<ClientConfig> {
        self.load_with(|key| std::env::var(key).ok())
    }

    /// Same as [`ConfigService::load`] with an explicit variable lookup.
    pub fn load_with<F>(&self, lookup: F) -> Result<ClientConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match self.file.load()? {
            Some(config) => {
                tracing::debug!("Loaded config from {}", self.file.path().display());
                config
            }
            None => {
                let config = ClientConfig::default();
                self.file.save(&config)?;
                tracing::info!("Wrote default config to {}", self.file.path().display());
                config
            }
        };

        config.apply_overrides(lookup)?;
        Ok(config)
    }
}
