//! Filesystem locations used by the MAPH client.
//!
//! ```text
//! ~/.config/maph/          # Config directory (platform equivalent elsewhere)
//! ├── config.toml          # ClientConfig
//! ├── session.toml         # Key-value store (token, user)
//! └── logs/                # Rolling log files
//!     └── maph.log.YYYY-MM-DD
//! ```

use std::path::{Path, PathBuf};
use thiserror::Error;

const APP_DIR: &str = "maph";

#[derive(Error, Debug)]
pub enum PathError {
    /// The platform config directory could not be determined.
    #[error("Cannot find the user configuration directory")]
    ConfigDirNotFound,
}

/// Resolved directory layout, rooted at the app's config directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaphPaths {
    root: PathBuf,
}

impl MaphPaths {
    /// Resolves the platform config directory (XDG on Linux).
    pub fn resolve() -> Result<Self, PathError> {
        let base = dirs::config_dir().ok_or(PathError::ConfigDirNotFound)?;
        Ok(Self::with_root(base.join(APP_DIR)))
    }

    /// Uses `root` instead of the platform directory (tests, `--config-dir`).
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn config_dir(&self) -> &Path {
        &self.root
    }

    pub fn config_file(&self) -> PathBuf {
        self.root.join("config.toml")
    }

    pub fn session_file(&self) -> PathBuf {
        self.root.join("session.toml")
    }

    pub fn log_dir(&self) -> PathBuf {
        self.root.join("logs")
    }
}
