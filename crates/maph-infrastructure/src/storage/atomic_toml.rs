//! Crash-safe TOML documents.
//!
//! Writes go to a hidden sibling file that is fsynced and then renamed over
//! the target, so readers see either the old or the new document. Updates
//! hold an exclusive `fs2` lock on a `.lock` sibling for the whole
//! read-modify-write cycle.

use maph_core::MaphError;
use serde::{Serialize, de::DeserializeOwned};
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Cannot serialize TOML: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Cannot lock {path}: {message}")]
    Lock { path: PathBuf, message: String },
}

impl StorageError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

impl From<StorageError> for MaphError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Parse { path, source } => MaphError::Serialization {
                format: "TOML".to_string(),
                message: format!("{}: {}", path.display(), source),
            },
            other => MaphError::storage(other.to_string()),
        }
    }
}

/// Handle to a TOML file holding one `T`.
#[derive(Debug)]
pub struct AtomicTomlFile<T> {
    path: PathBuf,
    _doc: PhantomData<fn() -> T>,
}

impl<T> Clone for AtomicTomlFile<T> {
    fn clone(&self) -> Self {
        Self {
            path: self.path.clone(),
            _doc: PhantomData,
        }
    }
}

impl<T> AtomicTomlFile<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _doc: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the document. A missing or blank file yields `None`.
    pub fn load(&self) -> Result<Option<T>, StorageError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StorageError::io(&self.path, e)),
        };

        if content.trim().is_empty() {
            return Ok(None);
        }

        toml::from_str(&content)
            .map(Some)
            .map_err(|source| StorageError::Parse {
                path: self.path.clone(),
                source,
            })
    }

    /// Replaces the document atomically, creating parent directories.
    pub fn save(&self, doc: &T) -> Result<(), StorageError> {
        let parent = self.parent()?;
        fs::create_dir_all(parent).map_err(|e| StorageError::io(parent, e))?;

        let text = toml::to_string_pretty(doc)?;
        let tmp_path = self.sibling("tmp");

        let mut tmp = File::create(&tmp_path).map_err(|e| StorageError::io(&tmp_path, e))?;
        tmp.write_all(text.as_bytes())
            .and_then(|_| tmp.sync_all())
            .map_err(|e| StorageError::io(&tmp_path, e))?;
        drop(tmp);

        fs::rename(&tmp_path, &self.path).map_err(|e| StorageError::io(&self.path, e))
    }

    /// Locked read-modify-write. `init` supplies the document when the file
    /// does not exist yet.
    pub fn update<F, R>(&self, init: impl FnOnce() -> T, f: F) -> Result<R, StorageError>
    where
        F: FnOnce(&mut T) -> R,
    {
        let _lock = FileLock::acquire(&self.sibling("lock"))?;
        let mut doc = self.load()?.unwrap_or_else(init);
        let out = f(&mut doc);
        self.save(&doc)?;
        Ok(out)
    }

    fn parent(&self) -> Result<&Path, StorageError> {
        self.path.parent().ok_or_else(|| {
            StorageError::io(
                &self.path,
                std::io::Error::new(std::io::ErrorKind::InvalidInput, "path has no parent"),
            )
        })
    }

    /// `dir/.name.ext` next to the document.
    fn sibling(&self, ext: &str) -> PathBuf {
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.path.with_file_name(format!(".{}.{}", name, ext))
    }
}

/// Exclusive advisory lock, released (and the lock file removed) on drop.
struct FileLock {
    _file: File,
    path: PathBuf,
}

impl FileLock {
    fn acquire(path: &Path) -> Result<Self, StorageError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| StorageError::io(parent, e))?;
        }

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)
            .map_err(|e| StorageError::io(path, e))?;

        #[cfg(unix)]
        {
            use fs2::FileExt;
            file.lock_exclusive().map_err(|e| StorageError::Lock {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        }

        Ok(Self {
            _file: file,
            path: path.to_path_buf(),
        })
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.path);
    }
}
