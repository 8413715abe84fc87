//! Infrastructure layer for the MAPH client.
//!
//! Implements the traits declared in `maph-core`: the reqwest-backed
//! [`HttpApiClient`], the TOML-file and in-memory key-value stores, plus
//! configuration loading and platform paths.

pub mod attachments;
pub mod config_service;
pub mod http_client;
pub mod paths;
pub mod storage;

pub use config_service::ConfigService;
pub use http_client::HttpApiClient;
pub use paths::{MaphPaths, PathError};
pub use storage::{FileKeyValueStore, MemoryKeyValueStore};
