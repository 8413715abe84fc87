//! Key-value store trait.

use crate::error::Result;
use async_trait::async_trait;

/// Key holding the opaque session token.
pub const TOKEN_KEY: &str = "token";

/// Key holding the JSON-serialized session user.
pub const USER_KEY: &str = "user";

/// A tiny string key-value store that survives between app runs.
///
/// Only the session context writes to it, under [`TOKEN_KEY`] and
/// [`USER_KEY`].
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Returns the value stored under `key`, if any.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Removes `key`. Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> Result<()>;
}
