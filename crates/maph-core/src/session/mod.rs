//! Session domain module.
//!
//! # Module Structure
//!
//! - `model`: The authenticated user (`Session`, `SessionUser`)
//! - `store`: Key-value storage trait used to keep the session between runs
//! - `auth`: Login gateway trait and response classification
//!
//! # Usage
//!
//! ```ignore
//! use maph_core::session::{Session, SessionUser, KeyValueStore, AuthGateway};
//! ```

mod auth;
mod model;
mod store;

// Re-export public API
pub use auth::{AuthGateway, Credentials, LoginGrant, classify_login_response};
pub use model::{Session, SessionUser};
pub use store::{KeyValueStore, TOKEN_KEY, USER_KEY};
