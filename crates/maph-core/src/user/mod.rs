//! User profile module.

mod model;

pub use model::{ProfileField, ProfileForm};
