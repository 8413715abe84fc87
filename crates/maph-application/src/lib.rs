//! View models and use cases for the MAPH client.
//!
//! Every screen is an async view model that owns its form state, talks to the
//! backend through `maph_core::resource::ResourceClient`, and guards its
//! submit actions against double triggers. The [`navigation::NavigationShell`]
//! owns the [`session_context::SessionContext`] and hands the current session
//! to screens when they are constructed.

pub mod agenda;
pub mod guard;
pub mod navigation;
pub mod screens;
pub mod session_context;

pub use agenda::AgendaViewModel;
pub use guard::{SubmitGuard, SubmitTicket};
pub use navigation::{NavigationShell, Route};
pub use session_context::SessionContext;
