//! # Core Auth
//!
//! Admin sign-in for the site: an explicit [`SessionContext`] instead of a
//! flag in ambient storage.

pub mod error;
pub mod session;
pub mod types;

pub use error::{AuthError, Result};
pub use session::SessionContext;
pub use types::{AdminUser, Credentials, Session};
