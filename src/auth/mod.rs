//! Authentication and role resolution.
//!
//! [`AuthStore`] is the single source of truth for "who is signed in and
//! what may they do". It talks to the remote auth service through the
//! [`AuthBackend`] trait; [`HttpAuthBackend`] is the REST implementation.
//!
//! Role lookups fail safe: a missing role row or a failed lookup resolves to
//! [`Role::Guest`], never to an error.

mod backend;
mod error;
mod http_backend;
mod role;
mod store;
mod types;

pub use backend::AuthBackend;
pub use error::AuthError;
pub use http_backend::{AuthEndpoints, HttpAuthBackend};
pub use role::Role;
pub use store::{AuthSnapshot, AuthStore};
pub use types::{AuthEvent, LoginResult, RegistrationResult, Session, User};
