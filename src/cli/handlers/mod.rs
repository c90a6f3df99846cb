//! Command handlers for CLI operations
//!
//! This module contains handlers for different CLI commands,
//! separating command execution logic from parsing and validation.
//! Handlers return the JSON document the executor prints.

pub mod auth;
pub mod catalog;
pub mod check;

pub use auth::AuthCommandHandler;
pub use catalog::CatalogCommandHandler;
pub use check::CheckCommandHandler;
