//! Dapur Buzzer client core
//!
//! Shared request cache with single-flight deduplication, auth/role state,
//! typed catalog services and the command-line client built on them.

use shadow_rs::shadow;
shadow!(build);

pub mod auth;
pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod external;
pub mod logger;
pub mod models;
pub mod services;
pub mod state;

pub use state::AppState;

pub fn pkg_version() -> &'static str {
    build::PKG_VERSION
}

pub fn clap_long_version() -> &'static str {
    build::CLAP_LONG_VERSION
}
