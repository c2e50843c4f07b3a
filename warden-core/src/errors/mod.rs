//! Error handling for Warden.
//! One error enum per subsystem, `thiserror` only, zero `anyhow`.
//!
//! Configuration *content* problems are deliberately not errors: they
//! surface through [`ValidationReport`](crate::config::ValidationReport)
//! so callers can decide whether to abort or continue with defaults.

pub mod config_error;
pub mod path_error;
pub mod store_error;

pub use config_error::ConfigError;
pub use path_error::PathError;
pub use store_error::StoreError;
