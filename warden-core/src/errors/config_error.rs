//! Configuration file errors.

/// Errors reading or parsing the policy configuration file.
///
/// These never cross the engine boundary: loading falls back to
/// defaults with a logged warning instead of propagating.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("configuration file not found: {path}")]
    FileNotFound { path: String },

    #[error("failed to read {path}: {message}")]
    ReadFailed { path: String, message: String },

    #[error("invalid JSON in {path}: {message}")]
    ParseError { path: String, message: String },
}
