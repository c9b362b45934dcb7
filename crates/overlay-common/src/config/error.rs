//! Error types for configuration loading.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading or interpreting configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// JSON parsing error
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// A JSON config file that carries no application section
    #[error("No app configuration found in {path}")]
    MissingAppSection {
        /// File that was inspected
        path: PathBuf,
    },

    /// An extension list entry with an unsupported shape
    #[error("Malformed extension entry: {reason} (got {value})")]
    MalformedEntry {
        /// What was wrong with it
        reason: String,
        /// The offending value, rendered as JSON
        value: String,
    },
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
