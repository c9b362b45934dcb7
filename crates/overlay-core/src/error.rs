//! Error types for override resolution

use overlay_common::ConfigError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for resolution operations
pub type Result<T> = std::result::Result<T, ResolveError>;

/// Errors that can occur while resolving a wildcard import
#[derive(Debug, Error)]
pub enum ResolveError {
    /// No candidate exists on disk
    #[error(
        "Module not found: cannot resolve '{request}' from {} ({} candidates tried)",
        .issuer.display(),
        .candidates.len()
    )]
    NotFound {
        /// The wildcard request as written
        request: String,
        /// File that issued the import
        issuer: PathBuf,
        /// Candidates in the order they were probed
        candidates: Vec<PathBuf>,
    },

    /// A wildcard request without an issuing file
    #[error("Wildcard import '{0}' has no issuer to resolve from")]
    MissingIssuer(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
