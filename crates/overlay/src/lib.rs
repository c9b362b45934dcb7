//! Overlay CLI Library
//!
//! This library exposes CLI functionality for programmatic use and testing.

pub mod commands;
pub mod context;
pub mod logging;
pub mod output;

pub use context::ProjectContext;
pub use output::OutputFormat;
