//! Shared building blocks for the overlay crates: configuration loading,
//! lexical path helpers and the virtual filesystem capability.

pub mod config;
pub mod paths;
pub mod vfs;

pub use config::{ConfigError, OverlayConfig};
pub use vfs::{MemoryVfs, OsVfs, Vfs};
