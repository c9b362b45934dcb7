//! Configuration module
//!
//! Handles loading and discovery of the application configuration that lists
//! extensions: `overlay.toml`, a JSON app config (`config/default.json`), or
//! the `mobify` section of a `package.json`.

pub mod entry;
pub mod error;
pub mod legacy;
pub mod model;

use self::legacy::JsonAppConfig;
use std::path::{Path, PathBuf};
use tracing::debug;

pub use self::entry::ExtensionEntry;
pub use self::error::{ConfigError, Result};
pub use self::model::*;

/// File names probed in each directory during discovery, in priority order.
pub const CONFIG_CANDIDATES: &[&str] = &["overlay.toml", "config/default.json", "package.json"];

/// Source of the active extension list.
///
/// Resolution reads extensions through this trait instead of a process-wide
/// accessor, so callers decide where configuration comes from.
pub trait ConfigProvider: Send + Sync {
    /// The raw configured extension list, falsy entries included.
    fn extensions(&self) -> Vec<ExtensionEntry>;
}

impl ConfigProvider for OverlayConfig {
    fn extensions(&self) -> Vec<ExtensionEntry> {
        self.app.extensions.clone()
    }
}

impl ConfigProvider for Vec<ExtensionEntry> {
    fn extensions(&self) -> Vec<ExtensionEntry> {
        self.clone()
    }
}

impl OverlayConfig {
    /// Load configuration from a file path
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        debug!("Loading configuration from {:?}", path);

        // Detect format based on extension
        if path.extension().is_some_and(|ext| ext == "json") {
            let json: JsonAppConfig = serde_json::from_str(&content)?;
            let app = json.into_app().ok_or_else(|| ConfigError::MissingAppSection {
                path: path.to_path_buf(),
            })?;
            return Ok(app.into());
        }

        // Default to TOML
        let config: OverlayConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Project directory for a configuration loaded from `config_path`.
    ///
    /// `app.project_dir` is taken relative to the directory holding the
    /// config file; without it the project root is the directory that
    /// discovery started from (the parent of `config/` for
    /// `config/default.json`).
    pub fn project_dir(&self, config_path: &Path) -> PathBuf {
        let mut root = config_path.parent().unwrap_or(Path::new(".")).to_path_buf();
        if config_path.ends_with("config/default.json") {
            root = root.parent().unwrap_or(Path::new(".")).to_path_buf();
        }

        match &self.app.project_dir {
            Some(dir) if dir.is_absolute() => dir.clone(),
            Some(dir) => crate::paths::clean(&root.join(dir)),
            None => root,
        }
    }
}

/// Walk up the directory tree to find a configuration file.
///
/// A `package.json` only counts when it carries an app section under
/// `mobify`; other package manifests are skipped.
pub fn discover_config(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();

    loop {
        for candidate in CONFIG_CANDIDATES {
            let path = current.join(candidate);
            if !path.is_file() {
                continue;
            }
            if *candidate == "package.json" && !package_json_has_app(&path) {
                continue;
            }
            debug!("Discovered configuration at {:?}", path);
            return Some(path);
        }

        // Move up one directory
        match current.parent() {
            Some(parent) => current = parent.to_path_buf(),
            None => break,
        }
    }

    None
}

fn package_json_has_app(path: &Path) -> bool {
    std::fs::read_to_string(path)
        .ok()
        .and_then(|content| serde_json::from_str::<JsonAppConfig>(&content).ok())
        .and_then(JsonAppConfig::into_app)
        .is_some()
}
