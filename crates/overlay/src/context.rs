//! Project context shared by the commands: where the project lives and
//! which configuration applies to it.

use anyhow::{Context, Result};
use overlay_common::config::{OverlayConfig, discover_config};
use overlay_common::paths::{clean, join_relative};
use overlay_common::vfs::OsVfs;
use overlay_core::{
    ExtensionNaming, ExtensionReference, OverrideResolver, ResolverFlavor, SdkFallback, normalize,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Configuration and project root for one CLI invocation.
#[derive(Debug, Clone)]
pub struct ProjectContext {
    pub config: OverlayConfig,
    /// The file the configuration came from, if any
    pub config_path: Option<PathBuf>,
    pub project_dir: PathBuf,
    cwd: PathBuf,
}

impl ProjectContext {
    /// Load the context from the global CLI flags.
    ///
    /// An explicit `--config` wins; otherwise the configuration is discovered
    /// by walking up from `--project-dir` (or the current directory). An
    /// explicit `--project-dir` always overrides the configured one.
    pub fn load(config: Option<PathBuf>, project_dir: Option<PathBuf>) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;
        Self::load_from(&cwd, config, project_dir)
    }

    /// Same as [`ProjectContext::load`] with an explicit working directory.
    pub fn load_from(
        cwd: &Path,
        config: Option<PathBuf>,
        project_dir: Option<PathBuf>,
    ) -> Result<Self> {
        let project_dir = project_dir.map(|dir| absolutize(cwd, &dir));
        let start = project_dir.clone().unwrap_or_else(|| cwd.to_path_buf());

        let config_path = match config {
            Some(path) => Some(absolutize(cwd, &path)),
            None => discover_config(&start),
        };

        let (config, configured_dir) = match &config_path {
            Some(path) => {
                let config = OverlayConfig::load(path)
                    .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
                let dir = config.project_dir(path);
                info!("Loaded configuration from {}", path.display());
                (config, dir)
            }
            None => {
                debug!("No configuration found from {}, using defaults", start.display());
                (OverlayConfig::default(), start.clone())
            }
        };

        Ok(Self {
            config,
            config_path,
            project_dir: project_dir.unwrap_or(configured_dir),
            cwd: cwd.to_path_buf(),
        })
    }

    pub fn naming(&self) -> ExtensionNaming {
        ExtensionNaming::from(&self.config.naming)
    }

    pub fn sdk(&self) -> SdkFallback {
        SdkFallback::new(self.config.app.sdk_package.clone())
    }

    /// The configured extensions, normalized, in configured order.
    pub fn references(&self) -> Vec<ExtensionReference> {
        normalize(&self.config.app.extensions, &self.project_dir, &self.naming())
    }

    /// A resolver over the real filesystem reading extensions from this
    /// context's configuration.
    pub fn resolver(&self, flavor: ResolverFlavor) -> OverrideResolver<OsVfs> {
        OverrideResolver::new(flavor, self.project_dir.clone(), OsVfs)
            .with_provider(Arc::new(self.config.clone()))
            .with_naming(self.naming())
            .with_sdk(self.sdk())
    }

    /// Resolve a user-supplied path against the invocation's working directory.
    pub fn path_arg(&self, path: &Path) -> PathBuf {
        absolutize(&self.cwd, path)
    }
}

fn absolutize(cwd: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        clean(path)
    } else {
        join_relative(cwd, path)
    }
}
