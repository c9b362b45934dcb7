use super::entry::ExtensionEntry;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default npm scope for extension packages.
pub const DEFAULT_NAMESPACE: &str = "@salesforce";

/// Default package-name prefix for extension packages.
pub const DEFAULT_PREFIX: &str = "extension";

/// Default SDK package providing the built-in fallback components.
pub const DEFAULT_SDK_PACKAGE: &str = "@salesforce/pwa-kit-react-sdk";

/// Root configuration from overlay.toml
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct OverlayConfig {
    /// Application settings
    #[serde(default)]
    pub app: AppSection,

    /// Package naming for bare extension names
    #[serde(default)]
    pub naming: NamingSection,
}

/// [app] section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppSection {
    /// Ordered extension list; order decides precedence
    #[serde(default)]
    pub extensions: Vec<ExtensionEntry>,

    /// SDK package that supplies fallback modules
    #[serde(default = "default_sdk_package", alias = "sdkPackage")]
    pub sdk_package: String,

    /// Project directory, relative to the config file
    #[serde(default, alias = "projectDir")]
    pub project_dir: Option<PathBuf>,
}

impl Default for AppSection {
    fn default() -> Self {
        Self {
            extensions: Vec::new(),
            sdk_package: default_sdk_package(),
            project_dir: None,
        }
    }
}

pub(crate) fn default_sdk_package() -> String {
    DEFAULT_SDK_PACKAGE.to_string()
}

/// [naming] section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NamingSection {
    /// Package scope, e.g. `@salesforce`
    #[serde(default = "default_namespace")]
    pub namespace: String,
    /// Package-name prefix, e.g. `extension`
    #[serde(default = "default_prefix")]
    pub prefix: String,
}

impl Default for NamingSection {
    fn default() -> Self {
        Self {
            namespace: default_namespace(),
            prefix: default_prefix(),
        }
    }
}

fn default_namespace() -> String {
    DEFAULT_NAMESPACE.to_string()
}

fn default_prefix() -> String {
    DEFAULT_PREFIX.to_string()
}

impl OverlayConfig {
    /// Configuration holding only an extension list.
    pub fn with_extensions(extensions: Vec<ExtensionEntry>) -> Self {
        Self {
            app: AppSection {
                extensions,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    /// Entries that are switched on, in configured order.
    pub fn active_extensions(&self) -> impl Iterator<Item = &ExtensionEntry> {
        self.app.extensions.iter().filter(|e| !e.is_disabled())
    }
}
