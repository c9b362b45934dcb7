use super::entry::ExtensionEntry;
use super::model::{AppSection, OverlayConfig, default_sdk_package};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// JSON application config (`config/default.json`), or the same object
/// nested under the `mobify` key of a `package.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonAppConfig {
    pub app: Option<JsonAppSection>,
    pub mobify: Option<Box<JsonAppConfig>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonAppSection {
    #[serde(default)]
    pub extensions: Vec<ExtensionEntry>,
    pub sdk_package: Option<String>,
    pub project_dir: Option<PathBuf>,
}

impl JsonAppConfig {
    /// The `app` section, looking inside `mobify` when the top level has none.
    pub fn into_app(self) -> Option<JsonAppSection> {
        match (self.app, self.mobify) {
            (Some(app), _) => Some(app),
            (None, Some(nested)) => nested.into_app(),
            (None, None) => None,
        }
    }
}

impl From<JsonAppSection> for OverlayConfig {
    fn from(json: JsonAppSection) -> Self {
        OverlayConfig {
            app: AppSection {
                extensions: json.extensions,
                sdk_package: json.sdk_package.unwrap_or_else(default_sdk_package),
                project_dir: json.project_dir,
            },
            ..Default::default()
        }
    }
}
