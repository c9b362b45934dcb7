//! Extension reference normalization.
//!
//! Turns the configured extension list into canonical `(identifier, config)`
//! references. Bare names become scoped package names, `.`-prefixed names
//! become paths under the project directory, absolute paths pass through.

use overlay_common::config::{DEFAULT_NAMESPACE, DEFAULT_PREFIX, ExtensionEntry, NamingSection};
use overlay_common::paths::{clean, join_relative};
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::path::{MAIN_SEPARATOR, Path, PathBuf};

/// How bare extension names map onto package names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionNaming {
    /// Package scope, e.g. `@salesforce`
    pub namespace: String,
    /// Package-name prefix, e.g. `extension`
    pub prefix: String,
}

impl Default for ExtensionNaming {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            prefix: DEFAULT_PREFIX.to_string(),
        }
    }
}

impl From<&NamingSection> for ExtensionNaming {
    fn from(section: &NamingSection) -> Self {
        Self {
            namespace: section.namespace.clone(),
            prefix: section.prefix.clone(),
        }
    }
}

impl ExtensionNaming {
    /// `store-finder` → `@salesforce/extension-store-finder`.
    ///
    /// Names that are already canonical are returned unchanged.
    pub fn package_name(&self, short_name: &str) -> String {
        let canonical_prefix = format!("{}/{}-", self.namespace, self.prefix);
        if short_name.starts_with(&canonical_prefix) {
            short_name.to_string()
        } else {
            format!("{}{}", canonical_prefix, short_name)
        }
    }
}

/// Where an extension lives.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum ExtensionId {
    /// Installed package, looked up under `node_modules`
    Package(String),
    /// Directory on disk
    Local(PathBuf),
}

impl ExtensionId {
    /// Directory holding the extension's sources.
    pub fn root(&self, project_dir: &Path) -> PathBuf {
        match self {
            Self::Package(name) => join_relative(&project_dir.join("node_modules"), name),
            Self::Local(path) => path.clone(),
        }
    }

    pub fn is_local(&self) -> bool {
        matches!(self, Self::Local(_))
    }
}

impl fmt::Display for ExtensionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Package(name) => f.write_str(name),
            Self::Local(path) => write!(f, "{}", path.display()),
        }
    }
}

/// One configured extension after normalization.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtensionReference {
    pub identifier: ExtensionId,
    /// Opaque to resolution; passed through unchanged
    pub config: Value,
}

/// Classify a configured name into an [`ExtensionId`].
pub fn classify(name: &str, project_dir: &Path, naming: &ExtensionNaming) -> ExtensionId {
    if name.starts_with('.') {
        ExtensionId::Local(join_relative(project_dir, name))
    } else if name.starts_with(MAIN_SEPARATOR) || Path::new(name).is_absolute() {
        ExtensionId::Local(clean(Path::new(name)))
    } else {
        ExtensionId::Package(naming.package_name(name))
    }
}

/// Normalize a configured extension list.
///
/// Disabled entries are dropped; everything else keeps its relative order.
pub fn normalize(
    entries: &[ExtensionEntry],
    project_dir: &Path,
    naming: &ExtensionNaming,
) -> Vec<ExtensionReference> {
    entries
        .iter()
        .filter_map(ExtensionEntry::parts)
        .map(|(name, config)| ExtensionReference {
            identifier: classify(name, project_dir, naming),
            config,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ids(refs: &[ExtensionReference]) -> Vec<String> {
        refs.iter().map(|r| r.identifier.to_string()).collect()
    }

    #[test]
    fn test_bare_names_are_canonicalized_in_order() {
        let entries = vec![
            ExtensionEntry::name("store-finder"),
            ExtensionEntry::name("wishlist"),
            ExtensionEntry::name("checkout"),
        ];
        let refs = normalize(&entries, Path::new("/project"), &ExtensionNaming::default());
        assert_eq!(
            ids(&refs),
            vec![
                "@salesforce/extension-store-finder",
                "@salesforce/extension-wishlist",
                "@salesforce/extension-checkout",
            ]
        );
        assert!(refs.iter().all(|r| r.config == json!({})));
    }

    #[test]
    fn test_falsy_entries_are_dropped() {
        let entries = vec![
            ExtensionEntry::name("a"),
            ExtensionEntry::Disabled,
            ExtensionEntry::name("b"),
            ExtensionEntry::Disabled,
        ];
        let refs = normalize(&entries, Path::new("/project"), &ExtensionNaming::default());
        assert_eq!(
            ids(&refs),
            vec!["@salesforce/extension-a", "@salesforce/extension-b"]
        );
    }

    #[test]
    fn test_paths_are_classified_as_local() {
        let entries = vec![
            ExtensionEntry::name("./extensions/local-one"),
            ExtensionEntry::configured("/opt/ext/abs", json!({"flag": true})),
            ExtensionEntry::name("../shared/ext"),
        ];
        let refs = normalize(&entries, Path::new("/work/project"), &ExtensionNaming::default());

        assert_eq!(
            refs[0].identifier,
            ExtensionId::Local(PathBuf::from("/work/project/extensions/local-one"))
        );
        assert_eq!(refs[1].identifier, ExtensionId::Local(PathBuf::from("/opt/ext/abs")));
        assert_eq!(refs[1].config, json!({"flag": true}));
        assert_eq!(
            refs[2].identifier,
            ExtensionId::Local(PathBuf::from("/work/shared/ext"))
        );
    }

    #[test]
    fn test_config_passes_through_unchanged() {
        let config = json!({"nested": {"list": [1, 2, 3]}, "name": "x"});
        let entries = vec![ExtensionEntry::configured("a", config.clone())];
        let refs = normalize(&entries, Path::new("/p"), &ExtensionNaming::default());
        assert_eq!(refs[0].config, config);
    }

    #[test]
    fn test_custom_naming_and_canonical_passthrough() {
        let naming = ExtensionNaming {
            namespace: "@acme".to_string(),
            prefix: "ext".to_string(),
        };
        assert_eq!(naming.package_name("search"), "@acme/ext-search");
        assert_eq!(naming.package_name("@acme/ext-search"), "@acme/ext-search");
    }

    #[test]
    fn test_package_root_is_under_node_modules() {
        let id = ExtensionId::Package("@salesforce/extension-a".to_string());
        assert_eq!(
            id.root(Path::new("/project")),
            PathBuf::from("/project/node_modules/@salesforce/extension-a")
        );
        assert!(!id.is_local());
    }
}
