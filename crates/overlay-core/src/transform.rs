//! Static content replacement for generated extension lists.
//!
//! Some SDK modules exist only to enumerate the active extensions' setup
//! modules. Serverless bundles cannot follow a dynamic `require`, so those
//! files are replaced wholesale at compile time with a literal
//! `module.exports = {...}` object of static `require` calls.

use crate::candidates::SdkFallback;
use crate::extension::{ExtensionId, ExtensionReference};
use indexmap::IndexMap;
use overlay_common::paths::{clean, join_relative};
use std::borrow::Cow;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Generated files inside the SDK package and the entry point each one lists.
pub const GENERATED_MODULES: &[(&str, &str)] = &[
    ("ssr/server/extensions.js", "setup-server"),
    ("ssr/universal/extensions.js", "setup-app"),
];

/// Exact-path source replacement.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentReplacement {
    replacements: IndexMap<PathBuf, String>,
}

impl ContentReplacement {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the body of `path` with `source`.
    pub fn insert(&mut self, path: impl AsRef<Path>, source: impl Into<String>) {
        self.replacements.insert(clean(path.as_ref()), source.into());
    }

    /// Replacements for the SDK's generated extension lists.
    ///
    /// `extensions` must be in configured order; the generated lists keep it.
    pub fn server_extensions(
        project_dir: &Path,
        sdk: &SdkFallback,
        extensions: &[ExtensionReference],
    ) -> Self {
        let sdk_root = sdk.root(project_dir);
        let mut replacement = Self::new();
        for (file, entry_point) in GENERATED_MODULES {
            replacement.insert(
                join_relative(&sdk_root, file),
                generate_extensions_module(extensions, entry_point),
            );
        }
        replacement
    }

    /// The replacement for `path`, if it is one of the mapped files.
    pub fn replacement_for(&self, path: &Path) -> Option<&str> {
        self.replacements.get(&clean(path)).map(String::as_str)
    }

    /// Apply to one file: mapped files get their replacement, every other
    /// file comes back borrowed and unchanged.
    pub fn transform<'a>(&'a self, path: &Path, source: &'a str) -> Cow<'a, str> {
        match self.replacement_for(path) {
            Some(replacement) => {
                debug!("Replacing contents of {:?}", path);
                Cow::Borrowed(replacement)
            }
            None => Cow::Borrowed(source),
        }
    }

    /// Mapped files with their replacement source, in insertion order.
    pub fn targets(&self) -> impl Iterator<Item = (&Path, &str)> {
        self.replacements
            .iter()
            .map(|(path, source)| (path.as_path(), source.as_str()))
    }

    pub fn len(&self) -> usize {
        self.replacements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.replacements.is_empty()
    }
}

/// Render `module.exports = {...}` for `entry_point` of every extension.
///
/// The object is keyed by extension identifier; JavaScript keeps string keys
/// in insertion order, so the configured order survives.
pub fn generate_extensions_module(extensions: &[ExtensionReference], entry_point: &str) -> String {
    let mut out = String::from("// Generated extension list. Do not edit.\n");
    if extensions.is_empty() {
        out.push_str("module.exports = {}\n");
        return out;
    }

    out.push_str("module.exports = {\n");
    for (i, extension) in extensions.iter().enumerate() {
        let separator = if i + 1 == extensions.len() { "" } else { "," };
        let module = match &extension.identifier {
            ExtensionId::Package(name) => format!("{}/{}", name, entry_point),
            ExtensionId::Local(path) => path.join(entry_point).to_string_lossy().into_owned(),
        };
        // Writing into a String cannot fail.
        let _ = write!(
            out,
            "  {}: {{\n    \"config\": {},\n    \"setup\": require({})\n  }}{}\n",
            js_string(&extension.identifier.to_string()),
            extension.config,
            js_string(&module),
            separator
        );
    }
    out.push_str("}\n");
    out
}

/// A JSON string literal is a valid JavaScript string literal.
fn js_string(value: &str) -> String {
    serde_json::Value::String(value.to_string()).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extension::{ExtensionNaming, normalize};
    use overlay_common::config::ExtensionEntry;
    use serde_json::json;

    fn references() -> Vec<ExtensionReference> {
        normalize(
            &[
                ExtensionEntry::name("store-finder"),
                ExtensionEntry::Disabled,
                ExtensionEntry::configured("./extensions/local", json!({"radius": 5})),
            ],
            Path::new("/project"),
            &ExtensionNaming::default(),
        )
    }

    #[test]
    fn test_generated_module_keeps_configured_order() {
        let source = generate_extensions_module(&references(), "setup-server");
        let expected = r#"// Generated extension list. Do not edit.
module.exports = {
  "@salesforce/extension-store-finder": {
    "config": {},
    "setup": require("@salesforce/extension-store-finder/setup-server")
  },
  "/project/extensions/local": {
    "config": {"radius":5},
    "setup": require("/project/extensions/local/setup-server")
  }
}
"#;
        assert_eq!(source, expected);
    }

    #[test]
    fn test_empty_list() {
        assert_eq!(
            generate_extensions_module(&[], "setup-app"),
            "// Generated extension list. Do not edit.\nmodule.exports = {}\n"
        );
    }

    #[test]
    fn test_only_mapped_files_are_replaced() {
        let replacement = ContentReplacement::server_extensions(
            Path::new("/project"),
            &SdkFallback::default(),
            &references(),
        );
        assert_eq!(replacement.len(), 2);

        let server = Path::new(
            "/project/node_modules/@salesforce/pwa-kit-react-sdk/ssr/server/extensions.js",
        );
        let transformed = replacement.transform(server, "module.exports = require(dynamic)");
        assert!(transformed.contains("extension-store-finder/setup-server"));
        assert!(!transformed.contains("dynamic"));

        let universal = Path::new(
            "/project/node_modules/@salesforce/pwa-kit-react-sdk/ssr/universal/../universal/extensions.js",
        );
        assert!(replacement.transform(universal, "").contains("/setup-app"));

        let other = Path::new("/project/app/routes.jsx");
        assert!(matches!(
            replacement.transform(other, "untouched"),
            Cow::Borrowed("untouched")
        ));
    }

    #[test]
    fn test_custom_replacement_map() {
        let mut replacement = ContentReplacement::new();
        replacement.insert("/project/generated.js", "module.exports = 1");
        assert_eq!(
            replacement.replacement_for(Path::new("/project/./generated.js")),
            Some("module.exports = 1")
        );
        assert!(replacement.replacement_for(Path::new("/project/other.js")).is_none());
    }
}
