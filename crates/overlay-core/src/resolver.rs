//! Override resolver plugin.
//!
//! Intercepts wildcard (`*/`) requests during module resolution, builds the
//! candidate list and probes it through a [`Vfs`], rewriting the request to
//! the first candidate that exists. Other requests pass through untouched.

use crate::candidates::{
    CandidateList, CandidateOptions, SdkFallback, build_candidates_matching, is_wildcard,
    strip_wildcard,
};
use crate::error::{ResolveError, Result};
use crate::extension::ExtensionNaming;
use overlay_common::config::{ConfigProvider, ExtensionEntry};
use overlay_common::paths::join_relative;
use overlay_common::vfs::Vfs;
use serde::Deserialize;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, trace};

/// File extensions tried after the exact candidate, in order.
pub const DEFAULT_FILE_EXTENSIONS: &[&str] = &[".ts", ".tsx", ".js", ".jsx", ".json"];

/// Entry points an application extension exposes.
pub const APP_EXTENSION_ENTRY_POINTS: &[&str] = &["setup-app", "setup-server"];

/// A module request as seen by a resolver plugin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveRequest {
    /// The specifier as written in the import
    pub request: String,
    /// The file containing the import
    pub issuer: Option<PathBuf>,
    /// Resolved location, filled in by the plugin that handled the request
    pub path: Option<PathBuf>,
}

impl ResolveRequest {
    pub fn new(request: impl Into<String>, issuer: impl Into<PathBuf>) -> Self {
        Self {
            request: request.into(),
            issuer: Some(issuer.into()),
            path: None,
        }
    }
}

/// What a plugin did with a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveOutcome {
    /// Not ours; the host continues with its normal resolution
    Passthrough,
    /// Resolved; the request's `path` has been set to this location
    Resolved(PathBuf),
}

/// A hook in the host's module resolution pipeline.
pub trait ResolvePlugin {
    fn apply(&self, request: &mut ResolveRequest) -> Result<ResolveOutcome>;
}

/// Which imports a resolver handles and where it looks inside extensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResolverFlavor {
    /// Every wildcard import; extensions supply files under `overrides/`,
    /// then `src/`, then the extension root
    Overrides,
    /// Only wildcard imports of application-extension entry points
    /// (`setup-app`, `setup-server`), looked up at the extension root
    AppExtension,
}

impl ResolverFlavor {
    pub fn extension_subdirs(self) -> Vec<PathBuf> {
        match self {
            Self::Overrides => vec![
                PathBuf::from("overrides"),
                PathBuf::from("src"),
                PathBuf::new(),
            ],
            Self::AppExtension => vec![PathBuf::new()],
        }
    }

    pub fn entry_points(self) -> Option<Vec<String>> {
        match self {
            Self::Overrides => None,
            Self::AppExtension => Some(
                APP_EXTENSION_ENTRY_POINTS
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
            ),
        }
    }
}

#[derive(Debug, Deserialize)]
struct PackageManifest {
    main: Option<String>,
}

/// Resolver plugin for wildcard imports.
///
/// Holds no mutable state; one instance can serve concurrent resolutions.
pub struct OverrideResolver<V: Vfs> {
    flavor: ResolverFlavor,
    candidates: CandidateOptions,
    file_extensions: Vec<String>,
    entry_points: Option<Vec<String>>,
    vfs: V,
}

impl<V: Vfs> OverrideResolver<V> {
    /// Resolver with the defaults of `flavor`.
    pub fn new(flavor: ResolverFlavor, project_dir: impl Into<PathBuf>, vfs: V) -> Self {
        Self {
            flavor,
            candidates: CandidateOptions::new(project_dir)
                .with_extension_subdirs(flavor.extension_subdirs()),
            file_extensions: DEFAULT_FILE_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
            entry_points: flavor.entry_points(),
            vfs,
        }
    }

    /// Resolver for general project overrides.
    pub fn overrides(project_dir: impl Into<PathBuf>, vfs: V) -> Self {
        Self::new(ResolverFlavor::Overrides, project_dir, vfs)
    }

    /// Resolver for application-extension entry points.
    pub fn app_extension(project_dir: impl Into<PathBuf>, vfs: V) -> Self {
        Self::new(ResolverFlavor::AppExtension, project_dir, vfs)
    }

    pub fn with_extensions<I, E>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Into<ExtensionEntry>,
    {
        self.candidates = self.candidates.with_extensions(extensions);
        self
    }

    pub fn with_provider(mut self, provider: Arc<dyn ConfigProvider>) -> Self {
        self.candidates = self.candidates.with_provider(provider);
        self
    }

    pub fn with_naming(mut self, naming: ExtensionNaming) -> Self {
        self.candidates = self.candidates.with_naming(naming);
        self
    }

    pub fn with_sdk(mut self, sdk: SdkFallback) -> Self {
        self.candidates = self.candidates.with_sdk(sdk);
        self
    }

    pub fn with_extension_subdirs<I, P>(mut self, subdirs: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.candidates = self.candidates.with_extension_subdirs(subdirs);
        self
    }

    /// Replace the file extensions tried for each candidate (`.ts`, `.js`, ...).
    pub fn with_file_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.file_extensions = extensions
            .into_iter()
            .map(Into::into)
            .map(|ext: String| {
                if ext.starts_with('.') {
                    ext
                } else {
                    format!(".{}", ext)
                }
            })
            .collect();
        self
    }

    pub fn flavor(&self) -> ResolverFlavor {
        self.flavor
    }

    /// The filesystem candidates are probed through.
    pub fn vfs(&self) -> &V {
        &self.vfs
    }

    pub fn candidate_options(&self) -> &CandidateOptions {
        &self.candidates
    }

    /// Whether this resolver takes responsibility for `request`.
    pub fn handles(&self, request: &str) -> bool {
        if !is_wildcard(request) {
            return false;
        }
        match &self.entry_points {
            None => true,
            Some(entry_points) => {
                let module_path = strip_wildcard(request);
                let last = module_path.rsplit('/').next().unwrap_or(module_path);
                entry_points.iter().any(|e| e == last)
            }
        }
    }

    /// Candidates for `request` issued from `issuer`.
    ///
    /// Resolved paths are real paths, so a file reached through a symlinked
    /// extension later issues imports from its real location. The issuer's
    /// own candidate is therefore also recognised by comparing the real path
    /// of what the candidate loads with the issuer's real path.
    pub fn candidates(&self, request: &str, issuer: &Path) -> Result<CandidateList> {
        let mut real_issuer = None;
        build_candidates_matching(request, issuer, &self.candidates, |candidate| {
            let real_issuer = real_issuer.get_or_insert_with(|| self.vfs.realpath(issuer).ok());
            let Some(real_issuer) = real_issuer.as_ref() else {
                return false;
            };
            self.load(candidate)
                .and_then(|found| self.vfs.realpath(&found).ok())
                .is_some_and(|real| &real == real_issuer)
        })
    }

    /// Resolve a wildcard `request` issued from `issuer` to a real path.
    pub fn resolve(&self, request: &str, issuer: &Path) -> Result<PathBuf> {
        let list = self.candidates(request, issuer)?;

        for candidate in list.probe_order() {
            trace!("Probing {:?} ({:?})", candidate.path, candidate.origin);
            if let Some(found) = self.load(&candidate.path) {
                let real = self.vfs.realpath(&found)?;
                debug!("Resolved '{}' from {:?} to {:?}", request, issuer, real);
                return Ok(real);
            }
        }

        Err(ResolveError::NotFound {
            request: request.to_string(),
            issuer: issuer.to_path_buf(),
            candidates: list.probe_order().into_iter().map(|c| c.path.clone()).collect(),
        })
    }

    fn load(&self, candidate: &Path) -> Option<PathBuf> {
        let parent_exists = candidate.parent().is_some_and(|p| self.vfs.is_dir(p));
        if !parent_exists {
            return None;
        }
        self.load_as_file(candidate)
            .or_else(|| self.load_as_directory(candidate))
    }

    fn load_as_file(&self, base: &Path) -> Option<PathBuf> {
        if self.vfs.is_file(base) {
            return Some(base.to_path_buf());
        }
        self.file_extensions
            .iter()
            .map(|ext| with_suffix(base, ext))
            .find(|path| self.vfs.is_file(path))
    }

    fn load_as_directory(&self, dir: &Path) -> Option<PathBuf> {
        if !self.vfs.is_dir(dir) {
            return None;
        }

        let manifest = dir.join("package.json");
        if self.vfs.is_file(&manifest) {
            let main = self
                .vfs
                .read_to_string(&manifest)
                .ok()
                .and_then(|content| serde_json::from_str::<PackageManifest>(&content).ok())
                .and_then(|m| m.main);
            if let Some(main) = main {
                let entry = join_relative(dir, &main);
                if let Some(found) = self
                    .load_as_file(&entry)
                    .or_else(|| self.load_as_file(&entry.join("index")))
                {
                    return Some(found);
                }
            }
        }

        self.load_as_file(&dir.join("index"))
    }
}

impl<V: Vfs> ResolvePlugin for OverrideResolver<V> {
    fn apply(&self, request: &mut ResolveRequest) -> Result<ResolveOutcome> {
        if !self.handles(&request.request) {
            return Ok(ResolveOutcome::Passthrough);
        }

        let issuer = request
            .issuer
            .clone()
            .ok_or_else(|| ResolveError::MissingIssuer(request.request.clone()))?;

        let resolved = self.resolve(&request.request, &issuer)?;
        request.path = Some(resolved.clone());
        Ok(ResolveOutcome::Resolved(resolved))
    }
}

/// `/a/routes` + `.jsx` → `/a/routes.jsx`; unlike `with_extension` this
/// keeps dots already in the file name (`_app-config.v2`).
fn with_suffix(base: &Path, suffix: &str) -> PathBuf {
    let mut raw: OsString = base.as_os_str().to_owned();
    raw.push(suffix);
    PathBuf::from(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use overlay_common::vfs::MemoryVfs;

    fn vfs() -> MemoryVfs {
        MemoryVfs::new()
            .with_file("/project/app/routes.jsx", "// base routes")
            .with_file(
                "/project/node_modules/@salesforce/extension-a/overrides/pages/home.tsx",
                "// a",
            )
            .with_file(
                "/project/node_modules/@salesforce/extension-a/src/pages/home/index.js",
                "// a src",
            )
    }

    #[test]
    fn test_non_wildcard_passes_through() {
        let resolver = OverrideResolver::overrides("/project", vfs()).with_extensions(["a"]);
        let mut request = ResolveRequest::new("./local", "/project/app/routes.jsx");

        assert_eq!(resolver.apply(&mut request).unwrap(), ResolveOutcome::Passthrough);
        assert_eq!(request.path, None);
    }

    #[test]
    fn test_resolved_path_is_written_back() {
        let resolver = OverrideResolver::overrides("/project", vfs()).with_extensions(["a"]);
        let mut request = ResolveRequest::new("*/pages/home", "/project/app/routes.jsx");

        let outcome = resolver.apply(&mut request).unwrap();
        let expected =
            PathBuf::from("/project/node_modules/@salesforce/extension-a/overrides/pages/home.tsx");
        assert_eq!(outcome, ResolveOutcome::Resolved(expected.clone()));
        assert_eq!(request.path, Some(expected));
    }

    #[test]
    fn test_directory_index_is_found() {
        let resolver = OverrideResolver::overrides("/project", vfs())
            .with_extensions(["a"])
            .with_extension_subdirs(["src"]);

        let resolved = resolver
            .resolve("*/pages/home", Path::new("/project/app/routes.jsx"))
            .unwrap();
        assert_eq!(
            resolved,
            PathBuf::from("/project/node_modules/@salesforce/extension-a/src/pages/home/index.js")
        );
    }

    #[test]
    fn test_overrides_flavor_falls_back_to_extension_root() {
        let vfs = vfs().with_file(
            "/project/node_modules/@salesforce/extension-a/pages/about.js",
            "// a root",
        );
        let resolver = OverrideResolver::overrides("/project", vfs).with_extensions(["a"]);
        assert_eq!(
            ResolverFlavor::Overrides.extension_subdirs(),
            vec![PathBuf::from("overrides"), PathBuf::from("src"), PathBuf::new()]
        );

        let resolved = resolver
            .resolve("*/pages/about", Path::new("/project/app/routes.jsx"))
            .unwrap();
        assert_eq!(
            resolved,
            PathBuf::from("/project/node_modules/@salesforce/extension-a/pages/about.js")
        );
    }

    #[test]
    fn test_package_main_is_honored() {
        let vfs = MemoryVfs::new()
            .with_file("/project/app/x.js", "")
            .with_file(
                "/project/node_modules/@salesforce/extension-a/widgets/package.json",
                r#"{"main": "./dist/widgets"}"#,
            )
            .with_file(
                "/project/node_modules/@salesforce/extension-a/widgets/dist/widgets.js",
                "",
            );
        let resolver = OverrideResolver::app_extension("/project", vfs)
            .with_extensions(["a"]);
        let resolved = resolver
            .resolve("*/widgets", Path::new("/project/app/x.js"))
            .unwrap();
        assert!(resolved.ends_with("widgets/dist/widgets.js"));
    }

    #[test]
    fn test_missing_issuer_is_an_error() {
        let resolver = OverrideResolver::overrides("/project", vfs());
        let mut request = ResolveRequest {
            request: "*/pages/home".to_string(),
            issuer: None,
            path: None,
        };
        assert!(matches!(
            resolver.apply(&mut request),
            Err(ResolveError::MissingIssuer(_))
        ));
    }

    #[test]
    fn test_app_extension_only_handles_entry_points() {
        let resolver = OverrideResolver::app_extension("/project", vfs());
        assert!(resolver.handles("*/setup-server"));
        assert!(resolver.handles("*/src/setup-app"));
        assert!(!resolver.handles("*/pages/home"));
        assert!(!resolver.handles("setup-app"));

        let mut request = ResolveRequest::new("*/pages/home", "/project/app/routes.jsx");
        assert_eq!(resolver.apply(&mut request).unwrap(), ResolveOutcome::Passthrough);
    }

    #[test]
    fn test_file_extensions_are_normalized() {
        let resolver =
            OverrideResolver::overrides("/project", vfs()).with_file_extensions(["jsx", ".tsx"]);
        assert_eq!(resolver.file_extensions, vec![".jsx", ".tsx"]);
    }

    #[test]
    fn test_with_suffix_keeps_inner_dots() {
        assert_eq!(
            with_suffix(Path::new("/a/_app-config.v2"), ".js"),
            PathBuf::from("/a/_app-config.v2.js")
        );
    }
}
