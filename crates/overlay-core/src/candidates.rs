//! Candidate path construction for wildcard imports.
//!
//! A wildcard import `*/app/pages/home` may be satisfied by the project
//! itself, by any configured extension, or finally by the SDK. This module
//! lays those locations out as extension-less candidate paths; probing them
//! against a filesystem is the resolver's job.

use crate::error::Result;
use crate::extension::{ExtensionNaming, ExtensionReference, normalize};
use indexmap::IndexMap;
use overlay_common::config::{ConfigProvider, DEFAULT_SDK_PACKAGE, ExtensionEntry};
use overlay_common::paths::{clean, contains_segments, join_relative, segments, strip_extension};
use serde::Serialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

/// Prefix marking an import as override-eligible.
pub const WILDCARD: &str = "*/";

/// Whether a request opts into override resolution.
pub fn is_wildcard(request: &str) -> bool {
    request.starts_with(WILDCARD)
}

/// The module path of a wildcard request (`*/app/routes` → `app/routes`).
///
/// Requests without the sentinel are returned unchanged.
pub fn strip_wildcard(request: &str) -> &str {
    request.strip_prefix(WILDCARD).unwrap_or(request)
}

/// Built-in SDK components used as the last candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SdkFallback {
    /// Package name under `node_modules`
    pub package: String,
    /// Module path → path inside the SDK package
    pub modules: IndexMap<String, String>,
}

impl Default for SdkFallback {
    fn default() -> Self {
        Self::new(DEFAULT_SDK_PACKAGE)
    }
}

impl SdkFallback {
    /// Fallback map for `package` with the well-known SDK components.
    pub fn new(package: impl Into<String>) -> Self {
        let modules = [
            ("app/routes", "ssr/universal/components/routes"),
            ("app/components/_app", "ssr/universal/components/_app"),
            ("app/components/_app-config", "ssr/universal/components/_app-config"),
            ("app/components/_document", "ssr/universal/components/_document"),
            ("app/components/_error", "ssr/universal/components/_error"),
        ]
        .into_iter()
        .map(|(from, to)| (from.to_string(), to.to_string()))
        .collect();

        Self {
            package: package.into(),
            modules,
        }
    }

    /// Directory of the SDK package.
    pub fn root(&self, project_dir: &Path) -> PathBuf {
        join_relative(&project_dir.join("node_modules"), &self.package)
    }

    /// Fallback path for `module_path`.
    ///
    /// Paths outside the map still produce a candidate; it simply will not
    /// exist on disk.
    pub fn candidate(&self, project_dir: &Path, module_path: &str) -> PathBuf {
        let target = self
            .modules
            .get(module_path)
            .map(String::as_str)
            .unwrap_or(module_path);
        join_relative(&self.root(project_dir), target)
    }
}

/// Where a candidate came from.
///
/// The derived ordering is the probe priority: project first, then
/// extensions by configuration rank (rank 0 = first configured), then SDK.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CandidateOrigin {
    Project,
    Extension { rank: usize },
    Sdk,
}

/// One extension-less location that may satisfy a wildcard import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Candidate {
    pub path: PathBuf,
    pub origin: CandidateOrigin,
}

/// Candidates for one request, in construction order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CandidateList {
    /// The module path with the wildcard removed
    pub module_path: String,
    /// Whether the issuer imported its own module path
    pub self_reference: bool,
    entries: Vec<Candidate>,
}

impl CandidateList {
    /// Candidates in construction order: project, extensions last-configured
    /// first, SDK.
    pub fn entries(&self) -> &[Candidate] {
        &self.entries
    }

    pub fn paths(&self) -> Vec<&Path> {
        self.entries.iter().map(|c| c.path.as_path()).collect()
    }

    /// Candidates in the order they should be probed.
    ///
    /// Walking the construction order backwards through the extension
    /// segment and keeping the last hit is the same as probing extensions by
    /// ascending rank. A stable sort keeps the subdirectory order within one
    /// extension.
    pub fn probe_order(&self) -> Vec<&Candidate> {
        let mut ordered: Vec<&Candidate> = self.entries.iter().collect();
        ordered.sort_by_key(|c| c.origin);
        ordered
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Inputs for [`build_candidates`].
#[derive(Clone)]
pub struct CandidateOptions {
    /// Explicit extension list; takes precedence over `provider`
    pub extensions: Option<Vec<ExtensionEntry>>,
    /// Consulted when `extensions` is `None`
    pub provider: Option<Arc<dyn ConfigProvider>>,
    /// Defaults to the current working directory
    pub project_dir: Option<PathBuf>,
    pub naming: ExtensionNaming,
    pub sdk: SdkFallback,
    /// Directories inside each extension to look in, in priority order.
    /// An empty path stands for the extension root.
    pub extension_subdirs: Vec<PathBuf>,
}

impl Default for CandidateOptions {
    fn default() -> Self {
        Self {
            extensions: None,
            provider: None,
            project_dir: None,
            naming: ExtensionNaming::default(),
            sdk: SdkFallback::default(),
            extension_subdirs: vec![PathBuf::new()],
        }
    }
}

impl std::fmt::Debug for CandidateOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CandidateOptions")
            .field("extensions", &self.extensions)
            .field("provider", &self.provider.as_ref().map(|_| "<dyn ConfigProvider>"))
            .field("project_dir", &self.project_dir)
            .field("naming", &self.naming)
            .field("sdk", &self.sdk)
            .field("extension_subdirs", &self.extension_subdirs)
            .finish()
    }
}

impl CandidateOptions {
    pub fn new(project_dir: impl Into<PathBuf>) -> Self {
        Self {
            project_dir: Some(project_dir.into()),
            ..Default::default()
        }
    }

    pub fn with_extensions<I, E>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Into<ExtensionEntry>,
    {
        self.extensions = Some(extensions.into_iter().map(Into::into).collect());
        self
    }

    /// Take the extension list from raw configuration values.
    pub fn with_raw_extensions(mut self, values: Vec<Value>) -> Result<Self> {
        let entries = values
            .into_iter()
            .map(ExtensionEntry::from_value)
            .collect::<std::result::Result<Vec<_>, _>>()?;
        self.extensions = Some(entries);
        Ok(self)
    }

    pub fn with_provider(mut self, provider: Arc<dyn ConfigProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    pub fn with_naming(mut self, naming: ExtensionNaming) -> Self {
        self.naming = naming;
        self
    }

    pub fn with_sdk(mut self, sdk: SdkFallback) -> Self {
        self.sdk = sdk;
        self
    }

    pub fn with_extension_subdirs<I, P>(mut self, subdirs: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.extension_subdirs = subdirs.into_iter().map(Into::into).collect();
        self
    }

    /// The configured project directory, or the current working directory.
    pub fn resolved_project_dir(&self) -> Result<PathBuf> {
        match &self.project_dir {
            Some(dir) => Ok(clean(dir)),
            None => Ok(std::env::current_dir()?),
        }
    }

    /// The raw extension list, explicit or from the provider.
    pub fn extension_entries(&self) -> Vec<ExtensionEntry> {
        match (&self.extensions, &self.provider) {
            (Some(entries), _) => entries.clone(),
            (None, Some(provider)) => provider.extensions(),
            (None, None) => Vec::new(),
        }
    }

    /// Normalized references in configured order.
    pub fn references(&self, project_dir: &Path) -> Vec<ExtensionReference> {
        normalize(&self.extension_entries(), project_dir, &self.naming)
    }
}

/// Build the candidate list for a wildcard import issued by `source_path`.
///
/// Layout: `[project, ...extensions (last-configured first), sdk]`. When the
/// issuer imports its own module path, everything up to and including the
/// issuer's own candidate is dropped; if the issuer is not among the
/// candidates the list comes back empty.
pub fn build_candidates(
    import_path: &str,
    source_path: &Path,
    options: &CandidateOptions,
) -> Result<CandidateList> {
    build_candidates_matching(import_path, source_path, options, |_| false)
}

/// [`build_candidates`] with an extra test for the issuer's own candidate.
///
/// The lexical match is always tried first; `is_issuer` is consulted for the
/// remaining candidates of a self-referencing import, e.g. to recognise an
/// issuer addressed through its real path rather than a symlink.
pub fn build_candidates_matching<F>(
    import_path: &str,
    source_path: &Path,
    options: &CandidateOptions,
    mut is_issuer: F,
) -> Result<CandidateList>
where
    F: FnMut(&Path) -> bool,
{
    let module_path = strip_wildcard(import_path);
    let project_dir = options.resolved_project_dir()?;
    let issuer = clean(&strip_extension(source_path));
    let self_reference = contains_segments(&issuer, &segments(module_path));

    let references = options.references(&project_dir);

    let mut entries = Vec::with_capacity(references.len() * options.extension_subdirs.len() + 2);
    entries.push(Candidate {
        path: join_relative(&project_dir, module_path),
        origin: CandidateOrigin::Project,
    });

    for (rank, reference) in references.iter().enumerate().rev() {
        let root = reference.identifier.root(&project_dir);
        for subdir in &options.extension_subdirs {
            entries.push(Candidate {
                path: join_relative(&join_relative(&root, subdir), module_path),
                origin: CandidateOrigin::Extension { rank },
            });
        }
    }

    entries.push(Candidate {
        path: options.sdk.candidate(&project_dir, module_path),
        origin: CandidateOrigin::Sdk,
    });

    if self_reference {
        let own_dir = issuer
            .file_name()
            .filter(|name| *name == "index")
            .and_then(|_| issuer.parent());

        let own = entries
            .iter()
            .position(|c| c.path == issuer || Some(c.path.as_path()) == own_dir)
            .or_else(|| entries.iter().position(|c| is_issuer(&c.path)));

        match own {
            Some(index) => {
                entries.drain(..=index);
            }
            None => {
                warn!(
                    "Self-referencing import '{}' from {:?} matches no candidate",
                    import_path, source_path
                );
                entries.clear();
            }
        }
    }

    debug!(
        "Built {} candidate(s) for '{}' from {:?} (self reference: {})",
        entries.len(),
        import_path,
        source_path,
        self_reference
    );

    Ok(CandidateList {
        module_path: module_path.to_string(),
        self_reference,
        entries,
    })
}
