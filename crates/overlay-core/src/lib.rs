//! Overlay core - override and extension resolution
//!
//! A base application can be extended by an ordered list of extensions, each
//! able to override source files of the app or of other extensions. Imports
//! opt in with the `*/` wildcard prefix:
//!
//! - [`extension`]: normalize the configured extension list
//! - [`candidates`]: lay out candidate paths with precedence and
//!   self-reference truncation
//! - [`resolver`]: the resolver plugin probing candidates through a `Vfs`
//! - [`transform`]: static replacement of generated extension-list modules

pub mod candidates;
pub mod error;
pub mod extension;
pub mod resolver;
pub mod transform;

pub use candidates::{
    Candidate, CandidateList, CandidateOptions, CandidateOrigin, SdkFallback, WILDCARD,
    build_candidates, build_candidates_matching, is_wildcard, strip_wildcard,
};
pub use error::{ResolveError, Result};
pub use extension::{ExtensionId, ExtensionNaming, ExtensionReference, normalize};
pub use resolver::{
    OverrideResolver, ResolveOutcome, ResolvePlugin, ResolveRequest, ResolverFlavor,
};
pub use transform::{ContentReplacement, generate_extensions_module};
