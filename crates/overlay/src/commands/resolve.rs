//! Resolve command
//!
//! Runs a wildcard import through the resolver plugin the way the bundler
//! would, printing the file it lands on.

use crate::commands::FlavorArg;
use crate::context::ProjectContext;
use crate::output::{CommandResult, OutputFormat, print_error, print_json};
use overlay_core::{ResolveError, ResolveOutcome, ResolvePlugin, ResolveRequest};
use owo_colors::OwoColorize;
use serde::Serialize;
use starbase::AppResult;
use std::path::{Path, PathBuf};

#[derive(Serialize)]
struct Resolution {
    request: String,
    issuer: PathBuf,
    /// `None` when the resolver passed the request through
    resolved: Option<PathBuf>,
}

/// Run the resolve command
pub fn run_resolve(
    context: &ProjectContext,
    import: &str,
    from: &Path,
    flavor: FlavorArg,
    format: OutputFormat,
) -> AppResult {
    let issuer = context.path_arg(from);
    let resolver = context.resolver(flavor.into());
    let mut request = ResolveRequest::new(import, issuer.clone());

    match resolver.apply(&mut request) {
        Ok(outcome) => {
            let resolved = match outcome {
                ResolveOutcome::Resolved(path) => Some(path),
                ResolveOutcome::Passthrough => None,
            };

            if format.is_json() {
                let result = CommandResult::ok(Resolution {
                    request: import.to_string(),
                    issuer,
                    resolved,
                });
                if let Err(e) = print_json(&result) {
                    print_error(e);
                    return Ok(Some(1));
                }
                return Ok(None);
            }

            match resolved {
                Some(path) => println!("{}", path.display().green()),
                None => println!(
                    "'{}' is not handled by the {:?} resolver; normal resolution applies",
                    import,
                    resolver.flavor()
                ),
            }
            Ok(None)
        }
        Err(e) => {
            if format.is_json() {
                if let Err(write_error) = print_json(&CommandResult::<Resolution>::failed(&e)) {
                    print_error(write_error);
                }
            } else {
                print_error(&e);
                if let ResolveError::NotFound { candidates, .. } = &e {
                    for candidate in candidates {
                        eprintln!("  tried {}", candidate.display());
                    }
                }
            }
            Ok(Some(1))
        }
    }
}
