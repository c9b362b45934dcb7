//! Candidates command
//!
//! Shows the candidate locations for a wildcard import in probe order,
//! marking the ones whose directory exists on disk.

use crate::commands::FlavorArg;
use crate::context::ProjectContext;
use crate::output::{CommandResult, OutputFormat, print_error, print_json, report_failure};
use overlay_common::vfs::Vfs;
use overlay_core::{CandidateList, CandidateOrigin};
use owo_colors::OwoColorize;
use serde::Serialize;
use starbase::AppResult;
use std::path::{Path, PathBuf};

#[derive(Serialize)]
struct CandidatesReport {
    request: String,
    issuer: PathBuf,
    #[serde(flatten)]
    list: CandidateList,
}

/// Run the candidates command
pub fn run_candidates(
    context: &ProjectContext,
    import: &str,
    from: &Path,
    flavor: FlavorArg,
    format: OutputFormat,
) -> AppResult {
    let issuer = context.path_arg(from);
    let resolver = context.resolver(flavor.into());

    if !resolver.handles(import) {
        let message = format!(
            "'{}' is not handled by the {:?} resolver",
            import,
            resolver.flavor()
        );
        report_failure(format, message);
        return Ok(Some(1));
    }

    let list = match resolver.candidates(import, &issuer) {
        Ok(list) => list,
        Err(e) => {
            report_failure(format, e);
            return Ok(Some(1));
        }
    };

    if format.is_json() {
        let report = CandidatesReport {
            request: import.to_string(),
            issuer,
            list,
        };
        if let Err(e) = print_json(&CommandResult::ok(report)) {
            print_error(e);
            return Ok(Some(1));
        }
        return Ok(None);
    }

    println!("Candidates for {} from {}", import.bold(), issuer.display());
    if list.self_reference {
        println!("{}", "(self-reference: own candidate and everything before it dropped)".dimmed());
    }
    println!();

    if list.is_empty() {
        println!("No candidates.");
        return Ok(None);
    }

    for (index, candidate) in list.probe_order().into_iter().enumerate() {
        let origin = describe_origin(candidate.origin);
        let marker = if is_probed(resolver.vfs(), &candidate.path) {
            "+".green().to_string()
        } else {
            "-".dimmed().to_string()
        };
        println!(
            "{:>3}. {} {:<14} {}",
            index + 1,
            marker,
            origin,
            candidate.path.display()
        );
    }

    Ok(None)
}

/// Whether the resolver would probe `candidate`: its directory must exist.
fn is_probed(vfs: &impl Vfs, candidate: &Path) -> bool {
    candidate.parent().is_some_and(|parent| vfs.is_dir(parent))
}

fn describe_origin(origin: CandidateOrigin) -> String {
    match origin {
        CandidateOrigin::Project => "project".to_string(),
        CandidateOrigin::Extension { rank } => format!("extension #{}", rank + 1),
        CandidateOrigin::Sdk => "sdk".to_string(),
    }
}
