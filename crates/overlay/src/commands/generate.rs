//! Generate command
//!
//! Renders the SDK's generated extension-list modules for the configured
//! extensions, either to stdout or into an output directory that mirrors the
//! SDK layout.

use crate::context::ProjectContext;
use crate::output::{CommandResult, OutputFormat, print_error, print_json, report_failure};
use anyhow::Context;
use overlay_common::paths::join_relative;
use overlay_core::ContentReplacement;
use owo_colors::OwoColorize;
use serde::Serialize;
use starbase::AppResult;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Serialize)]
struct GeneratedModule {
    /// The SDK file being replaced
    target: PathBuf,
    /// Where the module was written, with `--output`
    #[serde(skip_serializing_if = "Option::is_none")]
    written: Option<PathBuf>,
    source: String,
}

/// Run the generate command
pub fn run_generate(
    context: &ProjectContext,
    output: Option<&Path>,
    format: OutputFormat,
) -> AppResult {
    let sdk = context.sdk();
    let references = context.references();
    let replacement = ContentReplacement::server_extensions(&context.project_dir, &sdk, &references);
    let sdk_root = sdk.root(&context.project_dir);
    let output = output.map(|dir| context.path_arg(dir));

    let mut modules = Vec::with_capacity(replacement.len());
    for (target, source) in replacement.targets() {
        let written = match &output {
            Some(dir) => match write_module(dir, &sdk_root, target, source) {
                Ok(path) => Some(path),
                Err(e) => {
                    report_failure(format, format!("{e:#}"));
                    return Ok(Some(1));
                }
            },
            None => None,
        };
        modules.push(GeneratedModule {
            target: target.to_path_buf(),
            written,
            source: source.to_string(),
        });
    }

    if format.is_json() {
        if let Err(e) = print_json(&CommandResult::ok(&modules)) {
            print_error(e);
            return Ok(Some(1));
        }
        return Ok(None);
    }

    for module in &modules {
        match &module.written {
            Some(path) => println!("{} {}", "wrote".green(), path.display()),
            None => {
                println!("{}", format!("// {}", module.target.display()).dimmed());
                println!("{}", module.source);
            }
        }
    }

    Ok(None)
}

/// Write `source` under `output_dir` at the target's path relative to the
/// SDK root.
fn write_module(
    output_dir: &Path,
    sdk_root: &Path,
    target: &Path,
    source: &str,
) -> anyhow::Result<PathBuf> {
    let relative = target.strip_prefix(sdk_root).unwrap_or(target);
    let destination = join_relative(output_dir, relative);
    if let Some(parent) = destination.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(&destination, source)
        .with_context(|| format!("Failed to write {}", destination.display()))?;
    info!("Wrote generated module to {}", destination.display());
    Ok(destination)
}
