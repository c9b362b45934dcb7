//! Extensions command
//!
//! Lists the configured extensions after normalization, in configured order
//! (which is also their precedence order).

use crate::context::ProjectContext;
use crate::output::{CommandResult, OutputFormat, print_error, print_json};
use overlay_core::ExtensionReference;
use owo_colors::OwoColorize;
use serde::Serialize;
use starbase::AppResult;
use std::path::PathBuf;

#[derive(Serialize)]
struct ExtensionsReport<'a> {
    config: Option<&'a PathBuf>,
    project_dir: &'a PathBuf,
    extensions: &'a [ExtensionReference],
}

/// Run the extensions command
pub fn run_extensions(context: &ProjectContext, format: OutputFormat) -> AppResult {
    let references = context.references();

    if format.is_json() {
        let report = ExtensionsReport {
            config: context.config_path.as_ref(),
            project_dir: &context.project_dir,
            extensions: &references,
        };
        if let Err(e) = print_json(&CommandResult::ok(report)) {
            print_error(e);
            return Ok(Some(1));
        }
        return Ok(None);
    }

    match &context.config_path {
        Some(path) => println!("Configuration: {}", path.display()),
        None => println!("Configuration: {}", "none (defaults)".dimmed()),
    }
    println!("Project:       {}\n", context.project_dir.display());

    if references.is_empty() {
        println!("No extensions configured.");
        return Ok(None);
    }

    println!("{:<4} {:<45} {:<8} Config", "#", "Extension", "Kind");
    println!("{}", "-".repeat(70));
    for (index, reference) in references.iter().enumerate() {
        let kind = if reference.identifier.is_local() {
            "local"
        } else {
            "package"
        };
        println!(
            "{:<4} {:<45} {:<8} {}",
            index + 1,
            reference.identifier.to_string().cyan(),
            kind,
            reference.config
        );
    }
    println!(
        "\nTotal: {} extension(s); earlier entries take precedence",
        references.len()
    );

    Ok(None)
}
