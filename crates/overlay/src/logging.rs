//! Tracing subscriber setup for the CLI.
//!
//! Logs go to stderr (or a file with `--log-file`) so stdout stays clean
//! for command output. `OVERLAY_LOG` takes an `EnvFilter` directive and
//! overrides the `-v` count.

use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable holding a filter directive.
pub const LOG_ENV: &str = "OVERLAY_LOG";

const CRATES: [&str; 3] = ["overlay", "overlay_core", "overlay_common"];

#[derive(Debug, Clone, Default)]
pub struct LogOptions {
    pub verbose: u8,
    pub json: bool,
    pub file: Option<PathBuf>,
}

/// Directive used when `OVERLAY_LOG` is unset.
pub fn default_directive(verbose: u8) -> String {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    CRATES
        .iter()
        .map(|krate| format!("{krate}={level}"))
        .collect::<Vec<_>>()
        .join(",")
}

/// Install the global subscriber.
///
/// The returned guard flushes the file writer on drop and must be kept
/// alive until the process exits.
pub fn init(options: &LogOptions) -> anyhow::Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_directive(options.verbose)));

    let (layer, guard) = match &options.file {
        Some(path) => {
            let (directory, file_name) = split_log_path(path)?;
            let appender = tracing_appender::rolling::never(directory, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer: Box<dyn Layer<Registry> + Send + Sync> = if options.json {
                fmt::layer().json().with_writer(writer).boxed()
            } else {
                fmt::layer().with_ansi(false).with_writer(writer).boxed()
            };
            (layer, Some(guard))
        }
        None => {
            let layer: Box<dyn Layer<Registry> + Send + Sync> = if options.json {
                fmt::layer().json().with_writer(std::io::stderr).boxed()
            } else {
                fmt::layer().with_target(false).with_writer(std::io::stderr).boxed()
            };
            (layer, None)
        }
    };

    tracing_subscriber::registry()
        .with(layer)
        .with(filter)
        .try_init()?;

    Ok(guard)
}

fn split_log_path(path: &Path) -> anyhow::Result<(PathBuf, PathBuf)> {
    let file_name = path
        .file_name()
        .ok_or_else(|| anyhow::anyhow!("Log file path has no file name: {}", path.display()))?;
    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    Ok((directory, PathBuf::from(file_name)))
}
