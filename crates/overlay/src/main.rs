use clap::{Parser, Subcommand};
use overlay::commands::{FlavorArg, run_candidates, run_extensions, run_generate, run_resolve};
use overlay::logging::{self, LogOptions};
use overlay::output::print_error;
use overlay::{OutputFormat, ProjectContext};
use starbase::{App, AppResult, AppSession};
use std::path::PathBuf;

/// Overlay CLI - inspect extension overrides for an application
#[derive(Parser)]
#[command(name = "overlay")]
#[command(about = "Inspect and debug extension override resolution", long_about = None)]
#[command(version)]
struct Cli {
    /// Project root (defaults to the configured one, or the current directory)
    #[arg(long, global = true)]
    project_dir: Option<PathBuf>,

    /// Configuration file (defaults to discovery from the project directory)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Machine-readable JSON output
    #[arg(long, global = true)]
    json: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Write logs to this file instead of stderr
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Subcommand)]
enum Commands {
    /// List configured extensions in precedence order
    Extensions,
    /// Show the candidate locations for a wildcard import
    Candidates {
        /// Import specifier, e.g. `*/app/routes`
        import: String,
        /// File containing the import
        #[arg(long)]
        from: PathBuf,
        /// Resolver flavor
        #[arg(long, value_enum, default_value_t)]
        flavor: FlavorArg,
    },
    /// Resolve a wildcard import to a file
    Resolve {
        /// Import specifier, e.g. `*/pages/home`
        import: String,
        /// File containing the import
        #[arg(long)]
        from: PathBuf,
        /// Resolver flavor
        #[arg(long, value_enum, default_value_t)]
        flavor: FlavorArg,
    },
    /// Render the generated extension-list modules
    Generate {
        /// Output directory (prints to stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Application session for the overlay CLI
#[derive(Clone)]
struct OverlaySession {
    command: Commands,
    project_dir: Option<PathBuf>,
    config: Option<PathBuf>,
    format: OutputFormat,
}

impl OverlaySession {
    /// Dispatch the parsed command.
    ///
    /// Runs as the `App::run` operation; starbase executes
    /// `AppSession::execute` alongside it, so that hook stays a no-op.
    async fn run(&self) -> AppResult {
        let context = match ProjectContext::load(self.config.clone(), self.project_dir.clone()) {
            Ok(context) => context,
            Err(e) => {
                print_error(format!("{e:#}"));
                return Ok(Some(1));
            }
        };

        match &self.command {
            Commands::Extensions => run_extensions(&context, self.format),
            Commands::Candidates {
                import,
                from,
                flavor,
            } => run_candidates(&context, import, from, *flavor, self.format),
            Commands::Resolve {
                import,
                from,
                flavor,
            } => run_resolve(&context, import, from, *flavor, self.format),
            Commands::Generate { output } => run_generate(&context, output.as_deref(), self.format),
        }
    }
}

#[async_trait::async_trait]
impl AppSession for OverlaySession {}

#[tokio::main]
async fn main() -> starbase::MainResult {
    let cli = Cli::parse();

    let _guard = match logging::init(&LogOptions {
        verbose: cli.verbose,
        json: cli.json,
        file: cli.log_file.clone(),
    }) {
        Ok(guard) => guard,
        Err(e) => {
            print_error(format!("Failed to initialize logging: {e:#}"));
            None
        }
    };

    let session = OverlaySession {
        command: cli.command,
        project_dir: cli.project_dir,
        config: cli.config,
        format: OutputFormat::from_flag(cli.json),
    };

    let exit_code = App::default()
        .run(
            session,
            |session| async move { session.run().await },
        )
        .await?;

    Ok(std::process::ExitCode::from(exit_code))
}
