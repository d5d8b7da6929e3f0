//! migration-guard CLI tool.
//!
//! Usage:
//! ```bash
//! migration-guard check [OPTIONS] [PATH]
//! migration-guard list-rules
//! migration-guard init
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod commands;
mod config_resolver;

/// Validates a Go/templ project after a component migration
#[derive(Parser)]
#[command(name = "migration-guard")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a project tree
    Check {
        /// Project root (default: `[scan] root` from config, else current directory)
        path: Option<PathBuf>,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,

        /// Only run specific rules (comma-separated IDs)
        #[arg(long)]
        rules: Option<String>,

        /// Exclude glob patterns (can be specified multiple times)
        #[arg(short, long)]
        exclude: Vec<String>,

        /// Migration session to associate the report with
        #[arg(long)]
        session: Option<String>,

        /// Also write the JSON report to this file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Number of worker threads
        #[arg(short, long)]
        jobs: Option<usize>,
    },

    /// List the active rules
    ListRules,

    /// Initialize configuration file
    Init {
        /// Overwrite existing config
        #[arg(long)]
        force: bool,
    },
}

/// Output format for validation reports.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable issues followed by the report digest.
    #[default]
    Text,
    /// The full report as JSON.
    Json,
    /// One line per issue and nothing else; no digest.
    Compact,
    /// Source snippets rendered through miette, then the digest.
    Rich,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Check {
            path,
            format,
            rules,
            exclude,
            session,
            output,
            jobs,
        } => {
            let project_dir = path.clone().unwrap_or_else(|| PathBuf::from("."));
            let source = config_resolver::resolve(&project_dir, cli.config.as_deref());
            commands::check::run(
                &commands::check::CheckArgs {
                    path,
                    format,
                    rules,
                    exclude,
                    session,
                    output,
                    jobs,
                },
                &source,
            )
        }
        Commands::ListRules => {
            let source = config_resolver::resolve(&PathBuf::from("."), cli.config.as_deref());
            commands::list_rules::run(&source).map(|()| ExitCode::SUCCESS)
        }
        Commands::Init { force } => commands::init::run(force).map(|()| ExitCode::SUCCESS),
    };

    match result {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::from(commands::EXIT_FAILURE)
        }
    }
}
