//! Check command implementation.

use anyhow::{Context, Result};
use migration_guard_core::{RuleRegistry, ScanError, Validator};
use std::path::PathBuf;
use std::process::ExitCode;

use super::{active_registry, EXIT_FATAL_WALK, EXIT_ISSUES};
use crate::config_resolver::ConfigSource;
use crate::OutputFormat;

/// Arguments of `migration-guard check`.
pub struct CheckArgs {
    /// Project root; falls back to the configured root.
    pub path: Option<PathBuf>,
    /// Output format.
    pub format: OutputFormat,
    /// Comma-separated rule IDs to keep.
    pub rules: Option<String>,
    /// Extra exclude globs.
    pub exclude: Vec<String>,
    /// Migration session identifier.
    pub session: Option<String>,
    /// File to write the JSON report to.
    pub output: Option<PathBuf>,
    /// Worker threads, overriding the config.
    pub jobs: Option<usize>,
}

/// Runs the check command.
pub fn run(args: &CheckArgs, source: &ConfigSource) -> Result<ExitCode> {
    let config = source.load()?;

    let mut registry = active_registry(&config)?;
    if let Some(filter) = &args.rules {
        registry = filter_rules(&registry, filter);
    }

    let mut builder = Validator::builder();
    if let Some(path) = &args.path {
        builder = builder.root(path);
    }
    builder = builder
        .scan_config(&config.scan)
        .excludes(args.exclude.iter().cloned())
        .registry(registry);
    if let Some(session) = &args.session {
        builder = builder.session_id(session);
    }
    if let Some(jobs) = args.jobs {
        builder = builder.parallelism(jobs);
    }

    let validator = builder.build().context("Failed to build validator")?;

    tracing::info!(
        "Validating {} with {} rules",
        validator.root().display(),
        validator.registry().len()
    );

    let report = match validator.validate() {
        Ok(report) => report,
        Err(err @ ScanError::Walk(_)) => {
            eprintln!("{:?}", miette::Report::new(err));
            return Ok(ExitCode::from(EXIT_FATAL_WALK));
        }
        Err(err) => return Err(err).context("Validation failed"),
    };

    super::output::print(&report, args.format)?;

    if let Some(path) = &args.output {
        let json = serde_json::to_string_pretty(&report)?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write report: {}", path.display()))?;
        tracing::info!("Report written to {}", path.display());
    }

    if report.is_passing() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::from(EXIT_ISSUES))
    }
}

fn filter_rules(registry: &RuleRegistry, filter: &str) -> RuleRegistry {
    let ids: Vec<&str> = filter
        .split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .collect();

    for id in &ids {
        if registry.get(id).is_none() {
            tracing::warn!("Unknown rule: {}", id);
        }
    }

    registry.retain_ids(&ids)
}
