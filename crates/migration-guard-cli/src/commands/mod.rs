//! Subcommand implementations.

pub mod check;
pub mod init;
pub mod list_rules;
pub mod output;

use anyhow::{anyhow, Context, Result};
use migration_guard_core::{Config, RuleRegistry};
use migration_guard_rules::Preset;

/// At least one issue was found.
pub const EXIT_ISSUES: u8 = 1;
/// The tree could not be walked; no report was produced.
pub const EXIT_FATAL_WALK: u8 = 2;
/// Any other failure (configuration, registry, I/O).
pub const EXIT_FAILURE: u8 = 3;

/// Resolves the preset named in `config`.
fn preset(config: &Config) -> Result<Preset> {
    match config.preset.as_deref() {
        None => Ok(Preset::default()),
        Some(name) => Preset::from_name(name)
            .ok_or_else(|| anyhow!("Unknown preset {name:?} (expected recommended, strict or minimal)")),
    }
}

/// Builds the registry a run will use: preset, overrides, custom rules.
pub fn active_registry(config: &Config) -> Result<RuleRegistry> {
    let preset = preset(config)?;
    let rules = config.resolve_rules(preset.rules());
    RuleRegistry::new(rules).context("Invalid rule configuration")
}
