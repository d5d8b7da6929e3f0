//! List rules command implementation.

use anyhow::Result;
use migration_guard_rules::Preset;

use super::active_registry;
use crate::config_resolver::ConfigSource;

/// Runs the list-rules command against the resolved configuration.
pub fn run(source: &ConfigSource) -> Result<()> {
    let config = source.load()?;
    let registry = active_registry(&config)?;

    println!("Active rules:\n");
    println!(
        "{:<26} {:<12} {:<9} {:<10} Description",
        "ID", "Kind", "Required", "Files"
    );
    println!("{}", "-".repeat(100));

    for rule in &registry {
        let files = rule
            .file_kinds
            .iter()
            .map(|kind| kind.extension())
            .collect::<Vec<_>>()
            .join(",");
        println!(
            "{:<26} {:<12} {:<9} {:<10} {}",
            rule.id,
            rule.kind.label(),
            if rule.required { "yes" } else { "no" },
            files,
            rule.description
        );
    }

    println!("\nPresets:");
    for preset in Preset::ALL {
        let note = match preset {
            Preset::Recommended => "the full built-in table (default)",
            Preset::Strict => "every rule required, warnings become errors",
            Preset::Minimal => "syntax and import rules only",
        };
        println!("  {:<12} - {note}", preset.name());
    }

    println!("\nUse --rules to filter specific rules, e.g.:");
    println!("  migration-guard check --rules no-legacy-import-path,namespace-import-present");

    Ok(())
}
