//! Init command implementation.

use anyhow::{bail, Context, Result};
use std::path::Path;

const CONFIG_FILE: &str = "migration-guard.toml";

const DEFAULT_CONFIG: &str = r#"# migration-guard configuration

# Rule preset: "recommended" (default), "strict" or "minimal"
preset = "recommended"

[scan]
# Project root (default: current directory)
# root = "./web"

# Directory names pruned from the walk
exclude_dirs = ["vendor", "node_modules", ".git", "dist", "build", "migration_backups"]

# Glob patterns (relative to the root) excluded from the walk
exclude = [
    "**/*_templ.go",
]

# Respect .gitignore files
respect_gitignore = false

# Worker threads; 1 scans sequentially
# parallelism = 4

# Rule overrides by ID
# [rules.no-hardcoded-color-class]
# enabled = false
#
# [rules.htmx-via-props]
# required = true

# Project-specific rules
# [[custom_rules]]
# id = "no-inline-style"
# name = "No Inline Styles"
# description = "Styles belong in the component library"
# kind = "pattern"
# pattern = 'style="'
# file_kinds = ["templ"]
# message = "Inline style attribute"
# suggested_fix = "Use a utility class or a component prop"
"#;

/// Runs the init command.
pub fn run(force: bool) -> Result<()> {
    let config_path = Path::new(CONFIG_FILE);

    if config_path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::write(config_path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;

    println!("Created {CONFIG_FILE}");
    println!("\nNext steps:");
    println!("  1. Edit {CONFIG_FILE} to configure rules");
    println!("  2. Run: migration-guard check");

    Ok(())
}
