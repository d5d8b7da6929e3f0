//! Configuration types for migration-guard.

use crate::rule::Rule;
use crate::walker::DEFAULT_EXCLUDED_DIRS;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::debug;

/// Top-level configuration, read from `migration-guard.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Preset to start from ("recommended", "strict", "minimal").
    #[serde(default)]
    pub preset: Option<String>,

    /// Scan configuration.
    #[serde(default)]
    pub scan: ScanConfig,

    /// Per-rule overrides, keyed by rule ID.
    #[serde(default)]
    pub rules: HashMap<String, RuleConfig>,

    /// Additional rules appended after the preset.
    #[serde(default)]
    pub custom_rules: Vec<Rule>,
}

impl Config {
    /// Creates a new default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })
    }

    /// Checks if a rule is enabled.
    #[must_use]
    pub fn is_rule_enabled(&self, rule_id: &str) -> bool {
        self.rules
            .get(rule_id)
            .map_or(true, |c| c.enabled.unwrap_or(true))
    }

    /// Applies the overrides to `base` and appends the custom rules.
    ///
    /// Disabled rules are dropped, `required` overrides are applied in
    /// place. Overrides also apply to custom rules. The result is meant for
    /// [`RuleRegistry::new`](crate::RuleRegistry::new), which rejects
    /// duplicate IDs.
    #[must_use]
    pub fn resolve_rules(&self, base: Vec<Rule>) -> Vec<Rule> {
        base.into_iter()
            .chain(self.custom_rules.iter().cloned())
            .filter(|rule| {
                let enabled = self.is_rule_enabled(&rule.id);
                if !enabled {
                    debug!("Skipping disabled rule: {}", rule.id);
                }
                enabled
            })
            .map(|mut rule| {
                if let Some(required) = self.rules.get(&rule.id).and_then(|c| c.required) {
                    rule.required = required;
                }
                rule
            })
            .collect()
    }
}

/// Scan-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Root directory to validate (default: current directory).
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// Directory names pruned from the walk.
    #[serde(default = "default_exclude_dirs")]
    pub exclude_dirs: Vec<String>,

    /// Glob patterns, relative to the root, excluded from the walk.
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Whether to respect .gitignore files.
    #[serde(default)]
    pub respect_gitignore: bool,

    /// Number of worker threads; absent or 1 scans sequentially.
    #[serde(default)]
    pub parallelism: Option<usize>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            exclude_dirs: default_exclude_dirs(),
            exclude: Vec::new(),
            respect_gitignore: false,
            parallelism: None,
        }
    }
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_exclude_dirs() -> Vec<String> {
    DEFAULT_EXCLUDED_DIRS.iter().map(|d| (*d).to_string()).collect()
}

/// Per-rule configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleConfig {
    /// Whether this rule is enabled.
    #[serde(default)]
    pub enabled: Option<bool>,

    /// Override for the rule's `required` flag.
    #[serde(default)]
    pub required: Option<bool>,
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error reading config file.
    #[error("Failed to read config file {path}: {source}")]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Parse error in config file.
    #[error("Failed to parse config: {message}")]
    Parse {
        /// Parse error message.
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::RuleKind;
    use crate::types::FileKind;

    fn rule(id: &str, required: bool) -> Rule {
        Rule::new(
            id,
            id,
            RuleKind::Pattern {
                pattern: "x".to_string(),
            },
            &[FileKind::Go],
            "m",
        )
        .required(required)
    }

    #[test]
    fn default_config() {
        let config = Config::default();
        assert!(!config.scan.respect_gitignore);
        assert_eq!(config.scan.exclude_dirs.len(), DEFAULT_EXCLUDED_DIRS.len());
        assert!(config.rules.is_empty());
        assert!(config.preset.is_none());
    }

    #[test]
    fn parse_full_config() {
        let toml = r#"
preset = "strict"

[scan]
root = "./web"
exclude_dirs = ["vendor"]
exclude = ["**/*_templ.go"]
parallelism = 4

[rules.no-hardcoded-color-class]
enabled = false

[rules.alpine-via-props]
required = true

[[custom_rules]]
id = "no-inline-style"
name = "No Inline Styles"
kind = "pattern"
pattern = 'style="'
file_kinds = ["templ"]
message = "Inline style attribute"
"#;

        let config = Config::parse(toml).unwrap();
        assert_eq!(config.preset.as_deref(), Some("strict"));
        assert_eq!(config.scan.root, PathBuf::from("./web"));
        assert_eq!(config.scan.exclude_dirs, ["vendor"]);
        assert_eq!(config.scan.parallelism, Some(4));
        assert!(!config.is_rule_enabled("no-hardcoded-color-class"));
        assert!(config.is_rule_enabled("anything-else"));

        assert_eq!(config.custom_rules.len(), 1);
        let custom = &config.custom_rules[0];
        assert_eq!(custom.kind.pattern(), Some("style=\""));
        assert!(!custom.required);
    }

    #[test]
    fn resolve_rules_applies_overrides() {
        let config = Config::parse(
            r#"
[rules.dropped]
enabled = false

[rules.softened]
required = false

[[custom_rules]]
id = "extra"
name = "Extra"
kind = "syntax"
file_kinds = ["go"]
message = "m"
required = true
"#,
        )
        .unwrap();

        let resolved = config.resolve_rules(vec![
            rule("kept", true),
            rule("dropped", true),
            rule("softened", true),
        ]);

        let ids: Vec<&str> = resolved.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["kept", "softened", "extra"]);
        assert!(resolved[0].required);
        assert!(!resolved[1].required);
        assert_eq!(resolved[2].kind, RuleKind::Syntax);
    }

    #[test]
    fn invalid_toml_is_a_parse_error() {
        let err = Config::parse("[scan\nroot = 1").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = Config::from_file(std::path::Path::new("/nonexistent/migration-guard.toml"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
