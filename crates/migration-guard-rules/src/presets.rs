//! Rule presets for common configurations.

use crate::builtin::{builtin_rules, import_rules, syntax_rules};
use migration_guard_core::Rule;
use tracing::debug;

/// Preset configurations for migration-guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Preset {
    /// The full built-in table.
    #[default]
    Recommended,
    /// The full table with every rule required.
    Strict,
    /// Syntax and import rules only, for the first pass of a migration.
    Minimal,
}

impl Preset {
    /// Every preset, in listing order.
    pub const ALL: [Self; 3] = [Self::Recommended, Self::Strict, Self::Minimal];

    /// Parses a preset name as written in configuration files.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "recommended" => Some(Self::Recommended),
            "strict" => Some(Self::Strict),
            "minimal" => Some(Self::Minimal),
            _ => None,
        }
    }

    /// The configuration name of this preset.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Recommended => "recommended",
            Self::Strict => "strict",
            Self::Minimal => "minimal",
        }
    }

    /// Returns the rules for this preset.
    #[must_use]
    pub fn rules(self) -> Vec<Rule> {
        let rules = match self {
            Self::Recommended => recommended_rules(),
            Self::Strict => strict_rules(),
            Self::Minimal => minimal_rules(),
        };
        debug!("Preset {}: {} rules", self.name(), rules.len());
        rules
    }
}

/// Returns the recommended set of rules: the whole built-in table.
#[must_use]
pub fn recommended_rules() -> Vec<Rule> {
    builtin_rules()
}

/// Returns the strict set of rules.
///
/// Same table as [`recommended_rules`], but informational rules
/// (`no-hardcoded-color-class`, `htmx-via-props`, `alpine-via-props`)
/// become required, so their violations are errors.
#[must_use]
pub fn strict_rules() -> Vec<Rule> {
    builtin_rules()
        .into_iter()
        .map(|rule| rule.required(true))
        .collect()
}

/// Returns the minimal set of rules.
///
/// For gradual adoption, only includes:
/// - the two syntax rules
/// - `no-legacy-import-path`
/// - the atoms and molecules import-presence rules
#[must_use]
pub fn minimal_rules() -> Vec<Rule> {
    let mut rules = syntax_rules();
    rules.extend(import_rules());
    rules
}
