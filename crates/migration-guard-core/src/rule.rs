//! Typed validation rules.

use crate::types::{FileKind, Severity};
use serde::{Deserialize, Serialize};

/// What a rule inspects, with the payload that kind needs.
///
/// A pattern is present exactly for the kinds that match text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RuleKind {
    /// The file must parse (Go) or pass the structural checks (templ).
    Syntax,
    /// A forbidden pattern; every matching line is a violation.
    Pattern {
        /// Regular expression matched line by line.
        pattern: String,
    },
    /// Usage of a namespace requires its import declaration.
    ImportRequirement {
        /// Regular expression detecting the usage marker.
        pattern: String,
        /// Substring that must also be present when the marker is used.
        declaration: String,
    },
    /// The file must be ready to compile; derived from the syntax outcome.
    Compilation,
}

impl RuleKind {
    /// Returns the regular expression, for kinds that carry one.
    #[must_use]
    pub fn pattern(&self) -> Option<&str> {
        match self {
            Self::Pattern { pattern } | Self::ImportRequirement { pattern, .. } => Some(pattern),
            Self::Syntax | Self::Compilation => None,
        }
    }

    /// Short label used in listings.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Syntax => "syntax",
            Self::Pattern { .. } => "pattern",
            Self::ImportRequirement { .. } => "import",
            Self::Compilation => "compilation",
        }
    }
}

/// An immutable, typed check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    /// Unique kebab-case identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// What the rule checks.
    #[serde(default)]
    pub description: String,
    /// Rule kind and its payload.
    #[serde(flatten)]
    pub kind: RuleKind,
    /// Whether a violation is an error (otherwise a warning).
    #[serde(default)]
    pub required: bool,
    /// File kinds this rule inspects.
    pub file_kinds: Vec<FileKind>,
    /// Message attached to every issue.
    pub message: String,
    /// Suggested fix attached to every issue.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_fix: Option<String>,
}

impl Rule {
    /// Creates a rule with no description or fix.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        kind: RuleKind,
        file_kinds: &[FileKind],
        message: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            kind,
            required: false,
            file_kinds: file_kinds.to_vec(),
            message: message.into(),
            suggested_fix: None,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Marks the rule as required.
    #[must_use]
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Sets the suggested fix.
    #[must_use]
    pub fn suggested_fix(mut self, fix: impl Into<String>) -> Self {
        self.suggested_fix = Some(fix.into());
        self
    }

    /// Whether this rule inspects files of `kind`.
    #[must_use]
    pub fn applies_to(&self, kind: FileKind) -> bool {
        self.file_kinds.contains(&kind)
    }

    /// Severity of a violation of this rule.
    #[must_use]
    pub fn severity(&self) -> Severity {
        Severity::for_required(self.required)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn theme_rule() -> Rule {
        Rule::new(
            "no-dynamic-theme-lookup",
            "No theme.Get() Calls",
            RuleKind::Pattern {
                pattern: r"theme\.Get\(".to_string(),
            },
            &[FileKind::Go, FileKind::Templ],
            "Found theme.Get() call",
        )
        .required(true)
        .suggested_fix("Use compiled CSS classes instead of theme.Get()")
    }

    #[test]
    fn pattern_present_only_for_matching_kinds() {
        assert!(RuleKind::Syntax.pattern().is_none());
        assert!(RuleKind::Compilation.pattern().is_none());
        assert_eq!(theme_rule().kind.pattern(), Some(r"theme\.Get\("));
    }

    #[test]
    fn applies_to_listed_kinds() {
        let rule = Rule::new("r", "R", RuleKind::Syntax, &[FileKind::Templ], "m");
        assert!(rule.applies_to(FileKind::Templ));
        assert!(!rule.applies_to(FileKind::Go));
    }

    #[test]
    fn severity_derives_from_required() {
        assert_eq!(theme_rule().severity(), Severity::Error);
        assert_eq!(theme_rule().required(false).severity(), Severity::Warning);
    }

    #[test]
    fn serializes_kind_as_tag() {
        let json = serde_json::to_value(theme_rule()).unwrap();
        assert_eq!(json["kind"], "pattern");
        assert_eq!(json["pattern"], r"theme\.Get\(");
        assert_eq!(json["file_kinds"][1], "templ");

        let back: Rule = serde_json::from_value(json).unwrap();
        assert_eq!(back, theme_rule());
    }

    #[test]
    fn deserializes_import_requirement_from_toml() {
        let rule: Rule = toml::from_str(
            r#"
id = "icons-import-present"
name = "Icons Import Present"
kind = "import_requirement"
pattern = '@icons\.\w+'
declaration = '"example.com/app/icons"'
required = true
file_kinds = ["templ"]
message = "Using icons but missing import"
"#,
        )
        .unwrap();

        assert!(matches!(
            rule.kind,
            RuleKind::ImportRequirement { ref declaration, .. } if declaration == "\"example.com/app/icons\""
        ));
        assert!(rule.required);
        assert!(rule.suggested_fix.is_none());
    }
}
