//! Core types for validation issues.

use miette::{Diagnostic, NamedSource, SourceSpan};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Severity level for validation issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational message.
    Info,
    /// Violation of an optional rule.
    Warning,
    /// Violation of a required rule.
    Error,
}

impl Severity {
    /// Severity of a violation of a rule with the given `required` flag.
    #[must_use]
    pub fn for_required(required: bool) -> Self {
        if required {
            Self::Error
        } else {
            Self::Warning
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// The two file categories the engine understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    /// Structured source (Go), validated with a real parser.
    Go,
    /// Component templates (templ), validated with structural heuristics.
    Templ,
}

impl FileKind {
    /// Every known file kind.
    pub const ALL: [Self; 2] = [Self::Go, Self::Templ];

    /// Classifies a path by its extension.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|e| e.to_str())? {
            "go" => Some(Self::Go),
            "templ" => Some(Self::Templ),
            _ => None,
        }
    }

    /// File extension (without the dot).
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Go => "go",
            Self::Templ => "templ",
        }
    }
}

impl std::fmt::Display for FileKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

/// Source code location.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    /// File path relative to the scanned root.
    pub file: PathBuf,
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number (1-indexed, in characters).
    pub column: usize,
    /// Byte offset in file (for miette integration).
    #[serde(default)]
    pub offset: usize,
    /// Length of the span in bytes.
    #[serde(default)]
    pub length: usize,
}

impl Location {
    /// Creates a new location with explicit values.
    #[must_use]
    pub fn new(file: PathBuf, line: usize, column: usize) -> Self {
        Self {
            file,
            line,
            column,
            offset: 0,
            length: 0,
        }
    }

    /// Sets the byte offset and length for this location.
    #[must_use]
    pub fn with_span(mut self, offset: usize, length: usize) -> Self {
        self.offset = offset;
        self.length = length;
        self
    }
}

/// One concrete, located violation of a rule in one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    /// Unique issue identifier (`rule:file:line`).
    pub id: String,
    /// ID of the rule that produced this issue.
    pub rule_id: String,
    /// Where the issue was found.
    #[serde(flatten)]
    pub location: Location,
    /// The offending text (or the parser diagnostic for syntax issues).
    pub matched_text: String,
    /// Severity of this issue.
    pub severity: Severity,
    /// Human-readable message.
    pub message: String,
    /// Suggested fix, copied from the rule.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_fix: Option<String>,
}

impl Issue {
    /// Creates a new issue. The ID is derived from rule, file and line.
    #[must_use]
    pub fn new(
        rule_id: impl Into<String>,
        severity: Severity,
        location: Location,
        message: impl Into<String>,
    ) -> Self {
        let rule_id = rule_id.into();
        Self {
            id: format!(
                "{}:{}:{}",
                rule_id,
                location.file.display(),
                location.line
            ),
            rule_id,
            location,
            matched_text: String::new(),
            severity,
            message: message.into(),
            suggested_fix: None,
        }
    }

    /// Sets the matched text.
    #[must_use]
    pub fn with_matched_text(mut self, text: impl Into<String>) -> Self {
        self.matched_text = text.into();
        self
    }

    /// Sets the suggested fix.
    #[must_use]
    pub fn with_suggested_fix(mut self, fix: Option<String>) -> Self {
        self.suggested_fix = fix;
        self
    }

    /// Formats the issue for terminal output.
    #[must_use]
    pub fn format(&self) -> String {
        self.format_styled(false)
    }

    /// Like [`Issue::format`], with the severity in ANSI colour when
    /// `color` is set.
    #[must_use]
    pub fn format_styled(&self, color: bool) -> String {
        use std::fmt::Write;
        let mut output = format!(
            "{} at {}:{}:{}\n",
            self.rule_id,
            self.location.file.display(),
            self.location.line,
            self.location.column,
        );
        if color {
            let code = match self.severity {
                Severity::Error => 31,
                Severity::Warning => 33,
                Severity::Info => 34,
            };
            let _ = writeln!(
                output,
                "  \x1b[{code}m{}\x1b[0m: {}",
                self.severity, self.message
            );
        } else {
            let _ = writeln!(output, "  {}: {}", self.severity, self.message);
        }
        if let Some(fix) = &self.suggested_fix {
            let _ = writeln!(output, "  = fix: {fix}");
        }
        output
    }
}

impl std::fmt::Display for Issue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}:{}: {} [{}] {}",
            self.location.file.display(),
            self.location.line,
            self.location.column,
            self.severity,
            self.rule_id,
            self.message
        )
    }
}

/// An [`Issue`] paired with its file content, for rich miette rendering.
#[derive(Debug, thiserror::Error, Diagnostic)]
#[error("[{rule_id}] {message}")]
pub struct IssueDiagnostic {
    rule_id: String,
    message: String,
    #[help]
    help: Option<String>,
    #[source_code]
    source_code: NamedSource<String>,
    #[label("{label_message}")]
    span: SourceSpan,
    label_message: String,
}

impl IssueDiagnostic {
    /// Builds a diagnostic for `issue` over the full `content` of its file.
    #[must_use]
    pub fn new(issue: &Issue, content: String) -> Self {
        let offset = issue.location.offset.min(content.len());
        let length = issue.location.length.min(content.len() - offset);
        Self {
            rule_id: issue.rule_id.clone(),
            message: issue.message.clone(),
            help: issue.suggested_fix.clone(),
            source_code: NamedSource::new(issue.location.file.display().to_string(), content),
            span: SourceSpan::from((offset, length)),
            label_message: issue.severity.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_issue(severity: Severity) -> Issue {
        Issue::new(
            "no-dynamic-theme-lookup",
            severity,
            Location::new(PathBuf::from("views/page.templ"), 12, 5),
            "Found theme.Get() call",
        )
    }

    #[test]
    fn severity_follows_required_flag() {
        assert_eq!(Severity::for_required(true), Severity::Error);
        assert_eq!(Severity::for_required(false), Severity::Warning);
    }

    #[test]
    fn file_kind_from_extension() {
        assert_eq!(FileKind::from_path(Path::new("a/b.go")), Some(FileKind::Go));
        assert_eq!(
            FileKind::from_path(Path::new("views/button.templ")),
            Some(FileKind::Templ)
        );
        assert_eq!(FileKind::from_path(Path::new("README.md")), None);
        assert_eq!(FileKind::from_path(Path::new("Makefile")), None);
    }

    #[test]
    fn issue_id_combines_rule_file_and_line() {
        let issue = make_issue(Severity::Error);
        assert_eq!(issue.id, "no-dynamic-theme-lookup:views/page.templ:12");
    }

    #[test]
    fn issue_format_includes_fix() {
        let issue = make_issue(Severity::Error)
            .with_suggested_fix(Some("Use compiled CSS classes".to_string()));
        let formatted = issue.format();
        assert!(formatted.contains("= fix: Use compiled CSS classes"));
        assert!(formatted.contains("views/page.templ:12:5"));
    }

    #[test]
    fn issue_format_omits_fix_when_none() {
        let formatted = make_issue(Severity::Warning).format();
        assert!(!formatted.contains("fix:"));
        assert!(formatted.contains("warning: Found theme.Get() call"));
    }

    #[test]
    fn styled_format_colours_only_the_severity() {
        let issue = make_issue(Severity::Error);
        let styled = issue.format_styled(true);
        assert!(styled.contains("  \x1b[31merror\x1b[0m: Found theme.Get() call"));
        assert_eq!(
            styled.replace("\x1b[31m", "").replace("\x1b[0m", ""),
            issue.format()
        );
    }

    #[test]
    fn issue_serializes_location_flat() {
        let issue = make_issue(Severity::Error);
        let json = serde_json::to_value(&issue).unwrap();
        assert_eq!(json["file"], "views/page.templ");
        assert_eq!(json["line"], 12);
        assert_eq!(json["severity"], "error");
        assert!(json.get("suggested_fix").is_none());
    }

    #[test]
    fn diagnostic_clamps_span_to_content() {
        let issue = Issue::new(
            "r",
            Severity::Error,
            Location::new(PathBuf::from("f.go"), 1, 1).with_span(100, 10),
            "m",
        );
        let diag = IssueDiagnostic::new(&issue, "short".to_string());
        assert_eq!(diag.span.offset(), 5);
        assert_eq!(diag.span.len(), 0);
    }
}
