//! Final scan report and its human-readable digest.

use crate::collector::IssueCollector;
use crate::pattern::InvalidRule;
use crate::registry::RuleRegistry;
use crate::rule::Rule;
use crate::types::{Issue, Severity};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Write;
use std::path::PathBuf;

/// Maximum number of error issues listed in the digest.
const DIGEST_ERROR_LIMIT: usize = 5;

/// Aggregate counts for a report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    /// Issues with [`Severity::Error`].
    pub error: usize,
    /// Issues with [`Severity::Warning`].
    pub warning: usize,
    /// Issues with [`Severity::Info`].
    pub info: usize,
    /// All issues.
    pub total: usize,
    /// Rules in the passed set.
    pub passed_rules: usize,
    /// Rules in the failed set.
    pub failed_rules: usize,
}

impl Summary {
    fn count(issues: &[Issue]) -> Self {
        let mut summary = Self::default();
        for issue in issues {
            match issue.severity {
                Severity::Error => summary.error += 1,
                Severity::Warning => summary.warning += 1,
                Severity::Info => summary.info += 1,
            }
        }
        summary.total = issues.len();
        summary
    }
}

/// The single artifact produced by a scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// When the report was assembled.
    pub timestamp: DateTime<Utc>,
    /// Root directory that was scanned.
    pub root_path: PathBuf,
    /// Migration session this validation belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    /// Files that passed the relevance filter.
    pub files_checked: usize,
    /// Issues in discovery order.
    pub issues: Vec<Issue>,
    /// Severity and rule counts.
    pub summary: Summary,
    /// Snapshot of the registry used.
    pub rules: Vec<Rule>,
    /// Rules that passed everywhere they were observed.
    pub passed_rule_ids: Vec<String>,
    /// Rules that failed at least once.
    pub failed_rule_ids: Vec<String>,
    /// Rules skipped because their pattern was unusable.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub invalid_rules: Vec<InvalidRule>,
    /// Candidate files that could not be read.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped_files: Vec<PathBuf>,
}

impl Report {
    /// A run passes when it found no issues at all.
    #[must_use]
    pub fn is_passing(&self) -> bool {
        self.summary.total == 0
    }

    /// Issues filtered by severity.
    #[must_use]
    pub fn by_severity(&self, severity: Severity) -> Vec<&Issue> {
        self.issues
            .iter()
            .filter(|i| i.severity == severity)
            .collect()
    }

    /// Looks up a rule in the snapshot.
    #[must_use]
    pub fn rule(&self, id: &str) -> Option<&Rule> {
        self.rules.iter().find(|r| r.id == id)
    }

    /// Renders the digest printed after a scan.
    #[must_use]
    pub fn format_digest(&self) -> String {
        let rule_line = "=".repeat(60);
        let mut out = String::new();

        let _ = writeln!(out, "{rule_line}");
        let _ = writeln!(out, "MIGRATION VALIDATION REPORT");
        let _ = writeln!(out, "{rule_line}");
        let _ = writeln!(out, "Project path: {}", self.root_path.display());
        if let Some(session) = &self.session_id {
            let _ = writeln!(out, "Migration session: {session}");
        }
        let _ = writeln!(out, "Files checked: {}", self.files_checked);
        let _ = writeln!(
            out,
            "Validated at: {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC")
        );
        out.push('\n');

        if self.is_passing() {
            let _ = writeln!(out, "VALIDATION PASSED - no issues found");
        } else {
            let _ = writeln!(
                out,
                "VALIDATION FAILED - found {} issue(s)",
                self.summary.total
            );
        }
        out.push('\n');

        let _ = writeln!(out, "Issues by severity:");
        let _ = writeln!(out, "  errors:   {}", self.summary.error);
        let _ = writeln!(out, "  warnings: {}", self.summary.warning);
        let _ = writeln!(out, "  info:     {}", self.summary.info);
        out.push('\n');

        let _ = writeln!(out, "Rules:");
        let _ = writeln!(out, "  passed: {}", self.summary.passed_rules);
        let _ = writeln!(out, "  failed: {}", self.summary.failed_rules);

        if !self.failed_rule_ids.is_empty() {
            out.push('\n');
            let _ = writeln!(out, "Failed rules:");
            for id in &self.failed_rule_ids {
                match self.rule(id) {
                    Some(rule) if !rule.description.is_empty() => {
                        let _ = writeln!(out, "  - {}: {}", rule.name, rule.description);
                    }
                    Some(rule) => {
                        let _ = writeln!(out, "  - {}", rule.name);
                    }
                    None => {
                        let _ = writeln!(out, "  - {id}");
                    }
                }
            }
        }

        let errors = self.by_severity(Severity::Error);
        if !errors.is_empty() {
            out.push('\n');
            let _ = writeln!(out, "Critical issues (first {DIGEST_ERROR_LIMIT}):");
            for issue in errors.iter().take(DIGEST_ERROR_LIMIT) {
                let _ = writeln!(
                    out,
                    "  {}:{} - {}",
                    issue.location.file.display(),
                    issue.location.line,
                    issue.message
                );
                if let Some(fix) = &issue.suggested_fix {
                    let _ = writeln!(out, "    fix: {fix}");
                }
            }
        }

        if !self.invalid_rules.is_empty() {
            out.push('\n');
            let _ = writeln!(out, "Skipped rules (invalid pattern):");
            for invalid in &self.invalid_rules {
                let _ = writeln!(out, "  - {}: {}", invalid.rule_id, invalid.reason);
            }
        }

        if !self.skipped_files.is_empty() {
            out.push('\n');
            let _ = writeln!(out, "Unreadable files: {}", self.skipped_files.len());
        }

        let _ = writeln!(out, "{rule_line}");
        out
    }
}

/// Assembles the [`Report`] once the walk has finished.
#[derive(Debug, Clone)]
pub struct ReportBuilder {
    root: PathBuf,
    session_id: Option<String>,
    files_checked: usize,
    rules: Vec<Rule>,
    invalid_rules: Vec<InvalidRule>,
    skipped_files: Vec<PathBuf>,
}

impl ReportBuilder {
    /// Starts a report for the given root.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            session_id: None,
            files_checked: 0,
            rules: Vec::new(),
            invalid_rules: Vec::new(),
            skipped_files: Vec::new(),
        }
    }

    /// Sets the migration session identifier.
    #[must_use]
    pub fn session_id(mut self, id: Option<String>) -> Self {
        self.session_id = id;
        self
    }

    /// Sets the number of candidate files.
    #[must_use]
    pub fn files_checked(mut self, count: usize) -> Self {
        self.files_checked = count;
        self
    }

    /// Snapshots the registry used for the scan.
    #[must_use]
    pub fn rules(mut self, registry: &RuleRegistry) -> Self {
        self.rules = registry.rules().to_vec();
        self
    }

    /// Records rules skipped for the run.
    #[must_use]
    pub fn invalid_rules(mut self, invalid: Vec<InvalidRule>) -> Self {
        self.invalid_rules = invalid;
        self
    }

    /// Records files that could not be read.
    #[must_use]
    pub fn skipped_files(mut self, files: Vec<PathBuf>) -> Self {
        self.skipped_files = files;
        self
    }

    /// Builds the report from everything the collector observed.
    ///
    /// A rule that failed in any file is failed, whatever it did
    /// elsewhere. A rule is passed only if it was seen passing and never
    /// failing.
    #[must_use]
    pub fn build(self, collector: IssueCollector) -> Report {
        let (issues, seen_passed, seen_failed) = collector.into_parts();

        let passed_rule_ids: Vec<String> = seen_passed.difference(&seen_failed).cloned().collect();
        let failed_rule_ids: Vec<String> = seen_failed.into_iter().collect();

        let mut summary = Summary::count(&issues);
        summary.passed_rules = passed_rule_ids.len();
        summary.failed_rules = failed_rule_ids.len();

        Report {
            timestamp: Utc::now(),
            root_path: self.root,
            session_id: self.session_id,
            files_checked: self.files_checked,
            issues,
            summary,
            rules: self.rules,
            passed_rule_ids,
            failed_rule_ids,
            invalid_rules: self.invalid_rules,
            skipped_files: self.skipped_files,
        }
    }
}
