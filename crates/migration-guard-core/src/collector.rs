//! Append-only store of issues and rule observations.

use crate::types::Issue;
use std::collections::BTreeSet;

/// Accumulates issues in discovery order, plus the rules seen passing and
/// failing. Nothing is ever removed.
#[derive(Debug, Default, Clone)]
pub struct IssueCollector {
    issues: Vec<Issue>,
    passed: BTreeSet<String>,
    failed: BTreeSet<String>,
}

impl IssueCollector {
    /// Creates an empty collector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an issue and marks its rule as failed.
    pub fn record(&mut self, issue: Issue) {
        self.failed.insert(issue.rule_id.clone());
        self.issues.push(issue);
    }

    /// Records that a rule passed for one file.
    pub fn pass(&mut self, rule_id: &str) {
        if !self.passed.contains(rule_id) {
            self.passed.insert(rule_id.to_string());
        }
    }

    /// Records that a rule failed for one file without an issue of its own.
    pub fn fail(&mut self, rule_id: &str) {
        if !self.failed.contains(rule_id) {
            self.failed.insert(rule_id.to_string());
        }
    }

    /// Appends everything another collector recorded, after what is
    /// already here.
    pub fn absorb(&mut self, other: Self) {
        self.issues.extend(other.issues);
        self.passed.extend(other.passed);
        self.failed.extend(other.failed);
    }

    /// Issues recorded so far.
    #[must_use]
    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    /// Rules observed passing at least once.
    #[must_use]
    pub fn seen_passed(&self) -> &BTreeSet<String> {
        &self.passed
    }

    /// Rules observed failing at least once.
    #[must_use]
    pub fn seen_failed(&self) -> &BTreeSet<String> {
        &self.failed
    }

    /// Whether `rule_id` has failed anywhere so far.
    #[must_use]
    pub fn has_failed(&self, rule_id: &str) -> bool {
        self.failed.contains(rule_id)
    }

    /// Consumes the collector.
    #[must_use]
    pub fn into_parts(self) -> (Vec<Issue>, BTreeSet<String>, BTreeSet<String>) {
        (self.issues, self.passed, self.failed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Location, Severity};
    use std::path::PathBuf;

    fn issue(rule: &str, line: usize) -> Issue {
        Issue::new(
            rule,
            Severity::Error,
            Location::new(PathBuf::from("a.templ"), line, 1),
            "m",
        )
    }

    #[test]
    fn record_keeps_order_and_marks_failed() {
        let mut c = IssueCollector::new();
        c.record(issue("b", 2));
        c.record(issue("a", 1));

        let lines: Vec<usize> = c.issues().iter().map(|i| i.location.line).collect();
        assert_eq!(lines, [2, 1]);
        assert!(c.has_failed("a"));
        assert!(c.has_failed("b"));
    }

    #[test]
    fn pass_and_fail_are_tracked_independently() {
        let mut c = IssueCollector::new();
        c.pass("r");
        c.fail("r");
        c.pass("r");

        assert!(c.seen_passed().contains("r"));
        assert!(c.seen_failed().contains("r"));
        assert!(c.issues().is_empty());
    }

    #[test]
    fn absorb_appends_after_existing() {
        let mut global = IssueCollector::new();
        global.record(issue("first", 1));

        let mut local = IssueCollector::new();
        local.record(issue("second", 1));
        local.pass("ok");

        global.absorb(local);
        let rules: Vec<&str> = global.issues().iter().map(|i| i.rule_id.as_str()).collect();
        assert_eq!(rules, ["first", "second"]);
        assert!(global.seen_passed().contains("ok"));
    }
}
