//! Text-matching rules: forbidden patterns and required imports.

use crate::collector::IssueCollector;
use crate::context::SourceFile;
use crate::registry::RuleRegistry;
use crate::rule::{Rule, RuleKind};
use crate::types::Issue;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// A rule skipped for the whole run because its pattern is unusable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvalidRule {
    /// ID of the skipped rule.
    pub rule_id: String,
    /// Why the pattern was rejected.
    pub reason: String,
}

struct Matcher {
    rule: Rule,
    regex: Regex,
}

/// Applies pattern and import-requirement rules to file content.
///
/// Regexes are compiled once per run. Results go straight to the
/// [`IssueCollector`]; the evaluator keeps no per-scan state.
pub struct PatternEvaluator {
    matchers: Vec<Matcher>,
}

impl PatternEvaluator {
    /// Compiles every text-matching rule in the registry.
    ///
    /// Rules with an empty or unparsable pattern are logged once and
    /// returned as [`InvalidRule`]s; all other rules still apply.
    #[must_use]
    pub fn compile(registry: &RuleRegistry) -> (Self, Vec<InvalidRule>) {
        let mut matchers = Vec::new();
        let mut invalid = Vec::new();

        for rule in registry {
            let Some(pattern) = rule.kind.pattern() else {
                continue;
            };

            let compiled = if pattern.is_empty() {
                Err("pattern is empty".to_string())
            } else {
                Regex::new(pattern).map_err(|e| e.to_string())
            };

            match compiled {
                Ok(regex) => matchers.push(Matcher {
                    rule: rule.clone(),
                    regex,
                }),
                Err(reason) => {
                    warn!("Invalid regex in rule {}: {}", rule.id, reason);
                    invalid.push(InvalidRule {
                        rule_id: rule.id.clone(),
                        reason,
                    });
                }
            }
        }

        (Self { matchers }, invalid)
    }

    /// Number of usable rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.matchers.len()
    }

    /// Whether no rule compiled.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.matchers.is_empty()
    }

    /// Evaluates every applicable rule against one file.
    pub fn evaluate(&self, file: &SourceFile<'_>, sink: &mut IssueCollector) {
        for matcher in self.matchers.iter().filter(|m| m.rule.applies_to(file.kind)) {
            match &matcher.rule.kind {
                RuleKind::Pattern { .. } => Self::forbid(matcher, file, sink),
                RuleKind::ImportRequirement { declaration, .. } => {
                    Self::require_declaration(matcher, declaration, file, sink);
                }
                RuleKind::Syntax | RuleKind::Compilation => {}
            }
        }
    }

    /// One issue per matching line, located at the first match on it.
    fn forbid(matcher: &Matcher, file: &SourceFile<'_>, sink: &mut IssueCollector) {
        let rule = &matcher.rule;
        let mut matched = false;

        for (_, line_start, line) in file.lines() {
            let Some(m) = matcher.regex.find(line) else {
                continue;
            };
            matched = true;

            let issue = Issue::new(
                &rule.id,
                rule.severity(),
                file.locate(line_start + m.start(), m.len()),
                &rule.message,
            )
            .with_matched_text(m.as_str())
            .with_suggested_fix(rule.suggested_fix.clone());
            sink.record(issue);
        }

        // Optional rules only surface when triggered.
        if !matched && rule.required {
            sink.pass(&rule.id);
        }
    }

    /// One issue per file when the usage marker appears without the
    /// declaration.
    fn require_declaration(
        matcher: &Matcher,
        declaration: &str,
        file: &SourceFile<'_>,
        sink: &mut IssueCollector,
    ) {
        let rule = &matcher.rule;

        let Some(usage) = matcher.regex.find(file.content) else {
            if rule.required {
                sink.pass(&rule.id);
            }
            return;
        };

        if file.content.contains(declaration) {
            sink.pass(&rule.id);
            return;
        }

        let fix = rule
            .suggested_fix
            .clone()
            .unwrap_or_else(|| format!("Add: import {declaration}"));

        let issue = Issue::new(
            &rule.id,
            rule.severity(),
            file.locate(usage.start(), usage.len()),
            &rule.message,
        )
        .with_matched_text(usage.as_str())
        .with_suggested_fix(Some(fix));
        sink.record(issue);
    }
}

impl std::fmt::Debug for PatternEvaluator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.matchers.iter().map(|m| &m.rule.id))
            .finish()
    }
}
