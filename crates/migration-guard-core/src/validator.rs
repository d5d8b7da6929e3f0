//! Scan orchestration: walk, check each file, build the report.

use crate::collector::IssueCollector;
use crate::config::ScanConfig;
use crate::context::SourceFile;
use crate::parser::SourceParser;
use crate::pattern::{InvalidRule, PatternEvaluator};
use crate::registry::RuleRegistry;
use crate::report::{Report, ReportBuilder};
use crate::rule::RuleKind;
use crate::syntax::{SyntaxChecker, SyntaxFailure};
use crate::types::Issue;
use crate::walker::{Candidate, FileWalker, WalkError};

use miette::Diagnostic;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that abort a scan. No report is produced.
#[derive(Debug, Error, Diagnostic)]
pub enum ScanError {
    /// The tree could not be enumerated.
    #[error(transparent)]
    #[diagnostic(
        code(migration_guard::walk),
        help("check that the project root exists and is readable")
    )]
    Walk(#[from] WalkError),

    /// IO error while preparing the scan.
    #[error("IO error: {0}")]
    #[diagnostic(code(migration_guard::io))]
    Io(#[from] std::io::Error),

    /// An exclude pattern is not a valid glob.
    #[error("Invalid glob pattern: {0}")]
    #[diagnostic(
        code(migration_guard::glob),
        help("exclude patterns use glob syntax, e.g. **/*_templ.go")
    )]
    Glob(#[from] glob::PatternError),

    /// The worker pool for a parallel scan could not start.
    #[error("Failed to start worker pool: {0}")]
    #[diagnostic(code(migration_guard::pool))]
    Pool(#[from] rayon::ThreadPoolBuildError),
}

/// Builder for configuring a [`Validator`].
#[derive(Default)]
pub struct ValidatorBuilder {
    root: Option<PathBuf>,
    registry: Option<RuleRegistry>,
    parser: Option<Box<dyn SourceParser>>,
    exclude_dirs: Option<Vec<String>>,
    exclude_patterns: Vec<String>,
    git_ignore: bool,
    parallelism: usize,
    session_id: Option<String>,
}

impl ValidatorBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the root directory to validate.
    #[must_use]
    pub fn root(mut self, path: impl Into<PathBuf>) -> Self {
        self.root = Some(path.into());
        self
    }

    /// Sets the rules to apply.
    #[must_use]
    pub fn registry(mut self, registry: RuleRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Replaces the Go parser.
    #[must_use]
    pub fn parser(mut self, parser: Box<dyn SourceParser>) -> Self {
        self.parser = Some(parser);
        self
    }

    /// Replaces the pruned directory names.
    #[must_use]
    pub fn exclude_dirs<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_dirs = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Adds an exclude glob pattern.
    #[must_use]
    pub fn exclude(mut self, pattern: impl Into<String>) -> Self {
        self.exclude_patterns.push(pattern.into());
        self
    }

    /// Adds multiple exclude glob patterns.
    #[must_use]
    pub fn excludes<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_patterns
            .extend(patterns.into_iter().map(Into::into));
        self
    }

    /// Sets whether `.gitignore` files are honoured (default: false).
    #[must_use]
    pub fn git_ignore(mut self, yes: bool) -> Self {
        self.git_ignore = yes;
        self
    }

    /// Sets the number of worker threads. 0 and 1 scan sequentially.
    #[must_use]
    pub fn parallelism(mut self, workers: usize) -> Self {
        self.parallelism = workers;
        self
    }

    /// Sets the migration session carried into the report.
    #[must_use]
    pub fn session_id(mut self, id: impl Into<String>) -> Self {
        self.session_id = Some(id.into());
        self
    }

    /// Applies the `[scan]` section of a configuration file.
    ///
    /// An explicit root set on the builder takes precedence.
    #[must_use]
    pub fn scan_config(mut self, scan: &ScanConfig) -> Self {
        if self.root.is_none() {
            self.root = Some(scan.root.clone());
        }
        self.exclude_dirs = Some(scan.exclude_dirs.clone());
        self.exclude_patterns.extend(scan.exclude.iter().cloned());
        self.git_ignore = scan.respect_gitignore;
        if let Some(workers) = scan.parallelism {
            self.parallelism = workers;
        }
        self
    }

    /// Builds the validator, compiling every rule pattern once.
    ///
    /// # Errors
    ///
    /// Returns an error if the working directory cannot be resolved or an
    /// exclude pattern is invalid.
    pub fn build(self) -> Result<Validator, ScanError> {
        let root = self.root.unwrap_or_else(|| PathBuf::from("."));
        let root = if root.is_absolute() {
            root
        } else {
            std::env::current_dir()?.join(&root)
        };

        let mut walker = FileWalker::new(&root).git_ignore(self.git_ignore);
        if let Some(dirs) = self.exclude_dirs {
            walker = walker.exclude_dirs(dirs);
        }
        let walker = walker.exclude_globs(&self.exclude_patterns)?;

        let registry = self.registry.unwrap_or_default();
        let (patterns, invalid_rules) = PatternEvaluator::compile(&registry);
        let syntax = self
            .parser
            .map_or_else(SyntaxChecker::default, SyntaxChecker::new);

        Ok(Validator {
            root,
            registry,
            walker,
            syntax,
            patterns,
            invalid_rules,
            parallelism: self.parallelism,
            session_id: self.session_id,
        })
    }
}

/// Result of checking one candidate.
enum FileOutcome {
    Checked(IssueCollector),
    Unreadable(PathBuf),
}

/// Runs a full scan over a project tree.
///
/// Use [`Validator::builder()`] to construct an instance. The registry is
/// read-only for the lifetime of the validator and shared by all workers.
#[derive(Debug)]
pub struct Validator {
    root: PathBuf,
    registry: RuleRegistry,
    walker: FileWalker,
    syntax: SyntaxChecker,
    patterns: PatternEvaluator,
    invalid_rules: Vec<InvalidRule>,
    parallelism: usize,
    session_id: Option<String>,
}

impl Validator {
    /// Creates a new builder for configuring a validator.
    #[must_use]
    pub fn builder() -> ValidatorBuilder {
        ValidatorBuilder::new()
    }

    /// Returns the root directory being validated.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the rules in use.
    #[must_use]
    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    /// Rules skipped because their pattern did not compile.
    #[must_use]
    pub fn invalid_rules(&self) -> &[InvalidRule] {
        &self.invalid_rules
    }

    /// Validates every candidate file and returns the report.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::Walk`] if the tree cannot be enumerated; no
    /// partial report is produced. Unreadable files are not errors.
    pub fn validate(&self) -> Result<Report, ScanError> {
        info!(
            "Starting validation at {} with {} rules",
            self.root.display(),
            self.registry.len()
        );

        let mut collector = IssueCollector::new();
        let mut files_checked = 0;
        let mut skipped_files = Vec::new();

        let mut absorb = |outcome: FileOutcome| {
            files_checked += 1;
            match outcome {
                FileOutcome::Checked(local) => collector.absorb(local),
                FileOutcome::Unreadable(path) => skipped_files.push(path),
            }
        };

        if self.parallelism > 1 {
            let candidates = self.walker.walk().collect::<Result<Vec<_>, _>>()?;
            info!(
                "Found {} files, checking with {} workers",
                candidates.len(),
                self.parallelism
            );

            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(self.parallelism)
                .build()?;
            let outcomes: Vec<FileOutcome> = pool.install(|| {
                candidates
                    .par_iter()
                    .map(|candidate| self.check_candidate(candidate))
                    .collect()
            });
            outcomes.into_iter().for_each(&mut absorb);
        } else {
            for candidate in self.walker.walk() {
                let candidate = candidate?;
                absorb(self.check_candidate(&candidate));
            }
        }

        let report = ReportBuilder::new(&self.root)
            .session_id(self.session_id.clone())
            .files_checked(files_checked)
            .rules(&self.registry)
            .invalid_rules(self.invalid_rules.clone())
            .skipped_files(skipped_files)
            .build(collector);

        info!(
            "Validation complete: {} issues in {} files",
            report.summary.total, report.files_checked
        );

        Ok(report)
    }

    /// Reads one candidate and checks it into a fresh collector.
    ///
    /// A file that is not valid UTF-8 was still read: it fails its syntax
    /// rules and the pattern rules run over the lossily decoded text.
    fn check_candidate(&self, candidate: &Candidate) -> FileOutcome {
        debug!("Checking: {}", candidate.path.display());

        let bytes = match std::fs::read(&candidate.path) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("Failed to read {}: {}", candidate.path.display(), e);
                let relative = candidate
                    .path
                    .strip_prefix(&self.root)
                    .unwrap_or(&candidate.path);
                return FileOutcome::Unreadable(relative.to_path_buf());
            }
        };

        let mut sink = IssueCollector::new();
        match std::str::from_utf8(&bytes) {
            Ok(content) => {
                let file = SourceFile::new(&candidate.path, content, &self.root, candidate.kind);
                self.check_file(&file, &mut sink);
            }
            Err(e) => {
                debug!("Invalid UTF-8 in {}", candidate.path.display());
                let failure = SyntaxFailure::encoding(&bytes, e.valid_up_to());
                let content = String::from_utf8_lossy(&bytes);
                let file = SourceFile::new(&candidate.path, &content, &self.root, candidate.kind);
                self.apply(&file, &mut sink, &Err(failure));
            }
        }
        FileOutcome::Checked(sink)
    }

    /// Runs every applicable rule against one loaded file.
    ///
    /// Syntax rules run first; pattern rules run regardless of the syntax
    /// outcome; compilation rules follow the syntax outcome.
    pub fn check_file(&self, file: &SourceFile<'_>, sink: &mut IssueCollector) {
        let needs_syntax = self.registry.applicable(file.kind).any(|r| {
            matches!(r.kind, RuleKind::Syntax | RuleKind::Compilation)
        });
        let syntax = if needs_syntax {
            self.syntax.check(file.kind, file.content)
        } else {
            Ok(())
        };
        self.apply(file, sink, &syntax);
    }

    fn apply(
        &self,
        file: &SourceFile<'_>,
        sink: &mut IssueCollector,
        syntax: &Result<(), SyntaxFailure>,
    ) {
        for rule in self
            .registry
            .applicable(file.kind)
            .filter(|r| r.kind == RuleKind::Syntax)
        {
            match syntax {
                Ok(()) => sink.pass(&rule.id),
                Err(failure) => {
                    let (line, column) = failure.position();
                    let issue = Issue::new(
                        &rule.id,
                        rule.severity(),
                        file.point(line, column),
                        format!("{}: {failure}", rule.message),
                    )
                    .with_matched_text(failure.to_string())
                    .with_suggested_fix(rule.suggested_fix.clone());
                    sink.record(issue);
                }
            }
        }

        self.patterns.evaluate(file, sink);

        for rule in self
            .registry
            .applicable(file.kind)
            .filter(|r| r.kind == RuleKind::Compilation)
        {
            if syntax.is_ok() {
                sink.pass(&rule.id);
            } else {
                sink.fail(&rule.id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::Rule;
    use crate::types::FileKind;
    use std::fs;
    use tempfile::TempDir;

    fn registry() -> RuleRegistry {
        RuleRegistry::new(vec![
            Rule::new(
                "valid-structured-syntax",
                "Valid Go Syntax",
                RuleKind::Syntax,
                &[FileKind::Go],
                "Go syntax error",
            )
            .required(true),
            Rule::new(
                "source-builds",
                "Go Builds",
                RuleKind::Compilation,
                &[FileKind::Go],
                "Go file will not build",
            )
            .required(true),
        ])
        .unwrap()
    }

    #[test]
    fn builder_resolves_relative_root() {
        let validator = Validator::builder().root(".").build().unwrap();
        assert!(validator.root().is_absolute());
        assert!(validator.registry().is_empty());
    }

    #[test]
    fn invalid_exclude_glob_fails_build() {
        let err = Validator::builder().exclude("[oops").build().unwrap_err();
        assert!(matches!(err, ScanError::Glob(_)));
    }

    #[test]
    fn compilation_follows_syntax() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("ok.go"), "package main\n").unwrap();
        fs::write(tmp.path().join("bad.go"), "package main\nfunc (\n").unwrap();

        let report = Validator::builder()
            .root(tmp.path())
            .registry(registry())
            .build()
            .unwrap()
            .validate()
            .unwrap();

        assert_eq!(report.files_checked, 2);
        assert_eq!(report.issues.len(), 1);
        assert_eq!(report.issues[0].rule_id, "valid-structured-syntax");
        assert_eq!(
            report.failed_rule_ids,
            ["source-builds", "valid-structured-syntax"]
        );
        assert!(report.passed_rule_ids.is_empty());
    }

    #[test]
    fn syntax_is_skipped_without_syntax_rules() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("bad.go"), "this is not go").unwrap();

        let report = Validator::builder()
            .root(tmp.path())
            .build()
            .unwrap()
            .validate()
            .unwrap();
        assert_eq!(report.files_checked, 1);
        assert!(report.is_passing());
    }

    #[test]
    fn scan_config_keeps_explicit_root() {
        let scan = ScanConfig {
            root: PathBuf::from("/elsewhere"),
            parallelism: Some(3),
            ..ScanConfig::default()
        };
        let validator = Validator::builder()
            .root("/project")
            .scan_config(&scan)
            .build()
            .unwrap();
        assert_eq!(validator.root(), Path::new("/project"));
        assert_eq!(validator.parallelism, 3);
    }
}
