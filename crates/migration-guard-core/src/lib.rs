//! # migration-guard-core
//!
//! Rule-based validation of a Go/templ source tree after an automated
//! component migration.
//!
//! This crate provides the engine:
//!
//! - [`RuleRegistry`] holding the immutable, typed [`Rule`]s of a run
//! - [`FileWalker`] for the pruned traversal of the project tree
//! - [`SyntaxChecker`] (Tree-sitter for Go, structural heuristics for templ)
//! - [`PatternEvaluator`] for forbidden patterns and required imports
//! - [`IssueCollector`] and [`ReportBuilder`] for bookkeeping and output
//! - [`Validator`] for orchestrating a scan
//!
//! ## Example
//!
//! ```ignore
//! use migration_guard_core::{RuleRegistry, Validator};
//!
//! let validator = Validator::builder()
//!     .root("./web")
//!     .registry(RuleRegistry::new(my_rules)?)
//!     .build()?;
//!
//! let report = validator.validate()?;
//! println!("{}", report.format_digest());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod collector;
mod config;
mod context;
mod pattern;
mod registry;
mod report;
mod rule;
mod syntax;
mod types;
mod validator;
mod walker;

pub mod parser;
pub mod template;

pub use collector::IssueCollector;
pub use config::{Config, ConfigError, RuleConfig, ScanConfig};
pub use context::SourceFile;
pub use pattern::{InvalidRule, PatternEvaluator};
pub use registry::{RegistryError, RuleRegistry};
pub use report::{Report, ReportBuilder, Summary};
pub use rule::{Rule, RuleKind};
pub use syntax::{SyntaxChecker, SyntaxFailure};
pub use types::{FileKind, Issue, IssueDiagnostic, Location, Severity};
pub use validator::{ScanError, Validator, ValidatorBuilder};
pub use walker::{Candidate, FileWalker, Walk, WalkError, DEFAULT_EXCLUDED_DIRS};
