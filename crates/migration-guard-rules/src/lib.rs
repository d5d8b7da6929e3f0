//! # migration-guard-rules
//!
//! Built-in validation rules for migration-guard.
//!
//! The rules check a Go/templ tree after components moved from per-file
//! import paths to the `atoms`/`molecules` namespaces and to props structs.
//!
//! ## Available Rules
//!
//! | ID | Kind | Required | Applies to |
//! |----|------|----------|------------|
//! | `valid-structured-syntax` | syntax | yes | go |
//! | `valid-template-syntax` | syntax | yes | templ |
//! | `no-legacy-import-path` | pattern | yes | go, templ |
//! | `namespace-import-present` | import | yes | templ |
//! | `molecules-import-present` | import | yes | templ |
//! | `button-props-struct` | pattern | yes | templ |
//! | `form-field-props-struct` | pattern | yes | templ |
//! | `input-props-struct` | pattern | yes | templ |
//! | `no-dynamic-theme-lookup` | pattern | yes | go, templ |
//! | `no-hardcoded-color-class` | pattern | no | templ |
//! | `htmx-via-props` | pattern | no | templ |
//! | `alpine-via-props` | pattern | no | templ |
//! | `template-generates` | compilation | yes | templ |
//! | `source-builds` | compilation | yes | go |
//!
//! ## Usage
//!
//! ```ignore
//! use migration_guard_core::{RuleRegistry, Validator};
//! use migration_guard_rules::Preset;
//!
//! let validator = Validator::builder()
//!     .root("./web")
//!     .registry(RuleRegistry::new(Preset::Recommended.rules())?)
//!     .build()?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod builtin;
mod presets;

pub use builtin::{builtin_rules, default_registry};
pub use presets::{minimal_rules, recommended_rules, strict_rules, Preset};

/// Re-export core types for convenience.
pub use migration_guard_core::{Rule, RuleKind, RuleRegistry, Severity};
