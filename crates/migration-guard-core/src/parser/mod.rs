//! Strict parsers for structured-source files.
//!
//! `SourceParser` is the seam for plugging a real grammar into the
//! [`SyntaxChecker`](crate::SyntaxChecker). The engine ships a Tree-sitter
//! parser for Go.

mod go;

pub use go::GoParser;

/// First problem reported by a parser.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{line}:{column}: {message}")]
pub struct ParseDiagnostic {
    /// Line number (1-indexed).
    pub line: usize,
    /// Column (1-indexed byte offset within the line).
    pub column: usize,
    /// Parser message.
    pub message: String,
}

impl ParseDiagnostic {
    /// Creates a new diagnostic.
    #[must_use]
    pub fn new(line: usize, column: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            column,
            message: message.into(),
        }
    }
}

/// A strict, standards-conforming parser for one language.
pub trait SourceParser: Send + Sync {
    /// Language identifier (e.g., `"go"`).
    fn language_id(&self) -> &'static str;

    /// Parses the whole file.
    ///
    /// # Errors
    ///
    /// Returns the first problem found when the source does not parse.
    fn parse(&self, source: &str) -> Result<(), ParseDiagnostic>;
}
