//! Syntax checking, dispatched on file kind.

use crate::parser::{GoParser, ParseDiagnostic, SourceParser};
use crate::template::{self, TemplateError};
use crate::types::FileKind;

/// Why a file failed its syntax check.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SyntaxFailure {
    /// The strict parser rejected a structured-source file.
    #[error("{0}")]
    Parse(ParseDiagnostic),
    /// A template failed a structural heuristic.
    #[error("{0}")]
    Template(TemplateError),
    /// The file is not valid UTF-8.
    #[error("{line}:{column}: illegal UTF-8 encoding")]
    Encoding {
        /// Line of the first invalid byte (1-indexed).
        line: usize,
        /// Byte column of the first invalid byte (1-indexed).
        column: usize,
    },
}

impl SyntaxFailure {
    /// Position the issue is reported at, as `(line, column)`.
    ///
    /// Parser failures are reported at the top of the file with the
    /// parser's own position in the message; template heuristics point at
    /// the first inconsistency they found.
    #[must_use]
    pub fn position(&self) -> (usize, usize) {
        match self {
            Self::Parse(_) | Self::Encoding { .. } => (1, 1),
            Self::Template(err) => err.position(),
        }
    }

    /// Builds the encoding failure for `bytes`, whose first `valid_up_to`
    /// bytes are valid UTF-8.
    #[must_use]
    pub fn encoding(bytes: &[u8], valid_up_to: usize) -> Self {
        let valid = &bytes[..valid_up_to.min(bytes.len())];
        let line = valid.iter().filter(|&&b| b == b'\n').count() + 1;
        let line_start = valid
            .iter()
            .rposition(|&b| b == b'\n')
            .map_or(0, |i| i + 1);
        Self::Encoding {
            line,
            column: valid.len() - line_start + 1,
        }
    }
}

/// Validates file syntax: a real parser for Go, heuristics for templ.
pub struct SyntaxChecker {
    parser: Box<dyn SourceParser>,
}

impl Default for SyntaxChecker {
    fn default() -> Self {
        Self::new(Box::new(GoParser::new()))
    }
}

impl SyntaxChecker {
    /// Creates a checker using `parser` for structured-source files.
    #[must_use]
    pub fn new(parser: Box<dyn SourceParser>) -> Self {
        Self { parser }
    }

    /// Checks one file.
    ///
    /// # Errors
    ///
    /// Returns the first syntax problem in the file.
    pub fn check(&self, kind: FileKind, content: &str) -> Result<(), SyntaxFailure> {
        match kind {
            FileKind::Go => self.parser.parse(content).map_err(SyntaxFailure::Parse),
            FileKind::Templ => template::check(content).map_err(SyntaxFailure::Template),
        }
    }
}

impl std::fmt::Debug for SyntaxChecker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyntaxChecker")
            .field("parser", &self.parser.language_id())
            .finish()
    }
}
