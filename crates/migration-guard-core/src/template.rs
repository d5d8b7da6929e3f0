//! Structural checks for templ files.
//!
//! There is no grammar for templates here, so two approximate heuristics
//! run in sequence: brace balance, then the shape of component
//! declarations. Both can miss real errors (braces inside string literals
//! are counted, nested parentheses in parameter lists are not understood).
//! Their failures are reported as heuristic findings, never as parser
//! diagnostics.

use std::fmt;

const KEYWORD: &str = "templ";

/// A structural problem found in a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    /// A `}` with no matching `{`.
    UnbalancedClosing {
        /// Line of the brace (1-indexed).
        line: usize,
        /// Column of the brace (1-indexed).
        column: usize,
    },
    /// Input ended with `{` left open.
    UnbalancedOpening {
        /// Number of unclosed braces.
        unclosed: usize,
        /// Line of the outermost unclosed brace.
        line: usize,
        /// Column of the outermost unclosed brace.
        column: usize,
    },
    /// A `templ` declaration line exists but none is well formed.
    InvalidDeclaration {
        /// Line of the first declaration marker.
        line: usize,
    },
}

impl TemplateError {
    /// Position to report, as `(line, column)`.
    #[must_use]
    pub fn position(&self) -> (usize, usize) {
        match *self {
            Self::UnbalancedClosing { line, column }
            | Self::UnbalancedOpening { line, column, .. } => (line, column),
            Self::InvalidDeclaration { line } => (line, 1),
        }
    }
}

impl fmt::Display for TemplateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnbalancedClosing { line, column } => {
                write!(f, "unbalanced closing brace at {line}:{column}")
            }
            Self::UnbalancedOpening {
                unclosed,
                line,
                column,
            } => write!(
                f,
                "unbalanced opening brace: {unclosed} unclosed, first opened at {line}:{column}"
            ),
            Self::InvalidDeclaration { line } => {
                write!(f, "invalid component declaration at line {line}")
            }
        }
    }
}

impl std::error::Error for TemplateError {}

/// Runs both heuristics; the first failure wins.
///
/// # Errors
///
/// Returns the first structural problem found.
pub fn check(content: &str) -> Result<(), TemplateError> {
    check_braces(content)?;
    check_declarations(content)
}

/// Counts `{` and `}` character by character.
///
/// # Errors
///
/// Fails as soon as a closing brace has no partner, or at end of input
/// when braces remain open.
pub fn check_braces(content: &str) -> Result<(), TemplateError> {
    let mut open: Vec<(usize, usize)> = Vec::new();
    let (mut line, mut column) = (1, 1);

    for c in content.chars() {
        match c {
            '{' => open.push((line, column)),
            '}' => {
                if open.pop().is_none() {
                    return Err(TemplateError::UnbalancedClosing { line, column });
                }
            }
            _ => {}
        }

        if c == '\n' {
            line += 1;
            column = 1;
        } else {
            column += 1;
        }
    }

    match open.first() {
        None => Ok(()),
        Some(&(line, column)) => Err(TemplateError::UnbalancedOpening {
            unclosed: open.len(),
            line,
            column,
        }),
    }
}

/// When a line opens with the `templ` keyword, at least one marker must
/// start a well-formed declaration: `templ Name(params) {`, optionally with
/// a method receiver before the name. The parameter list and the opening
/// brace may continue on the following lines.
///
/// # Errors
///
/// Returns [`TemplateError::InvalidDeclaration`] at the first marker line
/// when no line matches.
pub fn check_declarations(content: &str) -> Result<(), TemplateError> {
    let mut first_marker = None;
    let mut offset = 0;

    for (i, line) in content.split_inclusive('\n').enumerate() {
        let start = offset;
        offset += line.len();
        if !is_marker(line) {
            continue;
        }
        if matches_declaration(&content[start..]) {
            return Ok(());
        }
        first_marker.get_or_insert(i + 1);
    }

    match first_marker {
        None => Ok(()),
        Some(line) => Err(TemplateError::InvalidDeclaration { line }),
    }
}

fn strip_keyword(line: &str) -> Option<&str> {
    line.trim_start()
        .strip_prefix(KEYWORD)
        .filter(|rest| rest.starts_with(char::is_whitespace))
}

fn is_marker(line: &str) -> bool {
    strip_keyword(line).is_some()
}

/// Matches a declaration starting at `source`, which may span lines.
fn matches_declaration(source: &str) -> bool {
    let Some(rest) = strip_keyword(source) else {
        return false;
    };
    let mut rest = rest.trim_start();

    // Method receiver: templ (c Card) Render() {
    if rest.starts_with('(') {
        let Some(end) = rest.find(')') else {
            return false;
        };
        rest = rest[end + 1..].trim_start();
    }

    if !rest.starts_with(|c: char| c.is_alphabetic() || c == '_') {
        return false;
    }
    let ident_end = rest
        .find(|c: char| !(c.is_alphanumeric() || c == '_'))
        .unwrap_or(rest.len());

    let Some(params) = rest[ident_end..].trim_start().strip_prefix('(') else {
        return false;
    };
    let Some(end) = params.find(')') else {
        return false;
    };
    params[end + 1..].trim_start().starts_with('{')
}
