//! Per-file context handed to the checkers.

use crate::types::{FileKind, Location};
use std::path::{Path, PathBuf};

/// A candidate file with its content loaded.
#[derive(Debug, Clone)]
pub struct SourceFile<'a> {
    /// Absolute path to the file.
    pub path: &'a Path,
    /// Path relative to the scanned root.
    pub relative_path: PathBuf,
    /// Classified file kind.
    pub kind: FileKind,
    /// File contents.
    pub content: &'a str,
}

impl<'a> SourceFile<'a> {
    /// Creates a new file context.
    #[must_use]
    pub fn new(path: &'a Path, content: &'a str, root: &Path, kind: FileKind) -> Self {
        let relative_path = path
            .strip_prefix(root)
            .map_or_else(|_| path.to_path_buf(), Path::to_path_buf);

        Self {
            path,
            relative_path,
            kind,
            content,
        }
    }

    /// Iterates over `(line_number, byte_offset_of_line_start, line)`.
    ///
    /// Lines are split on `\n` only, so offsets stay exact.
    pub fn lines(&self) -> impl Iterator<Item = (usize, usize, &'a str)> {
        let mut offset = 0;
        self.content
            .split('\n')
            .enumerate()
            .map(move |(i, line)| {
                let start = offset;
                offset += line.len() + 1;
                (i + 1, start, line)
            })
    }

    /// Location at the given line and column, without a span.
    #[must_use]
    pub fn location(&self, line: usize, column: usize) -> Location {
        Location::new(self.relative_path.clone(), line, column)
    }

    /// Location at the given line and column, spanning the character there.
    ///
    /// Positions past the end of a line or of the file get an empty span.
    #[must_use]
    pub fn point(&self, line: usize, column: usize) -> Location {
        let span = self
            .lines()
            .find(|(n, _, _)| *n == line)
            .and_then(|(_, start, text)| {
                text.char_indices()
                    .nth(column.saturating_sub(1))
                    .map(|(i, c)| (start + i, c.len_utf8()))
            });

        let location = self.location(line, column);
        match span {
            Some((offset, length)) => location.with_span(offset, length),
            None => location,
        }
    }

    /// Location of a byte range, with line and column computed from the offset.
    #[must_use]
    pub fn locate(&self, offset: usize, length: usize) -> Location {
        let offset = offset.min(self.content.len());
        let before = self.content.get(..offset).unwrap_or(self.content);
        let line = before.matches('\n').count() + 1;
        let line_start = before.rfind('\n').map_or(0, |i| i + 1);
        let column = before[line_start..].chars().count() + 1;

        self.location(line, column).with_span(offset, length)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(content: &str) -> SourceFile<'_> {
        SourceFile {
            path: Path::new("/project/views/page.templ"),
            relative_path: PathBuf::from("views/page.templ"),
            kind: FileKind::Templ,
            content,
        }
    }

    #[test]
    fn relative_path_strips_root() {
        let ctx = SourceFile::new(
            Path::new("/project/views/page.templ"),
            "",
            Path::new("/project"),
            FileKind::Templ,
        );
        assert_eq!(ctx.relative_path, PathBuf::from("views/page.templ"));
    }

    #[test]
    fn relative_path_falls_back_to_full_path() {
        let ctx = SourceFile::new(
            Path::new("/elsewhere/main.go"),
            "",
            Path::new("/project"),
            FileKind::Go,
        );
        assert_eq!(ctx.relative_path, PathBuf::from("/elsewhere/main.go"));
    }

    #[test]
    fn lines_report_start_offsets() {
        let ctx = file("ab\ncde\n\nf");
        let lines: Vec<_> = ctx.lines().collect();
        assert_eq!(
            lines,
            vec![(1, 0, "ab"), (2, 3, "cde"), (3, 7, ""), (4, 8, "f")]
        );
    }

    #[test]
    fn locate_computes_line_and_column() {
        let ctx = file("line1\nline2\nline3");
        let loc = ctx.locate(8, 2);
        assert_eq!((loc.line, loc.column), (2, 3));
        assert_eq!((loc.offset, loc.length), (8, 2));

        let start = ctx.locate(0, 0);
        assert_eq!((start.line, start.column), (1, 1));
    }

    #[test]
    fn point_spans_one_character() {
        let ctx = file("ab\n\té}\n");
        let loc = ctx.point(2, 3);
        assert_eq!((loc.line, loc.column), (2, 3));
        assert_eq!((loc.offset, loc.length), (6, 1));

        let past_end = ctx.point(9, 1);
        assert_eq!((past_end.offset, past_end.length), (0, 0));
    }

    #[test]
    fn locate_counts_characters_not_bytes() {
        let ctx = file("é{");
        let loc = ctx.locate(2, 1);
        assert_eq!((loc.line, loc.column), (1, 2));
    }
}
