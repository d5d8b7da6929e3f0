//! Go parser using Tree-sitter.

use tree_sitter::{Language, Node, Parser};

use super::{ParseDiagnostic, SourceParser};

const SNIPPET_MAX: usize = 40;

const TOP_LEVEL_DECLARATIONS: &[&str] = &[
    "import_declaration",
    "function_declaration",
    "method_declaration",
    "const_declaration",
    "var_declaration",
    "type_declaration",
];

/// Parses Go source and reports the first syntax error.
///
/// Tree-sitter recovers from errors, so the tree is searched for the first
/// `ERROR` or `MISSING` node. A file must also open with a package clause.
pub struct GoParser {
    language: Language,
}

impl Default for GoParser {
    fn default() -> Self {
        Self::new()
    }
}

impl GoParser {
    /// Creates a new Go parser.
    #[must_use]
    pub fn new() -> Self {
        Self {
            language: tree_sitter_go::LANGUAGE.into(),
        }
    }

    fn text<'a>(node: &Node<'_>, src: &'a [u8]) -> &'a str {
        std::str::from_utf8(&src[node.start_byte()..node.end_byte()]).unwrap_or("")
    }

    fn snippet(text: &str) -> String {
        let first_line = text.lines().next().unwrap_or("").trim();
        first_line.chars().take(SNIPPET_MAX).collect()
    }

    fn at(node: &Node<'_>, message: String) -> ParseDiagnostic {
        let pos = node.start_position();
        ParseDiagnostic::new(pos.row + 1, pos.column + 1, message)
    }

    /// Depth-first search for the first error or missing node.
    fn first_error<'t>(node: Node<'t>) -> Option<Node<'t>> {
        if node.is_error() || node.is_missing() {
            return Some(node);
        }
        if !node.has_error() {
            return None;
        }
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            if let Some(found) = Self::first_error(child) {
                return Some(found);
            }
        }
        None
    }

    fn describe_error(node: &Node<'_>, src: &[u8]) -> ParseDiagnostic {
        if node.is_missing() {
            return Self::at(node, format!("expected '{}'", node.kind()));
        }
        let found = Self::snippet(Self::text(node, src));
        if found.is_empty() {
            Self::at(node, "unexpected end of input".to_string())
        } else {
            Self::at(node, format!("unexpected '{found}'"))
        }
    }

    /// Go only allows declarations at the top level, after one package
    /// clause, with every import ahead of the other declarations.
    fn check_top_level(root: &Node<'_>, src: &[u8]) -> Result<(), ParseDiagnostic> {
        let mut cursor = root.walk();
        let mut seen_package = false;
        let mut seen_non_import = false;

        for node in root.named_children(&mut cursor) {
            match (node.kind(), seen_package) {
                ("comment", _) => {}
                ("package_clause", false) => seen_package = true,
                (_, false) => {
                    return Err(Self::at(
                        &node,
                        format!(
                            "expected 'package', found '{}'",
                            Self::snippet(Self::text(&node, src))
                        ),
                    ))
                }
                ("import_declaration", true) if seen_non_import => {
                    return Err(Self::at(
                        &node,
                        "imports must appear before other declarations".to_string(),
                    ))
                }
                ("import_declaration", true) => {}
                (kind, true) if TOP_LEVEL_DECLARATIONS.contains(&kind) => seen_non_import = true,
                (_, true) => {
                    return Err(Self::at(
                        &node,
                        format!(
                            "non-declaration statement outside function body: '{}'",
                            Self::snippet(Self::text(&node, src))
                        ),
                    ))
                }
            }
        }

        if seen_package {
            Ok(())
        } else {
            Err(ParseDiagnostic::new(1, 1, "expected 'package', found 'EOF'"))
        }
    }
}

impl SourceParser for GoParser {
    fn language_id(&self) -> &'static str {
        "go"
    }

    fn parse(&self, source: &str) -> Result<(), ParseDiagnostic> {
        let mut parser = Parser::new();
        parser
            .set_language(&self.language)
            .map_err(|e| ParseDiagnostic::new(1, 1, format!("Go grammar unavailable: {e}")))?;

        let tree = parser
            .parse(source, None)
            .ok_or_else(|| ParseDiagnostic::new(1, 1, "parser produced no syntax tree"))?;

        let root = tree.root_node();
        let src = source.as_bytes();

        if let Some(node) = Self::first_error(root) {
            return Err(Self::describe_error(&node, src));
        }

        Self::check_top_level(&root, src)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(src: &str) -> Result<(), ParseDiagnostic> {
        GoParser::new().parse(src)
    }

    #[test]
    fn accepts_valid_file() {
        let src = r#"package main

import "fmt"

// main prints a greeting.
func main() {
	name := "world"
	fmt.Println("hello", name)
}
"#;
        assert_eq!(parse(src), Ok(()));
    }

    #[test]
    fn rejects_unterminated_expression() {
        let src = "package main\n\nfunc main() {\n\tx := (1 +\n}\n";
        assert!(parse(src).is_err());
    }

    #[test]
    fn rejects_unclosed_function_body() {
        let src = "package main\n\nfunc main() {\n\tprintln(\"hi\")\n";
        assert!(parse(src).is_err());
    }

    #[test]
    fn requires_package_clause() {
        let diag = parse("func main() {}\n").unwrap_err();
        assert!(diag.message.contains("expected 'package'"), "{diag}");
    }

    #[test]
    fn rejects_statement_at_top_level() {
        let diag = parse("package main\n\nx := 1\n").unwrap_err();
        assert_eq!(diag.line, 3);
        assert!(diag.message.contains("outside function body"), "{diag}");
    }

    #[test]
    fn rejects_import_after_declaration() {
        let diag = parse("package main\n\nfunc main() {}\n\nimport \"fmt\"\n").unwrap_err();
        assert_eq!((diag.line, diag.column), (5, 1));
        assert!(diag.message.contains("imports must appear before"), "{diag}");
    }

    #[test]
    fn accepts_several_import_declarations_up_front() {
        let src = "package main\n\nimport \"fmt\"\nimport \"os\"\n\nvar _ = os.Args\n\nfunc main() { fmt.Println() }\n";
        assert_eq!(parse(src), Ok(()));
    }

    #[test]
    fn rejects_second_package_clause() {
        assert!(parse("package a\npackage b\n").is_err());
    }

    #[test]
    fn empty_file_has_no_package() {
        let diag = parse("").unwrap_err();
        assert_eq!(diag.to_string(), "1:1: expected 'package', found 'EOF'");
    }

    #[test]
    fn leading_comments_are_allowed() {
        let src = "// Package views renders pages.\npackage views\n";
        assert_eq!(parse(src), Ok(()));
    }
}
