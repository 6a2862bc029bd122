use std::path::Path;

use tree_sitter::{Node, Parser, Tree};

use crate::error::ParseError;

/// Parse Go source into a syntax tree.
///
/// tree-sitter recovers from bad input instead of failing, so a tree that
/// contains `ERROR` or `MISSING` nodes is turned into a [`ParseError`]
/// pointing at the first of them.
pub fn parse_go(path: &Path, source: &str) -> Result<Tree, ParseError> {
    let mut parser = Parser::new();
    parser.set_language(&tree_sitter_go::LANGUAGE.into())?;

    let tree = parser.parse(source, None).ok_or_else(|| ParseError::NoTree {
        path: path.to_path_buf(),
    })?;

    if let Some(node) = first_error(tree.root_node()) {
        let position = node.start_position();
        let message = if node.is_missing() {
            format!("syntax error: missing `{}`", node.kind())
        } else {
            let snippet = node
                .utf8_text(source.as_bytes())
                .unwrap_or_default()
                .lines()
                .next()
                .unwrap_or_default()
                .trim();
            format!("syntax error near `{snippet}`")
        };
        return Err(ParseError::Syntax {
            path: path.to_path_buf(),
            line: position.row + 1,
            column: position.column + 1,
            message,
        });
    }

    Ok(tree)
}

/// Depth-first search for the first error or missing node, only entering
/// subtrees that report an error.
fn first_error(node: Node<'_>) -> Option<Node<'_>> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }
    let mut cursor = node.walk();
    let children: Vec<Node<'_>> = node.children(&mut cursor).collect();
    children.into_iter().find_map(first_error)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_source() {
        let src = "package paint\n\nconst (\n\tRed = iota\n\tGreen\n)\n";
        let tree = parse_go(Path::new("paint.go"), src).unwrap();
        assert_eq!(tree.root_node().kind(), "source_file");
        assert!(!tree.root_node().has_error());
    }

    #[test]
    fn test_parse_unclosed_block() {
        let src = "package paint\n\nconst (\n\tRed = iota\n";
        let err = parse_go(Path::new("paint.go"), src).unwrap_err();
        match err {
            ParseError::Syntax { path, line, .. } => {
                assert_eq!(path, Path::new("paint.go"));
                assert!(line >= 3, "error reported on line {line}");
            }
            other => panic!("expected syntax error, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_error_message_names_file() {
        let src = "package paint\n\nfunc {\n";
        let err = parse_go(Path::new("dir/paint.go"), src).unwrap_err();
        assert!(err.to_string().starts_with("dir/paint.go:"));
    }
}
