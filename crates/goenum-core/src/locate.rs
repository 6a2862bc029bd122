use serde::Serialize;
use tree_sitter::{Node, Tree};

/// One single-name member of the matched declaration block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValueSpec {
    pub name: String,
    /// Trailing comment on the spec's line, with comment markers stripped.
    pub comment: Option<String>,
    /// 1-based line of the spec.
    pub line: usize,
}

/// Why no values came out of [`locate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Missing {
    /// No `const`/`var` declaration starts on the target line.
    NoDeclaration,
    /// The declaration was found but has no usable single-name specs.
    NoValues,
}

/// What the walker should do after visiting a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visit {
    Descend,
    SkipChildren,
    Stop,
}

/// Pre-order walk over `root` and its descendants.
pub fn walk<'t, F>(root: Node<'t>, mut visit: F)
where
    F: FnMut(Node<'t>) -> Visit,
{
    let mut cursor = root.walk();
    loop {
        let descend = match visit(cursor.node()) {
            Visit::Stop => return,
            Visit::Descend => true,
            Visit::SkipChildren => false,
        };
        if descend && cursor.goto_first_child() {
            continue;
        }
        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return;
            }
        }
    }
}

fn is_value_group(node: Node<'_>) -> bool {
    matches!(node.kind(), "const_declaration" | "var_declaration")
}

fn is_value_spec(node: Node<'_>) -> bool {
    matches!(node.kind(), "const_spec" | "var_spec")
}

/// Find the value-group declaration starting on `target_line` (1-based) and
/// return its single-name specs in declaration order.
///
/// Only the first declaration on that line is read; the walk stops as soon
/// as it has been collected.
pub fn locate(
    tree: &Tree,
    source: &str,
    target_line: usize,
) -> Result<Vec<ValueSpec>, Missing> {
    let mut found: Option<Vec<ValueSpec>> = None;

    walk(tree.root_node(), |node| {
        let first = node.start_position().row + 1;
        let last = node.end_position().row + 1;
        if target_line < first || target_line > last {
            return Visit::SkipChildren;
        }
        if !is_value_group(node) || first != target_line {
            return Visit::Descend;
        }
        found = Some(collect_specs(node, source));
        Visit::Stop
    });

    match found {
        None => Err(Missing::NoDeclaration),
        Some(specs) if specs.is_empty() => Err(Missing::NoValues),
        Some(specs) => Ok(specs),
    }
}

/// Read the specs of one declaration, stopping at the first clause that
/// declares more than one name.
fn collect_specs(decl: Node<'_>, source: &str) -> Vec<ValueSpec> {
    let mut spec_nodes = Vec::new();
    walk(decl, |node| {
        if is_value_spec(node) {
            spec_nodes.push(node);
            return Visit::SkipChildren;
        }
        Visit::Descend
    });
    let mut comments = Vec::new();
    walk(decl, |node| {
        if node.kind() == "comment" {
            comments.push(node);
        }
        Visit::Descend
    });
    // An ungrouped declaration's trailing comment is a sibling, not a child.
    let decl_end_row = decl.end_position().row;
    let mut sibling = decl.next_sibling();
    while let Some(node) = sibling {
        if node.start_position().row != decl_end_row {
            break;
        }
        if node.kind() == "comment" {
            comments.push(node);
        } else if node.is_named() {
            break;
        }
        sibling = node.next_sibling();
    }

    let mut specs = Vec::new();
    for (i, spec) in spec_nodes.iter().enumerate() {
        let mut cursor = spec.walk();
        let names: Vec<Node<'_>> = spec.children_by_field_name("name", &mut cursor).collect();
        let name = match names.as_slice() {
            [] => continue,
            [name] => node_text(*name, source),
            _ => {
                log::debug!(
                    "stopping at line {}: {} names in one clause",
                    spec.start_position().row + 1,
                    names.len()
                );
                break;
            }
        };
        if name == "_" {
            continue;
        }

        let (end_byte, end_row) = code_end(*spec);
        let next_start = spec_nodes.get(i + 1).map_or(usize::MAX, |n| n.start_byte());
        let trailing: Vec<String> = comments
            .iter()
            .filter(|c| {
                c.start_byte() >= end_byte
                    && c.start_byte() < next_start
                    && c.start_position().row == end_row
            })
            .map(|c| comment_text(node_text(*c, source)))
            .filter(|text| !text.is_empty())
            .collect();

        specs.push(ValueSpec {
            name: name.to_string(),
            comment: (!trailing.is_empty()).then(|| trailing.join(" ")),
            line: spec.start_position().row + 1,
        });
    }
    specs
}

/// End byte and row of the spec's last non-comment token.
fn code_end(spec: Node<'_>) -> (usize, usize) {
    let mut cursor = spec.walk();
    let last = spec.children(&mut cursor).filter(|c| !c.is_extra()).last();
    last.map_or((spec.end_byte(), spec.end_position().row), |c| {
        (c.end_byte(), c.end_position().row)
    })
}

fn node_text<'s>(node: Node<'_>, source: &'s str) -> &'s str {
    source.get(node.byte_range()).unwrap_or_default()
}

/// Strip `//` or `/* */` markers from a raw comment.
fn comment_text(raw: &str) -> String {
    let body = if let Some(line) = raw.strip_prefix("//") {
        line
    } else if let Some(block) = raw.strip_prefix("/*") {
        block.strip_suffix("*/").unwrap_or(block)
    } else {
        raw
    };
    body.split_whitespace().collect::<Vec<_>>().join(" ")
}
