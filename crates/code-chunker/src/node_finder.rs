//! Generic search over the concrete syntax tree.
//!
//! Shared by every extractor. Traversal uses an explicit stack rather than
//! recursion so deeply nested syntax cannot exhaust the call stack.

use tree_sitter::Node;

/// Find all descendant nodes of a given kind, including the start node
///
/// Nodes are returned in depth-first pre-order, which matches document order
/// for non-overlapping declarations.
pub fn find_nodes_by_kind<'tree>(node: Node<'tree>, kind: &str) -> Vec<Node<'tree>> {
    let mut found = Vec::new();
    let mut stack = vec![node];

    while let Some(current) = stack.pop() {
        if current.kind() == kind {
            found.push(current);
        }

        let mut cursor = current.walk();
        let children: Vec<_> = current.children(&mut cursor).collect();
        // Reverse so the leftmost child is processed first (pre-order).
        for child in children.into_iter().rev() {
            stack.push(child);
        }
    }

    found
}

/// Find direct children of `root` matching one of `kinds`
///
/// Additionally unwraps one level of `export_statement` so that
/// `export function f() {}` yields the wrapped `function_declaration`.
pub fn find_top_level<'tree>(root: Node<'tree>, kinds: &[&str]) -> Vec<Node<'tree>> {
    let mut found = Vec::new();

    let mut cursor = root.walk();
    let children: Vec<_> = root.children(&mut cursor).collect();

    for child in children {
        if kinds.contains(&child.kind()) {
            found.push(child);
        } else if child.kind() == "export_statement" {
            let mut export_cursor = child.walk();
            for wrapped in child.children(&mut export_cursor) {
                if kinds.contains(&wrapped.kind()) {
                    found.push(wrapped);
                }
            }
        }
    }

    found
}

/// Text of a node: its byte slice decoded as UTF-8
#[must_use]
pub fn node_text(node: Node<'_>, source: &[u8]) -> String {
    String::from_utf8_lossy(&source[node.start_byte()..node.end_byte()]).into_owned()
}

/// Text of an optional node; absent node yields the empty string
#[must_use]
pub fn optional_node_text(node: Option<Node<'_>>, source: &[u8]) -> String {
    node.map(|n| node_text(n, source)).unwrap_or_default()
}
