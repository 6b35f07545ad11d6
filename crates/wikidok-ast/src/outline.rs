//! Structural queries over a parsed tree
//!
//! Both queries are pure pre-order walks returning freshly built vectors;
//! nothing is stored on the tree and the caller owns the result.

use serde::{Deserialize, Serialize};

use crate::node::Node;

/// One table-of-contents entry derived from a section heading
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TocEntry {
    /// The heading text, styles flattened away
    pub title: String,
    /// Generated anchor: file base name plus the section position
    pub anchor: String,
    /// Heading nesting level (1-3)
    pub level: u8,
}

/// Collect a table of contents for the tree
///
/// One entry per section heading, in document order, with nesting levels
/// preserved. Anchors combine `file_base` with the section number
/// (`manual_1_2` for section 1.2 of `manual`).
pub fn table_of_contents(root: &Node, file_base: &str) -> Vec<TocEntry> {
    let mut entries = Vec::new();
    let mut ordinal = 0usize;
    collect_toc(root, file_base, &mut ordinal, &mut entries);
    entries
}

fn collect_toc(node: &Node, file_base: &str, ordinal: &mut usize, entries: &mut Vec<TocEntry>) {
    if let Node::Section {
        level,
        number,
        children,
    } = node
    {
        *ordinal += 1;
        let title: String = children.iter().map(Node::plain_text).collect();
        let anchor = match number {
            Some(number) => format!("{}_{}", file_base, number.replace('.', "_")),
            None => format!("{}_{}", file_base, ordinal),
        };
        entries.push(TocEntry {
            title,
            anchor,
            level: *level,
        });
    }
    for child in node.children().unwrap_or(&[]) {
        collect_toc(child, file_base, ordinal, entries);
    }
}

/// Collect every plain internal-link target in the tree
///
/// Targets appear in first-occurrence order and duplicates are kept;
/// function references do not contribute. Target existence is the
/// caller's concern.
pub fn internal_references(root: &Node) -> Vec<String> {
    let mut targets = Vec::new();
    collect_refs(root, &mut targets);
    targets
}

fn collect_refs(node: &Node, targets: &mut Vec<String>) {
    if let Node::Link { target, .. } = node {
        targets.push(target.clone());
    }
    for child in node.children().unwrap_or(&[]) {
        collect_refs(child, targets);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::clean_up;

    #[test]
    fn test_toc_order_and_anchors() {
        let mut root = Node::Richtext(vec![
            Node::Section {
                level: 1,
                number: None,
                children: vec![Node::Text("Intro".to_string())],
            },
            Node::Section {
                level: 2,
                number: None,
                children: vec![Node::Text("Detail".to_string())],
            },
        ]);
        clean_up(&mut root, [0, 0, 0]);
        let toc = table_of_contents(&root, "manual");
        assert_eq!(toc.len(), 2);
        assert_eq!(toc[0].title, "Intro");
        assert_eq!(toc[0].anchor, "manual_1");
        assert_eq!(toc[0].level, 1);
        assert_eq!(toc[1].anchor, "manual_1_1");
        assert_eq!(toc[1].level, 2);
    }

    #[test]
    fn test_references_keep_duplicates_in_order() {
        let root = Node::Richtext(vec![Node::Paragraph(vec![
            Node::Link {
                target: "alpha".to_string(),
                label: None,
            },
            Node::Link {
                target: "beta".to_string(),
                label: Some("B".to_string()),
            },
            Node::Link {
                target: "alpha".to_string(),
                label: None,
            },
        ])]);
        assert_eq!(internal_references(&root), vec!["alpha", "beta", "alpha"]);
    }

    #[test]
    fn test_function_refs_are_not_references() {
        let root = Node::Richtext(vec![Node::Paragraph(vec![Node::FunctionRef {
            name: "query".to_string(),
            args: vec!["x".to_string()],
            role: crate::node::FunctionRole::Inline,
        }])]);
        assert!(internal_references(&root).is_empty());
    }
}
