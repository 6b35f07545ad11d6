//! Tree node definitions for parsed wiki markup
//!
//! This module defines the node types that make up a parsed document tree.
//! Block-level nodes (sections, paragraphs, lists) and inline-level nodes
//! (text, style runs, links) share one enum because they mix freely under
//! a single root in document order.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A node in the parsed document tree
///
/// Children always preserve source order. Traversals are recursive walks;
/// nodes do not store parent links.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Node {
    /// The document root; present even for empty input
    Richtext(Vec<Node>),
    /// A section heading (level 1-3), numbered by the normalization pass
    Section {
        level: u8,
        number: Option<String>,
        children: Vec<Node>,
    },
    /// A paragraph of inline content
    Paragraph(Vec<Node>),
    /// Preformatted text, emitted verbatim by every renderer
    Preformatted(String),
    /// A horizontal rule
    HorizontalRule,
    /// An unordered list at a nesting level (1-3)
    BulletList { level: u8, children: Vec<Node> },
    /// A single unordered list item
    BulletItem { level: u8, children: Vec<Node> },
    /// An ordered list at a nesting level (1-3)
    EnumList { level: u8, children: Vec<Node> },
    /// A single ordered list item; its number derives from item order
    EnumItem { level: u8, children: Vec<Node> },
    /// Plain text content
    Text(String),
    /// A styled inline run (italic, bold, monospace, bold italic)
    Style { kind: StyleKind, children: Vec<Node> },
    /// An internal link with an optional label
    Link { target: String, label: Option<String> },
    /// A reference dispatched to a registered function handler at render time
    FunctionRef {
        name: String,
        args: Vec<String>,
        role: FunctionRole,
    },
    /// An inline verbatim span, emitted unchanged by every renderer
    Verbatim(String),
}

/// Inline style variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StyleKind {
    Italic,
    Bold,
    Monospace,
    BoldItalic,
}

/// Where a function reference appears, and therefore which handler serves it
///
/// A reference that forms a block of its own uses the `Block` role; a
/// reference inside running text uses the `Inline` role. Handlers are
/// registered per role, and lookup is an exact `(name, role)` match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FunctionRole {
    Block,
    Inline,
}

impl fmt::Display for FunctionRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FunctionRole::Block => f.write_str("block"),
            FunctionRole::Inline => f.write_str("inline"),
        }
    }
}

impl Node {
    /// Borrow the ordered children of this node, if it has any
    pub fn children(&self) -> Option<&[Node]> {
        match self {
            Node::Richtext(children) | Node::Paragraph(children) => Some(children),
            Node::Section { children, .. }
            | Node::BulletList { children, .. }
            | Node::BulletItem { children, .. }
            | Node::EnumList { children, .. }
            | Node::EnumItem { children, .. }
            | Node::Style { children, .. } => Some(children),
            _ => None,
        }
    }

    /// Mutably borrow the ordered children of this node, if it has any
    pub fn children_mut(&mut self) -> Option<&mut Vec<Node>> {
        match self {
            Node::Richtext(children) | Node::Paragraph(children) => Some(children),
            Node::Section { children, .. }
            | Node::BulletList { children, .. }
            | Node::BulletItem { children, .. }
            | Node::EnumList { children, .. }
            | Node::EnumItem { children, .. }
            | Node::Style { children, .. } => Some(children),
            _ => None,
        }
    }

    /// Whether this node is block-level content
    pub fn is_block(&self) -> bool {
        match self {
            Node::Section { .. }
            | Node::Paragraph(_)
            | Node::Preformatted(_)
            | Node::HorizontalRule
            | Node::BulletList { .. }
            | Node::EnumList { .. } => true,
            Node::FunctionRef { role, .. } => *role == FunctionRole::Block,
            _ => false,
        }
    }

    /// Whether this node has no children (true for childless leaf nodes)
    pub fn is_empty(&self) -> bool {
        self.children().map_or(true, |children| children.is_empty())
    }

    /// Flatten this subtree into its unstyled text content
    ///
    /// Style markers are dropped, links contribute their label (or target),
    /// and function references contribute nothing.
    pub fn plain_text(&self) -> String {
        match self {
            Node::Text(text) | Node::Verbatim(text) | Node::Preformatted(text) => text.clone(),
            Node::Link { target, label } => label.clone().unwrap_or_else(|| target.clone()),
            Node::FunctionRef { .. } | Node::HorizontalRule => String::new(),
            _ => self
                .children()
                .unwrap_or(&[])
                .iter()
                .map(Node::plain_text)
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_root() {
        let root = Node::Richtext(Vec::new());
        assert!(root.is_empty());
        assert_eq!(root.children(), Some(&[][..]));
    }

    #[test]
    fn test_plain_text_flattens_styles() {
        let node = Node::Paragraph(vec![
            Node::Text("Hello ".to_string()),
            Node::Style {
                kind: StyleKind::Bold,
                children: vec![Node::Text("world".to_string())],
            },
        ]);
        assert_eq!(node.plain_text(), "Hello world");
    }

    #[test]
    fn test_plain_text_prefers_link_label() {
        let labeled = Node::Link {
            target: "foo".to_string(),
            label: Some("Bar".to_string()),
        };
        let bare = Node::Link {
            target: "foo".to_string(),
            label: None,
        };
        assert_eq!(labeled.plain_text(), "Bar");
        assert_eq!(bare.plain_text(), "foo");
    }

    #[test]
    fn test_block_classification() {
        assert!(Node::HorizontalRule.is_block());
        assert!(!Node::Text("x".to_string()).is_block());
        let block_ref = Node::FunctionRef {
            name: "toc".to_string(),
            args: vec![],
            role: FunctionRole::Block,
        };
        let inline_ref = Node::FunctionRef {
            name: "query".to_string(),
            args: vec![],
            role: FunctionRole::Inline,
        };
        assert!(block_ref.is_block());
        assert!(!inline_ref.is_block());
    }

    #[test]
    fn test_serde_round_trip() {
        let node = Node::Section {
            level: 2,
            number: Some("1.2".to_string()),
            children: vec![Node::Text("Title".to_string())],
        };
        let json = serde_json::to_string(&node).unwrap();
        let back: Node = serde_json::from_str(&json).unwrap();
        assert_eq!(back, node);
    }
}
