//! Post-parse tree normalization
//!
//! A single bottom-up pass run once after parsing: it drops nodes with no
//! renderable content, merges adjacent plain-text siblings, and threads a
//! `SectionCounter` through the section headings in document order. The
//! pass is idempotent.

use crate::counter::SectionCounter;
use crate::node::Node;

/// Normalize a parsed tree in place
///
/// `seed` is the starting state for outline numbering, one integer per
/// heading depth.
pub fn clean_up(root: &mut Node, seed: [u32; 3]) {
    scrub(root);
    let mut counter = SectionCounter::new(seed);
    number(root, &mut counter);
}

/// Bottom-up structural cleanup: merge text runs, trim block edges, and
/// drop empty paragraphs and empty text nodes.
fn scrub(node: &mut Node) {
    let trims_edges = matches!(
        node,
        Node::Paragraph(_) | Node::Section { .. } | Node::BulletItem { .. } | Node::EnumItem { .. }
    );

    if let Some(children) = node.children_mut() {
        for child in children.iter_mut() {
            scrub(child);
        }
        merge_text(children);
        if trims_edges {
            trim_edges(children);
        }
        children.retain(|child| !discardable(child));
    }
}

/// Merge runs of adjacent plain-text siblings into single nodes
fn merge_text(children: &mut Vec<Node>) {
    let mut merged: Vec<Node> = Vec::with_capacity(children.len());
    for node in children.drain(..) {
        if let Node::Text(text) = &node {
            if let Some(Node::Text(prev)) = merged.last_mut() {
                prev.push_str(text);
                continue;
            }
        }
        merged.push(node);
    }
    *children = merged;
}

/// Strip leading whitespace from the first text child and trailing
/// whitespace from the last
fn trim_edges(children: &mut [Node]) {
    if let Some(Node::Text(text)) = children.first_mut() {
        *text = text.trim_start().to_string();
    }
    if let Some(Node::Text(text)) = children.last_mut() {
        *text = text.trim_end().to_string();
    }
}

fn discardable(node: &Node) -> bool {
    match node {
        Node::Text(text) => text.is_empty(),
        Node::Paragraph(children) => children.is_empty(),
        _ => false,
    }
}

/// Pre-order numbering walk over section nodes
fn number(node: &mut Node, counter: &mut SectionCounter) {
    if let Node::Section { level, number, .. } = node {
        counter.increment(*level);
        *number = Some(counter.dotted(*level));
    }
    if let Some(children) = node.children_mut() {
        for child in children {
            number(child, counter);
        }
    }
}
