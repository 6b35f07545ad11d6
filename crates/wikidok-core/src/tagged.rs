//! Tagged renderer
//!
//! Re-serializes a normalized tree back into canonical markup syntax.
//! Parsing the output again yields a structurally equivalent tree, which
//! makes this the round-trip check on the grammar and the way to re-emit
//! machine-produced markup.

use wikidok_ast::{Node, StyleKind};

use crate::error::Result;
use crate::registry::{FunctionCall, FunctionRegistry};

pub(crate) struct TaggedRenderer<'a> {
    registry: &'a FunctionRegistry,
}

impl<'a> TaggedRenderer<'a> {
    pub(crate) fn new(registry: &'a FunctionRegistry) -> Self {
        Self { registry }
    }

    pub(crate) fn render(&self, root: &Node) -> Result<String> {
        let children = root.children().unwrap_or(&[]);
        if children.is_empty() {
            return Ok(String::new());
        }
        if children.iter().all(|child| !child.is_block()) {
            return self.inline(children);
        }
        let mut blocks = Vec::new();
        for child in children {
            blocks.push(self.block(child)?);
        }
        Ok(blocks.join("\n\n"))
    }

    fn block(&self, node: &Node) -> Result<String> {
        match node {
            Node::Section {
                level, children, ..
            } => Ok(format!(
                "{} {}",
                "=".repeat(usize::from(*level)),
                self.inline(children)?
            )),
            Node::Paragraph(children) => self.inline(children),
            Node::Preformatted(content) => Ok(content
                .lines()
                .map(|line| format!(" {}", line))
                .collect::<Vec<_>>()
                .join("\n")),
            Node::HorizontalRule => Ok("----".to_string()),
            Node::BulletList { .. } | Node::EnumList { .. } => {
                let mut lines = Vec::new();
                self.list(node, &mut lines)?;
                Ok(lines.join("\n"))
            }
            Node::FunctionRef { name, args, role } => {
                let call = FunctionCall {
                    name: name.clone(),
                    args: args.clone(),
                    role: *role,
                };
                Ok(self.registry.require(name, *role)?.to_tagged(&call)?)
            }
            other => self.inline(std::slice::from_ref(other)),
        }
    }

    fn list(&self, node: &Node, lines: &mut Vec<String>) -> Result<()> {
        match node {
            Node::BulletList { children, .. } => {
                for child in children {
                    match child {
                        Node::BulletItem { level, children } => lines.push(format!(
                            "{} {}",
                            "*".repeat(usize::from(*level)),
                            self.inline(children)?
                        )),
                        Node::BulletList { .. } | Node::EnumList { .. } => {
                            self.list(child, lines)?;
                        }
                        _ => {}
                    }
                }
            }
            Node::EnumList { children, .. } => {
                for child in children {
                    match child {
                        Node::EnumItem { level, children } => lines.push(format!(
                            "{} {}",
                            "#".repeat(usize::from(*level)),
                            self.inline(children)?
                        )),
                        Node::BulletList { .. } | Node::EnumList { .. } => {
                            self.list(child, lines)?;
                        }
                        _ => {}
                    }
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn inline(&self, nodes: &[Node]) -> Result<String> {
        let mut out = String::new();
        for node in nodes {
            match node {
                Node::Text(text) => out.push_str(text),
                Node::Style { kind, children } => {
                    let marker = "'".repeat(match kind {
                        StyleKind::Italic => 2,
                        StyleKind::Bold => 3,
                        StyleKind::Monospace => 4,
                        StyleKind::BoldItalic => 5,
                    });
                    out.push_str(&marker);
                    out.push_str(&self.inline(children)?);
                    out.push_str(&marker);
                }
                Node::Link { target, label } => match label {
                    Some(label) => {
                        out.push_str("[[");
                        out.push_str(target);
                        out.push(' ');
                        out.push_str(label);
                        out.push_str("]]");
                    }
                    None => {
                        out.push_str("[[");
                        out.push_str(target);
                        out.push_str("]]");
                    }
                },
                Node::Verbatim(content) => {
                    out.push_str("<nowiki>");
                    out.push_str(content);
                    out.push_str("</nowiki>");
                }
                Node::FunctionRef { name, args, role } => {
                    let call = FunctionCall {
                        name: name.clone(),
                        args: args.clone(),
                        role: *role,
                    };
                    out.push_str(&self.registry.require(name, *role)?.to_tagged(&call)?);
                }
                other => out.push_str(&other.plain_text()),
            }
        }
        Ok(out)
    }
}
