//! Plain-text renderer
//!
//! Pre-order walk over the tree with greedy word-wrap. Wrapping works on
//! atoms: plain text splits at whitespace, while a styled run, link,
//! verbatim span, or function expansion is one unbreakable atom. Adjacent
//! fragments with no whitespace between them in the source stay glued
//! (`''world''.` wraps as `world.`). Preformatted content bypasses
//! wrapping entirely.
//!
//! Each block kind applies its own indentation delta on top of the base
//! indent; trailing newlines are trimmed from the final result.

use wikidok_ast::Node;

use crate::error::Result;
use crate::registry::{FunctionCall, FunctionRegistry};
use crate::wikitext::RenderConfig;

pub(crate) struct TextRenderer<'a> {
    config: &'a RenderConfig,
    registry: &'a FunctionRegistry,
    out: String,
}

impl<'a> TextRenderer<'a> {
    pub(crate) fn new(config: &'a RenderConfig, registry: &'a FunctionRegistry) -> Self {
        Self {
            config,
            registry,
            out: String::new(),
        }
    }

    pub(crate) fn render(mut self, root: &Node) -> Result<String> {
        let children = root.children().unwrap_or(&[]);
        if !children.is_empty() && children.iter().all(|child| !child.is_block()) {
            // single-line interpretation: one wrapped run, no block framing
            let indent = self.config.indent;
            let atoms = self.atoms(children)?;
            self.wrap(&atoms, " ".repeat(indent), indent);
        } else {
            for child in children {
                self.block(child)?;
            }
        }
        Ok(self.out.trim_end().to_string())
    }

    fn block(&mut self, node: &Node) -> Result<()> {
        match node {
            Node::Section {
                number, children, ..
            } => {
                let indent = self.config.indent + self.config.title_indent;
                let mut atoms = Vec::new();
                if self.config.section_numbers {
                    if let Some(number) = number {
                        atoms.push(number.clone());
                    }
                }
                atoms.extend(self.atoms(children)?);
                self.wrap(&atoms, " ".repeat(indent), indent);
                self.out.push('\n');
            }
            Node::Paragraph(children) => {
                let indent = self.config.indent + self.config.par_indent;
                let atoms = self.atoms(children)?;
                self.wrap(&atoms, " ".repeat(indent), indent);
                self.out.push('\n');
            }
            Node::Preformatted(content) => {
                let indent = " ".repeat(self.config.indent + self.config.pre_indent);
                for line in content.lines() {
                    self.out.push_str(&indent);
                    self.out.push_str(line);
                    self.out.push('\n');
                }
                self.out.push('\n');
            }
            Node::HorizontalRule => {
                let indent = self.config.indent;
                let width = self.config.line_width.saturating_sub(indent).max(4);
                self.out.push_str(&" ".repeat(indent));
                self.out.push_str(&"-".repeat(width));
                self.out.push_str("\n\n");
            }
            Node::BulletList { .. } | Node::EnumList { .. } => {
                self.list(node)?;
                self.out.push('\n');
            }
            Node::FunctionRef { name, args, role } => {
                let call = FunctionCall {
                    name: name.clone(),
                    args: args.clone(),
                    role: *role,
                };
                let expansion = self.registry.require(name, *role)?.to_text(&call)?;
                self.out.push_str(expansion.trim_end());
                self.out.push_str("\n\n");
            }
            other => {
                let indent = self.config.indent;
                let atoms = self.atoms(std::slice::from_ref(other))?;
                self.wrap(&atoms, " ".repeat(indent), indent);
                self.out.push('\n');
            }
        }
        Ok(())
    }

    fn list(&mut self, node: &Node) -> Result<()> {
        match node {
            Node::BulletList { children, .. } => {
                for child in children {
                    match child {
                        Node::BulletItem { level, children } => self.item("* ", *level, children)?,
                        Node::BulletList { .. } | Node::EnumList { .. } => self.list(child)?,
                        _ => {}
                    }
                }
            }
            Node::EnumList { children, .. } => {
                let mut number = 0usize;
                for child in children {
                    match child {
                        Node::EnumItem { level, children } => {
                            number += 1;
                            let marker = format!("{}. ", number);
                            self.item(&marker, *level, children)?;
                        }
                        Node::BulletList { .. } | Node::EnumList { .. } => self.list(child)?,
                        _ => {}
                    }
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn item(&mut self, marker: &str, level: u8, children: &[Node]) -> Result<()> {
        let indent = self.config.indent + self.config.list_indent * usize::from(level - 1);
        let atoms = self.atoms(children)?;
        let first = format!("{}{}", " ".repeat(indent), marker);
        self.wrap(&atoms, first, indent + marker.chars().count());
        Ok(())
    }

    /// Flatten inline content into wrap atoms
    ///
    /// Fragments separated by whitespace in the source become separate
    /// atoms; fragments that touch stay glued into one atom.
    fn atoms(&self, nodes: &[Node]) -> Result<Vec<String>> {
        let mut atoms: Vec<String> = Vec::new();
        // whether the last atom may still be extended by a touching fragment
        let mut open = false;
        for node in nodes {
            if let Node::Text(text) = node {
                if text.is_empty() {
                    continue;
                }
                let starts_ws = text.starts_with(char::is_whitespace);
                let ends_ws = text.ends_with(char::is_whitespace);
                let mut first = true;
                for word in text.split_whitespace() {
                    if first && !starts_ws && open {
                        atoms.last_mut().unwrap().push_str(word);
                    } else {
                        atoms.push(word.to_string());
                    }
                    first = false;
                }
                open = if text.chars().all(char::is_whitespace) {
                    false
                } else {
                    !ends_ws
                };
                continue;
            }
            let fragment = match node {
                Node::Verbatim(content) => content.clone(),
                Node::FunctionRef { name, args, role } => {
                    let call = FunctionCall {
                        name: name.clone(),
                        args: args.clone(),
                        role: *role,
                    };
                    self.registry.require(name, *role)?.to_text(&call)?
                }
                other => other.plain_text(),
            };
            if fragment.is_empty() {
                continue;
            }
            if open {
                atoms.last_mut().unwrap().push_str(&fragment);
            } else {
                atoms.push(fragment);
            }
            open = true;
        }
        Ok(atoms)
    }

    /// Greedy wrap at the configured line width; an atom is never split
    fn wrap(&mut self, atoms: &[String], first_prefix: String, cont_indent: usize) {
        let width = self.config.line_width;
        let mut line = first_prefix;
        let mut len = line.chars().count();
        let mut bare = true;
        for atom in atoms.iter().filter(|atom| !atom.is_empty()) {
            let atom_len = atom.chars().count();
            if !bare && len + 1 + atom_len > width {
                self.flush_line(&line);
                line = " ".repeat(cont_indent);
                len = cont_indent;
                bare = true;
            }
            if !bare {
                line.push(' ');
                len += 1;
            }
            line.push_str(atom);
            len += atom_len;
            bare = false;
        }
        self.flush_line(&line);
    }

    fn flush_line(&mut self, line: &str) {
        self.out.push_str(line.trim_end());
        self.out.push('\n');
    }
}
