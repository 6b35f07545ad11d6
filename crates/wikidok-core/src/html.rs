//! Element-tree renderer
//!
//! Pre-order walk producing a [`Element`](crate::element::Element) tree.
//! Sections become heading elements at `level + heading_base`; section
//! numbers are prefixed only when numbering is enabled. Internal links
//! resolve to anchors targeting `target.html`, or `file.html#sub` when the
//! target carries a sub-anchor, decorated with the configured link-target
//! and CSS-class attributes. Verbatim spans come out as literal text and
//! pick up escaping when the tree is serialized.

use wikidok_ast::{Node, StyleKind};

use crate::element::{Element, Markup};
use crate::error::Result;
use crate::registry::{FunctionCall, FunctionRegistry};
use crate::wikitext::RenderConfig;

pub(crate) struct HtmlRenderer<'a> {
    config: &'a RenderConfig,
    registry: &'a FunctionRegistry,
}

impl<'a> HtmlRenderer<'a> {
    pub(crate) fn new(config: &'a RenderConfig, registry: &'a FunctionRegistry) -> Self {
        Self { config, registry }
    }

    pub(crate) fn render(&self, root: &Node) -> Result<Element> {
        let mut container = Element::new("div");
        for child in root.children().unwrap_or(&[]) {
            container.push(self.node(child)?);
        }
        Ok(container)
    }

    fn node(&self, node: &Node) -> Result<Markup> {
        match node {
            Node::Richtext(children) => self.container("div", children),
            Node::Section {
                level,
                number,
                children,
            } => {
                let tag = format!("h{}", usize::from(*level) + self.config.heading_base);
                let mut heading = Element::new(tag);
                if self.config.section_numbers {
                    if let Some(number) = number {
                        heading.push(Markup::Text(format!("{} ", number)));
                    }
                }
                self.push_children(&mut heading, children)?;
                Ok(Markup::Element(heading))
            }
            Node::Paragraph(children) => self.container("p", children),
            Node::Preformatted(content) => {
                Ok(Markup::Element(Element::new("pre").text(content.as_str())))
            }
            Node::HorizontalRule => Ok(Markup::Element(Element::new("hr"))),
            Node::BulletList { children, .. } => self.container("ul", children),
            Node::EnumList { children, .. } => self.container("ol", children),
            Node::BulletItem { children, .. } | Node::EnumItem { children, .. } => {
                self.container("li", children)
            }
            Node::Text(text) => Ok(Markup::Text(text.clone())),
            Node::Verbatim(content) => Ok(Markup::Text(content.clone())),
            Node::Style { kind, children } => self.style(*kind, children),
            Node::Link { target, label } => Ok(self.link(target, label.as_deref())),
            Node::FunctionRef { name, args, role } => {
                let call = FunctionCall {
                    name: name.clone(),
                    args: args.clone(),
                    role: *role,
                };
                Ok(self.registry.require(name, *role)?.to_element(&call)?)
            }
        }
    }

    fn style(&self, kind: StyleKind, children: &[Node]) -> Result<Markup> {
        let tag = match kind {
            StyleKind::Italic => "em",
            StyleKind::Bold => "strong",
            StyleKind::Monospace => "code",
            StyleKind::BoldItalic => {
                let mut inner = Element::new("em");
                self.push_children(&mut inner, children)?;
                let mut outer = Element::new("strong");
                outer.push(Markup::Element(inner));
                return Ok(Markup::Element(outer));
            }
        };
        self.container(tag, children)
    }

    fn link(&self, target: &str, label: Option<&str>) -> Markup {
        let (file, fragment) = match target.split_once('#') {
            Some((file, fragment)) => (file, Some(fragment)),
            None => (target, None),
        };
        let href = match fragment {
            Some(fragment) => format!("{}.html#{}", file, fragment),
            None => format!("{}.html", file),
        };
        let mut anchor = Element::new("a").attr("href", href);
        if let Some(class) = &self.config.css_class {
            anchor = anchor.attr("class", class.as_str());
        }
        if let Some(window) = &self.config.link_target {
            anchor = anchor.attr("target", window.as_str());
        }
        Markup::Element(anchor.text(label.unwrap_or(target)))
    }

    fn container(&self, tag: &str, children: &[Node]) -> Result<Markup> {
        let mut element = Element::new(tag);
        self.push_children(&mut element, children)?;
        Ok(Markup::Element(element))
    }

    fn push_children(&self, element: &mut Element, children: &[Node]) -> Result<()> {
        for child in children {
            element.push(self.node(child)?);
        }
        Ok(())
    }
}
