//! Per-document facade
//!
//! A [`WikiText`] pairs one parsed, normalized tree with its rendering
//! configuration and function-handler registry. The tree is built once per
//! parse, owned exclusively by its facade, and discarded with it.

use wikidok_ast::{clean_up, internal_references, table_of_contents, Node, TocEntry};

use crate::element::Element;
use crate::error::Result;
use crate::html::HtmlRenderer;
use crate::parser::{Binding, Parser, TokenSet};
use crate::registry::FunctionRegistry;
use crate::tagged::TaggedRenderer;
use crate::text::TextRenderer;

/// Rendering configuration for one document
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Block interpretation when true; single-line interpretation when false
    pub block_mode: bool,
    /// Whether headings carry outline numbers in rendered output
    pub section_numbers: bool,
    /// Wrap width for the plain-text renderer
    pub line_width: usize,
    /// Base indentation applied to every block
    pub indent: usize,
    /// Extra indentation for headings
    pub title_indent: usize,
    /// Extra indentation for paragraphs
    pub par_indent: usize,
    /// Extra indentation per list nesting level
    pub list_indent: usize,
    /// Extra indentation for preformatted blocks
    pub pre_indent: usize,
    /// Offset added to heading levels in element output
    pub heading_base: usize,
    /// `target` attribute for generated anchors, if any
    pub link_target: Option<String>,
    /// `class` attribute for generated anchors, if any
    pub css_class: Option<String>,
    /// Initial outline-counter state, one integer per heading depth
    pub section_seed: [u32; 3],
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            block_mode: true,
            section_numbers: true,
            line_width: 80,
            indent: 0,
            title_indent: 0,
            par_indent: 0,
            list_indent: 2,
            pre_indent: 2,
            heading_base: 0,
            link_target: None,
            css_class: None,
            section_seed: [0, 0, 0],
        }
    }
}

/// One parsed document, ready to render and query
#[derive(Debug)]
pub struct WikiText {
    config: RenderConfig,
    registry: FunctionRegistry,
    tree: Node,
}

impl WikiText {
    /// Parse a document with a parser constructed for this call
    ///
    /// The simple path: one parser per document. Use
    /// [`parse_with`](WikiText::parse_with) to amortize one parser across
    /// many documents.
    pub fn parse(text: &str, config: RenderConfig, registry: FunctionRegistry) -> Result<Self> {
        let mut parser = Parser::new();
        Self::parse_with(&mut parser, text, config, registry)
    }

    /// Parse a document with a caller-supplied parser
    ///
    /// Rebinds the parser to this document (counter seed, handler keys,
    /// token set), opens the text, parses, and normalizes the tree. The
    /// parser can be handed straight to the next document afterwards.
    pub fn parse_with(
        parser: &mut Parser,
        text: &str,
        config: RenderConfig,
        registry: FunctionRegistry,
    ) -> Result<Self> {
        let tokens = if config.block_mode {
            TokenSet::Block
        } else {
            TokenSet::Inline
        };
        parser.reuse(Binding {
            section_seed: config.section_seed,
            handlers: registry.keys(),
            tokens,
        });
        parser.open(text)?;
        let mut tree = parser.parse()?;
        clean_up(&mut tree, parser.binding().section_seed);
        Ok(Self {
            config,
            registry,
            tree,
        })
    }

    /// Render to plain text
    pub fn to_text(&self) -> Result<String> {
        TextRenderer::new(&self.config, &self.registry).render(&self.tree)
    }

    /// Render to a generic markup-element tree for embedding
    pub fn to_element(&self) -> Result<Element> {
        HtmlRenderer::new(&self.config, &self.registry).render(&self.tree)
    }

    /// Render back to canonical markup syntax
    pub fn to_tagged(&self) -> Result<String> {
        TaggedRenderer::new(&self.registry).render(&self.tree)
    }

    /// Table-of-contents entries for every heading, in document order
    pub fn table_of_contents(&self, file_base: &str) -> Vec<TocEntry> {
        table_of_contents(&self.tree, file_base)
    }

    /// Every plain internal-link target, in first-occurrence order
    pub fn internal_references(&self) -> Vec<String> {
        internal_references(&self.tree)
    }

    /// The normalized tree
    pub fn tree(&self) -> &Node {
        &self.tree
    }

    /// The rendering configuration
    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// The function-handler registry bound to this document
    pub fn registry(&self) -> &FunctionRegistry {
        &self.registry
    }

    /// Swap the handler registry
    ///
    /// The same tree can then be rendered against a different handler set;
    /// resolution happens per render call.
    pub fn set_registry(&mut self, registry: FunctionRegistry) {
        self.registry = registry;
    }

    /// Whether the document has no content
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }
}
