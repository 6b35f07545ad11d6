//! wikidok-core - wiki markup parsing and multi-format rendering
//!
//! Core library for wikidok: a scanner/parser for a constrained wiki-style
//! markup language plus three renderers over the same tree (plain text, a
//! generic markup-element tree for HTML embedding, and canonical "tagged"
//! markup for round-trips).
//!
//! # Example
//!
//! ```
//! use wikidok_core::{FunctionRegistry, RenderConfig, WikiText};
//!
//! let source = "= Overview\n\nHello ''world''.";
//! let doc = WikiText::parse(source, RenderConfig::default(), FunctionRegistry::new()).unwrap();
//!
//! let text = doc.to_text().unwrap();
//! assert!(text.contains("1 Overview"));
//! assert!(text.contains("Hello world."));
//!
//! let tagged = doc.to_tagged().unwrap();
//! assert!(tagged.contains("''world''"));
//! ```

pub mod element;
pub mod error;
mod html;
pub mod parser;
pub mod registry;
mod scanner;
mod tagged;
mod text;
pub mod wikitext;

pub use element::{Element, Markup};
pub use error::{Result, WikiError};
pub use parser::{Binding, Parser, TokenSet};
pub use registry::{FunctionCall, FunctionHandler, FunctionRegistry};
pub use wikitext::{RenderConfig, WikiText};

pub use wikidok_ast::{FunctionRole, Node, SectionCounter, StyleKind, TocEntry};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
