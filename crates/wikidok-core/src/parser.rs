//! Wiki markup parser
//!
//! Recursive-descent driver over the scanner's token stream with one-token
//! lookahead. One invocation builds one tree; the parser instance itself is
//! built for reuse across many documents.
//!
//! # Reuse protocol
//!
//! `Parser::new` compiles the block-marker tables once. `reuse` rebinds the
//! parser to a new target document: section-counter seed, the handler keys
//! used for parse-time function validation, and the token-set selection.
//! `open` resets scanner position and lookahead only. `parse` consumes the
//! open document; calling it again without an intervening `open` is a
//! contract violation reported as `WikiError::NotOpen`.
//!
//! The `&mut self` receivers make overlapping open/parse cycles on one
//! instance unrepresentable; concurrent documents each get their own
//! instance.

use std::collections::HashSet;

use wikidok_ast::{FunctionRole, Node, StyleKind};

use crate::error::{Result, WikiError};
use crate::scanner::{BlockRules, Scanner, Token, TokenKind};

pub use crate::scanner::TokenSet;

/// Per-target parser state, swapped wholesale by [`Parser::reuse`]
#[derive(Debug, Clone, Default)]
pub struct Binding {
    /// Seed for outline numbering, one integer per heading depth
    pub section_seed: [u32; 3],
    /// Registered handler keys, checked when a function reference is parsed
    pub handlers: HashSet<(String, FunctionRole)>,
    /// Block or single-line interpretation of the input
    pub tokens: TokenSet,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum ListKind {
    Bullet,
    Enumerate,
}

/// The markup parser
///
/// Holds the compiled marker tables across documents so that reusing one
/// instance amortizes their construction. Not reentrant: a single
/// open/parse cycle is active at a time.
#[derive(Debug)]
pub struct Parser {
    rules: BlockRules,
    binding: Binding,
    scanner: Option<Scanner>,
    lookahead: Option<Token>,
}

impl Parser {
    /// Create a parser with freshly compiled marker tables
    pub fn new() -> Self {
        Self {
            rules: BlockRules::new(),
            binding: Binding::default(),
            scanner: None,
            lookahead: None,
        }
    }

    /// Rebind this parser to a new target document
    ///
    /// Keeps the compiled marker tables; everything document-scoped
    /// (scanner position, lookahead, previous binding) is discarded so no
    /// residue crosses document boundaries.
    pub fn reuse(&mut self, binding: Binding) {
        self.binding = binding;
        self.scanner = None;
        self.lookahead = None;
    }

    /// The currently bound target state
    pub fn binding(&self) -> &Binding {
        &self.binding
    }

    /// Open a document for parsing
    ///
    /// Resets scanner position and token lookahead only; the binding is
    /// untouched.
    pub fn open(&mut self, text: &str) -> Result<()> {
        self.scanner = Some(Scanner::open(text, self.binding.tokens)?);
        self.lookahead = None;
        Ok(())
    }

    /// Parse the open document into a tree
    ///
    /// Consumes the document: a second call without an intervening
    /// [`open`](Parser::open) fails with [`WikiError::NotOpen`]. On a
    /// grammar violation no partial tree is returned.
    pub fn parse(&mut self) -> Result<Node> {
        if self.scanner.is_none() {
            return Err(WikiError::NotOpen);
        }
        let result = match self.binding.tokens {
            TokenSet::Block => self.parse_blocks(),
            TokenSet::Inline => self.parse_inline_document(),
        };
        self.scanner = None;
        self.lookahead = None;
        result
    }

    fn next(&mut self) -> Result<Token> {
        if let Some(token) = self.lookahead.take() {
            return Ok(token);
        }
        match self.scanner.as_mut() {
            Some(scanner) => scanner.next_token(&self.rules),
            None => Err(WikiError::NotOpen),
        }
    }

    fn peek(&mut self) -> Result<&Token> {
        if self.lookahead.is_none() {
            let token = self.next()?;
            self.lookahead = Some(token);
        }
        Ok(self.lookahead.as_ref().unwrap())
    }

    fn parse_blocks(&mut self) -> Result<Node> {
        let mut blocks = Vec::new();
        loop {
            let token = self.next()?;
            match token.kind {
                TokenKind::Eof => break,
                TokenKind::Blank | TokenKind::Newline => continue,
                TokenKind::Heading(level) => {
                    blocks.push(self.parse_heading(level, token.line)?);
                }
                TokenKind::Rule => blocks.push(Node::HorizontalRule),
                TokenKind::Bullet(level) => {
                    blocks.push(self.parse_list(ListKind::Bullet, level, token.line)?);
                }
                TokenKind::Enumerate(level) => {
                    blocks.push(self.parse_list(ListKind::Enumerate, level, token.line)?);
                }
                TokenKind::Pre(first) => blocks.push(self.parse_preformatted(first)?),
                _ => {
                    if let Some(block) = self.parse_paragraph(token)? {
                        blocks.push(block);
                    }
                }
            }
        }
        Ok(Node::Richtext(blocks))
    }

    /// Single-line interpretation: the whole input is one inline run
    fn parse_inline_document(&mut self) -> Result<Node> {
        let mut children = Vec::new();
        loop {
            let token = self.next()?;
            match token.kind {
                TokenKind::Eof => break,
                TokenKind::Newline | TokenKind::Blank => {
                    if !matches!(self.peek()?.kind, TokenKind::Eof) {
                        children.push(Node::Text(" ".to_string()));
                    }
                }
                _ => children.push(self.parse_inline_token(token)?),
            }
        }
        self.check_functions(&children, 1)?;
        Ok(Node::Richtext(children))
    }

    fn parse_heading(&mut self, level: u8, line: usize) -> Result<Node> {
        let children = self.parse_inline_line()?;
        self.check_functions(&children, line)?;
        Ok(Node::Section {
            level,
            number: None,
            children,
        })
    }

    /// Inline content up to the end of the current line; consumes the
    /// terminating newline
    fn parse_inline_line(&mut self) -> Result<Vec<Node>> {
        let mut children = Vec::new();
        loop {
            let ends = matches!(
                self.peek()?.kind,
                TokenKind::Newline | TokenKind::Blank | TokenKind::Eof
            );
            if ends {
                if matches!(self.peek()?.kind, TokenKind::Newline) {
                    self.next()?;
                }
                break;
            }
            let token = self.next()?;
            children.push(self.parse_inline_token(token)?);
        }
        Ok(children)
    }

    fn parse_inline_token(&mut self, token: Token) -> Result<Node> {
        match token.kind {
            TokenKind::Text(text) => Ok(Node::Text(text)),
            TokenKind::Verbatim(content) => Ok(Node::Verbatim(content)),
            TokenKind::Quotes(run) => self.parse_style(run),
            TokenKind::Reference(content) => parse_reference(&content, token.line),
            other => Err(WikiError::Syntax {
                message: format!("unexpected token {:?}", other),
                line: token.line,
            }),
        }
    }

    /// Quote-run lengths 2-5 open a style run; any other length is
    /// emitted as literal text unchanged
    fn parse_style(&mut self, run: usize) -> Result<Node> {
        let kind = match run {
            2 => StyleKind::Italic,
            3 => StyleKind::Bold,
            4 => StyleKind::Monospace,
            5 => StyleKind::BoldItalic,
            _ => return Ok(Node::Text("'".repeat(run))),
        };
        let mut children = Vec::new();
        loop {
            let closes = matches!(self.peek()?.kind, TokenKind::Quotes(r) if r == run);
            if closes {
                self.next()?;
                break;
            }
            // a run left open at the end of its line closes implicitly
            let ends = matches!(
                self.peek()?.kind,
                TokenKind::Newline | TokenKind::Blank | TokenKind::Eof
            );
            if ends {
                break;
            }
            let token = self.next()?;
            children.push(self.parse_inline_token(token)?);
        }
        Ok(Node::Style { kind, children })
    }

    fn parse_paragraph(&mut self, first: Token) -> Result<Option<Node>> {
        let line = first.line;
        let mut children = Vec::new();
        let mut token = first;
        loop {
            match token.kind {
                TokenKind::Newline => {
                    let ends = matches!(
                        self.peek()?.kind,
                        TokenKind::Blank
                            | TokenKind::Eof
                            | TokenKind::Heading(_)
                            | TokenKind::Rule
                            | TokenKind::Bullet(_)
                            | TokenKind::Enumerate(_)
                            | TokenKind::Pre(_)
                    );
                    if ends {
                        break;
                    }
                    children.push(Node::Text(" ".to_string()));
                }
                TokenKind::Eof | TokenKind::Blank => break,
                _ => children.push(self.parse_inline_token(token)?),
            }
            token = self.next()?;
        }

        // A reference that is the sole content of its block dispatches
        // with the block role instead of becoming a paragraph.
        if children.len() == 1 {
            if let Node::FunctionRef { name, args, .. } = &children[0] {
                let node = Node::FunctionRef {
                    name: name.clone(),
                    args: args.clone(),
                    role: FunctionRole::Block,
                };
                self.check_functions(std::slice::from_ref(&node), line)?;
                return Ok(Some(node));
            }
        }
        self.check_functions(&children, line)?;
        if children.is_empty() {
            return Ok(None);
        }
        Ok(Some(Node::Paragraph(children)))
    }

    fn parse_list(&mut self, kind: ListKind, first_level: u8, line: usize) -> Result<Node> {
        let mut entries: Vec<(u8, Vec<Node>)> = Vec::new();
        let mut level = first_level;
        loop {
            let children = self.parse_inline_line()?;
            self.check_functions(&children, line)?;
            entries.push((level, children));
            let next_level = match (kind, &self.peek()?.kind) {
                (ListKind::Bullet, TokenKind::Bullet(l)) => Some(*l),
                (ListKind::Enumerate, TokenKind::Enumerate(l)) => Some(*l),
                _ => None,
            };
            match next_level {
                Some(l) => {
                    self.next()?;
                    level = l;
                }
                None => break,
            }
        }
        let mut ix = 0;
        let start = entries[0].0;
        Ok(build_list(kind, &mut entries, start, &mut ix))
    }

    fn parse_preformatted(&mut self, first: String) -> Result<Node> {
        let mut content = first;
        loop {
            if !matches!(self.peek()?.kind, TokenKind::Pre(_)) {
                break;
            }
            if let TokenKind::Pre(next_line) = self.next()?.kind {
                content.push('\n');
                content.push_str(&next_line);
            }
        }
        Ok(Node::Preformatted(content))
    }

    /// Parse-time validation of function references against the bound
    /// handler keys; render re-checks because handler sets may differ
    /// between reuses.
    fn check_functions(&self, nodes: &[Node], line: usize) -> Result<()> {
        for node in nodes {
            match node {
                Node::FunctionRef { name, role, .. } => {
                    if !self.binding.handlers.contains(&(name.clone(), *role)) {
                        return Err(WikiError::UnknownFunction {
                            name: name.clone(),
                            role: *role,
                            line,
                        });
                    }
                }
                Node::Style { children, .. } => self.check_functions(children, line)?,
                _ => {}
            }
        }
        Ok(())
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

/// Split reference content into a function reference or a plain link
///
/// A `:` inside the first word routes to function dispatch; otherwise the
/// first word is the link target and any remaining text is the label.
/// Only syntax is validated here; target existence is the consumer's
/// concern.
fn parse_reference(content: &str, line: usize) -> Result<Node> {
    let content = content.trim();
    if content.is_empty() {
        return Err(WikiError::Syntax {
            message: "empty reference".to_string(),
            line,
        });
    }
    let mut words = content.split_whitespace();
    let first = words.next().unwrap();
    if let Some((name, arg)) = first.split_once(':') {
        if name.is_empty() {
            return Err(WikiError::Syntax {
                message: "reference with empty function name".to_string(),
                line,
            });
        }
        let mut args = Vec::new();
        if !arg.is_empty() {
            args.push(arg.to_string());
        }
        args.extend(words.map(String::from));
        return Ok(Node::FunctionRef {
            name: name.to_string(),
            args,
            role: FunctionRole::Inline,
        });
    }
    let label = words.collect::<Vec<_>>().join(" ");
    Ok(Node::Link {
        target: first.to_string(),
        label: if label.is_empty() { None } else { Some(label) },
    })
}

/// Fold a flat run of (level, item content) entries into nested lists
fn build_list(
    kind: ListKind,
    entries: &mut Vec<(u8, Vec<Node>)>,
    level: u8,
    ix: &mut usize,
) -> Node {
    let mut children = Vec::new();
    while *ix < entries.len() {
        let entry_level = entries[*ix].0;
        if entry_level < level {
            break;
        }
        if entry_level > level {
            children.push(build_list(kind, entries, entry_level, ix));
        } else {
            let item_children = std::mem::take(&mut entries[*ix].1);
            *ix += 1;
            children.push(match kind {
                ListKind::Bullet => Node::BulletItem {
                    level,
                    children: item_children,
                },
                ListKind::Enumerate => Node::EnumItem {
                    level,
                    children: item_children,
                },
            });
        }
    }
    match kind {
        ListKind::Bullet => Node::BulletList { level, children },
        ListKind::Enumerate => Node::EnumList { level, children },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Node {
        let mut parser = Parser::new();
        parser.open(text).unwrap();
        parser.parse().unwrap()
    }

    #[test]
    fn test_empty_input_yields_empty_root() {
        assert_eq!(parse(""), Node::Richtext(vec![]));
        assert_eq!(parse("\n\n\n"), Node::Richtext(vec![]));
    }

    #[test]
    fn test_parse_without_open_is_a_contract_violation() {
        let mut parser = Parser::new();
        assert!(matches!(parser.parse(), Err(WikiError::NotOpen)));
    }

    #[test]
    fn test_second_parse_without_open_fails() {
        let mut parser = Parser::new();
        parser.open("hello").unwrap();
        parser.parse().unwrap();
        assert!(matches!(parser.parse(), Err(WikiError::NotOpen)));
    }

    #[test]
    fn test_paragraph_lines_join_with_spaces() {
        let tree = parse("one\ntwo");
        assert_eq!(
            tree,
            Node::Richtext(vec![Node::Paragraph(vec![
                Node::Text("one".to_string()),
                Node::Text(" ".to_string()),
                Node::Text("two".to_string()),
            ])])
        );
    }

    #[test]
    fn test_style_run_lengths() {
        let expect = |kind| {
            Node::Richtext(vec![Node::Paragraph(vec![Node::Style {
                kind,
                children: vec![Node::Text("x".to_string())],
            }])])
        };
        assert_eq!(parse("''x''"), expect(StyleKind::Italic));
        assert_eq!(parse("'''x'''"), expect(StyleKind::Bold));
        assert_eq!(parse("''''x''''"), expect(StyleKind::Monospace));
        assert_eq!(parse("'''''x'''''"), expect(StyleKind::BoldItalic));
    }

    #[test]
    fn test_six_quote_run_degrades_to_text() {
        let tree = parse("''''''");
        assert_eq!(
            tree,
            Node::Richtext(vec![Node::Paragraph(vec![Node::Text(
                "''''''".to_string()
            )])])
        );
    }

    #[test]
    fn test_plain_link_and_labeled_link() {
        let tree = parse("[[foo]] and [[foo Bar]]");
        assert_eq!(
            tree,
            Node::Richtext(vec![Node::Paragraph(vec![
                Node::Link {
                    target: "foo".to_string(),
                    label: None,
                },
                Node::Text(" and ".to_string()),
                Node::Link {
                    target: "foo".to_string(),
                    label: Some("Bar".to_string()),
                },
            ])])
        );
    }

    #[test]
    fn test_function_reference_requires_registration() {
        let mut parser = Parser::new();
        parser.open("[[upper:foo]] tail").unwrap();
        let err = parser.parse().unwrap_err();
        assert!(matches!(
            err,
            WikiError::UnknownFunction {
                role: FunctionRole::Inline,
                ..
            }
        ));
    }

    #[test]
    fn test_sole_reference_in_block_uses_block_role() {
        let mut handlers = HashSet::new();
        handlers.insert(("upper".to_string(), FunctionRole::Block));
        let mut parser = Parser::new();
        parser.reuse(Binding {
            handlers,
            ..Binding::default()
        });
        parser.open("[[upper:foo]]").unwrap();
        let tree = parser.parse().unwrap();
        assert_eq!(
            tree,
            Node::Richtext(vec![Node::FunctionRef {
                name: "upper".to_string(),
                args: vec!["foo".to_string()],
                role: FunctionRole::Block,
            }])
        );
    }

    #[test]
    fn test_nested_list_levels() {
        let tree = parse("* one\n** two\n* three");
        assert_eq!(
            tree,
            Node::Richtext(vec![Node::BulletList {
                level: 1,
                children: vec![
                    Node::BulletItem {
                        level: 1,
                        children: vec![Node::Text("one".to_string())],
                    },
                    Node::BulletList {
                        level: 2,
                        children: vec![Node::BulletItem {
                            level: 2,
                            children: vec![Node::Text("two".to_string())],
                        }],
                    },
                    Node::BulletItem {
                        level: 1,
                        children: vec![Node::Text("three".to_string())],
                    },
                ],
            }])
        );
    }

    #[test]
    fn test_bullet_run_of_five_clamps_to_level_three() {
        let tree = parse("***** deep");
        assert_eq!(
            tree,
            Node::Richtext(vec![Node::BulletList {
                level: 3,
                children: vec![Node::BulletItem {
                    level: 3,
                    children: vec![Node::Text("deep".to_string())],
                }],
            }])
        );
    }

    #[test]
    fn test_preformatted_lines_merge() {
        let tree = parse(" a\n b\n\ntail");
        assert_eq!(
            tree,
            Node::Richtext(vec![
                Node::Preformatted("a\nb".to_string()),
                Node::Paragraph(vec![Node::Text("tail".to_string())]),
            ])
        );
    }

    #[test]
    fn test_inline_token_set_has_no_blocks() {
        let mut parser = Parser::new();
        parser.reuse(Binding {
            tokens: TokenSet::Inline,
            ..Binding::default()
        });
        parser.open("== not a heading").unwrap();
        let tree = parser.parse().unwrap();
        assert_eq!(
            tree,
            Node::Richtext(vec![Node::Text("== not a heading".to_string())])
        );
    }

    #[test]
    fn test_unterminated_reference_aborts_parse() {
        let mut parser = Parser::new();
        parser.open("text\n[[broken").unwrap();
        let err = parser.parse().unwrap_err();
        assert!(matches!(err, WikiError::Unterminated { line: 2, .. }));
    }
}
