//! Wiki markup tokenizer
//!
//! The scanner turns raw text into a finite token sequence, restarted for
//! each document. Block markers (headings, rules, list items, preformatted
//! lines, blank-line breaks) are recognized only at the start of a logical
//! line, against a table of compiled patterns; inline markers (quote runs,
//! references, verbatim spans) are recognized anywhere within a text run.
//!
//! Content inside a `<nowiki>...</nowiki>` span is collected into a single
//! literal token with no further interpretation.

use regex::Regex;

use crate::error::{Result, WikiError};

/// Upper bound on document size accepted by the scanner
pub const MAX_DOCUMENT_BYTES: usize = 4 * 1024 * 1024;

const NOWIKI_OPEN: &str = "<nowiki>";
const NOWIKI_CLOSE: &str = "</nowiki>";

/// Which token repertoire the scanner produces
///
/// `Block` is the full grammar; `Inline` suppresses all line-start block
/// markers so the whole input reads as one inline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TokenSet {
    #[default]
    Block,
    Inline,
}

/// A scanned token and the 1-based source line it started on
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub line: usize,
}

/// Token kinds produced by the scanner
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// Heading marker at line start; level already clamped to 3
    Heading(u8),
    /// Horizontal rule line
    Rule,
    /// Bullet list marker at line start; level already clamped to 3
    Bullet(u8),
    /// Enumeration list marker at line start; level already clamped to 3
    Enumerate(u8),
    /// One preformatted line (leading space stripped)
    Pre(String),
    /// A blank line
    Blank,
    /// A run of consecutive single quotes, length preserved
    Quotes(usize),
    /// The raw content between `[[` and `]]`
    Reference(String),
    /// The raw content of a verbatim span
    Verbatim(String),
    /// A run of plain text
    Text(String),
    /// End of a non-blank line
    Newline,
    /// End of input
    Eof,
}

/// Compiled line-start marker patterns
///
/// Built once per parser and kept across documents, so reusing a parser
/// amortizes the construction cost.
#[derive(Debug)]
pub(crate) struct BlockRules {
    heading: Regex,
    bullet: Regex,
    enumerate: Regex,
    rule: Regex,
}

impl BlockRules {
    pub(crate) fn new() -> Self {
        Self {
            heading: Regex::new(r"^(=+)[ \t]+").unwrap(),
            bullet: Regex::new(r"^(\*+)[ \t]+").unwrap(),
            enumerate: Regex::new(r"^(#+)[ \t]+").unwrap(),
            rule: Regex::new(r"^-{4,}[ \t]*$").unwrap(),
        }
    }
}

/// Tokenizer state for one document
#[derive(Debug)]
pub(crate) struct Scanner {
    lines: Vec<String>,
    line_ix: usize,
    col: usize,
    mode: TokenSet,
}

impl Scanner {
    /// Start scanning a document
    pub(crate) fn open(text: &str, mode: TokenSet) -> Result<Self> {
        if text.len() > MAX_DOCUMENT_BYTES {
            return Err(WikiError::DocumentTooLarge {
                size: text.len(),
                limit: MAX_DOCUMENT_BYTES,
            });
        }
        let text = text.replace("\r\n", "\n");
        Ok(Self {
            lines: text.lines().map(String::from).collect(),
            line_ix: 0,
            col: 0,
            mode,
        })
    }

    /// Produce the next token
    pub(crate) fn next_token(&mut self, rules: &BlockRules) -> Result<Token> {
        if self.line_ix >= self.lines.len() {
            return Ok(self.token(TokenKind::Eof));
        }

        if self.col == 0 && self.mode == TokenSet::Block {
            let line = self.lines[self.line_ix].as_str();
            if line.trim().is_empty() {
                let token = self.token(TokenKind::Blank);
                self.line_ix += 1;
                return Ok(token);
            }
            if rules.rule.is_match(line) {
                let token = self.token(TokenKind::Rule);
                self.line_ix += 1;
                return Ok(token);
            }
            if let Some(caps) = rules.heading.captures(line) {
                let level = clamp_level(caps[1].len());
                let end = caps.get(0).unwrap().end();
                let token = self.token(TokenKind::Heading(level));
                self.col = end;
                return Ok(token);
            }
            if let Some(caps) = rules.bullet.captures(line) {
                let level = clamp_level(caps[1].len());
                let end = caps.get(0).unwrap().end();
                let token = self.token(TokenKind::Bullet(level));
                self.col = end;
                return Ok(token);
            }
            if let Some(caps) = rules.enumerate.captures(line) {
                let level = clamp_level(caps[1].len());
                let end = caps.get(0).unwrap().end();
                let token = self.token(TokenKind::Enumerate(level));
                self.col = end;
                return Ok(token);
            }
            if let Some(rest) = line.strip_prefix(' ') {
                let token = self.token(TokenKind::Pre(rest.to_string()));
                self.line_ix += 1;
                return Ok(token);
            }
        }

        if self.col >= self.lines[self.line_ix].len() {
            let token = self.token(TokenKind::Newline);
            self.line_ix += 1;
            self.col = 0;
            return Ok(token);
        }

        self.scan_inline()
    }

    fn scan_inline(&mut self) -> Result<Token> {
        let line_no = self.line_ix + 1;
        let rest = &self.lines[self.line_ix][self.col..];

        let quotes = rest.chars().take_while(|&c| c == '\'').count();
        if quotes >= 2 {
            let token = self.token(TokenKind::Quotes(quotes));
            self.col += quotes;
            return Ok(token);
        }

        if rest.starts_with("[[") {
            return match rest[2..].find("]]") {
                Some(pos) => {
                    let inner = rest[2..2 + pos].to_string();
                    let token = self.token(TokenKind::Reference(inner));
                    self.col += pos + 4;
                    Ok(token)
                }
                None => Err(WikiError::Unterminated {
                    construct: "internal reference",
                    line: line_no,
                }),
            };
        }

        if rest.starts_with(NOWIKI_OPEN) {
            return self.scan_verbatim();
        }

        let mut end = rest.len();
        for (ix, _) in rest.char_indices().skip(1) {
            let tail = &rest[ix..];
            if tail.starts_with("''") || tail.starts_with("[[") || tail.starts_with(NOWIKI_OPEN) {
                end = ix;
                break;
            }
        }
        let token = self.token(TokenKind::Text(rest[..end].to_string()));
        self.col += end;
        Ok(token)
    }

    /// Collect a verbatim span, possibly across lines, into one token
    fn scan_verbatim(&mut self) -> Result<Token> {
        let open_line = self.line_ix + 1;
        let mut ix = self.line_ix;
        let mut start = self.col + NOWIKI_OPEN.len();
        let mut content = String::new();
        loop {
            if ix >= self.lines.len() {
                return Err(WikiError::Unterminated {
                    construct: "nowiki span",
                    line: open_line,
                });
            }
            if let Some(pos) = self.lines[ix][start..].find(NOWIKI_CLOSE) {
                content.push_str(&self.lines[ix][start..start + pos]);
                self.line_ix = ix;
                self.col = start + pos + NOWIKI_CLOSE.len();
                return Ok(Token {
                    kind: TokenKind::Verbatim(content),
                    line: open_line,
                });
            }
            content.push_str(&self.lines[ix][start..]);
            content.push('\n');
            ix += 1;
            start = 0;
        }
    }

    fn token(&self, kind: TokenKind) -> Token {
        Token {
            kind,
            line: self.line_ix + 1,
        }
    }
}

fn clamp_level(run: usize) -> u8 {
    run.min(3) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan_all(text: &str, mode: TokenSet) -> Vec<TokenKind> {
        let rules = BlockRules::new();
        let mut scanner = Scanner::open(text, mode).unwrap();
        let mut kinds = Vec::new();
        loop {
            let token = scanner.next_token(&rules).unwrap();
            let done = token.kind == TokenKind::Eof;
            kinds.push(token.kind);
            if done {
                break;
            }
        }
        kinds
    }

    #[test]
    fn test_block_markers_only_at_line_start() {
        let kinds = scan_all("== Title\na == b", TokenSet::Block);
        assert_eq!(
            kinds,
            vec![
                TokenKind::Heading(2),
                TokenKind::Text("Title".to_string()),
                TokenKind::Newline,
                TokenKind::Text("a == b".to_string()),
                TokenKind::Newline,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_marker_run_clamped_to_three() {
        let kinds = scan_all("***** deep", TokenSet::Block);
        assert_eq!(kinds[0], TokenKind::Bullet(3));
    }

    #[test]
    fn test_quote_run_length_preserved() {
        let kinds = scan_all("''''''six", TokenSet::Block);
        assert_eq!(kinds[0], TokenKind::Quotes(6));
        assert_eq!(kinds[1], TokenKind::Text("six".to_string()));
    }

    #[test]
    fn test_single_quote_is_text() {
        let kinds = scan_all("it's fine", TokenSet::Block);
        assert_eq!(kinds[0], TokenKind::Text("it's fine".to_string()));
    }

    #[test]
    fn test_reference_span() {
        let kinds = scan_all("see [[target label]].", TokenSet::Block);
        assert_eq!(kinds[0], TokenKind::Text("see ".to_string()));
        assert_eq!(kinds[1], TokenKind::Reference("target label".to_string()));
        assert_eq!(kinds[2], TokenKind::Text(".".to_string()));
    }

    #[test]
    fn test_unterminated_reference_fails() {
        let rules = BlockRules::new();
        let mut scanner = Scanner::open("[[broken", TokenSet::Block).unwrap();
        let err = scanner.next_token(&rules).unwrap_err();
        assert!(matches!(
            err,
            WikiError::Unterminated {
                construct: "internal reference",
                line: 1,
            }
        ));
    }

    #[test]
    fn test_verbatim_spans_lines() {
        let kinds = scan_all("<nowiki>a\nb</nowiki>", TokenSet::Block);
        assert_eq!(kinds[0], TokenKind::Verbatim("a\nb".to_string()));
    }

    #[test]
    fn test_unterminated_verbatim_fails() {
        let rules = BlockRules::new();
        let mut scanner = Scanner::open("x<nowiki>open", TokenSet::Block).unwrap();
        assert_eq!(
            scanner.next_token(&rules).unwrap().kind,
            TokenKind::Text("x".to_string())
        );
        let err = scanner.next_token(&rules).unwrap_err();
        assert!(matches!(
            err,
            WikiError::Unterminated {
                construct: "nowiki span",
                line: 1,
            }
        ));
    }

    #[test]
    fn test_inline_mode_ignores_block_markers() {
        let kinds = scan_all("== not a heading", TokenSet::Inline);
        assert_eq!(kinds[0], TokenKind::Text("== not a heading".to_string()));
    }

    #[test]
    fn test_preformatted_line() {
        let kinds = scan_all(" kept  spacing", TokenSet::Block);
        assert_eq!(kinds[0], TokenKind::Pre("kept  spacing".to_string()));
    }

    #[test]
    fn test_document_size_ceiling() {
        let text = "a".repeat(MAX_DOCUMENT_BYTES + 1);
        assert!(matches!(
            Scanner::open(&text, TokenSet::Block),
            Err(WikiError::DocumentTooLarge { .. })
        ));
    }
}
