//! Error types for wiki markup processing

use thiserror::Error;
use wikidok_ast::FunctionRole;

/// Errors that can occur while parsing or rendering wiki markup
#[derive(Error, Debug)]
pub enum WikiError {
    /// A span construct was opened but never closed
    #[error("syntax error at line {line}: unterminated {construct}")]
    Unterminated {
        construct: &'static str,
        line: usize,
    },

    /// The markup violates the grammar in an unrecoverable way
    #[error("syntax error at line {line}: {message}")]
    Syntax { message: String, line: usize },

    /// A function reference names a function with no registered handler
    /// for its role, detected while parsing
    #[error("unknown function '{name}' ({role}) at line {line}")]
    UnknownFunction {
        name: String,
        role: FunctionRole,
        line: usize,
    },

    /// A function reference could not be resolved against the handler
    /// registry at render time
    #[error("no {role} handler registered for function '{name}'")]
    UnresolvedHandler { name: String, role: FunctionRole },

    /// A handler was already registered under the same name and role
    #[error("duplicate handler registration for '{name}' ({role})")]
    DuplicateHandler { name: String, role: FunctionRole },

    /// The document exceeds the size ceiling
    #[error("document of {size} bytes exceeds the {limit} byte limit")]
    DocumentTooLarge { size: usize, limit: usize },

    /// `parse` was called on a parser with no open document
    #[error("parser has no open document; call open() first")]
    NotOpen,

    /// A function handler failed while expanding a reference
    #[error("function handler failed: {0}")]
    Handler(#[from] anyhow::Error),
}

/// Result type for wiki markup operations
pub type Result<T> = std::result::Result<T, WikiError>;
