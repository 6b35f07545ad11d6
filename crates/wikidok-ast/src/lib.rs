//! wikidok-ast - Abstract Syntax Tree definitions
//!
//! This crate provides the tree types used by wikidok for representing
//! parsed wiki markup, together with the post-parse normalization pass
//! and the structural queries (table of contents, internal references).

pub mod counter;
pub mod node;
pub mod normalize;
pub mod outline;

pub use counter::SectionCounter;
pub use node::{FunctionRole, Node, StyleKind};
pub use normalize::clean_up;
pub use outline::{internal_references, table_of_contents, TocEntry};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert_eq!(VERSION, "0.1.0");
    }
}
