//! Storage-format front end: tokenizer, tree builder and macro resolver.

mod entities;
mod lexer;
mod macros;
mod tree;

use crate::core::ast::Document;

pub use entities::decode_entities;
pub use lexer::{Token, TokenKind, Tokenizer};
pub use macros::resolve_macros;
pub use tree::TreeBuilder;

pub trait AstExtractor {
    fn extract(&self, markup: &str) -> Document;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct StorageExtractor;

impl AstExtractor for StorageExtractor {
    fn extract(&self, markup: &str) -> Document {
        let document = TreeBuilder::new().build(Tokenizer::new(markup));
        tracing::debug!(
            input_len = markup.len(),
            top_level_nodes = document.children.len(),
            "built storage tree"
        );
        resolve_macros(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ast::Node;

    #[test]
    fn test_extract_never_fails_on_garbage() {
        let doc = StorageExtractor.extract("</p><<>&&<![CDATA[<p>");
        assert!(!doc.children.is_empty());
        assert!(doc
            .children
            .iter()
            .all(|n| matches!(n, Node::Text(_) | Node::Unknown(_))));
    }

    #[test]
    fn test_extract_empty_input() {
        assert!(StorageExtractor.extract("").children.is_empty());
    }
}
