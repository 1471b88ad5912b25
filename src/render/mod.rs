mod cleanup;
mod escape;
mod markdown;

use crate::core::ast::Document;

pub use cleanup::tidy;
pub use escape::{code_fence, code_span, escape_markdown_link_destination, escape_markdown_link_text};
pub use markdown::MarkdownRenderer;

pub trait Renderer {
    fn render(&self, document: &Document) -> String;
}
