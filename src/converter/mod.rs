//! Conversion façade: storage-format fragments and whole pages to Markdown.

mod assembler;
mod metadata;

use crate::adapters::storage::{AstExtractor, StorageExtractor};
use crate::core::record::{CommentRecord, ConversionResult, PageRecord};
use crate::localization::LocalizationStrategy;
use crate::render::{MarkdownRenderer, Renderer};
use crate::{error::Error, ConvertOptions, Result};
use std::fmt::Display;

pub use self::assembler::{DocumentAssembler, RenderedComment};
pub use self::metadata::{build_metadata, format_timestamp, resolve_web_url};

/// Main converter struct that orchestrates storage-format to Markdown conversion.
///
/// Holds only its options, so one instance can be shared across threads.
#[derive(Debug, Clone, Default)]
pub struct StorageToMarkdown {
    options: ConvertOptions,
}

impl StorageToMarkdown {
    /// Creates a new converter with the given options.
    pub fn new(options: ConvertOptions) -> Self {
        Self { options }
    }

    /// Creates a new converter with default options.
    pub fn with_defaults() -> Self {
        Self::new(ConvertOptions::default())
    }

    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    fn localization(&self) -> &'static dyn LocalizationStrategy {
        self.options.language.strategy()
    }

    /// Renders one storage-format body to Markdown.
    ///
    /// Never fails: malformed or unsupported markup shows up as placeholder
    /// text in the output.
    pub fn render_fragment(&self, markup: &str) -> String {
        let document = StorageExtractor.extract(markup);
        MarkdownRenderer::new(self.localization()).render(&document)
    }

    /// Converts a page and its comments into a single Markdown document.
    ///
    /// # Arguments
    /// * `page` - The fetched page
    /// * `comments` - Comments in display order; they are numbered in this order
    ///
    /// # Errors
    /// Returns [`Error::InvalidRecord`] when the page has no id.
    pub fn convert(
        &self,
        page: &PageRecord,
        comments: &[CommentRecord],
    ) -> Result<ConversionResult> {
        if page.id.trim().is_empty() {
            return Err(Error::InvalidRecord("page id is empty".to_string()));
        }

        let metadata = build_metadata(page, &self.options.base_url);
        let body = self.render_fragment(&page.body);

        let comments: Vec<RenderedComment> = if self.options.include_comments {
            comments
                .iter()
                .map(|comment| RenderedComment {
                    author: Some(comment.author.trim().to_string()).filter(|a| !a.is_empty()),
                    created: format_timestamp(&comment.timestamp),
                    body: self.render_fragment(&comment.body),
                })
                .collect()
        } else {
            Vec::new()
        };

        tracing::debug!(
            page_id = %page.id,
            comments = comments.len(),
            body_len = body.len(),
            "converted page"
        );

        let content = DocumentAssembler::new(self.localization()).assemble(&metadata, &body, &comments);
        Ok(ConversionResult { metadata, content })
    }

    /// Like [`convert`](Self::convert), for callers that fetch comments
    /// separately. A failed comment fetch is logged and treated as no
    /// comments; the page still converts.
    pub fn convert_with_fetched_comments<E: Display>(
        &self,
        page: &PageRecord,
        comments: std::result::Result<Vec<CommentRecord>, E>,
    ) -> Result<ConversionResult> {
        let comments = comments.unwrap_or_else(|err| {
            tracing::warn!(page_id = %page.id, error = %err, "comment fetch failed; continuing without comments");
            Vec::new()
        });
        self.convert(page, &comments)
    }
}
