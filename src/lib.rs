//! # storage2md
//!
//! Wiki storage-format to Markdown converter.
//!
//! Pages and comments arrive as already-fetched records; the converter turns
//! their storage-format bodies into Markdown and lays them out with a
//! metadata header. No network I/O happens here.
//!
//! ## Example
//!
//! ```
//! use storage2md::{ConvertOptions, PageRecord, StorageToMarkdown};
//!
//! let converter = StorageToMarkdown::new(ConvertOptions {
//!     base_url: "https://wiki.example.com".into(),
//!     ..Default::default()
//! });
//!
//! assert_eq!(converter.render_fragment("<h3>Title</h3>"), "### Title");
//!
//! let page = PageRecord {
//!     id: "42".into(),
//!     title: "Hello".into(),
//!     body: "<p>Hi <strong>there</strong></p>".into(),
//!     ..Default::default()
//! };
//! let result = converter.convert(&page, &[]).unwrap();
//! assert!(result.content.ends_with("Hi **there**"));
//! ```

pub mod adapters;
pub mod converter;
pub mod core;
pub mod error;
pub mod localization;
pub mod render;

pub use converter::StorageToMarkdown;
pub use crate::core::record::{CommentRecord, ConversionResult, PageBundle, PageMetadata, PageRecord};
pub use error::{Error, Result};
pub use localization::{ChineseLocalization, DefaultLocalization, Language, LocalizationStrategy};

/// Options for storage-format to Markdown conversion.
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Site base URL that relative page links are resolved against.
    pub base_url: String,
    /// Language of labels and placeholders.
    pub language: Language,
    /// Whether comments are rendered into the output.
    pub include_comments: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            language: Language::English,
            include_comments: true,
        }
    }
}

// Python bindings (only when 'python' feature is enabled)
#[cfg(feature = "python")]
mod python_bindings {
    use super::*;
    use pyo3::prelude::*;

    /// Converts a storage-format fragment to Markdown.
    #[pyfunction]
    fn convert_storage(markup: String) -> String {
        StorageToMarkdown::with_defaults().render_fragment(&markup)
    }

    /// Converts a page bundle (JSON with `page` and `comments`) to Markdown.
    #[pyfunction]
    #[pyo3(signature = (bundle_json, base_url = String::new()))]
    fn convert_page(bundle_json: String, base_url: String) -> PyResult<String> {
        let to_py = |e: Error| PyErr::new::<pyo3::exceptions::PyRuntimeError, _>(e.to_string());
        let bundle = PageBundle::from_json(&bundle_json).map_err(to_py)?;
        let converter = StorageToMarkdown::new(ConvertOptions {
            base_url,
            ..Default::default()
        });
        converter
            .convert(&bundle.page, &bundle.comments)
            .map(|result| result.content)
            .map_err(to_py)
    }

    /// A Python module implemented in Rust.
    #[pymodule]
    pub fn storage2md(m: &Bound<'_, PyModule>) -> PyResult<()> {
        m.add_function(wrap_pyfunction!(convert_storage, m)?)?;
        m.add_function(wrap_pyfunction!(convert_page, m)?)?;
        Ok(())
    }
}
