//! Content extraction module
//!
//! This module turns page HTML into a normalized document summary:
//! title, meta description, headings, and the most relevant body text.

pub mod content;
pub mod metadata;

pub use content::{
    normalize_whitespace, truncate_chars, visible_text_len, ContentExtractor, MainText,
    ScrapedDocument, MAIN_CONTENT_SELECTORS,
};
pub use metadata::{MetadataExtractor, PageMetadata};
