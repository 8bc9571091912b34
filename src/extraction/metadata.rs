//! Page metadata extraction
//!
//! Title, meta description and the heading outline, read from the
//! document before any noise stripping happens.

use super::content::normalize_whitespace;
use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Metadata read from a page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMetadata {
    /// `<title>` text, else first `<h1>`, else empty
    pub title: String,
    /// `<meta name="description">` content, else empty
    pub description: String,
    /// Non-empty heading texts in document order
    pub headings: Vec<String>,
}

struct Selectors {
    title: Selector,
    h1: Selector,
    description: Selector,
    headings: Selector,
}

fn selectors() -> &'static Selectors {
    static SELECTORS: OnceLock<Selectors> = OnceLock::new();
    SELECTORS.get_or_init(|| {
        let parse = |css: &str| Selector::parse(css).expect("static selector");
        Selectors {
            title: parse("title"),
            h1: parse("h1"),
            description: parse(r#"meta[name="description"]"#),
            headings: parse("h1, h2, h3, h4, h5, h6"),
        }
    })
}

/// Metadata extraction functionality
pub struct MetadataExtractor;

impl MetadataExtractor {
    /// Read title, description and up to `max_headings` headings
    pub fn extract(document: &Html, max_headings: usize) -> PageMetadata {
        PageMetadata {
            title: Self::title(document),
            description: Self::description(document),
            headings: Self::headings(document, max_headings),
        }
    }

    /// Page title, falling back to the first top-level heading
    pub fn title(document: &Html) -> String {
        let from = |sel: &Selector| {
            document
                .select(sel)
                .next()
                .map(|el| normalize_whitespace(&el.text().collect::<String>()))
                .filter(|t| !t.is_empty())
        };

        from(&selectors().title)
            .or_else(|| from(&selectors().h1))
            .unwrap_or_default()
    }

    /// Meta description content attribute
    pub fn description(document: &Html) -> String {
        document
            .select(&selectors().description)
            .next()
            .and_then(|el| el.value().attr("content"))
            .map(|c| c.trim().to_string())
            .unwrap_or_default()
    }

    /// Heading texts (levels 1-6) in document order, empties skipped
    pub fn headings(document: &Html, max_headings: usize) -> Vec<String> {
        document
            .select(&selectors().headings)
            .map(|el| normalize_whitespace(&el.text().collect::<String>()))
            .filter(|t| !t.is_empty())
            .take(max_headings)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_prefers_title_element() {
        let doc = Html::parse_document(
            "<html><head><title> Acme Corp </title></head><body><h1>Welcome</h1></body></html>",
        );
        assert_eq!(MetadataExtractor::title(&doc), "Acme Corp");
    }

    #[test]
    fn test_title_falls_back_to_h1() {
        let doc = Html::parse_document("<body><h1>Acme  Holdings</h1><h1>Second</h1></body>");
        assert_eq!(MetadataExtractor::title(&doc), "Acme Holdings");
    }

    #[test]
    fn test_title_empty_when_absent() {
        let doc = Html::parse_document("<body><p>No headings</p></body>");
        assert_eq!(MetadataExtractor::title(&doc), "");
    }

    #[test]
    fn test_description() {
        let doc = Html::parse_document(
            r#"<head><meta name="description" content="We build bridges."></head>"#,
        );
        assert_eq!(MetadataExtractor::description(&doc), "We build bridges.");

        let doc = Html::parse_document(r#"<head><meta name="keywords" content="x"></head>"#);
        assert_eq!(MetadataExtractor::description(&doc), "");
    }

    #[test]
    fn test_headings_order_and_empties() {
        let doc = Html::parse_document(
            "<body><h2>Two</h2><h1>One</h1><h3>   </h3><h6>Six</h6></body>",
        );
        assert_eq!(
            MetadataExtractor::headings(&doc, 20),
            vec!["Two".to_string(), "One".to_string(), "Six".to_string()]
        );
    }

    #[test]
    fn test_headings_capped() {
        let body: String = (1..=25).map(|i| format!("<h2>Heading {}</h2>", i)).collect();
        let doc = Html::parse_document(&format!("<body>{}</body>", body));
        let headings = MetadataExtractor::headings(&doc, 20);
        assert_eq!(headings.len(), 20);
        assert_eq!(headings[0], "Heading 1");
        assert_eq!(headings[19], "Heading 20");
    }
}
