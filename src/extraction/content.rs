//! Main content extraction
//!
//! Turns static or rendered HTML into a [`ScrapedDocument`]: metadata,
//! plus the body text most likely to describe the company. Parsing is
//! best-effort; malformed markup yields empty fields, never an error.

use super::metadata::MetadataExtractor;
use crate::config::ScrapeConfig;
use scraper::node::Element;
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use tracing::{debug, instrument};

/// Candidate regions for company facts, evaluated in order.
///
/// Every match of every selector competes; the longest text wins and
/// earlier selectors win ties.
pub const MAIN_CONTENT_SELECTORS: &[&str] = &[
    "main",
    r#"[role="main"]"#,
    ".about",
    ".company",
    ".profile",
    ".overview",
    "#about",
    "#company",
    "#profile",
    "#overview",
    r#"[class*="about"]"#,
    r#"[class*="company"]"#,
    r#"[class*="profile"]"#,
    r#"[class*="overview"]"#,
    r#"[id*="about"]"#,
    r#"[id*="company"]"#,
    r#"[id*="profile"]"#,
    r#"[id*="overview"]"#,
];

/// Elements removed before body text is selected
pub const NOISE_TAGS: &[&str] = &[
    "script", "style", "noscript", "template", "nav", "header", "footer", "aside",
];

/// Class names of cookie banners and overlays
pub const NOISE_CLASSES: &[&str] = &["cookie-banner", "popup", "modal"];

/// Elements whose text is never rendered
const NON_VISIBLE_TAGS: &[&str] = &["script", "style", "noscript", "template"];

/// Elements that end a run of text; a space is emitted after them
const BLOCK_TAGS: &[&str] = &[
    "address", "article", "blockquote", "br", "dd", "div", "dl", "dt", "figure", "form", "h1",
    "h2", "h3", "h4", "h5", "h6", "li", "main", "ol", "p", "pre", "section", "table", "td", "th",
    "tr", "ul",
];

/// Normalized summary of one fetched page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapedDocument {
    /// Page title
    pub title: String,
    /// Meta description (empty when absent)
    #[serde(default)]
    pub meta_description: String,
    /// Headings in document order
    pub headings: Vec<String>,
    /// Selected, normalized and truncated body text
    pub text: String,
}

/// Where the body text came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MainText {
    /// Normalized, untruncated text
    pub text: String,
    /// Selector that produced it; None means whole-body fallback
    pub selector: Option<&'static str>,
}

fn main_content_selectors() -> &'static [(&'static str, Selector)] {
    static SELECTORS: OnceLock<Vec<(&'static str, Selector)>> = OnceLock::new();
    SELECTORS.get_or_init(|| {
        MAIN_CONTENT_SELECTORS
            .iter()
            .filter_map(|css| Selector::parse(css).ok().map(|sel| (*css, sel)))
            .collect()
    })
}

fn body_selector() -> &'static Selector {
    static SELECTOR: OnceLock<Selector> = OnceLock::new();
    SELECTOR.get_or_init(|| Selector::parse("body").expect("static selector"))
}

fn is_noise(element: &Element) -> bool {
    NOISE_TAGS.contains(&element.name())
        || element.classes().any(|class| NOISE_CLASSES.contains(&class))
}

fn is_non_visible(element: &Element) -> bool {
    NON_VISIBLE_TAGS.contains(&element.name())
}

fn collect_text(element: ElementRef<'_>, skip: fn(&Element) -> bool, out: &mut String) {
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            out.push_str(text);
        } else if let Some(child_el) = ElementRef::wrap(child) {
            if !skip(child_el.value()) {
                collect_text(child_el, skip, out);
                if BLOCK_TAGS.contains(&child_el.value().name()) {
                    out.push(' ');
                }
            }
        }
    }
}

fn text_without(element: ElementRef<'_>, skip: fn(&Element) -> bool) -> String {
    let mut out = String::new();
    collect_text(element, skip, &mut out);
    out
}

fn body_or_root(document: &Html) -> ElementRef<'_> {
    document
        .select(body_selector())
        .next()
        .unwrap_or_else(|| document.root_element())
}

/// Collapse whitespace runs (newlines included) to single spaces and trim
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Keep the first `max_chars` characters
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}

/// Characters of rendered text in the body, whitespace-trimmed.
///
/// Only script-like elements are excluded: navigation chrome still
/// counts, since it shows the page rendered without JavaScript.
pub fn visible_text_len(html: &str) -> usize {
    let document = Html::parse_document(html);
    let body = body_or_root(&document);
    text_without(body, is_non_visible).trim().chars().count()
}

/// Content extraction functionality
#[derive(Debug, Clone)]
pub struct ContentExtractor {
    min_main_content_chars: usize,
    max_text_chars: usize,
    max_headings: usize,
}

impl Default for ContentExtractor {
    fn default() -> Self {
        Self::new(&ScrapeConfig::default())
    }
}

impl ContentExtractor {
    /// Create an extractor using the thresholds in `config`
    pub fn new(config: &ScrapeConfig) -> Self {
        Self {
            min_main_content_chars: config.min_main_content_chars,
            max_text_chars: config.max_text_chars,
            max_headings: config.max_headings,
        }
    }

    /// Summarize `html` into a [`ScrapedDocument`]
    #[instrument(skip(self, html), fields(html_len = html.len()))]
    pub fn extract(&self, html: &str) -> ScrapedDocument {
        let document = Html::parse_document(html);
        let metadata = MetadataExtractor::extract(&document, self.max_headings);
        let main = self.select_main_text(&document);

        debug!(
            "Selected {} chars from {}",
            main.text.chars().count(),
            main.selector.unwrap_or("body")
        );

        ScrapedDocument {
            title: metadata.title,
            meta_description: metadata.description,
            headings: metadata.headings,
            text: truncate_chars(&main.text, self.max_text_chars),
        }
    }

    /// Pick the longest main-content candidate, or the whole body
    pub fn select_main_text(&self, document: &Html) -> MainText {
        let mut best: Option<MainText> = None;
        let mut best_len = 0;

        for (css, selector) in main_content_selectors() {
            for element in document.select(selector) {
                if Self::inside_noise(element) {
                    continue;
                }
                let text = normalize_whitespace(&text_without(element, is_noise));
                let len = text.chars().count();
                if len > best_len {
                    best_len = len;
                    best = Some(MainText {
                        text,
                        selector: Some(*css),
                    });
                }
            }
        }

        match best {
            Some(main) if best_len >= self.min_main_content_chars => main,
            _ => MainText {
                text: normalize_whitespace(&text_without(body_or_root(document), is_noise)),
                selector: None,
            },
        }
    }

    fn inside_noise(element: ElementRef<'_>) -> bool {
        is_noise(element.value())
            || element
                .ancestors()
                .filter_map(ElementRef::wrap)
                .any(|ancestor| is_noise(ancestor.value()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filler(words: usize) -> String {
        (0..words).map(|i| format!("word{} ", i % 10)).collect()
    }

    #[test]
    fn test_normalize_whitespace() {
        assert_eq!(normalize_whitespace("  Hello \n\n  world\t test "), "Hello world test");
        assert_eq!(normalize_whitespace(""), "");
    }

    #[test]
    fn test_truncate_chars_counts_chars_not_bytes() {
        assert_eq!(truncate_chars("株式会社サンプル", 4), "株式会社");
        assert_eq!(truncate_chars("abc", 10), "abc");
        assert_eq!(truncate_chars("abc", 3), "abc");
    }

    #[test]
    fn test_visible_text_len_ignores_scripts() {
        let html = "<body><script>var x = 'a very long script body';</script><p>Hi</p></body>";
        assert_eq!(visible_text_len(html), 2);
    }

    #[test]
    fn test_noise_stripped_from_body_fallback() {
        let html = format!(
            "<body><nav>Menu links</nav><header>Brand</header><p>{}</p>\
             <div class=\"cookie-banner\">Accept cookies</div><footer>Copyright</footer></body>",
            "Short page."
        );
        let doc = ContentExtractor::default().extract(&html);
        assert_eq!(doc.text, "Short page.");
    }

    #[test]
    fn test_longest_candidate_wins() {
        let short = filler(50);
        let long = filler(80);
        let html = format!(
            "<body><div class=\"overview\">{}</div><section id=\"about\">{}</section></body>",
            short, long
        );
        let extractor = ContentExtractor::default();
        let main = extractor.select_main_text(&Html::parse_document(&html));
        assert_eq!(main.text, normalize_whitespace(&long));
        assert_eq!(main.selector, Some("#about"));
    }

    #[test]
    fn test_sparse_candidate_falls_back_to_body() {
        let html = format!(
            "<body><div class=\"about\">Tiny about.</div><p>{}</p></body>",
            filler(10)
        );
        let main = ContentExtractor::default().select_main_text(&Html::parse_document(&html));
        assert!(main.selector.is_none());
        assert!(main.text.starts_with("Tiny about."));
    }

    #[test]
    fn test_candidate_inside_footer_ignored() {
        let html = format!(
            "<body><footer><div class=\"company\">{}</div></footer><p>Body text.</p></body>",
            filler(100)
        );
        let main = ContentExtractor::default().select_main_text(&Html::parse_document(&html));
        assert!(main.selector.is_none());
        assert_eq!(main.text, "Body text.");
    }

    #[test]
    fn test_text_truncated() {
        let config = ScrapeConfig::builder().max_text_chars(30).build();
        let html = format!("<body><p>{}</p></body>", filler(100));
        let doc = ContentExtractor::new(&config).extract(&html);
        assert_eq!(doc.text.chars().count(), 30);
    }

    #[test]
    fn test_malformed_html_never_panics() {
        let doc = ContentExtractor::default().extract("<div><p>unclosed <b>tags <title>");
        assert!(doc.headings.is_empty());
        assert!(doc.text.contains("unclosed"));

        let empty = ContentExtractor::default().extract("");
        assert_eq!(empty, ScrapedDocument::default());
    }
}
