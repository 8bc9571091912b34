//! Extraction module tests
//!
//! These tests verify metadata, heading, and main-content selection on
//! realistic company pages.

use company_lens::config::ScrapeConfig;
use company_lens::extraction::{ContentExtractor, MetadataExtractor};
use pretty_assertions::assert_eq;
use scraper::Html;

fn words(prefix: &str, count: usize) -> String {
    (0..count)
        .map(|i| format!("{}{:04}", prefix, i))
        .collect::<Vec<_>>()
        .join(" ")
}

#[test]
fn test_about_section_beats_whole_body() {
    // ~500 chars of about text inside ~5000 chars of body.
    let about = words("acme", 56);
    let news = words("news", 500);
    assert!(about.chars().count() >= 500);

    let html = format!(
        r#"<html><head><title>Acme</title></head><body>
        <nav>Home Products Contact</nav>
        <div class="news-feed"><p>{}</p></div>
        <section class="about"><p>{}</p></section>
        <footer>Copyright Acme</footer>
        </body></html>"#,
        news, about
    );

    let doc = ContentExtractor::default().extract(&html);
    assert_eq!(doc.text, about);
}

#[test]
fn test_sparse_candidate_falls_back_to_body() {
    let html = format!(
        r#"<html><body>
        <div id="about">Short blurb.</div>
        <div class="content"><p>{}</p></div>
        <footer>Footer links</footer>
        </body></html>"#,
        words("body", 60)
    );

    let doc = ContentExtractor::default().extract(&html);
    assert!(doc.text.starts_with("Short blurb. body0000"));
    assert!(!doc.text.contains("Footer links"));
}

#[test]
fn test_headings_capped_in_document_order() {
    let headings: String = (1..=25)
        .map(|i| format!("<h{}>Heading {}</h{}>", (i % 6) + 1, i, (i % 6) + 1))
        .collect();
    let html = format!("<html><body>{}<h2>   </h2></body></html>", headings);

    let doc = ContentExtractor::default().extract(&html);
    assert_eq!(doc.headings.len(), 20);
    assert_eq!(doc.headings[0], "Heading 1");
    assert_eq!(doc.headings[19], "Heading 20");
}

#[test]
fn test_metadata_title_and_description() {
    let html = Html::parse_document(
        r#"<html><head>
        <title> Acme Corp | About </title>
        <meta name="description" content="Anvils since 1949">
        </head><body><h1>Welcome</h1></body></html>"#,
    );

    let meta = MetadataExtractor::extract(&html, 20);
    assert_eq!(meta.title, "Acme Corp | About");
    assert_eq!(meta.description, "Anvils since 1949");
    assert_eq!(meta.headings, vec!["Welcome".to_string()]);
}

#[test]
fn test_missing_metadata_is_empty() {
    let doc = ContentExtractor::default().extract("<html><body><p>Only text</p></body></html>");
    assert_eq!(doc.title, "");
    assert_eq!(doc.meta_description, "");
    assert!(doc.headings.is_empty());
    assert_eq!(doc.text, "Only text");
}

#[test]
fn test_noise_removed_from_body_text() {
    let html = r#"<html><body>
        <header>Site header</header>
        <script>var tracking = 1;</script>
        <style>.x { color: red }</style>
        <div class="cookie-banner">We use cookies</div>
        <p>Acme builds anvils.</p>
        <aside>Related links</aside>
        </body></html>"#;

    let doc = ContentExtractor::default().extract(html);
    assert_eq!(doc.text, "Acme builds anvils.");
}

#[test]
fn test_text_truncated_to_budget() {
    let config = ScrapeConfig::builder().max_text_chars(50).build();
    let html = format!("<html><body><p>{}</p></body></html>", words("long", 100));

    let doc = ContentExtractor::new(&config).extract(&html);
    assert_eq!(doc.text.chars().count(), 50);
}

#[test]
fn test_malformed_html_does_not_fail() {
    let doc = ContentExtractor::default().extract("<div><p>Unclosed <b>tags");
    assert_eq!(doc.text, "Unclosed tags");
}
