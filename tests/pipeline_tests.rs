//! Extraction pipeline tests
//!
//! The model is replaced by a recording mock; page acquisition by fakes.

use async_trait::async_trait;
use company_lens::error::{Error, StaticFetchError};
use company_lens::extraction::ContentExtractor;
use company_lens::fetch::{FetchStrategy, PageRenderer, StaticFetcher};
use company_lens::llm::{CompletionClient, SYSTEM_PROMPT};
use company_lens::record::{EmployeeScale, InputPayload, EXTRACTION_ERROR_LABEL};
use company_lens::{CompanyRecord, Extractor};
use pretty_assertions::assert_eq;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use url::Url;

const ABOUT_PAGE: &str = r#"<html><head>
    <title>Acme Corporation</title>
    <meta name="description" content="Precision anvils since 1949">
    </head><body>
    <nav>Home About Contact</nav>
    <h1>About Acme</h1>
    <section class="about"><p>Acme Corporation was founded in 1949 in Osaka. The company
    designs and manufactures precision anvils, drop hammers and forging tools, and employs
    about 120 people at its head office and two regional branches in Nagoya and Fukuoka.</p></section>
    </body></html>"#;

enum Reply {
    Text(String),
    Timeout,
}

struct MockModel {
    reply: Reply,
    prompts: Mutex<Vec<(String, String)>>,
}

impl MockModel {
    fn text(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Reply::Text(reply.to_string()),
            prompts: Mutex::new(Vec::new()),
        })
    }

    fn timing_out() -> Arc<Self> {
        Arc::new(Self {
            reply: Reply::Timeout,
            prompts: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    fn last_user_message(&self) -> String {
        self.prompts.lock().unwrap().last().unwrap().1.clone()
    }
}

#[async_trait]
impl CompletionClient for MockModel {
    async fn complete(&self, system: &str, user: &str) -> company_lens::Result<String> {
        self.prompts
            .lock()
            .unwrap()
            .push((system.to_string(), user.to_string()));
        match &self.reply {
            Reply::Text(text) => Ok(text.clone()),
            Reply::Timeout => Err(Error::timeout("model call", 60_000)),
        }
    }
}

struct PageFetcher {
    result: Result<String, StaticFetchError>,
    calls: AtomicUsize,
}

#[async_trait]
impl StaticFetcher for PageFetcher {
    async fn fetch(&self, _url: &Url) -> Result<String, StaticFetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.result.clone()
    }
}

struct FailingRenderer;

#[async_trait]
impl PageRenderer for FailingRenderer {
    async fn render(&self, _url: &Url) -> company_lens::Result<String> {
        Err(Error::cdp("no browser in tests"))
    }
}

fn fetcher(result: Result<&str, StaticFetchError>) -> Arc<PageFetcher> {
    Arc::new(PageFetcher {
        result: result.map(str::to_string),
        calls: AtomicUsize::new(0),
    })
}

fn extractor(page: &Arc<PageFetcher>, model: Option<Arc<MockModel>>) -> Extractor {
    let fetch = FetchStrategy::with_parts(page.clone(), Arc::new(FailingRenderer), 100);
    Extractor::new(
        fetch,
        ContentExtractor::default(),
        model.map(|m| m as Arc<dyn CompletionClient>),
    )
}

const ACME_JSON: &str = r#"{
  "corporateName": "Acme Corporation",
  "foundingYear": "1949",
  "industry": "Manufacturing",
  "employeeScale": "100-299",
  "headOffice": "Osaka",
  "offices": [{"id": 1, "address": "Nagoya"}, {"id": 2, "address": "Fukuoka"}]
}"#;

#[tokio::test]
async fn test_offline_returns_placeholder_without_network() {
    let page = fetcher(Ok(ABOUT_PAGE));
    let extractor = extractor(&page, None);
    assert!(extractor.is_offline());

    let outcome = extractor
        .extract_payload(InputPayload::url("https://example.com"))
        .await
        .unwrap();

    assert!(outcome.placeholder);
    assert_eq!(outcome.record, CompanyRecord::placeholder());
    assert_eq!(page.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_offline_still_rejects_empty_payload() {
    let page = fetcher(Ok(ABOUT_PAGE));
    let err = extractor(&page, None)
        .extract_payload(InputPayload::default())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidInput(_)));
}

#[tokio::test]
async fn test_empty_payload_never_calls_model() {
    let page = fetcher(Ok(ABOUT_PAGE));
    let model = MockModel::text(ACME_JSON);
    let extractor = extractor(&page, Some(model.clone()));

    for payload in [
        InputPayload::default(),
        InputPayload::plain_text("   "),
        InputPayload::url(""),
    ] {
        let err = extractor.extract_payload(payload).await.unwrap_err();
        assert!(err.is_client_error());
    }
    assert_eq!(model.calls(), 0);
    assert_eq!(page.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_plain_text_sent_verbatim() {
    let page = fetcher(Ok(ABOUT_PAGE));
    let model = MockModel::text(ACME_JSON);
    let text = "Acme Corporation, founded 1949, head office in Osaka.";

    let outcome = extractor(&page, Some(model.clone()))
        .extract_payload(InputPayload::plain_text(text))
        .await
        .unwrap();

    assert!(!outcome.placeholder);
    assert_eq!(outcome.record.corporate_name, "Acme Corporation");
    assert_eq!(outcome.record.employee_scale, Some(EmployeeScale::Large));
    assert_eq!(outcome.record.raw_output.as_deref(), Some(ACME_JSON));

    let prompts = model.prompts.lock().unwrap();
    assert_eq!(prompts.len(), 1);
    assert_eq!(prompts[0].0, SYSTEM_PROMPT);
    assert_eq!(prompts[0].1, text);
    assert_eq!(page.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_plain_text_wins_over_url() {
    let page = fetcher(Ok(ABOUT_PAGE));
    let model = MockModel::text(ACME_JSON);

    extractor(&page, Some(model.clone()))
        .extract_payload(InputPayload {
            url: Some("https://example.com".to_string()),
            plain_text: Some("pasted text".to_string()),
        })
        .await
        .unwrap();

    assert_eq!(model.last_user_message(), "pasted text");
    assert_eq!(page.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_url_payload_is_composed_document() {
    let page = fetcher(Ok(ABOUT_PAGE));
    let model = MockModel::text(ACME_JSON);

    extractor(&page, Some(model.clone()))
        .extract_payload(InputPayload::url("https://example.com"))
        .await
        .unwrap();

    let user = model.last_user_message();
    assert!(user.contains("Title: Acme Corporation"), "{}", user);
    assert!(user.contains("Meta description: Precision anvils since 1949"));
    assert!(user.contains("Headings:\nAbout Acme"));
    assert!(user.contains("Body:\nAcme Corporation was founded in 1949 in Osaka."));
    assert!(!user.contains("Home About Contact"));
}

#[tokio::test]
async fn test_fenced_output_parsed() {
    let page = fetcher(Ok(ABOUT_PAGE));
    let fenced = format!("```json\n{}\n```", ACME_JSON);
    let model = MockModel::text(&fenced);

    let outcome = extractor(&page, Some(model))
        .extract_payload(InputPayload::plain_text("Acme"))
        .await
        .unwrap();

    assert_eq!(outcome.record.corporate_name, "Acme Corporation");
    assert_eq!(outcome.record.offices().len(), 2);
    assert_eq!(outcome.record.raw_output.as_deref(), Some(fenced.as_str()));
}

#[tokio::test]
async fn test_non_json_output_degrades_with_raw_text() {
    let page = fetcher(Ok(ABOUT_PAGE));
    let prose = "I'm sorry, but the text does not describe a company.";
    let model = MockModel::text(prose);

    let outcome = extractor(&page, Some(model))
        .extract_payload(InputPayload::plain_text("hello"))
        .await
        .unwrap();

    assert_eq!(outcome.record.corporate_name, EXTRACTION_ERROR_LABEL);
    assert_eq!(outcome.record.raw_output.as_deref(), Some(prose));
    assert!(outcome.record.notes.unwrap().starts_with("Error details: "));
    assert!(!outcome.placeholder);
}

#[tokio::test]
async fn test_empty_output_degrades() {
    let page = fetcher(Ok(ABOUT_PAGE));
    let outcome = extractor(&page, Some(MockModel::text("")))
        .extract_payload(InputPayload::plain_text("Acme"))
        .await
        .unwrap();

    assert!(outcome.record.is_parse_failure());
}

#[tokio::test]
async fn test_offices_capped_and_unique() {
    let page = fetcher(Ok(ABOUT_PAGE));
    let offices: Vec<String> = (0..8)
        .map(|i| format!(r#"{{"id": {}, "address": "Branch {}"}}"#, i % 3, i))
        .collect();
    let reply = format!(
        r#"{{"corporateName": "Acme", "headOffice": "Osaka", "offices": [{}]}}"#,
        offices.join(",")
    );

    let outcome = extractor(&page, Some(MockModel::text(&reply)))
        .extract_payload(InputPayload::plain_text("Acme"))
        .await
        .unwrap();

    let ids: HashSet<u64> = outcome.record.offices().iter().map(|o| o.id).collect();
    assert_eq!(outcome.record.offices().len(), 5);
    assert_eq!(ids.len(), 5);
}

#[tokio::test]
async fn test_model_timeout_propagates() {
    let page = fetcher(Ok(ABOUT_PAGE));
    let err = extractor(&page, Some(MockModel::timing_out()))
        .extract_payload(InputPayload::plain_text("Acme"))
        .await
        .unwrap_err();

    assert!(err.is_timeout());
}

#[tokio::test]
async fn test_fetch_failure_skips_model() {
    let page = fetcher(Err(StaticFetchError::Status { status: 500 }));
    let model = MockModel::text(ACME_JSON);

    let err = extractor(&page, Some(model.clone()))
        .extract_payload(InputPayload::url("https://example.com"))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Fetch(_)));
    assert!(err.to_string().contains("no browser in tests"));
    assert_eq!(model.calls(), 0);
}
