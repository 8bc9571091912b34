//! Extraction request shapes

use crate::error::Error;
use serde::{Deserialize, Serialize};

/// Inbound body of `POST /api/extract`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputPayload {
    /// Page to scrape
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Text to extract from directly
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plain_text: Option<String>,
}

impl InputPayload {
    /// Payload carrying a URL
    pub fn url<S: Into<String>>(url: S) -> Self {
        Self {
            url: Some(url.into()),
            plain_text: None,
        }
    }

    /// Payload carrying plain text
    pub fn plain_text<S: Into<String>>(text: S) -> Self {
        Self {
            url: None,
            plain_text: Some(text.into()),
        }
    }
}

/// A validated source of content; exactly one is chosen
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionRequest {
    /// Scrape this URL
    Url(String),
    /// Use this text verbatim
    PlainText(String),
}

impl ExtractionRequest {
    /// Short label for logs
    pub fn kind(&self) -> &'static str {
        match self {
            ExtractionRequest::Url(_) => "url",
            ExtractionRequest::PlainText(_) => "plain_text",
        }
    }
}

impl TryFrom<InputPayload> for ExtractionRequest {
    type Error = Error;

    /// Plain text wins when both are present; blank values count as absent.
    fn try_from(payload: InputPayload) -> Result<Self, Self::Error> {
        let present = |value: Option<String>| value.filter(|v| !v.trim().is_empty());

        if let Some(text) = present(payload.plain_text) {
            return Ok(ExtractionRequest::PlainText(text));
        }
        if let Some(url) = present(payload.url) {
            return Ok(ExtractionRequest::Url(url.trim().to_string()));
        }
        Err(Error::invalid_input("no content to process"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_camel_case() {
        let payload: InputPayload =
            serde_json::from_str(r#"{"plainText": "Acme Inc. was founded in 1999."}"#).unwrap();
        assert_eq!(payload.plain_text.as_deref(), Some("Acme Inc. was founded in 1999."));
        assert!(payload.url.is_none());
    }

    #[test]
    fn test_plain_text_wins() {
        let payload = InputPayload {
            url: Some("https://example.com".into()),
            plain_text: Some("text".into()),
        };
        assert_eq!(
            ExtractionRequest::try_from(payload).unwrap(),
            ExtractionRequest::PlainText("text".into())
        );
    }

    #[test]
    fn test_blank_fields_are_absent() {
        let payload = InputPayload {
            url: Some(" https://example.com ".into()),
            plain_text: Some("   ".into()),
        };
        assert_eq!(
            ExtractionRequest::try_from(payload).unwrap(),
            ExtractionRequest::Url("https://example.com".into())
        );
    }

    #[test]
    fn test_empty_payload_rejected() {
        let err = ExtractionRequest::try_from(InputPayload::default()).unwrap_err();
        assert!(err.is_client_error());

        let err = ExtractionRequest::try_from(InputPayload {
            url: Some(String::new()),
            plain_text: Some(String::new()),
        })
        .unwrap_err();
        assert!(err.is_client_error());
    }
}
