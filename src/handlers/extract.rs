//! `POST /api/extract`

use super::AppState;
use crate::error::Error;
use crate::pipeline::ExtractionOutcome;
use crate::record::InputPayload;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::SecondsFormat;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

/// Response header carrying the extraction timestamp
pub const EXTRACTION_TIME_HEADER: HeaderName = HeaderName::from_static("x-extraction-time");

/// Response header set when the placeholder record was returned
pub const MOCK_RESPONSE_HEADER: HeaderName = HeaderName::from_static("x-mock-response");

/// Error payload: `{ error, details? }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Message suitable for direct display
    pub error: String,
    /// Underlying cause
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorBody {
    fn new<S: Into<String>>(error: S, details: Option<String>) -> Self {
        Self {
            error: error.into(),
            details,
        }
    }
}

/// Status and body for a pipeline failure
pub(crate) fn error_response(err: &Error) -> (StatusCode, ErrorBody) {
    match err {
        Error::InvalidInput(msg) => (
            StatusCode::BAD_REQUEST,
            ErrorBody::new("URL or text content is required", Some(msg.clone())),
        ),
        Error::Timeout { .. } => (
            StatusCode::GATEWAY_TIMEOUT,
            ErrorBody::new("Extraction timed out", Some(err.to_string())),
        ),
        other => (
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorBody::new("Failed to extract company information", Some(other.to_string())),
        ),
    }
}

fn success_response(outcome: ExtractionOutcome) -> Response {
    let stamp = outcome
        .extracted_at
        .to_rfc3339_opts(SecondsFormat::Millis, true);
    let placeholder = outcome.placeholder;

    let mut response = Json(outcome).into_response();
    let headers = response.headers_mut();
    if let Ok(value) = HeaderValue::from_str(&stamp) {
        headers.insert(EXTRACTION_TIME_HEADER, value);
    }
    if placeholder {
        headers.insert(MOCK_RESPONSE_HEADER, HeaderValue::from_static("true"));
    }
    response
}

/// `POST /api/extract`
pub async fn extract_handler(
    State(state): State<AppState>,
    payload: Result<Json<InputPayload>, JsonRejection>,
) -> Response {
    let Json(payload) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            warn!("Rejected request body: {}", rejection.body_text());
            let body = ErrorBody::new("Invalid request body", Some(rejection.body_text()));
            return (StatusCode::BAD_REQUEST, Json(body)).into_response();
        }
    };

    match state.extractor.extract_payload(payload).await {
        Ok(outcome) => {
            info!(
                "Extracted '{}' (placeholder: {})",
                outcome.record.corporate_name, outcome.placeholder
            );
            success_response(outcome)
        }
        Err(err) => {
            let (status, body) = error_response(&err);
            if status.is_server_error() {
                error!("Error in extract API: {}", err);
            } else {
                warn!("Extract request refused: {}", err);
            }
            (status, Json(body)).into_response()
        }
    }
}
