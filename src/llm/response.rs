//! Model response interpretation
//!
//! Fence stripping, parsing into a [`CompanyRecord`], and the degraded
//! record used when the text is not the JSON object we asked for.

use crate::error::{Error, Result};
use crate::record::CompanyRecord;
use regex::Regex;
use std::sync::OnceLock;
use tracing::{error, warn};

fn fence_regex() -> &'static Regex {
    static FENCE: OnceLock<Regex> = OnceLock::new();
    FENCE.get_or_init(|| {
        Regex::new(r"(?s)^```[A-Za-z0-9_-]*[ \t]*\r?\n?(.*?)(?:\r?\n?```)?$")
            .expect("static regex")
    })
}

/// Remove a surrounding ```json ... ``` or ``` ... ``` wrapper
pub fn strip_code_fences(content: &str) -> &str {
    let trimmed = content.trim();
    if !trimmed.starts_with("```") {
        return trimmed;
    }
    fence_regex()
        .captures(trimmed)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .unwrap_or(trimmed)
}

/// Parse model output into a record; `raw_output` is set to `content`.
///
/// Fails with [`Error::ModelResponse`] when the content is empty or
/// does not deserialize.
pub fn parse_record(content: &str) -> Result<CompanyRecord> {
    if content.trim().is_empty() {
        return Err(Error::ModelResponse(
            "no content received from model".to_string(),
        ));
    }

    let json = strip_code_fences(content);
    let mut record: CompanyRecord =
        serde_json::from_str(json).map_err(|e| Error::ModelResponse(e.to_string()))?;

    record.normalize_offices();
    record.raw_output = Some(content.to_string());
    Ok(record)
}

/// Parse model output, recovering locally into a degraded record
pub fn parse_or_degrade(content: &str) -> CompanyRecord {
    match parse_record(content) {
        Ok(record) => record,
        Err(e) => {
            let detail = match e {
                Error::ModelResponse(msg) => msg,
                other => other.to_string(),
            };
            error!("Model output parse error: {}", detail);
            warn!("Returning degraded record ({} raw chars kept)", content.len());
            CompanyRecord::parse_failure(&detail, content)
        }
    }
}
