//! HTTP handlers for the extraction server
//!
//! - `POST /api/extract` - run one extraction
//! - `GET /health` - liveness check

pub mod extract;
pub mod health;

pub use extract::{extract_handler, ErrorBody, EXTRACTION_TIME_HEADER, MOCK_RESPONSE_HEADER};
pub use health::{health_handler, HealthResponse};

use crate::pipeline::Extractor;
use std::sync::Arc;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    /// The extraction pipeline
    pub extractor: Arc<Extractor>,
}

impl AppState {
    /// Wrap an extractor
    pub fn new(extractor: Extractor) -> Self {
        Self {
            extractor: Arc::new(extractor),
        }
    }
}
