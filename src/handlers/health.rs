//! Liveness check

use super::AppState;
use crate::VERSION;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

/// Health check response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always "healthy" if responding
    pub status: String,
    /// Crate version
    pub version: String,
    /// True when extractions return the placeholder record
    pub offline: bool,
}

impl HealthResponse {
    fn healthy(offline: bool) -> Self {
        Self {
            status: "healthy".to_string(),
            version: VERSION.to_string(),
            offline,
        }
    }
}

/// `GET /health`
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse::healthy(state.extractor.is_offline()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_response_shape() {
        let json = serde_json::to_value(HealthResponse::healthy(true)).unwrap();
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["version"], VERSION);
        assert_eq!(json["offline"], true);
    }
}
