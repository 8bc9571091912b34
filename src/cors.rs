//! CORS policy for the extraction server
//!
//! Only browser pages served from `localhost`, `127.0.0.1` or `[::1]`
//! (any port, http or https) may call the API. The extraction headers
//! are exposed so a local UI can tell placeholder responses apart.

use crate::handlers::{EXTRACTION_TIME_HEADER, MOCK_RESPONSE_HEADER};
use http::header::{HeaderValue, CONTENT_TYPE};
use http::Method;
use std::time::Duration;
use tower_http::cors::{AllowOrigin, CorsLayer};
use url::{Host, Url};

/// Allowed request methods
pub const ALLOWED_METHODS: [Method; 3] = [Method::GET, Method::POST, Method::OPTIONS];

/// Preflight cache lifetime
pub const DEFAULT_MAX_AGE_SECS: u64 = 3600;

/// Localhost-only CORS layer
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(|origin, _| {
            is_localhost_origin(origin)
        }))
        .allow_methods(ALLOWED_METHODS)
        .allow_headers([CONTENT_TYPE])
        .expose_headers([EXTRACTION_TIME_HEADER, MOCK_RESPONSE_HEADER])
        .max_age(Duration::from_secs(DEFAULT_MAX_AGE_SECS))
}

/// True for http(s) origins whose host is a loopback name or address
pub fn is_localhost_origin(origin: &HeaderValue) -> bool {
    let Ok(origin) = origin.to_str() else {
        return false;
    };
    let Ok(url) = Url::parse(origin) else {
        return false;
    };
    if !matches!(url.scheme(), "http" | "https") {
        return false;
    }
    match url.host() {
        Some(Host::Domain(domain)) => domain.eq_ignore_ascii_case("localhost"),
        Some(Host::Ipv4(ip)) => ip.is_loopback(),
        Some(Host::Ipv6(ip)) => ip.is_loopback(),
        None => false,
    }
}
