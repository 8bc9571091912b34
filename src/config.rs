//! Runtime configuration
//!
//! Scrape heuristics, model-provider settings, and browser launch options.
//! The scrape thresholds have no derivation beyond observed behavior on
//! company sites, so they are kept as named, tunable values.

use crate::browser::BrowserConfig;
use std::time::Duration;

/// Timeout for the plain HTTP request
pub const STATIC_TIMEOUT: Duration = Duration::from_secs(10);

/// Visible body text below this many chars escalates to a headless render
pub const SPARSE_BODY_THRESHOLD: usize = 100;

/// A main-content candidate shorter than this falls back to the whole body
pub const MIN_MAIN_CONTENT_CHARS: usize = 200;

/// Upper bound on extracted body text
pub const MAX_TEXT_CHARS: usize = 10_000;

/// Upper bound on collected headings
pub const MAX_HEADINGS: usize = 20;

/// Navigation bound for the headless render
pub const RENDER_TIMEOUT: Duration = Duration::from_secs(30);

/// Fixed wait after navigation before serializing the DOM
pub const SETTLE_DELAY: Duration = Duration::from_secs(2);

/// Bound on a single model completion
pub const MODEL_TIMEOUT: Duration = Duration::from_secs(60);

/// Browser-like user agent sent by both fetch tiers
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Default chat model
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Default OpenAI-compatible API root
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Key value shipped in `.env` templates; treated as "no credential"
pub const PLACEHOLDER_API_KEY: &str = "your_openai_api_key_here";

/// Scrape and content-selection settings
#[derive(Debug, Clone)]
pub struct ScrapeConfig {
    /// Static request timeout (default: 10s)
    pub static_timeout: Duration,
    /// Escalation threshold in visible chars (default: 100)
    pub sparse_threshold: usize,
    /// Minimum accepted main-content length (default: 200)
    pub min_main_content_chars: usize,
    /// Body text cap (default: 10000)
    pub max_text_chars: usize,
    /// Heading cap (default: 20)
    pub max_headings: usize,
    /// Render navigation timeout (default: 30s)
    pub render_timeout: Duration,
    /// Post-navigation settle delay (default: 2s)
    pub settle_delay: Duration,
    /// User agent for both tiers
    pub user_agent: String,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            static_timeout: STATIC_TIMEOUT,
            sparse_threshold: SPARSE_BODY_THRESHOLD,
            min_main_content_chars: MIN_MAIN_CONTENT_CHARS,
            max_text_chars: MAX_TEXT_CHARS,
            max_headings: MAX_HEADINGS,
            render_timeout: RENDER_TIMEOUT,
            settle_delay: SETTLE_DELAY,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl ScrapeConfig {
    /// Create a new config builder
    pub fn builder() -> ScrapeConfigBuilder {
        ScrapeConfigBuilder::default()
    }
}

/// Builder for ScrapeConfig
#[derive(Default)]
pub struct ScrapeConfigBuilder {
    config: ScrapeConfig,
}

impl ScrapeConfigBuilder {
    /// Set static request timeout
    pub fn static_timeout(mut self, timeout: Duration) -> Self {
        self.config.static_timeout = timeout;
        self
    }

    /// Set escalation threshold
    pub fn sparse_threshold(mut self, chars: usize) -> Self {
        self.config.sparse_threshold = chars;
        self
    }

    /// Set minimum main-content length
    pub fn min_main_content_chars(mut self, chars: usize) -> Self {
        self.config.min_main_content_chars = chars;
        self
    }

    /// Set body text cap
    pub fn max_text_chars(mut self, chars: usize) -> Self {
        self.config.max_text_chars = chars;
        self
    }

    /// Set heading cap
    pub fn max_headings(mut self, count: usize) -> Self {
        self.config.max_headings = count;
        self
    }

    /// Set render navigation timeout
    pub fn render_timeout(mut self, timeout: Duration) -> Self {
        self.config.render_timeout = timeout;
        self
    }

    /// Set settle delay
    pub fn settle_delay(mut self, delay: Duration) -> Self {
        self.config.settle_delay = delay;
        self
    }

    /// Set user agent
    pub fn user_agent<S: Into<String>>(mut self, ua: S) -> Self {
        self.config.user_agent = ua.into();
        self
    }

    /// Build the config
    pub fn build(self) -> ScrapeConfig {
        self.config
    }
}

/// Model provider settings
#[derive(Clone)]
pub struct LlmConfig {
    /// API key (None = offline placeholder mode)
    pub api_key: Option<String>,
    /// Chat model name
    pub model: String,
    /// OpenAI-compatible API root, without trailing slash
    pub base_url: String,
    /// Caller-side bound on one completion (default: 60s)
    pub timeout: Duration,
}

impl std::fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: MODEL_TIMEOUT,
        }
    }
}

impl LlmConfig {
    /// Load from `OPENAI_API_KEY`, `OPENAI_MODEL` and `OPENAI_BASE_URL`
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.api_key = std::env::var("OPENAI_API_KEY").ok();
        if let Ok(model) = std::env::var("OPENAI_MODEL") {
            if !model.trim().is_empty() {
                config.model = model;
            }
        }
        if let Ok(base_url) = std::env::var("OPENAI_BASE_URL") {
            if !base_url.trim().is_empty() {
                config.base_url = base_url.trim_end_matches('/').to_string();
            }
        }
        config
    }

    /// Set the API key
    pub fn with_api_key<S: Into<String>>(mut self, key: S) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set the model
    pub fn with_model<S: Into<String>>(mut self, model: S) -> Self {
        self.model = model.into();
        self
    }

    /// Set the API root
    pub fn with_base_url<S: Into<String>>(mut self, base_url: S) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the completion timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The usable credential, if any
    pub fn credential(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty() && *k != PLACEHOLDER_API_KEY)
    }

    /// Whether a usable credential is configured
    pub fn has_credential(&self) -> bool {
        self.credential().is_some()
    }
}

/// Everything the pipeline needs
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    /// Scrape heuristics
    pub scrape: ScrapeConfig,
    /// Model provider
    pub llm: LlmConfig,
    /// Headless browser launch options
    pub browser: BrowserConfig,
}

impl AppConfig {
    /// Defaults plus model settings from the environment
    pub fn from_env() -> Self {
        Self {
            llm: LlmConfig::from_env(),
            ..Self::default()
        }
    }
}
