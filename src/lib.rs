//! Company Lens - company profile extraction
//!
//! Turns a company website URL or a block of free text into a structured
//! [`CompanyRecord`] by way of a chat-completion model.
//!
//! # Architecture
//!
//! ```text
//! InputPayload ──▶ ExtractionRequest
//!                    │            │
//!                   url      plain text
//!                    ▼            │
//!             FetchStrategy       │
//!          (static ▶ headless)    │
//!                    ▼            │
//!            ContentExtractor     │
//!                    ▼            ▼
//!              compose_document ──▶ CompletionClient ──▶ CompanyRecord
//! ```
//!
//! Without a model credential the [`Extractor`] answers every valid request
//! with a fixed placeholder record, flagged as such.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use company_lens::config::AppConfig;
//! use company_lens::record::InputPayload;
//! use company_lens::Extractor;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let extractor = Extractor::from_config(&AppConfig::from_env())?;
//!     let outcome = extractor
//!         .extract_payload(InputPayload::url("https://example.com"))
//!         .await?;
//!
//!     println!("{}", outcome.record.corporate_name);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod browser;
pub mod client;
pub mod config;
pub mod cors;
pub mod error;
pub mod extraction;
pub mod fetch;
pub mod handlers;
pub mod llm;
pub mod pipeline;
pub mod record;
pub mod server;

// Re-exports for convenience
pub use client::{ApiError, ExtractClient};
pub use error::{Error, Result};
pub use extraction::{ContentExtractor, MetadataExtractor, ScrapedDocument};
pub use pipeline::{ExtractionOutcome, Extractor};
pub use record::{CompanyRecord, RecordEditor};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
