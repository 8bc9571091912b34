//! Model-call contract
//!
//! The completion client, the extraction schema sent as the system
//! instruction, and interpretation of what comes back.

pub mod client;
pub mod prompt;
pub mod response;

pub use client::{CompletionClient, OpenAiClient};
pub use prompt::{compose_document, SYSTEM_PROMPT};
pub use response::{parse_or_degrade, parse_record, strip_code_fences};
