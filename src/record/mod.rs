//! Company records, extraction requests, and record editing

pub mod company;
pub mod editor;
pub mod request;

pub use company::{CompanyRecord, EmployeeScale, Office, EXTRACTION_ERROR_LABEL, MAX_OFFICES};
pub use editor::{RecordEdit, RecordEditor, RecordField, ValidationIssue};
pub use request::{ExtractionRequest, InputPayload};
