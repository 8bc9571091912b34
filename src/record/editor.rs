//! Human correction of an extracted record
//!
//! Editing is an explicit sequence: load a record, apply edits,
//! validate, emit the updated record. The editor owns its copy; nothing
//! is shared with the caller until [`RecordEditor::emit`].

use super::company::{next_office_id, CompanyRecord, EmployeeScale, Office, MAX_OFFICES};
use crate::error::EditError;
use serde::Serialize;

/// Editable text fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordField {
    /// `corporateName`
    CorporateName,
    /// `foundingYear`
    FoundingYear,
    /// `industry`
    Industry,
    /// `description`
    Description,
    /// `headOffice`
    HeadOffice,
    /// `revenue`
    Revenue,
    /// `capital`
    Capital,
    /// `contactMail`
    ContactMail,
    /// `challenges`
    Challenges,
    /// `notes`
    Notes,
}

/// One change applied by a human editor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordEdit {
    /// Replace a text field
    SetField(RecordField, String),
    /// Replace the headcount band
    SetEmployeeScale(Option<EmployeeScale>),
    /// Append an office; ids continue from the current maximum
    AddOffice(String),
    /// Change an office address
    UpdateOffice {
        /// Office to change
        id: u64,
        /// New address
        address: String,
    },
    /// Remove an office
    RemoveOffice(u64),
}

/// A validation failure on one field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    /// Wire name of the field
    pub field: &'static str,
    /// Human-readable problem
    pub message: String,
}

impl ValidationIssue {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Applies edits to a loaded record
#[derive(Debug, Clone)]
pub struct RecordEditor {
    record: CompanyRecord,
}

impl RecordEditor {
    /// Start editing `record`
    pub fn load(record: CompanyRecord) -> Self {
        Self { record }
    }

    /// Current state of the record
    pub fn record(&self) -> &CompanyRecord {
        &self.record
    }

    /// Apply one edit
    pub fn apply(&mut self, edit: RecordEdit) -> Result<(), EditError> {
        match edit {
            RecordEdit::SetField(field, value) => self.set_field(field, value),
            RecordEdit::SetEmployeeScale(scale) => self.record.employee_scale = scale,
            RecordEdit::AddOffice(address) => {
                let offices = self.record.offices.get_or_insert_with(Vec::new);
                if offices.len() >= MAX_OFFICES {
                    return Err(EditError::OfficeLimit(MAX_OFFICES));
                }
                let id = next_office_id(offices);
                offices.push(Office { id, address });
            }
            RecordEdit::UpdateOffice { id, address } => {
                let office = self
                    .record
                    .offices
                    .as_mut()
                    .and_then(|offices| offices.iter_mut().find(|o| o.id == id))
                    .ok_or(EditError::UnknownOffice(id))?;
                office.address = address;
            }
            RecordEdit::RemoveOffice(id) => {
                let offices = self
                    .record
                    .offices
                    .as_mut()
                    .ok_or(EditError::UnknownOffice(id))?;
                let before = offices.len();
                offices.retain(|o| o.id != id);
                if offices.len() == before {
                    return Err(EditError::UnknownOffice(id));
                }
            }
        }
        Ok(())
    }

    /// Apply edits in order, stopping at the first failure
    pub fn apply_all<I>(&mut self, edits: I) -> Result<(), EditError>
    where
        I: IntoIterator<Item = RecordEdit>,
    {
        edits.into_iter().try_for_each(|edit| self.apply(edit))
    }

    fn set_field(&mut self, field: RecordField, value: String) {
        let r = &mut self.record;
        match field {
            RecordField::CorporateName => r.corporate_name = value,
            RecordField::HeadOffice => r.head_office = value,
            RecordField::FoundingYear => r.founding_year = Some(value),
            RecordField::Industry => r.industry = Some(value),
            RecordField::Description => r.description = Some(value),
            RecordField::Revenue => r.revenue = Some(value),
            RecordField::Capital => r.capital = Some(value),
            RecordField::ContactMail => r.contact_mail = Some(value),
            RecordField::Challenges => r.challenges = Some(value),
            RecordField::Notes => r.notes = Some(value),
        }
    }

    /// Check the record against the invariants a saved profile must hold
    pub fn validate(&self) -> Vec<ValidationIssue> {
        let r = &self.record;
        let mut issues = Vec::new();

        if r.corporate_name.trim().is_empty() {
            issues.push(ValidationIssue::new("corporateName", "corporate name is required"));
        }
        if r.head_office.trim().is_empty() {
            issues.push(ValidationIssue::new("headOffice", "head office is required"));
        }

        let offices = r.offices();
        if offices.len() > MAX_OFFICES {
            issues.push(ValidationIssue::new(
                "offices",
                format!("at most {} offices allowed", MAX_OFFICES),
            ));
        }
        let mut ids: Vec<u64> = offices.iter().map(|o| o.id).collect();
        ids.sort_unstable();
        if ids.windows(2).any(|w| w[0] == w[1]) {
            issues.push(ValidationIssue::new("offices", "office ids must be unique"));
        }

        if let Some(mail) = r.contact_mail.as_deref().filter(|m| !m.is_empty()) {
            if !looks_like_email(mail) {
                issues.push(ValidationIssue::new("contactMail", "not a valid email address"));
            }
        }

        issues
    }

    /// Finish editing, returning the record if it validates
    pub fn emit(self) -> Result<CompanyRecord, Vec<ValidationIssue>> {
        let issues = self.validate();
        if issues.is_empty() {
            Ok(self.record)
        } else {
            Err(issues)
        }
    }
}

fn looks_like_email(mail: &str) -> bool {
    let mut parts = mail.trim().split('@');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => {
            !local.is_empty() && !domain.is_empty() && !domain.contains(char::is_whitespace)
        }
        _ => false,
    }
}
