//! Company profile record
//!
//! The JSON shape the model is asked to produce and the HTTP layer
//! returns. Deserialization is lenient about scalar types because model
//! output is; optional fields are omitted rather than serialized as null.

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Maximum number of branch offices on a record
pub const MAX_OFFICES: usize = 5;

/// Office id standing for "not assigned yet"; replaced by normalization
pub const UNASSIGNED_OFFICE_ID: u64 = 0;

/// `corporateName` of a record built from unparseable model output
pub const EXTRACTION_ERROR_LABEL: &str = "Extraction error";

/// Employee headcount band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EmployeeScale {
    /// 1 to 9 employees
    #[serde(rename = "1-9")]
    Micro,
    /// 10 to 49 employees
    #[serde(rename = "10-49")]
    Small,
    /// 50 to 99 employees
    #[serde(rename = "50-99")]
    Medium,
    /// 100 to 299 employees
    #[serde(rename = "100-299")]
    Large,
    /// 300 or more employees
    #[serde(rename = "300+")]
    Enterprise,
}

impl EmployeeScale {
    /// All bands, smallest first
    pub const ALL: [EmployeeScale; 5] = [
        EmployeeScale::Micro,
        EmployeeScale::Small,
        EmployeeScale::Medium,
        EmployeeScale::Large,
        EmployeeScale::Enterprise,
    ];

    /// Wire label of the band
    pub fn as_str(&self) -> &'static str {
        match self {
            EmployeeScale::Micro => "1-9",
            EmployeeScale::Small => "10-49",
            EmployeeScale::Medium => "50-99",
            EmployeeScale::Large => "100-299",
            EmployeeScale::Enterprise => "300+",
        }
    }
}

impl fmt::Display for EmployeeScale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EmployeeScale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|scale| scale.as_str() == trimmed)
            .ok_or_else(|| format!("unknown employee scale: {}", trimmed))
    }
}

/// A branch office
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Office {
    /// Identifier, unique within a record. Numeric strings are accepted;
    /// a missing or unreadable id comes in as [`UNASSIGNED_OFFICE_ID`]
    #[serde(default, deserialize_with = "lenient_office_id")]
    pub id: u64,
    /// Full address
    #[serde(default, deserialize_with = "lenient_string")]
    pub address: String,
}

/// Structured company profile
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyRecord {
    /// Registered company name
    #[serde(default, deserialize_with = "lenient_string")]
    pub corporate_name: String,
    /// Founding year as written in the source
    #[serde(default, deserialize_with = "lenient_opt_string", skip_serializing_if = "Option::is_none")]
    pub founding_year: Option<String>,
    /// Primary industry
    #[serde(default, deserialize_with = "lenient_opt_string", skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    /// Business description
    #[serde(default, deserialize_with = "lenient_opt_string", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Headcount band
    #[serde(default, deserialize_with = "lenient_scale", skip_serializing_if = "Option::is_none")]
    pub employee_scale: Option<EmployeeScale>,
    /// Head office location
    #[serde(default, deserialize_with = "lenient_string")]
    pub head_office: String,
    /// Branch offices, at most [`MAX_OFFICES`]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offices: Option<Vec<Office>>,
    /// Revenue as written in the source
    #[serde(default, deserialize_with = "lenient_opt_string", skip_serializing_if = "Option::is_none")]
    pub revenue: Option<String>,
    /// Capital as written in the source
    #[serde(default, deserialize_with = "lenient_opt_string", skip_serializing_if = "Option::is_none")]
    pub capital: Option<String>,
    /// Public contact address
    #[serde(default, deserialize_with = "lenient_opt_string", skip_serializing_if = "Option::is_none")]
    pub contact_mail: Option<String>,
    /// Current focus areas and strategy
    #[serde(default, deserialize_with = "lenient_opt_string", skip_serializing_if = "Option::is_none")]
    pub challenges: Option<String>,
    /// Anything else notable
    #[serde(default, deserialize_with = "lenient_opt_string", skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Verbatim model response
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_output: Option<String>,
}

impl CompanyRecord {
    /// Illustrative record returned when no model credential is configured
    pub fn placeholder() -> Self {
        Self {
            corporate_name: "Sample Corporation".to_string(),
            founding_year: Some("2010".to_string()),
            industry: Some("IT / Software Development".to_string()),
            description: Some(
                "Web application development and systems consulting, with a focus on modern web stacks."
                    .to_string(),
            ),
            employee_scale: Some(EmployeeScale::Medium),
            head_office: "Shibuya, Tokyo".to_string(),
            offices: Some(vec![
                Office {
                    id: 1,
                    address: "1-1-1 Shibuya, Shibuya-ku, Tokyo".to_string(),
                },
                Office {
                    id: 2,
                    address: "2-2-2 Umeda, Kita-ku, Osaka".to_string(),
                },
            ]),
            revenue: Some("500 million JPY".to_string()),
            capital: Some("10 million JPY".to_string()),
            contact_mail: Some("info@sample.com".to_string()),
            challenges: Some("AI-driven services and overseas expansion".to_string()),
            notes: Some("ISO 27001 certified".to_string()),
            raw_output: Some("Mock response for development".to_string()),
        }
    }

    /// Record carrying diagnostics instead of facts when the model
    /// output could not be parsed; `raw` is kept verbatim
    pub fn parse_failure(detail: &str, raw: &str) -> Self {
        Self {
            corporate_name: EXTRACTION_ERROR_LABEL.to_string(),
            head_office: String::new(),
            description: Some(
                "An error occurred while extracting information from the model response"
                    .to_string(),
            ),
            notes: Some(format!("Error details: {}", detail)),
            raw_output: Some(raw.to_string()),
            ..Self::default()
        }
    }

    /// True for records built by [`CompanyRecord::parse_failure`]
    pub fn is_parse_failure(&self) -> bool {
        self.corporate_name == EXTRACTION_ERROR_LABEL
    }

    /// Offices, or an empty slice
    pub fn offices(&self) -> &[Office] {
        self.offices.as_deref().unwrap_or(&[])
    }

    /// Enforce the office invariants: at most [`MAX_OFFICES`] entries and
    /// unique non-zero ids. Unassigned ids and repeats after the first
    /// occurrence get a fresh id from [`next_office_id`].
    pub fn normalize_offices(&mut self) {
        let Some(offices) = self.offices.as_mut() else {
            return;
        };

        offices.truncate(MAX_OFFICES);

        for i in 0..offices.len() {
            let id = offices[i].id;
            if id == UNASSIGNED_OFFICE_ID || offices[..i].iter().any(|o| o.id == id) {
                offices[i].id = next_office_id(offices);
            }
        }
    }
}

/// A fresh id for `offices`: one past the largest id, or the smallest
/// unused positive id once the largest is `u64::MAX`
pub(crate) fn next_office_id(offices: &[Office]) -> u64 {
    let max = offices.iter().map(|o| o.id).max().unwrap_or(UNASSIGNED_OFFICE_ID);
    max.checked_add(1).unwrap_or_else(|| {
        let mut id = 1;
        while offices.iter().any(|o| o.id == id) {
            id += 1;
        }
        id
    })
}

fn lenient_opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(other) => Err(de::Error::custom(format!(
            "expected a string, found {}",
            other
        ))),
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    lenient_opt_string(deserializer).map(Option::unwrap_or_default)
}

fn lenient_office_id<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let id = match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => n.as_u64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    };
    Ok(id.unwrap_or(UNASSIGNED_OFFICE_ID))
}

fn lenient_scale<'de, D>(deserializer: D) -> Result<Option<EmployeeScale>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_opt_string(deserializer)?.and_then(|s| s.parse().ok()))
}
