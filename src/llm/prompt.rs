//! Extraction schema and payload composition

use crate::extraction::ScrapedDocument;

/// System instruction: output schema and the no-guess policy
pub const SYSTEM_PROMPT: &str = r#"# Role
Company profile research and JSON conversion assistant.

# Goal
Analyze the supplied company information and produce one complete, accurate JSON object.

# Source priority
1. "Company overview" / "About us" / corporate information sections
2. IR material and financial statements
3. Press releases and news
4. Business, product and service descriptions
5. Recruiting and culture pages

# Anti-hallucination rules
1. Never guess a value that is not clearly stated in the source.
2. Only when the source itself is approximate ("approximately", "about", "over") keep that qualifier verbatim.
3. When older and newer information conflict, use the most recent.
4. If the source of a value is unclear, use an empty string.
5. Copy numbers exactly as written; do not convert or calculate.

# Output JSON schema (follow exactly)
{
  "corporateName": "Official company name, including any English name given in parentheses",
  "foundingYear": "Founding year as written, or empty string",
  "industry": "Primary industry, specific",
  "description": "Business description with concrete product/service names, at most 3 lines",
  "employeeScale": "One of: 1-9 | 10-49 | 50-99 | 100-299 | 300+ (empty string if unknown)",
  "headOffice": "Head office location, at least region and city",
  "offices": [{"id": 1, "address": "Full address of a branch or sales office"}],
  "revenue": "Revenue for the latest period as written, or empty string",
  "capital": "Capital as written, or empty string",
  "contactMail": "Official contact email address",
  "challenges": "Current focus areas, challenges and future strategy",
  "notes": "Other important facts: awards, certifications, patents, key clients"
}

# Important
- Use an empty string "" for any field without information. Never use null or words like "unknown".
- List at most 5 offices, numbered from 1.
- Do not speculate.
- Respond with the JSON object only, with no surrounding explanation."#;

/// Compose the user payload from a scraped page
pub fn compose_document(doc: &ScrapedDocument) -> String {
    format!(
        "Company website information:\nTitle: {}\nMeta description: {}\n\nHeadings:\n{}\n\nBody:\n{}",
        doc.title,
        doc.meta_description,
        doc.headings.join("\n"),
        doc.text
    )
    .trim()
    .to_string()
}
