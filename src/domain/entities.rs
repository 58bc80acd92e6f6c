//! Domain entities. Pure data structures for the core business.
//!
//! No HTTP, LLM or spreadsheet types here. Adapters map into these.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::DomainError;

/// Placeholder for any field the model did not provide.
pub const UNKNOWN: &str = "Unknown";

/// Minimum number of non-whitespace characters a submitted email must carry.
pub const MIN_EMAIL_CHARS: usize = 10;

/// Maximum number of characters of the original email stored next to a record.
pub const EMAIL_PREVIEW_CHARS: usize = 500;

/// Urgency level assigned to a support email.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    High,
    #[default]
    Medium,
    Low,
}

impl Urgency {
    /// Case-insensitive match against high/medium/low. Anything else is `Medium`.
    pub fn normalize(raw: &str) -> Self {
        match raw.to_lowercase().as_str() {
            "high" => Self::High,
            "low" => Self::Low,
            _ => Self::Medium,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl fmt::Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured fields extracted from one support email.
///
/// Always complete: missing fields are `"Unknown"` and urgency is one of the
/// three known levels. Built once per request and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedRecord {
    pub summary: String,
    pub customer_name: String,
    pub topic: String,
    pub urgency: Urgency,
}

impl ExtractedRecord {
    /// Flagged record returned when the model answered but the answer could not be parsed.
    pub fn fallback() -> Self {
        Self {
            summary: "Error processing email - manual review required".to_string(),
            customer_name: UNKNOWN.to_string(),
            topic: "Error".to_string(),
            urgency: Urgency::Medium,
        }
    }
}

/// Raw email text that passed the minimum-length check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmittedEmail(String);

impl SubmittedEmail {
    /// Accepts text with at least [`MIN_EMAIL_CHARS`] non-whitespace characters.
    pub fn parse(raw: impl Into<String>) -> Result<Self, DomainError> {
        let raw = raw.into();
        let visible = raw.chars().filter(|c| !c.is_whitespace()).count();
        if visible < MIN_EMAIL_CHARS {
            return Err(DomainError::InvalidInput(format!(
                "Email content is required and must be at least {} characters",
                MIN_EMAIL_CHARS
            )));
        }
        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First [`EMAIL_PREVIEW_CHARS`] characters, as stored in the tracking sheet.
    pub fn preview(&self) -> &str {
        truncate_chars(&self.0, EMAIL_PREVIEW_CHARS)
    }
}

/// Where a record landed in the tabular store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskReceipt {
    pub success: bool,
    pub message: String,
    /// 1-based row index after the append.
    pub row_number: u64,
    pub sheet_url: String,
}

/// Prefix of `s` holding at most `max` characters, cut on a char boundary.
pub fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
