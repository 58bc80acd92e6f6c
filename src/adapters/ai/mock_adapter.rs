//! Mock extractor for running without API keys.
//!
//! Always answers with the same canned record, serialized the way a
//! well-behaved model would answer.

use crate::domain::{DomainError, ExtractedRecord, Urgency};
use crate::ports::Extractor;
use tracing::info;

/// Mock extractor. No network calls.
#[derive(Debug, Default)]
pub struct MockExtractor;

impl MockExtractor {
    pub fn new() -> Self {
        Self
    }

    /// The record every mock extraction yields.
    pub fn canned_record() -> ExtractedRecord {
        ExtractedRecord {
            summary: "Mock summary: Customer requesting help with login issues".to_string(),
            customer_name: "John Doe".to_string(),
            topic: "Login Issues".to_string(),
            urgency: Urgency::High,
        }
    }
}

#[async_trait::async_trait]
impl Extractor for MockExtractor {
    async fn extract(&self, prompt: &str) -> Result<String, DomainError> {
        info!(prompt_len = prompt.len(), "[MOCK] Simulating extraction");

        serde_json::to_string(&Self::canned_record())
            .map_err(|e| DomainError::ExtractionUnavailable(e.to_string()))
    }
}
