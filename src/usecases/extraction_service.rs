//! Extraction service. Turns raw model output into a valid `ExtractedRecord`.
//!
//! The model is asked for a bare JSON object with four keys. Whatever comes
//! back, the caller gets a complete record: fenced output is unwrapped,
//! missing keys become "Unknown", urgency is coerced into high/medium/low,
//! and unparseable content degrades to [`ExtractedRecord::fallback`].
//! Only a failed call (network, auth, quota) is reported as an error.

use crate::domain::{DomainError, ExtractedRecord, SubmittedEmail, UNKNOWN, Urgency};
use crate::ports::Extractor;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Upper bound on raw content echoed into the log when parsing fails.
const LOG_PREVIEW_CHARS: usize = 200;

/// Service wrapping an [`Extractor`] with the normalization contract.
pub struct ExtractionService {
    extractor: Arc<dyn Extractor>,
}

impl ExtractionService {
    pub fn new(extractor: Arc<dyn Extractor>) -> Self {
        Self { extractor }
    }

    /// Extract structured fields from `email`.
    ///
    /// # Errors
    /// `DomainError::ExtractionUnavailable` when the extraction call fails.
    /// Malformed content never produces an error.
    pub async fn extract(&self, email: &SubmittedEmail) -> Result<ExtractedRecord, DomainError> {
        let prompt = build_prompt(email.as_str());
        let raw = self.extractor.extract(&prompt).await?;
        debug!(raw_len = raw.len(), "received extraction output");

        match parse_record(&raw) {
            Ok(record) => {
                info!(
                    customer = %record.customer_name,
                    topic = %record.topic,
                    urgency = %record.urgency,
                    "email fields extracted"
                );
                Ok(record)
            }
            Err(e) => {
                warn!(
                    error = %e,
                    raw = %raw.chars().take(LOG_PREVIEW_CHARS).collect::<String>(),
                    "extraction output unparseable, using fallback record"
                );
                Ok(ExtractedRecord::fallback())
            }
        }
    }
}

/// Instruction sent to the model for one email.
pub fn build_prompt(email_content: &str) -> String {
    format!(
        r#"You are an AI assistant helping a customer support team.
Analyze the following email and extract key information.

Email:
{email_content}

Please respond with ONLY a JSON object in this exact format:
{{
    "summary": "A brief 1-2 sentence summary of the email",
    "customer_name": "The customer's name (or 'Unknown' if not found)",
    "topic": "The main topic/category (e.g., Technical Issue, Billing, Feature Request)",
    "urgency": "high, medium, or low based on the email content"
}}

Do not include any other text, just the JSON object."#
    )
}

/// Strip a surrounding markdown code fence (```` ```json ```` or bare ```` ``` ````).
pub fn strip_code_fence(raw: &str) -> &str {
    let mut content = raw.trim();
    if let Some(rest) = content.strip_prefix("```") {
        content = rest.strip_prefix("json").unwrap_or(rest);
    }
    if let Some(rest) = content.strip_suffix("```") {
        content = rest;
    }
    content.trim()
}

/// Parse model output into a record, backfilling and coercing fields.
///
/// # Errors
/// `DomainError::ExtractionMalformed` if the content is not a JSON object.
pub fn parse_record(raw: &str) -> Result<ExtractedRecord, DomainError> {
    let content = strip_code_fence(raw);
    let value: Value = serde_json::from_str(content)
        .map_err(|e| DomainError::ExtractionMalformed(e.to_string()))?;
    let Value::Object(fields) = value else {
        return Err(DomainError::ExtractionMalformed(
            "expected a JSON object".to_string(),
        ));
    };

    let urgency = match fields.get("urgency") {
        Some(Value::String(s)) => Urgency::normalize(s),
        _ => Urgency::Medium,
    };

    Ok(ExtractedRecord {
        summary: text_field(&fields, "summary"),
        customer_name: text_field(&fields, "customer_name"),
        topic: text_field(&fields, "topic"),
        urgency,
    })
}

fn text_field(fields: &Map<String, Value>, key: &str) -> String {
    match fields.get(key) {
        None | Some(Value::Null) => UNKNOWN.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Extractor stand-in returning a fixed answer and counting calls.
    struct ScriptedExtractor {
        answer: Result<String, String>,
        calls: AtomicUsize,
    }

    impl ScriptedExtractor {
        fn answering(text: &str) -> Self {
            Self {
                answer: Ok(text.to_string()),
                calls: AtomicUsize::new(0),
            }
        }

        fn failing(msg: &str) -> Self {
            Self {
                answer: Err(msg.to_string()),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait::async_trait]
    impl Extractor for ScriptedExtractor {
        async fn extract(&self, _prompt: &str) -> Result<String, DomainError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.answer
                .clone()
                .map_err(DomainError::ExtractionUnavailable)
        }
    }

    fn email() -> SubmittedEmail {
        SubmittedEmail::parse("Hi, I can't log into my account, please help! - Jane").unwrap()
    }

    #[test]
    fn test_strip_code_fence_json_tag() {
        let input = "```json\n{\"summary\": \"test\"}\n```";
        assert_eq!(strip_code_fence(input), "{\"summary\": \"test\"}");
    }

    #[test]
    fn test_strip_code_fence_no_lang() {
        let input = "```\n{\"summary\": \"test\"}\n```";
        assert_eq!(strip_code_fence(input), "{\"summary\": \"test\"}");
    }

    #[test]
    fn test_strip_code_fence_plain() {
        let input = "  {\"summary\": \"test\"}  ";
        assert_eq!(strip_code_fence(input), "{\"summary\": \"test\"}");
    }

    #[test]
    fn test_parse_record_well_formed_round_trip() {
        let raw = r#"{"summary":"Cannot log in","customer_name":"Jane","topic":"Login Issues","urgency":"high"}"#;
        let record = parse_record(raw).unwrap();
        assert_eq!(
            record,
            ExtractedRecord {
                summary: "Cannot log in".to_string(),
                customer_name: "Jane".to_string(),
                topic: "Login Issues".to_string(),
                urgency: Urgency::High,
            }
        );
    }

    #[test]
    fn test_parse_record_lowercases_urgency() {
        let raw = r#"{"summary":"s","customer_name":"c","topic":"t","urgency":"LOW"}"#;
        assert_eq!(parse_record(raw).unwrap().urgency, Urgency::Low);
    }

    #[test]
    fn test_parse_record_unknown_urgency_is_medium() {
        let raw = r#"{"summary":"s","customer_name":"c","topic":"t","urgency":"urgent!!"}"#;
        assert_eq!(parse_record(raw).unwrap().urgency, Urgency::Medium);
    }

    #[test]
    fn test_parse_record_padded_urgency_is_medium() {
        let raw = r#"{"summary":"s","customer_name":"c","topic":"t","urgency":"  high "}"#;
        assert_eq!(parse_record(raw).unwrap().urgency, Urgency::Medium);
    }

    #[test]
    fn test_parse_record_non_string_urgency_is_medium() {
        let raw = r#"{"summary":"s","customer_name":"c","topic":"t","urgency":3}"#;
        assert_eq!(parse_record(raw).unwrap().urgency, Urgency::Medium);
    }

    #[test]
    fn test_parse_record_backfills_missing_keys() {
        let record = parse_record(r#"{"summary":"Only a summary"}"#).unwrap();
        assert_eq!(record.summary, "Only a summary");
        assert_eq!(record.customer_name, "Unknown");
        assert_eq!(record.topic, "Unknown");
        assert_eq!(record.urgency, Urgency::Medium);
    }

    #[test]
    fn test_parse_record_null_is_unknown() {
        let raw = r#"{"summary":"s","customer_name":null,"topic":"t","urgency":"high"}"#;
        assert_eq!(parse_record(raw).unwrap().customer_name, "Unknown");
    }

    #[test]
    fn test_parse_record_drops_extra_keys_and_renders_scalars() {
        let raw = r#"{"summary":"s","customer_name":"c","topic":42,"urgency":"low","extra":true}"#;
        let record = parse_record(raw).unwrap();
        assert_eq!(record.topic, "42");
        assert_eq!(record.urgency, Urgency::Low);
    }

    #[test]
    fn test_parse_record_fenced_payload() {
        let raw = "```json\n{\"summary\":\"s\",\"customer_name\":\"Ann\",\"topic\":\"Billing\",\"urgency\":\"Medium\"}\n```";
        let record = parse_record(raw).unwrap();
        assert_eq!(record.customer_name, "Ann");
        assert_eq!(record.urgency, Urgency::Medium);
    }

    #[test]
    fn test_parse_record_rejects_non_object() {
        assert!(matches!(
            parse_record("[1, 2, 3]"),
            Err(DomainError::ExtractionMalformed(_))
        ));
        assert!(matches!(
            parse_record("\"just a string\""),
            Err(DomainError::ExtractionMalformed(_))
        ));
    }

    #[test]
    fn test_build_prompt_embeds_email_and_keys() {
        let prompt = build_prompt("My invoice is wrong");
        assert!(prompt.contains("My invoice is wrong"));
        for key in ["summary", "customer_name", "topic", "urgency"] {
            assert!(prompt.contains(&format!("\"{}\"", key)));
        }
    }

    #[tokio::test]
    async fn test_extract_apology_text_yields_fallback() {
        let extractor = Arc::new(ScriptedExtractor::answering(
            "I'm sorry, I cannot process this.",
        ));
        let service = ExtractionService::new(extractor.clone());

        let record = service.extract(&email()).await.unwrap();

        assert_eq!(record, ExtractedRecord::fallback());
        assert_eq!(record.topic, "Error");
        assert_eq!(extractor.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_extract_fenced_garbage_yields_fallback() {
        let extractor = Arc::new(ScriptedExtractor::answering("```json\n{not json\n```"));
        let service = ExtractionService::new(extractor);

        let record = service.extract(&email()).await.unwrap();

        assert_eq!(record, ExtractedRecord::fallback());
    }

    #[tokio::test]
    async fn test_extract_call_failure_propagates() {
        let extractor = Arc::new(ScriptedExtractor::failing("401 Unauthorized"));
        let service = ExtractionService::new(extractor);

        let err = service.extract(&email()).await.unwrap_err();

        assert!(matches!(err, DomainError::ExtractionUnavailable(_)));
    }
}
