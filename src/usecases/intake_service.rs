//! Intake service. Orchestrates one email through extraction and recording.
//!
//! Flow per request (no state is kept between requests):
//! 1. Validate the raw text (minimum length)
//! 2. Extract structured fields via the extraction service
//! 3. Append the record to the sink
//!
//! The sink is only touched after extraction fully succeeded, so a failed
//! request never leaves a partial row behind.

use crate::domain::{DomainError, ExtractedRecord, SubmittedEmail, TaskReceipt};
use crate::ports::RecordSink;
use crate::usecases::ExtractionService;
use std::sync::Arc;
use tracing::info;

/// Result of a fully processed email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedEmail {
    pub extracted: ExtractedRecord,
    pub task: TaskReceipt,
}

pub struct IntakeService {
    extraction: ExtractionService,
    sink: Arc<dyn RecordSink>,
}

impl IntakeService {
    pub fn new(extraction: ExtractionService, sink: Arc<dyn RecordSink>) -> Self {
        Self { extraction, sink }
    }

    /// Run one email through the pipeline.
    ///
    /// # Errors
    /// `InvalidInput` before any outbound call; `ExtractionUnavailable` or
    /// `SinkUnavailable` when a collaborator fails.
    pub async fn process(&self, raw_email: &str) -> Result<ProcessedEmail, DomainError> {
        let email = SubmittedEmail::parse(raw_email)?;

        info!(email_len = email.as_str().len(), "processing email with AI");
        let extracted = self.extraction.extract(&email).await?;

        info!("creating task in tracking sheet");
        let task = self.sink.record(&extracted, &email).await?;

        Ok(ProcessedEmail { extracted, task })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::MockExtractor;
    use crate::adapters::sheets::MockRecordSink;
    use crate::domain::Urgency;
    use crate::ports::Extractor;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Mutex;

    struct CountingExtractor(AtomicUsize);

    #[async_trait::async_trait]
    impl Extractor for CountingExtractor {
        async fn extract(&self, _prompt: &str) -> Result<String, DomainError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Err(DomainError::ExtractionUnavailable("quota exceeded".to_string()))
        }
    }

    /// Sink that remembers what it was given.
    #[derive(Default)]
    struct CapturingSink {
        previews: Mutex<Vec<String>>,
    }

    #[async_trait::async_trait]
    impl RecordSink for CapturingSink {
        async fn record(
            &self,
            _record: &ExtractedRecord,
            email: &SubmittedEmail,
        ) -> Result<TaskReceipt, DomainError> {
            self.previews.lock().await.push(email.preview().to_string());
            Ok(TaskReceipt {
                success: true,
                message: "captured".to_string(),
                row_number: 1,
                sheet_url: "memory".to_string(),
            })
        }
    }

    #[tokio::test]
    async fn test_mock_pipeline_scenario() {
        let service = IntakeService::new(
            ExtractionService::new(Arc::new(MockExtractor::new())),
            Arc::new(MockRecordSink::new()),
        );

        let out = service
            .process("Hi, I can't log into my account, please help! - Jane")
            .await
            .unwrap();

        assert_eq!(out.extracted.customer_name, "John Doe");
        assert_eq!(out.extracted.topic, "Login Issues");
        assert_eq!(out.extracted.urgency, Urgency::High);
        assert!(out.task.success);
        assert_eq!(out.task.row_number, 42);
    }

    #[tokio::test]
    async fn test_short_input_calls_no_collaborator() {
        let extractor = Arc::new(CountingExtractor(AtomicUsize::new(0)));
        let sink = Arc::new(CapturingSink::default());
        let service = IntakeService::new(ExtractionService::new(extractor.clone()), sink.clone());

        let err = service.process("hi").await.unwrap_err();

        assert!(matches!(err, DomainError::InvalidInput(_)));
        assert_eq!(extractor.0.load(Ordering::SeqCst), 0);
        assert!(sink.previews.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_extraction_failure_skips_sink() {
        let extractor = Arc::new(CountingExtractor(AtomicUsize::new(0)));
        let sink = Arc::new(CapturingSink::default());
        let service = IntakeService::new(ExtractionService::new(extractor.clone()), sink.clone());

        let err = service
            .process("My order never arrived, where is it?")
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::ExtractionUnavailable(_)));
        assert_eq!(extractor.0.load(Ordering::SeqCst), 1);
        assert!(sink.previews.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_long_email_truncated_before_sink() {
        let sink = Arc::new(CapturingSink::default());
        let service = IntakeService::new(
            ExtractionService::new(Arc::new(MockExtractor::new())),
            sink.clone(),
        );

        service.process(&"a".repeat(900)).await.unwrap();

        let previews = sink.previews.lock().await;
        assert_eq!(previews[0].chars().count(), 500);
    }
}
