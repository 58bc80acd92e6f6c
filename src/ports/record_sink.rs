//! Record sink outbound port. Persist extracted records in an external tracker.

use crate::domain::{DomainError, ExtractedRecord, SubmittedEmail, TaskReceipt};

/// Port for logging one extracted record as a task.
///
/// Implemented by the spreadsheet-backed service and by the mock sink used
/// when no credentials are configured.
#[async_trait::async_trait]
pub trait RecordSink: Send + Sync {
    /// Store `record` together with (a truncated copy of) the original email.
    ///
    /// # Errors
    /// Returns `DomainError::SinkUnavailable` if the store cannot be written or read back.
    async fn record(
        &self,
        record: &ExtractedRecord,
        email: &SubmittedEmail,
    ) -> Result<TaskReceipt, DomainError>;
}
