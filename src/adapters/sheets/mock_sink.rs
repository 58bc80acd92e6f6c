//! Mock record sink. Reports a fixed receipt without any network call.

use super::google_sheets::sheet_url;
use crate::domain::{DomainError, ExtractedRecord, SubmittedEmail, TaskReceipt};
use crate::ports::RecordSink;
use tracing::info;

/// Row number every mock receipt reports.
pub const MOCK_ROW_NUMBER: u64 = 42;
/// Spreadsheet ID every mock receipt points at.
pub const MOCK_SPREADSHEET_ID: &str = "mock-spreadsheet-id";

/// Canned sink used in mock mode or when no Sheets credentials are set.
#[derive(Debug, Default)]
pub struct MockRecordSink;

impl MockRecordSink {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait::async_trait]
impl RecordSink for MockRecordSink {
    async fn record(
        &self,
        record: &ExtractedRecord,
        email: &SubmittedEmail,
    ) -> Result<TaskReceipt, DomainError> {
        info!(
            topic = %record.topic,
            email_len = email.preview().len(),
            "[MOCK] Simulating task creation"
        );
        Ok(TaskReceipt {
            success: true,
            message: "Task created in mock mode".to_string(),
            row_number: MOCK_ROW_NUMBER,
            sheet_url: sheet_url(MOCK_SPREADSHEET_ID),
        })
    }
}
