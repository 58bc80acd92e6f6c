//! Record service. Implements `RecordSink` on top of a `TabularStore`.
//!
//! One record becomes one row:
//! `[timestamp, customer_name, topic, urgency, summary, email preview]`.

use crate::domain::{DomainError, ExtractedRecord, SubmittedEmail, TaskReceipt};
use crate::ports::{RecordSink, TabularStore};
use chrono::{DateTime, Local, TimeZone};
use std::sync::Arc;
use tracing::info;

/// Timestamp format of the first column (second precision, local time).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Sink that appends rows to a spreadsheet-like store.
pub struct TableRecordService {
    store: Arc<dyn TabularStore>,
}

impl TableRecordService {
    pub fn new(store: Arc<dyn TabularStore>) -> Self {
        Self { store }
    }
}

/// Build the row stored for `record`.
pub fn compose_row<Tz: TimeZone>(
    record: &ExtractedRecord,
    email: &SubmittedEmail,
    at: &DateTime<Tz>,
) -> Vec<String>
where
    Tz::Offset: std::fmt::Display,
{
    vec![
        at.format(TIMESTAMP_FORMAT).to_string(),
        record.customer_name.clone(),
        record.topic.clone(),
        record.urgency.to_string(),
        record.summary.clone(),
        email.preview().to_string(),
    ]
}

#[async_trait::async_trait]
impl RecordSink for TableRecordService {
    async fn record(
        &self,
        record: &ExtractedRecord,
        email: &SubmittedEmail,
    ) -> Result<TaskReceipt, DomainError> {
        let row = compose_row(record, email, &Local::now());
        self.store.append_row(&row).await?;

        // Row number comes from the table itself, not a local counter, so it
        // reflects rows written by anyone else. It can be stale if another
        // writer appends between our append and this read.
        let row_number = self.store.read_all_rows().await?.len() as u64;

        info!(row_number, topic = %record.topic, "task row appended");

        Ok(TaskReceipt {
            success: true,
            message: "Task created successfully".to_string(),
            row_number,
            sheet_url: self.store.location(),
        })
    }
}
