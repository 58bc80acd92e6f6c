//! Outbound ports. Application calls into infrastructure.
//!
//! Implemented by adapters.

use crate::domain::DomainError;

/// Language-model extraction call.
///
/// Returns the model's raw text answer. Parsing and validation belong to the
/// extraction service, so adapters only fail when the call itself fails
/// (network, auth, quota, empty envelope).
#[async_trait::async_trait]
pub trait Extractor: Send + Sync {
    async fn extract(&self, prompt: &str) -> Result<String, DomainError>;
}

/// Spreadsheet-like append-only table.
///
/// An adapter is bound to one table when it is opened (constructed).
#[async_trait::async_trait]
pub trait TabularStore: Send + Sync {
    /// Append one row of cells after the last non-empty row.
    async fn append_row(&self, row: &[String]) -> Result<(), DomainError>;

    /// Read every row currently in the table.
    async fn read_all_rows(&self) -> Result<Vec<Vec<String>>, DomainError>;

    /// Human-facing reference to the table (e.g. a browser URL).
    fn location(&self) -> String;
}
