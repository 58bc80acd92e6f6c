//! Domain errors. Used by ports and use cases.
//!
//! Adapters map infrastructure errors into these.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    /// Submitted email text is missing or too short. Client error, never retried.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The extraction call succeeded but its content could not be parsed.
    /// Recovered inside the extraction service; never reaches a caller.
    #[error("Malformed extraction output: {0}")]
    ExtractionMalformed(String),

    #[error("AI processing failed: {0}")]
    ExtractionUnavailable(String),

    #[error("Failed to create task in sheets: {0}")]
    SinkUnavailable(String),

    #[error("Configuration error: {0}")]
    Config(String),
}
