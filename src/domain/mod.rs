//! Core domain layer. No external I/O dependencies.
//!
//! Entities and business rules live here. Dependencies flow inward.

pub mod entities;
pub mod errors;

pub use entities::{
    EMAIL_PREVIEW_CHARS, ExtractedRecord, MIN_EMAIL_CHARS, SubmittedEmail, TaskReceipt, UNKNOWN,
    Urgency,
};
pub use errors::DomainError;
