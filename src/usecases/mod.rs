//! Application use cases. Orchestrate domain logic via ports.

pub mod extraction_service;
pub mod intake_service;
pub mod record_service;

pub use extraction_service::ExtractionService;
pub use intake_service::{IntakeService, ProcessedEmail};
pub use record_service::TableRecordService;
