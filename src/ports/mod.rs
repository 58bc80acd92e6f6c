//! Port traits. API boundaries for the hexagon.
//!
//! - Outbound: Called by application into infrastructure (LLM, spreadsheet)
//! - Record sink: where normalized records end up

pub mod outbound;
pub mod record_sink;

pub use outbound::{Extractor, TabularStore};
pub use record_sink::RecordSink;
