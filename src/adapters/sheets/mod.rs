//! Spreadsheet adapters. Google Sheets store and the mock record sink.

pub mod auth;
pub mod google_sheets;
pub mod mock_sink;

pub use auth::{ServiceAccountAuth, TokenSource};
pub use google_sheets::{GoogleSheetsStore, sheet_url};
pub use mock_sink::{MOCK_SPREADSHEET_ID, MockRecordSink};
