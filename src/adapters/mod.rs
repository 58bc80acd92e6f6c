//! Infrastructure adapters. Implement outbound ports and serve HTTP.
//!
//! OpenAI, Google Sheets, axum, terminal. Map errors to DomainError.

pub mod ai;
pub mod http;
pub mod sheets;
pub mod ui;
