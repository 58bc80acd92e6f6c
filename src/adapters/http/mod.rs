//! HTTP adapter. Axum router exposing the intake pipeline.

pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;
pub mod templates;

pub use error::ApiError;
pub use routes::create_router;
pub use state::{AppState, ServiceStatus};
