//! Shared handler state. Built once at startup, read-only afterwards.

use super::templates::StatusPage;
use crate::domain::DomainError;
use crate::usecases::IntakeService;
use std::sync::Arc;

/// Which collaborators are live. Reported by `/health` and the status page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ServiceStatus {
    pub mock_mode: bool,
    pub openai_configured: bool,
    pub sheets_configured: bool,
}

#[derive(Clone)]
pub struct AppState {
    pub intake: Arc<IntakeService>,
    pub status: ServiceStatus,
    pub page: Arc<StatusPage>,
}

impl AppState {
    pub fn new(intake: IntakeService, status: ServiceStatus) -> Result<Self, DomainError> {
        Ok(Self {
            intake: Arc::new(intake),
            status,
            page: Arc::new(StatusPage::new()?),
        })
    }
}
