//! Wiring & DI. Chooses live or mock collaborators from the configuration
//! and assembles the HTTP state. No business logic here.

use crate::adapters::ai::{MockExtractor, OpenAiExtractor};
use crate::adapters::http::{AppState, ServiceStatus};
use crate::adapters::sheets::{GoogleSheetsStore, MockRecordSink, ServiceAccountAuth};
use crate::domain::DomainError;
use crate::ports::{Extractor, RecordSink};
use crate::shared::config::AppConfig;
use crate::usecases::{ExtractionService, IntakeService, TableRecordService};
use std::sync::Arc;
use tracing::{info, warn};

/// Pick the extractor. Live only when a key is set and mock mode is off.
fn build_extractor(cfg: &AppConfig) -> (Arc<dyn Extractor>, bool) {
    match cfg.openai_api_key() {
        Some(key) if cfg.is_openai_configured() => {
            info!(
                model = %cfg.openai_model_or_default(),
                url = %cfg.openai_api_url_or_default(),
                "extraction enabled with OpenAI adapter"
            );
            let extractor = OpenAiExtractor::new(
                cfg.openai_api_url_or_default(),
                key.to_string(),
                cfg.openai_model_or_default(),
            );
            (Arc::new(extractor), true)
        }
        _ => {
            warn!("OPENAI_API_KEY not set or mock mode on, using mock extractor");
            (Arc::new(MockExtractor::new()), false)
        }
    }
}

/// Pick the record sink. A credential blob that fails to load degrades to the mock sink.
fn build_sink(cfg: &AppConfig) -> (Arc<dyn RecordSink>, bool) {
    let creds = match cfg.sheets_credentials() {
        Some(creds) if cfg.wants_live_sheets() => creds,
        _ => {
            warn!("GOOGLE_SHEETS_CREDS not set or mock mode on, using mock record sink");
            return (Arc::new(MockRecordSink::new()), false);
        }
    };

    match ServiceAccountAuth::from_json(creds) {
        Ok(auth) => {
            let spreadsheet_id = cfg.spreadsheet_id_or_default();
            info!(spreadsheet_id = %spreadsheet_id, "Google Sheets record sink enabled");
            let store = GoogleSheetsStore::open(Arc::new(auth), spreadsheet_id);
            (Arc::new(TableRecordService::new(Arc::new(store))), true)
        }
        Err(e) => {
            warn!(error = %e, "Google Sheets initialization failed, using mock record sink");
            (Arc::new(MockRecordSink::new()), false)
        }
    }
}

/// Assemble the application state from configuration.
pub fn build_app_state(cfg: &AppConfig) -> Result<AppState, DomainError> {
    let (extractor, openai_configured) = build_extractor(cfg);
    let (sink, sheets_configured) = build_sink(cfg);

    let intake = IntakeService::new(ExtractionService::new(extractor), sink);
    let status = ServiceStatus {
        mock_mode: cfg.is_mock_mode(),
        openai_configured,
        sheets_configured,
    };
    AppState::new(intake, status)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg(pairs: &[(&str, &str)]) -> AppConfig {
        let mut builder = config::Config::builder();
        for (k, v) in pairs {
            builder = builder.set_override(*k, *v).unwrap();
        }
        AppConfig::from_builder(builder).unwrap()
    }

    #[test]
    fn test_no_credentials_wires_mocks() {
        let state = build_app_state(&AppConfig::default()).unwrap();
        assert_eq!(
            state.status,
            ServiceStatus {
                mock_mode: false,
                openai_configured: false,
                sheets_configured: false,
            }
        );
    }

    #[test]
    fn test_mock_mode_wins_over_credentials() {
        let state = build_app_state(&cfg(&[
            ("openai_api_key", "sk-live"),
            ("mock_mode", "true"),
        ]))
        .unwrap();
        assert!(state.status.mock_mode);
        assert!(!state.status.openai_configured);
    }

    #[test]
    fn test_openai_key_wires_live_extractor() {
        let state = build_app_state(&cfg(&[("openai_api_key", "sk-live")])).unwrap();
        assert!(state.status.openai_configured);
        assert!(!state.status.sheets_configured);
    }

    #[test]
    fn test_bad_sheets_credentials_fall_back_to_mock() {
        let state = build_app_state(&cfg(&[("google_sheets_creds", "{not json")])).unwrap();
        assert!(!state.status.sheets_configured);
    }
}
