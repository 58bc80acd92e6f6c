//! Application configuration. API credentials, mock mode, listen address.
//!
//! Read once at startup from the environment (and `.env`), optionally layered
//! over a file named by `WORKFLOW_CONFIG`. Read-only afterwards.

use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError};
use serde::Deserialize;

pub const DEFAULT_OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_SPREADSHEET_ID: &str = "mock-spreadsheet-id";
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5000;

#[derive(Debug, Deserialize, Default)]
pub struct AppConfig {
    // ─────────────────────────────────────────────────────────────────────────
    // Extraction (OpenAI-compatible API)
    // ─────────────────────────────────────────────────────────────────────────
    /// API key; enables live extraction. Read from OPENAI_API_KEY.
    #[serde(default)]
    pub openai_api_key: Option<String>,

    /// Chat-completions endpoint. Read from OPENAI_API_URL.
    #[serde(default)]
    pub openai_api_url: Option<String>,

    /// Model name. Read from OPENAI_MODEL.
    #[serde(default)]
    pub openai_model: Option<String>,

    // ─────────────────────────────────────────────────────────────────────────
    // Record sink (Google Sheets)
    // ─────────────────────────────────────────────────────────────────────────
    /// Service-account JSON blob; enables the live sink. Read from GOOGLE_SHEETS_CREDS.
    #[serde(default)]
    pub google_sheets_creds: Option<String>,

    /// Target spreadsheet. Read from SPREADSHEET_ID.
    #[serde(default)]
    pub spreadsheet_id: Option<String>,

    // ─────────────────────────────────────────────────────────────────────────
    // Runtime
    // ─────────────────────────────────────────────────────────────────────────
    /// "true" (any case) forces both collaborators into canned responses. Read from MOCK_MODE.
    #[serde(default)]
    pub mock_mode: Option<String>,

    /// Listen host. Read from HOST.
    #[serde(default)]
    pub host: Option<String>,

    /// Listen port. Read from PORT.
    #[serde(default)]
    pub port: Option<String>,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        let mut c = config::Config::builder();
        if let Ok(path) = std::env::var("WORKFLOW_CONFIG") {
            c = c.add_source(config::File::with_name(&path));
        }
        c = c.add_source(config::Environment::default());
        Self::from_builder(c)
    }

    /// Deserialize from an already-assembled source stack.
    pub fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        builder.build()?.try_deserialize()
    }

    /// True when MOCK_MODE is "true" (case-insensitive).
    pub fn is_mock_mode(&self) -> bool {
        self.mock_mode
            .as_deref()
            .is_some_and(|v| v.trim().eq_ignore_ascii_case("true"))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Extraction Helpers
    // ─────────────────────────────────────────────────────────────────────────

    /// Returns the OpenAI API key if set and non-empty.
    pub fn openai_api_key(&self) -> Option<&str> {
        non_empty(self.openai_api_key.as_deref())
    }

    /// Returns the chat-completions URL. Defaults to OpenAI.
    pub fn openai_api_url_or_default(&self) -> String {
        non_empty(self.openai_api_url.as_deref())
            .unwrap_or(DEFAULT_OPENAI_API_URL)
            .to_string()
    }

    /// Returns the model name. Defaults to "gpt-3.5-turbo".
    pub fn openai_model_or_default(&self) -> String {
        non_empty(self.openai_model.as_deref())
            .unwrap_or(DEFAULT_OPENAI_MODEL)
            .to_string()
    }

    /// Returns true if live extraction should be wired (key present, not in mock mode).
    pub fn is_openai_configured(&self) -> bool {
        !self.is_mock_mode() && self.openai_api_key().is_some()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Sheets Helpers
    // ─────────────────────────────────────────────────────────────────────────

    /// Returns the service-account JSON blob if set and non-empty.
    pub fn sheets_credentials(&self) -> Option<&str> {
        non_empty(self.google_sheets_creds.as_deref())
    }

    /// Returns the target spreadsheet ID. Defaults to "mock-spreadsheet-id".
    pub fn spreadsheet_id_or_default(&self) -> String {
        non_empty(self.spreadsheet_id.as_deref())
            .unwrap_or(DEFAULT_SPREADSHEET_ID)
            .to_string()
    }

    /// Returns true if a live sink should be attempted (credentials present, not in mock mode).
    /// The credentials can still fail to parse, in which case the mock sink is used.
    pub fn wants_live_sheets(&self) -> bool {
        !self.is_mock_mode() && self.sheets_credentials().is_some()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Listen Address Helpers
    // ─────────────────────────────────────────────────────────────────────────

    pub fn host_or_default(&self) -> String {
        non_empty(self.host.as_deref())
            .unwrap_or(DEFAULT_HOST)
            .to_string()
    }

    /// Returns the listen port. Defaults to 5000 if unset or invalid.
    pub fn port_or_default(&self) -> u16 {
        self.port
            .as_deref()
            .and_then(|p| p.trim().parse().ok())
            .unwrap_or(DEFAULT_PORT)
    }

    /// "host:port" string for the TCP listener.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host_or_default(), self.port_or_default())
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
