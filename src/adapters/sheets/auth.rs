//! Google service-account OAuth. Exchanges a signed JWT for an access token.
//!
//! Tokens are cached until shortly before they expire; the cache is the only
//! mutable state shared between requests.

use crate::domain::DomainError;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{debug, info};

pub const SHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";
const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
/// Lifetime requested for the signed assertion (Google's maximum).
const ASSERTION_TTL_SECS: i64 = 3600;
/// Refresh this long before the token actually expires.
const EXPIRY_MARGIN: Duration = Duration::from_secs(60);

/// Source of bearer tokens for the Sheets API.
#[async_trait::async_trait]
pub trait TokenSource: Send + Sync {
    async fn access_token(&self) -> Result<String, DomainError>;
}

/// Subset of a Google service-account key file.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

#[derive(Serialize)]
struct Claims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
}

struct CachedToken {
    value: String,
    expires_at: Instant,
}

/// Service-account token source (JWT bearer grant).
pub struct ServiceAccountAuth {
    client: reqwest::Client,
    key: ServiceAccountKey,
    signing_key: EncodingKey,
    cached: Mutex<Option<CachedToken>>,
}

impl ServiceAccountAuth {
    /// Build from the JSON credential blob.
    ///
    /// # Errors
    /// `DomainError::Config` if the blob is not a service-account key or the
    /// private key is not a valid RSA PEM.
    pub fn from_json(blob: &str) -> Result<Self, DomainError> {
        let key: ServiceAccountKey = serde_json::from_str(blob)
            .map_err(|e| DomainError::Config(format!("Invalid service account JSON: {}", e)))?;
        let signing_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())
            .map_err(|e| DomainError::Config(format!("Invalid service account key: {}", e)))?;
        info!(client_email = %key.client_email, "loaded Google service account");
        Ok(Self {
            client: reqwest::Client::new(),
            key,
            signing_key,
            cached: Mutex::new(None),
        })
    }

    fn signed_assertion(&self) -> Result<String, DomainError> {
        let iat = chrono::Utc::now().timestamp();
        let claims = Claims {
            iss: &self.key.client_email,
            scope: SHEETS_SCOPE,
            aud: &self.key.token_uri,
            iat,
            exp: iat + ASSERTION_TTL_SECS,
        };
        jsonwebtoken::encode(&Header::new(Algorithm::RS256), &claims, &self.signing_key)
            .map_err(|e| DomainError::SinkUnavailable(format!("JWT signing failed: {}", e)))
    }

    async fn fetch_token(&self) -> Result<CachedToken, DomainError> {
        let assertion = self.signed_assertion()?;
        let res = self
            .client
            .post(&self.key.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await
            .map_err(|e| DomainError::SinkUnavailable(format!("Token request failed: {}", e)))?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_else(|_| "unknown".to_string());
            return Err(DomainError::SinkUnavailable(format!(
                "Token endpoint error {}: {}",
                status, text
            )));
        }

        let token: TokenResponse = res
            .json()
            .await
            .map_err(|e| DomainError::SinkUnavailable(format!("Bad token response: {}", e)))?;
        let ttl = Duration::from_secs(token.expires_in.unwrap_or(ASSERTION_TTL_SECS as u64));
        debug!(ttl_secs = ttl.as_secs(), "obtained Google access token");

        Ok(CachedToken {
            value: token.access_token,
            expires_at: Instant::now() + ttl.saturating_sub(EXPIRY_MARGIN),
        })
    }
}

#[async_trait::async_trait]
impl TokenSource for ServiceAccountAuth {
    async fn access_token(&self) -> Result<String, DomainError> {
        let mut cached = self.cached.lock().await;
        if let Some(token) = cached.as_ref() {
            if Instant::now() < token.expires_at {
                return Ok(token.value.clone());
            }
        }
        let fresh = self.fetch_token().await?;
        let value = fresh.value.clone();
        *cached = Some(fresh);
        Ok(value)
    }
}
