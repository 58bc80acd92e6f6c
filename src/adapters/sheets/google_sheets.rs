//! Google Sheets adapter. Implements `TabularStore` via the Sheets v4 REST API.
//!
//! Rows go to the first worksheet of the spreadsheet. Its title is looked up on
//! first use and looked up again when the API rejects the cached range.

use super::auth::TokenSource;
use crate::domain::DomainError;
use crate::ports::TabularStore;
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

const SHEETS_API_BASE: &str = "https://sheets.googleapis.com/v4/spreadsheets";

/// Browser URL of a spreadsheet.
pub fn sheet_url(spreadsheet_id: &str) -> String {
    format!("https://docs.google.com/spreadsheets/d/{}", spreadsheet_id)
}

/// A1 range covering a whole worksheet. Quoted so titles like `Q1` or
/// `Tasks 2024` are not read as cell references.
fn worksheet_range(title: &str) -> String {
    format!("'{}'", title.replace('\'', "''"))
}

#[derive(Deserialize)]
struct SpreadsheetMeta {
    #[serde(default)]
    sheets: Vec<SheetMeta>,
}

#[derive(Deserialize)]
struct SheetMeta {
    properties: SheetProperties,
}

#[derive(Deserialize)]
struct SheetProperties {
    title: String,
}

#[derive(Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<String>>,
}

/// Failed Sheets call. Rejections keep their status so a stale range can be retried.
enum SheetsFailure {
    Rejected(StatusCode, String),
    Other(DomainError),
}

impl From<DomainError> for SheetsFailure {
    fn from(e: DomainError) -> Self {
        Self::Other(e)
    }
}

impl From<SheetsFailure> for DomainError {
    fn from(f: SheetsFailure) -> Self {
        match f {
            SheetsFailure::Rejected(status, text) => {
                DomainError::SinkUnavailable(format!("Sheets API error {}: {}", status, text))
            }
            SheetsFailure::Other(e) => e,
        }
    }
}

impl SheetsFailure {
    /// 400/404 on a ranged call usually means the worksheet was renamed or removed.
    fn is_stale_range(&self) -> bool {
        matches!(
            self,
            Self::Rejected(StatusCode::BAD_REQUEST | StatusCode::NOT_FOUND, _)
        )
    }
}

/// One spreadsheet, opened by its ID.
pub struct GoogleSheetsStore {
    client: Client,
    tokens: Arc<dyn TokenSource>,
    api_base: String,
    spreadsheet_id: String,
    worksheet: RwLock<Option<String>>,
}

impl GoogleSheetsStore {
    /// Bind to the spreadsheet `spreadsheet_id`. No request is made until first use.
    pub fn open(tokens: Arc<dyn TokenSource>, spreadsheet_id: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            tokens,
            api_base: SHEETS_API_BASE.to_string(),
            spreadsheet_id: spreadsheet_id.into(),
            worksheet: RwLock::new(None),
        }
    }

    /// Point at a different API root (e.g. a local mock server).
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    fn url(&self, segments: &[&str]) -> Result<Url, DomainError> {
        let mut url = Url::parse(&self.api_base)
            .map_err(|e| DomainError::SinkUnavailable(format!("Bad Sheets API base: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| DomainError::SinkUnavailable("Sheets API base cannot hold a path".to_string()))?
            .pop_if_empty()
            .push(&self.spreadsheet_id)
            .extend(segments);
        Ok(url)
    }

    async fn send(&self, req: reqwest::RequestBuilder) -> Result<reqwest::Response, SheetsFailure> {
        let token = self.tokens.access_token().await?;
        let res = req
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| DomainError::SinkUnavailable(format!("Request failed: {}", e)))?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_else(|_| "unknown".to_string());
            return Err(SheetsFailure::Rejected(status, text));
        }
        Ok(res)
    }

    /// Quoted range of the first worksheet, resolved on demand.
    async fn target_range(&self) -> Result<String, DomainError> {
        if let Some(title) = self.worksheet.read().await.as_deref() {
            return Ok(worksheet_range(title));
        }

        let mut slot = self.worksheet.write().await;
        if let Some(title) = slot.as_deref() {
            return Ok(worksheet_range(title));
        }
        let title = self.first_worksheet_title().await?;
        info!(spreadsheet_id = %self.spreadsheet_id, worksheet = %title, "opened spreadsheet");
        let range = worksheet_range(&title);
        *slot = Some(title);
        Ok(range)
    }

    async fn first_worksheet_title(&self) -> Result<String, DomainError> {
        let mut url = self.url(&[])?;
        url.query_pairs_mut()
            .append_pair("fields", "sheets.properties.title");
        let meta: SpreadsheetMeta = self
            .send(self.client.get(url))
            .await?
            .json()
            .await
            .map_err(|e| DomainError::SinkUnavailable(format!("Bad spreadsheet metadata: {}", e)))?;
        meta.sheets
            .into_iter()
            .next()
            .map(|s| s.properties.title)
            .ok_or_else(|| DomainError::SinkUnavailable("Spreadsheet has no worksheets".to_string()))
    }

    /// Run `op` against the first worksheet. A stale cached title is dropped and
    /// resolved again once.
    async fn on_worksheet<T, F, Fut>(&self, op: F) -> Result<T, DomainError>
    where
        F: Fn(String) -> Fut + Send,
        Fut: Future<Output = Result<T, SheetsFailure>> + Send,
        T: Send,
    {
        let range = self.target_range().await?;
        match op(range).await {
            Err(failure) if failure.is_stale_range() => {
                warn!(spreadsheet_id = %self.spreadsheet_id, "worksheet range rejected, looking it up again");
                *self.worksheet.write().await = None;
                let range = self.target_range().await?;
                op(range).await.map_err(DomainError::from)
            }
            other => other.map_err(DomainError::from),
        }
    }

    async fn try_append(&self, row: &[String], range: String) -> Result<(), SheetsFailure> {
        let append_range = format!("{}:append", range);
        let mut url = self.url(&["values", append_range.as_str()])?;
        url.query_pairs_mut().append_pair("valueInputOption", "RAW");

        let body = serde_json::json!({ "values": [row] });
        self.send(self.client.post(url).json(&body)).await?;
        Ok(())
    }

    async fn try_read(&self, range: String) -> Result<Vec<Vec<String>>, SheetsFailure> {
        let url = self.url(&["values", range.as_str()])?;
        let values: ValueRange = self
            .send(self.client.get(url))
            .await?
            .json()
            .await
            .map_err(|e| DomainError::SinkUnavailable(format!("Bad values response: {}", e)))?;
        Ok(values.values)
    }
}

#[async_trait::async_trait]
impl TabularStore for GoogleSheetsStore {
    async fn append_row(&self, row: &[String]) -> Result<(), DomainError> {
        self.on_worksheet(|range| self.try_append(row, range)).await?;
        debug!(cells = row.len(), "row appended");
        Ok(())
    }

    async fn read_all_rows(&self) -> Result<Vec<Vec<String>>, DomainError> {
        self.on_worksheet(|range| self.try_read(range)).await
    }

    fn location(&self) -> String {
        sheet_url(&self.spreadsheet_id)
    }
}
