#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Google Drive and Sheets REST adapter.
//!
//! Copies the master DBR template spreadsheet and writes projected cell
//! updates into the copy's input tab. The client is constructed explicitly
//! (usually from environment variables) and passed by handle; nothing in
//! this crate reads global state after construction.
//!
//! # Environment Variables
//!
//! | Variable | Required | Description |
//! |----------|----------|-------------|
//! | `GOOGLE_ACCESS_TOKEN` | Yes | OAuth bearer token authorized for Drive and Sheets |
//! | `DBR_MASTER_SHEET_ID` | Yes | Spreadsheet id of the master template to copy |
//! | `DBR_TARGET_TAB` | No | Tab that receives the cell writes (default `INPUT`) |

use std::time::Duration;

use dbr_sheet_template::CellUpdate;

mod retry;

const DRIVE_API_BASE: &str = "https://www.googleapis.com/drive/v3";
const SHEETS_API_BASE: &str = "https://sheets.googleapis.com/v4";
const DEFAULT_TARGET_TAB: &str = "INPUT";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors returned by the Drive and Sheets adapter.
#[derive(Debug, thiserror::Error)]
pub enum SheetsError {
    /// A required environment variable is not set.
    #[error("Missing environment variable: {name}")]
    MissingEnv {
        /// Name of the missing variable.
        name: String,
    },
    /// An HTTP request failed after retries.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    /// The Google API answered with an error status.
    #[error("Google API error: HTTP {status}: {message}")]
    Api {
        /// HTTP status code of the response.
        status: u16,
        /// Message from the API error envelope, or a body preview.
        message: String,
    },
    /// A response body could not be decoded as JSON.
    #[error("Invalid API response: {0}")]
    Json(#[from] serde_json::Error),
    /// A response decoded but did not have the expected shape.
    #[error("Unexpected API response: {0}")]
    UnexpectedResponse(String),
}

fn require_env(name: &str) -> Result<String, SheetsError> {
    std::env::var(name).map_err(|_| SheetsError::MissingEnv {
        name: name.to_string(),
    })
}

fn tab_range(tab: &str, range: &str) -> String {
    format!("'{tab}'!{range}")
}

/// Returns the browser URL for a spreadsheet id.
#[must_use]
pub fn spreadsheet_url(spreadsheet_id: &str) -> String {
    format!("https://docs.google.com/spreadsheets/d/{spreadsheet_id}/edit")
}

/// Client for the Drive copy and Sheets batch-update endpoints.
pub struct SheetsClient {
    http: reqwest::Client,
    token: String,
    master_sheet_id: String,
    target_tab: String,
}

impl SheetsClient {
    /// Creates a client with an explicit bearer token and master sheet id.
    ///
    /// The target tab defaults to `INPUT`; override it with
    /// [`with_target_tab`](Self::with_target_tab).
    ///
    /// # Errors
    ///
    /// * If the underlying HTTP client cannot be constructed.
    pub fn new(token: String, master_sheet_id: String) -> Result<Self, SheetsError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .connect_timeout(CONNECT_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            token,
            master_sheet_id,
            target_tab: DEFAULT_TARGET_TAB.to_string(),
        })
    }

    /// Creates a client from the environment variables listed in the crate
    /// docs.
    ///
    /// # Errors
    ///
    /// * If `GOOGLE_ACCESS_TOKEN` or `DBR_MASTER_SHEET_ID` is not set.
    /// * If the underlying HTTP client cannot be constructed.
    pub fn from_env() -> Result<Self, SheetsError> {
        let token = require_env("GOOGLE_ACCESS_TOKEN")?;
        let master_sheet_id = require_env("DBR_MASTER_SHEET_ID")?;
        let target_tab =
            std::env::var("DBR_TARGET_TAB").unwrap_or_else(|_| DEFAULT_TARGET_TAB.to_string());

        Ok(Self::new(token, master_sheet_id)?.with_target_tab(&target_tab))
    }

    /// Sets the tab that receives cell writes.
    #[must_use]
    pub fn with_target_tab(mut self, tab: &str) -> Self {
        self.target_tab = tab.to_string();
        self
    }

    /// Returns the tab that receives cell writes.
    #[must_use]
    pub fn target_tab(&self) -> &str {
        &self.target_tab
    }

    /// Copies the master template spreadsheet under a new title and returns
    /// the id of the copy.
    ///
    /// # Errors
    ///
    /// * If the Drive request fails after retries.
    /// * If the API answers with an error status.
    /// * If the copy response carries no file id.
    pub async fn copy_template(&self, title: &str) -> Result<String, SheetsError> {
        log::info!("Copying master template as '{title}'");

        let url = format!("{DRIVE_API_BASE}/files/{}/copy", self.master_sheet_id);
        let body = serde_json::json!({ "name": title });

        let response =
            retry::send_json(|| self.http.post(&url).bearer_auth(&self.token).json(&body)).await?;

        response
            .get("id")
            .and_then(serde_json::Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| {
                SheetsError::UnexpectedResponse("Drive copy response has no file id".to_string())
            })
    }

    /// Writes cell updates into the target tab of `spreadsheet_id`.
    ///
    /// Ranges are prefixed with the target tab name and written with the
    /// `USER_ENTERED` input option, so formulas and dates are interpreted
    /// the same way as manual entry.
    ///
    /// # Errors
    ///
    /// * If the Sheets request fails after retries.
    /// * If the API answers with an error status.
    pub async fn batch_update(
        &self,
        spreadsheet_id: &str,
        updates: &[CellUpdate],
    ) -> Result<(), SheetsError> {
        if updates.is_empty() {
            log::debug!("No cell updates for {spreadsheet_id}");
            return Ok(());
        }

        let data: Vec<serde_json::Value> = updates
            .iter()
            .map(|update| {
                serde_json::json!({
                    "range": tab_range(&self.target_tab, &update.range),
                    "values": update.values,
                })
            })
            .collect();
        let body = serde_json::json!({
            "valueInputOption": "USER_ENTERED",
            "data": data,
        });

        let url = format!("{SHEETS_API_BASE}/spreadsheets/{spreadsheet_id}/values:batchUpdate");

        let response =
            retry::send_json(|| self.http.post(&url).bearer_auth(&self.token).json(&body)).await?;

        let written = response
            .get("totalUpdatedCells")
            .and_then(serde_json::Value::as_u64)
            .unwrap_or(0);
        log::info!(
            "Wrote {written} cells across {} ranges to {spreadsheet_id}",
            updates.len()
        );

        Ok(())
    }
}
