//! Remote source of daily market-watch workbooks.
//!
//! The `WorkbookSource` trait abstracts over where the bytes come from so the
//! fetch stage can be driven by a fake in tests. `MarketWatchClient` is the
//! real HTTP implementation. There is no retry policy: the first transport or
//! status failure is returned to the caller.

use crate::dates::DATE_FORMAT;
use chrono::NaiveDate;
use std::time::Duration;
use thiserror::Error;

/// Structured errors for workbook downloads.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to build HTTP client: {0}")]
    Client(String),

    #[error("network error for {url}: {reason}")]
    Network { url: String, reason: String },

    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("failed to read response body from {url}: {reason}")]
    Body { url: String, reason: String },
}

/// Something that can produce the workbook bytes for a trading date.
pub trait WorkbookSource {
    /// Human-readable name of this source.
    fn name(&self) -> &str;

    /// Fetch the raw workbook for `date`.
    fn fetch(&self, date: NaiveDate) -> Result<Vec<u8>, FetchError>;
}

/// Blocking HTTP client for the market-watch export endpoint.
pub struct MarketWatchClient {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl MarketWatchClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, FetchError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(60))
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    /// Use a preconfigured client (custom proxy or TLS settings).
    pub fn with_client(client: reqwest::blocking::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `{base}?d={YYYY-MM-DD}`
    pub fn workbook_url(&self, date: NaiveDate) -> String {
        workbook_url(&self.base_url, date)
    }
}

/// Build the download URL for a trading date.
pub fn workbook_url(base_url: &str, date: NaiveDate) -> String {
    format!("{base_url}?d={}", date.format(DATE_FORMAT))
}

impl WorkbookSource for MarketWatchClient {
    fn name(&self) -> &str {
        "market_watch"
    }

    fn fetch(&self, date: NaiveDate) -> Result<Vec<u8>, FetchError> {
        let url = self.workbook_url(date);

        let resp = self
            .client
            .get(&url)
            .send()
            .map_err(|e| FetchError::Network {
                url: url.clone(),
                reason: e.to_string(),
            })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url,
                status: status.as_u16(),
            });
        }

        let body = resp.bytes().map_err(|e| FetchError::Body {
            url: url.clone(),
            reason: e.to_string(),
        })?;
        Ok(body.to_vec())
    }
}
