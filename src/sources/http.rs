//! Remote record source over HTTP

use std::time::Duration;

use reqwest::StatusCode;

use super::{decode, validate_ticker, RecordSource, SourceFormat};
use crate::types::{AnomdashError, RawRecord, Result};

/// HTTP request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Fetches `<base_url>/<TICKER>.<ext>` (e.g. a static `/data` folder)
pub struct HttpSource {
    base_url: String,
    format: SourceFormat,
    client: reqwest::blocking::Client,
}

impl HttpSource {
    pub fn new(base_url: &str, format: SourceFormat) -> Result<Self> {
        Self::with_timeout(base_url, format, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    pub fn with_timeout(base_url: &str, format: SourceFormat, timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AnomdashError::Http(format!("HTTP client error: {}", e)))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            format,
            client,
        })
    }

    /// URL for one ticker file
    pub fn url_for(&self, ticker: &str, ext: &str) -> Result<String> {
        let ticker = validate_ticker(ticker)?;
        Ok(format!("{}/{}.{}", self.base_url, ticker, ext))
    }

    fn fetch_ext(&self, ticker: &str, ext: &str) -> Result<FetchOutcome> {
        let url = self.url_for(ticker, ext)?;
        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|e| AnomdashError::Http(format!("request to {} failed: {}", url, e)))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(FetchOutcome::NotFound(url));
        }
        if !status.is_success() {
            return Err(AnomdashError::Http(format!("{} returned {}", url, status)));
        }

        let bytes = response
            .bytes()
            .map_err(|e| AnomdashError::Http(format!("reading {} failed: {}", url, e)))?;
        tracing::debug!(%url, bytes = bytes.len(), "fetched ticker data");
        decode(ext, bytes.to_vec()).map(FetchOutcome::Rows)
    }
}

enum FetchOutcome {
    Rows(Vec<RawRecord>),
    NotFound(String),
}

impl RecordSource for HttpSource {
    fn name(&self) -> &str {
        "http"
    }

    fn fetch(&self, ticker: &str) -> Result<Vec<RawRecord>> {
        let mut missing = Vec::new();
        for ext in self.format.extensions() {
            match self.fetch_ext(ticker, ext)? {
                FetchOutcome::Rows(rows) => return Ok(rows),
                FetchOutcome::NotFound(url) => missing.push(url),
            }
        }
        Err(AnomdashError::Http(format!(
            "no data for {}: {} not found",
            ticker,
            missing.join(", ")
        )))
    }
}
