//! Record sources: where raw per-ticker rows come from

mod csv_file;
mod directory;
mod http;
mod json_file;

pub use csv_file::{parse_csv_text, CsvFileSource};
pub use directory::DirectorySource;
pub use http::{HttpSource, DEFAULT_TIMEOUT_SECS};
pub use json_file::{parse_json_bytes, JsonFileSource};

use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::types::{AnomdashError, RawRecord, Result};

/// Trait for obtaining raw rows for a ticker
pub trait RecordSource: Send + Sync {
    /// Source name (e.g., "csv-file")
    fn name(&self) -> &str;

    /// Fetch all raw rows for `ticker`, in file order
    fn fetch(&self, ticker: &str) -> Result<Vec<RawRecord>>;
}

/// On-disk / on-wire encoding of a ticker's rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    /// Prefer `<TICKER>.json`, fall back to `<TICKER>.csv`
    #[default]
    Auto,
    Csv,
    Json,
}

impl SourceFormat {
    /// Parse from a CLI/config string
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "auto" => Some(Self::Auto),
            "csv" => Some(Self::Csv),
            "json" => Some(Self::Json),
            _ => None,
        }
    }

    /// Concrete file extensions tried for this format, in order
    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            Self::Auto => &["json", "csv"],
            Self::Csv => &["csv"],
            Self::Json => &["json"],
        }
    }
}

/// Decode source bytes according to a concrete extension
pub fn decode(ext: &str, mut bytes: Vec<u8>) -> Result<Vec<RawRecord>> {
    match ext {
        "csv" => {
            let text = String::from_utf8(bytes)
                .map_err(|e| AnomdashError::Parse(format!("csv is not utf-8: {}", e)))?;
            parse_csv_text(&text)
        }
        "json" => parse_json_bytes(&mut bytes),
        other => Err(AnomdashError::Parse(format!("unsupported format: {}", other))),
    }
}

fn ticker_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._-]*$").expect("valid regex"))
}

/// Check whether `ticker` is safe to use as a file stem or URL segment
pub fn is_valid_ticker(ticker: &str) -> bool {
    ticker.len() <= 32 && !ticker.contains("..") && ticker_pattern().is_match(ticker)
}

/// Validate a ticker before it is joined into a path or URL
pub fn validate_ticker(ticker: &str) -> Result<&str> {
    if is_valid_ticker(ticker) {
        Ok(ticker)
    } else {
        Err(AnomdashError::InvalidTicker(ticker.to_string()))
    }
}

/// Read `<data_dir>/<ticker>.<ext>` and decode it
fn read_ticker_file(data_dir: &Path, ticker: &str, ext: &str) -> Result<Vec<RawRecord>> {
    let ticker = validate_ticker(ticker)?;
    let path = data_dir.join(format!("{}.{}", ticker, ext));
    let bytes = fs::read(&path)?;
    tracing::debug!(path = %path.display(), bytes = bytes.len(), "read ticker file");
    decode(ext, bytes)
}
