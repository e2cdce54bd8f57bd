//! CSV record source

use std::path::{Path, PathBuf};

use serde_json::Value;

use super::{read_ticker_file, RecordSource};
use crate::types::{AnomdashError, RawRecord, Result};

/// Header that upstream files mistakenly put over the date column
const MISLABELED_DATE_HEADER: &str = "Price";

/// Parse CSV text into raw rows.
///
/// The first line is the header row. Values are mapped positionally onto
/// headers; short rows leave their trailing keys absent. A first-column
/// `Price` header is renamed to `Date` unless the file also has a real
/// `Date` column.
pub fn parse_csv_text(text: &str) -> Result<Vec<RawRecord>> {
    let text = text.trim_start_matches('\u{feff}');
    let mut reader = ::csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(::csv::Trim::All)
        .from_reader(text.as_bytes());

    let mut headers: Vec<String> = reader
        .headers()
        .map_err(|e| AnomdashError::Parse(format!("csv header: {}", e)))?
        .iter()
        .map(String::from)
        .collect();

    if headers.first().map(String::as_str) == Some(MISLABELED_DATE_HEADER)
        && !headers.iter().any(|h| h == "Date")
    {
        headers[0] = "Date".to_string();
    }

    let mut rows = Vec::new();
    for (line, result) in reader.records().enumerate() {
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                // Header is line 1
                tracing::warn!(line = line + 2, error = %e, "skipping unreadable csv row");
                continue;
            }
        };

        // Only blank lines have no fields; rows of empty fields are kept
        if record.is_empty() {
            continue;
        }

        let row: RawRecord = headers
            .iter()
            .zip(record.iter())
            .map(|(h, v)| (h.clone(), Value::String(v.to_string())))
            .collect();
        rows.push(row);
    }

    Ok(rows)
}

/// Reads `<data_dir>/<TICKER>.csv`
pub struct CsvFileSource {
    data_dir: PathBuf,
}

impl CsvFileSource {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

impl RecordSource for CsvFileSource {
    fn name(&self) -> &str {
        "csv-file"
    }

    fn fetch(&self, ticker: &str) -> Result<Vec<RawRecord>> {
        read_ticker_file(&self.data_dir, ticker, "csv")
    }
}
