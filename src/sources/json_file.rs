//! JSON record source

use std::path::{Path, PathBuf};

use serde_json::Value;

use super::{read_ticker_file, RecordSource};
use crate::types::{AnomdashError, RawRecord, Result};

/// Parse a JSON array of objects into raw rows.
///
/// The buffer is parsed in place by simd-json. Anything other than a
/// top-level array is rejected; a non-object element becomes an empty row
/// so that row positions are preserved.
pub fn parse_json_bytes(bytes: &mut [u8]) -> Result<Vec<RawRecord>> {
    let value: Value =
        simd_json::from_slice(bytes).map_err(|e| AnomdashError::Parse(e.to_string()))?;

    let items = match value {
        Value::Array(items) => items,
        other => {
            return Err(AnomdashError::Parse(format!(
                "expected top-level array, found {}",
                kind(&other)
            )))
        }
    };

    Ok(items
        .into_iter()
        .enumerate()
        .map(|(i, item)| match item {
            Value::Object(map) => map,
            other => {
                tracing::warn!(index = i, kind = kind(&other), "non-object row in json array");
                RawRecord::new()
            }
        })
        .collect())
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Reads `<data_dir>/<TICKER>.json`
pub struct JsonFileSource {
    data_dir: PathBuf,
}

impl JsonFileSource {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

impl RecordSource for JsonFileSource {
    fn name(&self) -> &str {
        "json-file"
    }

    fn fetch(&self, ticker: &str) -> Result<Vec<RawRecord>> {
        read_ticker_file(&self.data_dir, ticker, "json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture_dir() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("tests")
            .join("fixtures")
            .join("data")
    }

    fn parse(text: &str) -> Result<Vec<RawRecord>> {
        let mut bytes = text.as_bytes().to_vec();
        parse_json_bytes(&mut bytes)
    }

    #[test]
    fn test_parse_array_of_objects() {
        let rows = parse(r#"[{"Date": "2024-01-02", "Close": 155.0}, {"date": "2024-01-03"}]"#)
            .unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["Close"], 155.0);
        assert_eq!(rows[1]["date"], "2024-01-03");
    }

    #[test]
    fn test_key_order_preserved() {
        let rows = parse(r#"[{"zeta": 1, "alpha": 2, "mid": 3}]"#).unwrap();
        let keys: Vec<&str> = rows[0].keys().map(String::as_str).collect();
        assert_eq!(keys, ["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_empty_array() {
        assert!(parse("[]").unwrap().is_empty());
    }

    #[test]
    fn test_top_level_object_rejected() {
        let err = parse(r#"{"error": "nope"}"#).unwrap_err();
        assert!(err.to_string().contains("expected top-level array"));
    }

    #[test]
    fn test_invalid_json_rejected() {
        assert!(matches!(parse("[{"), Err(AnomdashError::Parse(_))));
    }

    #[test]
    fn test_non_object_element_becomes_empty_row() {
        let rows = parse(r#"[{"Date": "2024-01-02"}, 42, {"Date": "2024-01-03"}]"#).unwrap();
        assert_eq!(rows.len(), 3);
        assert!(rows[1].is_empty());
    }

    // ========== JsonFileSource ==========

    #[test]
    fn test_fetch_capitalized_fixture() {
        let rows = JsonFileSource::new(fixture_dir()).fetch("MSFT").unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1]["Anomaly_Score"], 0.77);
    }

    #[test]
    fn test_fetch_malformed_fixture() {
        let result = JsonFileSource::new(fixture_dir()).fetch("BROKEN");
        assert!(matches!(result, Err(AnomdashError::Parse(_))));
    }

    #[test]
    fn test_source_name() {
        assert_eq!(JsonFileSource::new(".").name(), "json-file");
    }
}
