//! Record types for per-ticker anomaly data

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// One loosely-typed row as read from CSV or JSON, keys in source order.
pub type RawRecord = serde_json::Map<String, serde_json::Value>;

/// Date used when a row carries no usable date under any alias
pub const UNKNOWN_DATE: &str = "unknown";

/// One trading day for one ticker
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DailyRecord {
    pub date: String,
    pub close: f64,
    pub daily_return: f64,
    pub volume: u64,
    pub volume_ratio_20d: f64,
    pub volatility_5d: f64,
    /// Stored as 0/1 on the wire
    #[serde(with = "flag")]
    pub is_smart_anomaly: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anomaly_score: Option<f64>,
}

impl DailyRecord {
    /// Parse the date as `YYYY-MM-DD`, ignoring any trailing time component.
    /// Returns None for the unknown-date sentinel.
    pub fn naive_date(&self) -> Option<NaiveDate> {
        let head = self.date.get(..10).unwrap_or(&self.date);
        NaiveDate::parse_from_str(head, "%Y-%m-%d").ok()
    }

    pub fn has_known_date(&self) -> bool {
        self.date != UNKNOWN_DATE
    }
}

/// Derived aggregate over one ticker's series
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct TickerSummary {
    pub ticker: String,
    pub total_days: usize,
    pub anomaly_count: usize,
    pub avg_volatility: f64,
    /// Largest absolute daily return
    pub max_return: f64,
    /// Last (up to 5) anomalous days, chronological
    pub recent_anomalies: Vec<DailyRecord>,
    /// Anomalous days whose volume ran above twice the 20-day average
    pub high_volume_anomalies: usize,
    /// Percentage of days flagged as anomalous
    pub anomaly_rate: f64,
}

impl TickerSummary {
    /// Zeroed summary for a ticker without data
    pub fn empty(ticker: &str) -> Self {
        Self {
            ticker: ticker.to_string(),
            ..Self::default()
        }
    }
}

/// Serde adapter for the 0/1 anomaly flag
mod flag {
    use super::*;

    pub fn serialize<S>(value: &bool, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        s.serialize_u8(u8::from(*value))
    }

    pub fn deserialize<'de, D>(d: D) -> Result<bool, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Bool(bool),
            Number(f64),
            Text(String),
        }

        Ok(match Repr::deserialize(d)? {
            Repr::Bool(b) => b,
            Repr::Number(n) => n != 0.0,
            Repr::Text(s) => s
                .trim()
                .parse::<f64>()
                .map(|n| n != 0.0)
                .unwrap_or_else(|_| s.trim().eq_ignore_ascii_case("true")),
        })
    }
}
