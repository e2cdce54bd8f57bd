//! Record normalization service
//!
//! Converts one raw tabular row into a canonical [`DailyRecord`]. Upstream
//! files disagree on key casing and sometimes header the date column as
//! `Price`, so every canonical field is resolved through an ordered alias
//! list instead of a fixed key.
//!
//! Normalization never fails: unusable values degrade to `0`, `false`,
//! an absent score, or the [`UNKNOWN_DATE`] sentinel.

use serde_json::Value;

use crate::types::{DailyRecord, RawRecord, UNKNOWN_DATE};

/// Canonical numeric/flag fields of a [`DailyRecord`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Close,
    DailyReturn,
    Volume,
    VolumeRatio20d,
    Volatility5d,
    IsSmartAnomaly,
    AnomalyScore,
}

/// Date candidates, tried in this order before the first-key fallback.
/// `Price` is a known upstream mislabeling of the date column.
pub const DATE_ALIASES: &[&str] = &["Date", "Price"];

/// Candidate keys per field, capitalized form first.
pub const FIELD_ALIASES: &[(Field, &[&str])] = &[
    (Field::Close, &["Close", "close"]),
    (Field::DailyReturn, &["Daily_Return", "daily_return"]),
    (Field::Volume, &["Volume", "volume"]),
    (
        Field::VolumeRatio20d,
        &["Volume_Ratio_20d", "volume_ratio_20d"],
    ),
    (Field::Volatility5d, &["Volatility_5d", "volatility_5d"]),
    (
        Field::IsSmartAnomaly,
        &["Is_Smart_Anomaly", "is_smart_anomaly"],
    ),
    (Field::AnomalyScore, &["Anomaly_Score", "anomaly_score"]),
];

/// Ordered candidate keys for a field
pub fn aliases_for(field: Field) -> &'static [&'static str] {
    FIELD_ALIASES
        .iter()
        .find(|(f, _)| *f == field)
        .map(|(_, aliases)| *aliases)
        .unwrap_or(&[])
}

/// Normalize a raw row into a [`DailyRecord`].
///
/// # Examples
/// ```
/// use anomdash::services::normalizer::normalize;
/// use anomdash::types::RawRecord;
///
/// let raw: RawRecord = serde_json::from_str(
///     r#"{"Price": "2024-01-02", "Close": "155.0", "Is_Smart_Anomaly": "1"}"#,
/// ).unwrap();
/// let record = normalize(&raw);
/// assert_eq!(record.date, "2024-01-02");
/// assert_eq!(record.close, 155.0);
/// assert!(record.is_smart_anomaly);
/// assert!(record.anomaly_score.is_none());
/// ```
pub fn normalize(raw: &RawRecord) -> DailyRecord {
    DailyRecord {
        date: resolve_date(raw),
        close: float_field(raw, Field::Close),
        daily_return: float_field(raw, Field::DailyReturn),
        volume: volume_field(raw),
        volume_ratio_20d: float_field(raw, Field::VolumeRatio20d),
        volatility_5d: float_field(raw, Field::Volatility5d),
        is_smart_anomaly: flag_field(raw),
        anomaly_score: score_field(raw),
    }
}

/// Resolve the date: `Date`, then `Price`, then the first key's value,
/// then [`UNKNOWN_DATE`].
pub fn resolve_date(raw: &RawRecord) -> String {
    DATE_ALIASES
        .iter()
        .filter_map(|key| raw.get(*key))
        .chain(raw.values().next())
        .find_map(date_text)
        .unwrap_or_else(|| UNKNOWN_DATE.to_string())
}

fn date_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// First alias holding a non-null, non-blank value
fn lookup<'a>(raw: &'a RawRecord, field: Field) -> Option<&'a Value> {
    aliases_for(field)
        .iter()
        .filter_map(|key| raw.get(*key))
        .find(|v| !is_blank(v))
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

/// Strict numeric parse: JSON numbers or trimmed numeric strings, finite only
fn parse_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

fn float_field(raw: &RawRecord, field: Field) -> f64 {
    lookup(raw, field).and_then(parse_number).unwrap_or(0.0)
}

fn volume_field(raw: &RawRecord) -> u64 {
    match lookup(raw, Field::Volume) {
        Some(Value::Number(n)) if n.is_u64() => n.as_u64().unwrap_or(0),
        Some(v) => match parse_number(v) {
            // Saturating float-to-int cast; fractional volumes are truncated
            Some(n) if n >= 0.0 => n as u64,
            _ => 0,
        },
        None => 0,
    }
}

fn flag_field(raw: &RawRecord) -> bool {
    match lookup(raw, Field::IsSmartAnomaly) {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) if s.trim().eq_ignore_ascii_case("true") => true,
        Some(v) => parse_number(v).is_some_and(|n| n != 0.0),
        None => false,
    }
}

/// Score is optional: a zero or unparseable score reads as absent
fn score_field(raw: &RawRecord) -> Option<f64> {
    aliases_for(Field::AnomalyScore)
        .iter()
        .filter_map(|key| raw.get(*key))
        .filter_map(parse_number)
        .find(|n| *n != 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(value: Value) -> RawRecord {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {}", other),
        }
    }

    // ========== Date resolution ==========

    #[test]
    fn test_date_key_preferred() {
        let r = raw(json!({"Price": "2024-01-01", "Date": "2024-01-02"}));
        assert_eq!(resolve_date(&r), "2024-01-02");
    }

    #[test]
    fn test_price_key_used_as_date() {
        let r = raw(json!({"Price": "2024-01-02", "Close": 155.0}));
        assert_eq!(resolve_date(&r), "2024-01-02");
    }

    #[test]
    fn test_first_key_fallback() {
        let r = raw(json!({"timestamp": "2024-03-04", "Close": 10.0}));
        assert_eq!(resolve_date(&r), "2024-03-04");
    }

    #[test]
    fn test_lowercase_date_only_used_as_first_key() {
        let first: RawRecord =
            serde_json::from_str(r#"{"date": "2024-01-02", "close": 101.5}"#).unwrap();
        assert_eq!(resolve_date(&first), "2024-01-02");

        let later: RawRecord =
            serde_json::from_str(r#"{"close": 101.5, "date": "2024-01-02"}"#).unwrap();
        assert_eq!(resolve_date(&later), "101.5");
    }

    #[test]
    fn test_first_key_follows_source_order() {
        let r: RawRecord =
            serde_json::from_str(r#"{"zeta": "2024-05-06", "alpha": "2024-01-01"}"#).unwrap();
        assert_eq!(resolve_date(&r), "2024-05-06");
    }

    #[test]
    fn test_blank_date_falls_through_to_price() {
        let r = raw(json!({"Date": "  ", "Price": "2024-01-02"}));
        assert_eq!(resolve_date(&r), "2024-01-02");
    }

    #[test]
    fn test_unknown_date_on_empty_row() {
        assert_eq!(resolve_date(&RawRecord::new()), UNKNOWN_DATE);
    }

    #[test]
    fn test_unknown_date_when_first_key_unusable() {
        let r = raw(json!({"Close": null, "Volume": ""}));
        assert_eq!(resolve_date(&r), UNKNOWN_DATE);
    }

    #[test]
    fn test_date_trimmed() {
        let r = raw(json!({"Date": " 2024-01-02 "}));
        assert_eq!(resolve_date(&r), "2024-01-02");
    }

    // ========== Alias precedence ==========

    #[test]
    fn test_capitalized_alias_wins() {
        let r = raw(json!({"Date": "d", "close": 1.0, "Close": 2.0}));
        assert_eq!(normalize(&r).close, 2.0);
    }

    #[test]
    fn test_lowercase_alias_used_when_capitalized_missing() {
        let r = raw(json!({
            "date": "2024-01-02",
            "close": 101.5,
            "daily_return": -0.75,
            "volume": 900,
            "volume_ratio_20d": 0.9,
            "volatility_5d": 1.2,
            "is_smart_anomaly": 0
        }));
        let rec = normalize(&r);
        assert_eq!(rec.date, "2024-01-02");
        assert_eq!(rec.close, 101.5);
        assert_eq!(rec.daily_return, -0.75);
        assert_eq!(rec.volume, 900);
        assert_eq!(rec.volume_ratio_20d, 0.9);
        assert_eq!(rec.volatility_5d, 1.2);
        assert!(!rec.is_smart_anomaly);
    }

    #[test]
    fn test_null_capitalized_falls_back_to_lowercase() {
        let r = raw(json!({"Date": "d", "Close": null, "close": 3.5}));
        assert_eq!(normalize(&r).close, 3.5);
    }

    #[test]
    fn test_aliases_table_order() {
        assert_eq!(aliases_for(Field::Close), &["Close", "close"]);
        assert_eq!(
            aliases_for(Field::AnomalyScore),
            &["Anomaly_Score", "anomaly_score"]
        );
        assert_eq!(DATE_ALIASES, &["Date", "Price"]);
    }

    // ========== Numeric coercion ==========

    #[test]
    fn test_numeric_strings_parsed() {
        let r = raw(json!({
            "Date": "2024-01-02",
            "Close": "155.0",
            "Daily_Return": " 1.5 ",
            "Volume": "1200000",
            "Volume_Ratio_20d": "1.8",
            "Volatility_5d": "2.8"
        }));
        let rec = normalize(&r);
        assert_eq!(rec.close, 155.0);
        assert_eq!(rec.daily_return, 1.5);
        assert_eq!(rec.volume, 1_200_000);
        assert_eq!(rec.volume_ratio_20d, 1.8);
        assert_eq!(rec.volatility_5d, 2.8);
    }

    #[test]
    fn test_non_numeric_strings_become_zero() {
        let r = raw(json!({
            "Date": "2024-01-02",
            "Close": "n/a",
            "Daily_Return": "abc",
            "Volume": "lots",
            "Volume_Ratio_20d": "1,8",
            "Volatility_5d": "NaN"
        }));
        let rec = normalize(&r);
        assert_eq!(rec.close, 0.0);
        assert_eq!(rec.daily_return, 0.0);
        assert_eq!(rec.volume, 0);
        assert_eq!(rec.volume_ratio_20d, 0.0);
        assert_eq!(rec.volatility_5d, 0.0);
    }

    #[test]
    fn test_missing_fields_default_to_zero() {
        let rec = normalize(&raw(json!({"Date": "2024-01-02"})));
        assert_eq!(rec.close, 0.0);
        assert_eq!(rec.volume, 0);
        assert!(!rec.is_smart_anomaly);
        assert!(rec.anomaly_score.is_none());
    }

    #[test]
    fn test_volume_fractional_truncated() {
        let rec = normalize(&raw(json!({"Date": "d", "Volume": 1500.9})));
        assert_eq!(rec.volume, 1500);
    }

    #[test]
    fn test_volume_negative_clamped() {
        let rec = normalize(&raw(json!({"Date": "d", "Volume": "-20"})));
        assert_eq!(rec.volume, 0);
    }

    // ========== Anomaly flag ==========

    #[test]
    fn test_flag_variants() {
        let cases = [
            (json!(1), true),
            (json!(0), false),
            (json!("1"), true),
            (json!("0"), false),
            (json!(1.0), true),
            (json!(true), true),
            (json!("TRUE"), true),
            (json!("false"), false),
            (json!("yes"), false),
        ];
        for (value, expected) in cases {
            let r = raw(json!({"Date": "d", "Is_Smart_Anomaly": value.clone()}));
            assert_eq!(normalize(&r).is_smart_anomaly, expected, "value {}", value);
        }
    }

    // ========== Anomaly score ==========

    #[test]
    fn test_score_absent_when_missing() {
        assert!(normalize(&raw(json!({"Date": "d"}))).anomaly_score.is_none());
    }

    #[test]
    fn test_score_absent_when_both_falsy() {
        let r = raw(json!({"Date": "d", "Anomaly_Score": 0, "anomaly_score": ""}));
        assert!(normalize(&r).anomaly_score.is_none());
    }

    #[test]
    fn test_score_falls_back_to_lowercase() {
        let r = raw(json!({"Date": "d", "Anomaly_Score": null, "anomaly_score": "-0.42"}));
        assert_eq!(normalize(&r).anomaly_score, Some(-0.42));
    }

    #[test]
    fn test_score_present_when_capitalized() {
        let r = raw(json!({"Date": "d", "Anomaly_Score": 0.91, "anomaly_score": 0.1}));
        assert_eq!(normalize(&r).anomaly_score, Some(0.91));
    }

    #[test]
    fn test_score_unparseable_is_absent() {
        let r = raw(json!({"Date": "d", "Anomaly_Score": "high"}));
        assert!(normalize(&r).anomaly_score.is_none());
    }

    // ========== Properties ==========

    use proptest::prelude::*;

    proptest! {
        #[test]
        fn prop_date_never_empty(
            keys in proptest::collection::vec("[a-z_]{1,8}", 0..6),
            vals in proptest::collection::vec("[ 0-9a-z-]{0,6}", 0..6),
        ) {
            let r: RawRecord = keys
                .into_iter()
                .zip(vals)
                .map(|(k, v)| (k, Value::String(v)))
                .collect();
            prop_assert!(!normalize(&r).date.is_empty());
        }

        #[test]
        fn prop_non_numeric_text_is_zero(text in "[a-zA-Z ]{1,12}") {
            prop_assume!(text.trim().parse::<f64>().is_err());
            let r = raw(json!({"Date": "d", "Close": text.clone(), "Volume": text}));
            let rec = normalize(&r);
            prop_assert_eq!(rec.close, 0.0);
            prop_assert_eq!(rec.volume, 0);
        }
    }
}
