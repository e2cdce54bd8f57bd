//! Series loading service
//!
//! Turns a ticker into an ordered `Vec<DailyRecord>` by fetching raw rows
//! from a [`RecordSource`] and normalizing each one. Source failures never
//! reach the caller of [`SeriesLoader::load`]: "no data" is a renderable
//! state, so they degrade to the configured [`FallbackPolicy`].

use serde::{Deserialize, Serialize};

use crate::services::normalizer::normalize;
use crate::sources::RecordSource;
use crate::types::{DailyRecord, Result};

/// What `load` returns when the source is unavailable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FallbackPolicy {
    /// Empty series
    #[default]
    Empty,
    /// Small deterministic demo series
    Placeholder,
}

/// Loads per-ticker series through a record source
pub struct SeriesLoader {
    source: Box<dyn RecordSource>,
    fallback: FallbackPolicy,
}

impl SeriesLoader {
    pub fn new(source: Box<dyn RecordSource>) -> Self {
        Self {
            source,
            fallback: FallbackPolicy::default(),
        }
    }

    pub fn with_fallback(mut self, fallback: FallbackPolicy) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn source_name(&self) -> &str {
        self.source.name()
    }

    pub fn fallback(&self) -> FallbackPolicy {
        self.fallback
    }

    /// Load a ticker's series in source row order, degrading to the
    /// fallback on any source error
    pub fn load(&self, ticker: &str) -> Vec<DailyRecord> {
        match self.try_load(ticker) {
            Ok(series) => series,
            Err(e) => {
                tracing::warn!(
                    ticker,
                    source = self.source.name(),
                    error = %e,
                    "source unavailable, using {:?} fallback",
                    self.fallback
                );
                match self.fallback {
                    FallbackPolicy::Empty => Vec::new(),
                    FallbackPolicy::Placeholder => placeholder_series(),
                }
            }
        }
    }

    /// Load a ticker's series, surfacing source errors
    pub fn try_load(&self, ticker: &str) -> Result<Vec<DailyRecord>> {
        let rows = self.source.fetch(ticker)?;
        tracing::debug!(ticker, rows = rows.len(), "normalizing rows");
        Ok(rows.iter().map(normalize).collect())
    }
}

/// (date, close, daily_return, volume, volume_ratio_20d, volatility_5d, anomaly, score)
type PlaceholderRow = (&'static str, f64, f64, u64, f64, f64, bool, Option<f64>);

const PLACEHOLDER_ROWS: &[PlaceholderRow] = &[
    ("2024-01-02", 150.00, 0.00, 1_000_000, 1.00, 1.20, false, None),
    ("2024-01-03", 151.20, 0.80, 1_050_000, 1.04, 1.25, false, None),
    ("2024-01-04", 149.90, -0.86, 980_000, 0.97, 1.31, false, None),
    ("2024-01-05", 156.40, 4.34, 2_450_000, 2.35, 2.10, true, Some(0.87)),
    ("2024-01-08", 155.10, -0.83, 1_200_000, 1.12, 2.05, false, None),
    ("2024-01-09", 155.80, 0.45, 1_010_000, 0.94, 1.98, false, None),
    ("2024-01-10", 157.00, 0.77, 1_100_000, 1.02, 1.40, false, None),
    ("2024-01-11", 151.30, -3.63, 2_900_000, 2.61, 2.42, true, Some(0.91)),
    ("2024-01-12", 152.00, 0.46, 1_150_000, 1.05, 2.30, false, None),
    ("2024-01-16", 152.90, 0.59, 1_020_000, 0.96, 1.75, false, None),
];

/// Fixed demo series used by [`FallbackPolicy::Placeholder`]
pub fn placeholder_series() -> Vec<DailyRecord> {
    PLACEHOLDER_ROWS
        .iter()
        .map(
            |&(date, close, daily_return, volume, volume_ratio_20d, volatility_5d, anomaly, score)| {
                DailyRecord {
                    date: date.to_string(),
                    close,
                    daily_return,
                    volume,
                    volume_ratio_20d,
                    volatility_5d,
                    is_smart_anomaly: anomaly,
                    anomaly_score: score,
                }
            },
        )
        .collect()
}
