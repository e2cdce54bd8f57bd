//! Aggregator service for computing per-ticker summaries

use crate::types::{DailyRecord, TickerSummary};

/// Number of trailing anomalies kept in a summary
pub const RECENT_ANOMALY_LIMIT: usize = 5;

/// Volume ratio above which an anomaly counts as high-volume
pub const HIGH_VOLUME_RATIO: f64 = 2.0;

/// Aggregator for computing series statistics
pub struct Aggregator;

impl Aggregator {
    /// Summarize one ticker's series. Empty series yield a zeroed summary.
    pub fn summarize(ticker: &str, series: &[DailyRecord]) -> TickerSummary {
        if series.is_empty() {
            return TickerSummary::empty(ticker);
        }

        let anomalies = Self::anomalies(series);
        let total_days = series.len();
        let anomaly_count = anomalies.len();

        let avg_volatility =
            series.iter().map(|r| r.volatility_5d).sum::<f64>() / total_days as f64;
        let max_return = series
            .iter()
            .map(|r| r.daily_return.abs())
            .fold(0.0_f64, f64::max);

        let high_volume_anomalies = anomalies
            .iter()
            .filter(|r| r.volume_ratio_20d > HIGH_VOLUME_RATIO)
            .count();

        let recent_start = anomaly_count.saturating_sub(RECENT_ANOMALY_LIMIT);
        let recent_anomalies = anomalies[recent_start..]
            .iter()
            .map(|r| (*r).clone())
            .collect();

        TickerSummary {
            ticker: ticker.to_string(),
            total_days,
            anomaly_count,
            avg_volatility,
            max_return,
            recent_anomalies,
            high_volume_anomalies,
            anomaly_rate: anomaly_count as f64 / total_days as f64 * 100.0,
        }
    }

    /// Anomalous days in original order
    pub fn anomalies(series: &[DailyRecord]) -> Vec<&DailyRecord> {
        series.iter().filter(|r| r.is_smart_anomaly).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_record(day: u32, ret: f64, vol: f64, ratio: f64, anomaly: bool) -> DailyRecord {
        DailyRecord {
            date: format!("2024-01-{:02}", day),
            close: 100.0 + day as f64,
            daily_return: ret,
            volume: 1_000_000,
            volume_ratio_20d: ratio,
            volatility_5d: vol,
            is_smart_anomaly: anomaly,
            anomaly_score: None,
        }
    }

    // ========== summarize() tests ==========

    #[test]
    fn test_summarize_empty() {
        let s = Aggregator::summarize("AAPL", &[]);

        assert_eq!(s.ticker, "AAPL");
        assert_eq!(s.total_days, 0);
        assert_eq!(s.anomaly_count, 0);
        assert!((s.avg_volatility - 0.0).abs() < f64::EPSILON);
        assert!((s.max_return - 0.0).abs() < f64::EPSILON);
        assert!(s.recent_anomalies.is_empty());
        assert_eq!(s.high_volume_anomalies, 0);
        assert!((s.anomaly_rate - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_summarize_single_day() {
        let series = vec![make_record(2, 1.5, 2.8, 1.8, true)];
        let s = Aggregator::summarize("AAPL", &series);

        assert_eq!(s.total_days, 1);
        assert_eq!(s.anomaly_count, 1);
        assert!((s.avg_volatility - 2.8).abs() < f64::EPSILON);
        assert!((s.max_return - 1.5).abs() < f64::EPSILON);
        assert_eq!(s.recent_anomalies, series);
        assert!((s.anomaly_rate - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_max_return_uses_absolute_value() {
        let series = vec![
            make_record(2, 1.5, 1.0, 1.0, false),
            make_record(3, -6.25, 1.0, 1.0, false),
            make_record(4, 3.0, 1.0, 1.0, false),
        ];
        let s = Aggregator::summarize("TSLA", &series);
        assert!((s.max_return - 6.25).abs() < f64::EPSILON);
    }

    #[test]
    fn test_avg_volatility_over_all_days() {
        let series = vec![
            make_record(2, 0.0, 2.0, 1.0, false),
            make_record(3, 0.0, 4.0, 1.0, true),
            make_record(4, 0.0, 6.0, 1.0, false),
        ];
        let s = Aggregator::summarize("MSFT", &series);
        assert!((s.avg_volatility - 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_recent_anomalies_is_last_five_in_order() {
        let series: Vec<DailyRecord> = (1..=10)
            .map(|d| make_record(d, 0.0, 1.0, 1.0, d != 5))
            .collect();
        let s = Aggregator::summarize("JPM", &series);

        assert_eq!(s.anomaly_count, 9);
        let dates: Vec<&str> = s.recent_anomalies.iter().map(|r| r.date.as_str()).collect();
        assert_eq!(
            dates,
            ["2024-01-06", "2024-01-07", "2024-01-08", "2024-01-09", "2024-01-10"]
        );
    }

    #[test]
    fn test_recent_anomalies_fewer_than_limit() {
        let series = vec![
            make_record(2, 0.0, 1.0, 1.0, true),
            make_record(3, 0.0, 1.0, 1.0, false),
            make_record(4, 0.0, 1.0, 1.0, true),
        ];
        let s = Aggregator::summarize("WMT", &series);
        assert_eq!(s.recent_anomalies.len(), 2);
        assert_eq!(s.recent_anomalies[0].date, "2024-01-02");
        assert_eq!(s.recent_anomalies[1].date, "2024-01-04");
    }

    #[test]
    fn test_recent_anomalies_not_ranked_by_score() {
        let mut series: Vec<DailyRecord> =
            (1..=6).map(|d| make_record(d, 0.0, 1.0, 1.0, true)).collect();
        series[0].anomaly_score = Some(0.99);
        let s = Aggregator::summarize("JNJ", &series);
        assert!(s.recent_anomalies.iter().all(|r| r.date != "2024-01-01"));
    }

    #[test]
    fn test_high_volume_anomalies_strictly_above_two() {
        let series = vec![
            make_record(2, 0.0, 1.0, 2.0, true),
            make_record(3, 0.0, 1.0, 2.01, true),
            make_record(4, 0.0, 1.0, 3.5, false),
        ];
        let s = Aggregator::summarize("AMZN", &series);
        assert_eq!(s.high_volume_anomalies, 1);
    }

    #[test]
    fn test_anomaly_rate() {
        let series = vec![
            make_record(2, 0.0, 1.0, 1.0, true),
            make_record(3, 0.0, 1.0, 1.0, false),
            make_record(4, 0.0, 1.0, 1.0, false),
            make_record(5, 0.0, 1.0, 1.0, false),
        ];
        let s = Aggregator::summarize("GOOGL", &series);
        assert!((s.anomaly_rate - 25.0).abs() < f64::EPSILON);
    }

    // ========== anomalies() tests ==========

    #[test]
    fn test_anomalies_preserve_order() {
        let series = vec![
            make_record(9, 0.0, 1.0, 1.0, true),
            make_record(3, 0.0, 1.0, 1.0, false),
            make_record(5, 0.0, 1.0, 1.0, true),
        ];
        let dates: Vec<&str> = Aggregator::anomalies(&series)
            .iter()
            .map(|r| r.date.as_str())
            .collect();
        assert_eq!(dates, ["2024-01-09", "2024-01-05"]);
    }

    // ========== Properties ==========

    use proptest::prelude::*;

    proptest! {
        #[test]
        fn prop_summary_counts_consistent(
            flags in proptest::collection::vec((any::<bool>(), 0.0f64..5.0), 0..40)
        ) {
            let series: Vec<DailyRecord> = flags
                .iter()
                .enumerate()
                .map(|(i, (flag, ratio))| make_record(i as u32 + 1, 0.0, 1.0, *ratio, *flag))
                .collect();
            let s = Aggregator::summarize("X", &series);

            let expected = series.iter().filter(|r| r.is_smart_anomaly).count();
            prop_assert_eq!(s.anomaly_count, expected);
            prop_assert!(s.anomaly_count <= s.total_days);
            prop_assert!(s.high_volume_anomalies <= s.anomaly_count);
            prop_assert_eq!(s.recent_anomalies.len(), expected.min(RECENT_ANOMALY_LIMIT));

            let tail: Vec<DailyRecord> = series
                .iter()
                .filter(|r| r.is_smart_anomaly)
                .skip(expected.saturating_sub(RECENT_ANOMALY_LIMIT))
                .cloned()
                .collect();
            prop_assert_eq!(&s.recent_anomalies, &tail);
        }
    }
}
