//! Shared helpers for the series chart views

use chrono::NaiveDate;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    widgets::{Axis, Widget},
};

use crate::tui::theme::Theme;
use crate::types::DailyRecord;

/// Axis label for a record date (`MM/YY`), raw text when not ISO.
pub fn format_axis_date(date: &str) -> String {
    let head = date.get(..10).unwrap_or(date);
    match NaiveDate::parse_from_str(head, "%Y-%m-%d") {
        Ok(d) => d.format("%m/%y").to_string(),
        Err(_) => date.to_string(),
    }
}

/// First, middle and last date labels for an index-based x axis
pub fn x_labels(series: &[DailyRecord]) -> Vec<String> {
    match series.len() {
        0 => Vec::new(),
        1 => vec![format_axis_date(&series[0].date)],
        2 => vec![
            format_axis_date(&series[0].date),
            format_axis_date(&series[1].date),
        ],
        n => vec![
            format_axis_date(&series[0].date),
            format_axis_date(&series[n / 2].date),
            format_axis_date(&series[n - 1].date),
        ],
    }
}

/// X bounds covering every index (at least one unit wide)
pub fn x_bounds(len: usize) -> [f64; 2] {
    [0.0, (len.saturating_sub(1)).max(1) as f64]
}

/// Y bounds with 5% headroom; flat data gets a unit band
pub fn y_bounds(values: impl Iterator<Item = f64>, floor_at_zero: bool) -> [f64; 2] {
    let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if !min.is_finite() || !max.is_finite() {
        return [0.0, 1.0];
    }

    let (min, max) = if (max - min).abs() < f64::EPSILON {
        (min - 1.0, max + 1.0)
    } else {
        let pad = (max - min) * 0.05;
        (min - pad, max + pad)
    };

    if floor_at_zero {
        [min.max(0.0), max]
    } else {
        [min, max]
    }
}

/// Low, middle and high y labels
pub fn y_labels(bounds: [f64; 2], precision: usize) -> Vec<String> {
    let mid = (bounds[0] + bounds[1]) / 2.0;
    [bounds[0], mid, bounds[1]]
        .iter()
        .map(|v| format!("{:.*}", precision, v))
        .collect()
}

/// `(index, value)` points for every day
pub fn points(series: &[DailyRecord], value: impl Fn(&DailyRecord) -> f64) -> Vec<(f64, f64)> {
    series
        .iter()
        .enumerate()
        .map(|(i, r)| (i as f64, value(r)))
        .collect()
}

/// `(index, value)` points for anomalous days only
pub fn anomaly_points(
    series: &[DailyRecord],
    value: impl Fn(&DailyRecord) -> f64,
) -> Vec<(f64, f64)> {
    series
        .iter()
        .enumerate()
        .filter(|(_, r)| r.is_smart_anomaly)
        .map(|(i, r)| (i as f64, value(r)))
        .collect()
}

/// Styled x axis over the series dates
pub fn date_axis<'a>(series: &[DailyRecord], theme: Theme) -> Axis<'a> {
    Axis::default()
        .style(Style::default().fg(theme.muted()))
        .bounds(x_bounds(series.len()))
        .labels(x_labels(series))
}

/// Styled y axis with three value labels
pub fn value_axis<'a>(title: &'a str, bounds: [f64; 2], precision: usize, theme: Theme) -> Axis<'a> {
    Axis::default()
        .title(title)
        .style(Style::default().fg(theme.muted()))
        .bounds(bounds)
        .labels(y_labels(bounds, precision))
}

/// Centered placeholder shown instead of an empty chart
pub struct NoData<'a> {
    ticker: &'a str,
    theme: Theme,
}

impl<'a> NoData<'a> {
    pub fn new(ticker: &'a str, theme: Theme) -> Self {
        Self { ticker, theme }
    }
}

impl Widget for NoData<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 {
            return;
        }
        let text = format!("No data available for {}", self.ticker);
        let x = area.x + (area.width.saturating_sub(text.len() as u16)) / 2;
        let y = area.y + area.height / 2;
        buf.set_string(x, y, &text, Style::default().fg(self.theme.muted()));
    }
}
