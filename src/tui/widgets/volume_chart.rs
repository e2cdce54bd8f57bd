//! 20-day volume ratio with the high-volume threshold

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    symbols::Marker,
    text::Span,
    widgets::{Block, Borders, Chart, Dataset, GraphType, LegendPosition, Widget},
};

use super::chart::{anomaly_points, date_axis, points, value_axis, x_bounds, y_bounds, NoData};
use crate::services::aggregator::HIGH_VOLUME_RATIO;
use crate::tui::theme::Theme;
use crate::types::DailyRecord;

pub struct VolumeChart<'a> {
    ticker: &'a str,
    series: &'a [DailyRecord],
    theme: Theme,
}

impl<'a> VolumeChart<'a> {
    pub fn new(ticker: &'a str, series: &'a [DailyRecord], theme: Theme) -> Self {
        Self {
            ticker,
            series,
            theme,
        }
    }
}

impl Widget for VolumeChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if self.series.is_empty() {
            NoData::new(self.ticker, self.theme).render(area, buf);
            return;
        }

        let ratio = points(self.series, |r| r.volume_ratio_20d);
        let anomalies = anomaly_points(self.series, |r| r.volume_ratio_20d);
        let [x_min, x_max] = x_bounds(self.series.len());
        let threshold = [(x_min, HIGH_VOLUME_RATIO), (x_max, HIGH_VOLUME_RATIO)];

        // Keep the threshold visible even on quiet series
        let bounds = y_bounds(
            self.series
                .iter()
                .map(|r| r.volume_ratio_20d)
                .chain(std::iter::once(HIGH_VOLUME_RATIO)),
            true,
        );

        let datasets = vec![
            Dataset::default()
                .name("Volume / 20d avg")
                .marker(Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(self.theme.volume()))
                .data(&ratio),
            Dataset::default()
                .name(format!("{:.0}x threshold", HIGH_VOLUME_RATIO))
                .marker(Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(self.theme.muted()))
                .data(&threshold),
            Dataset::default()
                .name("Smart anomaly")
                .marker(Marker::Dot)
                .graph_type(GraphType::Scatter)
                .style(
                    Style::default()
                        .fg(self.theme.anomaly())
                        .add_modifier(Modifier::BOLD),
                )
                .data(&anomalies),
        ];

        let title = Span::styled(
            format!(" {} volume ratio ", self.ticker),
            Style::default()
                .fg(self.theme.text())
                .add_modifier(Modifier::BOLD),
        );

        Chart::new(datasets)
            .block(
                Block::default()
                    .title(title)
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(self.theme.muted())),
            )
            .x_axis(date_axis(self.series, self.theme))
            .y_axis(value_axis("x", bounds, 1, self.theme))
            .legend_position(Some(LegendPosition::TopLeft))
            .render(area, buf);
    }
}
