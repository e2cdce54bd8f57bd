//! 5-day rolling volatility, drawn as a filled area

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    symbols::Marker,
    text::Span,
    widgets::{Block, Borders, Chart, Dataset, GraphType, LegendPosition, Widget},
};

use super::chart::{anomaly_points, date_axis, points, value_axis, y_bounds, NoData};
use crate::tui::theme::Theme;
use crate::types::DailyRecord;

pub struct VolatilityChart<'a> {
    ticker: &'a str,
    series: &'a [DailyRecord],
    theme: Theme,
}

impl<'a> VolatilityChart<'a> {
    pub fn new(ticker: &'a str, series: &'a [DailyRecord], theme: Theme) -> Self {
        Self {
            ticker,
            series,
            theme,
        }
    }
}

impl Widget for VolatilityChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if self.series.is_empty() {
            NoData::new(self.ticker, self.theme).render(area, buf);
            return;
        }

        let volatility = points(self.series, |r| r.volatility_5d);
        let anomalies = anomaly_points(self.series, |r| r.volatility_5d);
        let bounds = y_bounds(self.series.iter().map(|r| r.volatility_5d), true);

        // Bar graph type fills each column down to the axis
        let datasets = vec![
            Dataset::default()
                .name("Volatility (5d)")
                .marker(Marker::HalfBlock)
                .graph_type(GraphType::Bar)
                .style(Style::default().fg(self.theme.volatility()))
                .data(&volatility),
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
            format!(" {} 5-day volatility ", self.ticker),
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
            .y_axis(value_axis("%", bounds, 1, self.theme))
            .legend_position(Some(LegendPosition::TopLeft))
            .render(area, buf);
    }
}
