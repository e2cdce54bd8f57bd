//! Close price line with smart-anomaly markers

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

pub struct PriceChart<'a> {
    ticker: &'a str,
    series: &'a [DailyRecord],
    theme: Theme,
}

impl<'a> PriceChart<'a> {
    pub fn new(ticker: &'a str, series: &'a [DailyRecord], theme: Theme) -> Self {
        Self {
            ticker,
            series,
            theme,
        }
    }
}

impl Widget for PriceChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if self.series.is_empty() {
            NoData::new(self.ticker, self.theme).render(area, buf);
            return;
        }

        let close = points(self.series, |r| r.close);
        let anomalies = anomaly_points(self.series, |r| r.close);
        let bounds = y_bounds(self.series.iter().map(|r| r.close), false);

        let datasets = vec![
            Dataset::default()
                .name("Close")
                .marker(Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(self.theme.price()))
                .data(&close),
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
            format!(" {} close price ", self.ticker),
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
            .y_axis(value_axis("$", bounds, 2, self.theme))
            .legend_position(Some(LegendPosition::TopLeft))
            .render(area, buf);
    }
}
