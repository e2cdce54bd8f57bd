//! Summary view widget - anomaly stat cards and recent anomalies

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use super::chart::NoData;
use crate::services::aggregator::{HIGH_VOLUME_RATIO, RECENT_ANOMALY_LIMIT};
use crate::tui::theme::Theme;
use crate::types::TickerSummary;

/// Card dimensions
const CARD_WIDTH: u16 = 24;
const CARD_HEIGHT: u16 = 5;

/// Fixed number of columns for balanced 3x2 grid
const FIXED_COLS: usize = 3;

/// Format a number with thousand separators (e.g., 1234567 -> "1,234,567")
pub fn format_number(n: u64) -> String {
    let s = n.to_string();
    let len = s.len();
    let mut result = String::with_capacity(len + len / 3);

    // Digits are ASCII, so byte indexing is safe
    for (i, ch) in s.bytes().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            result.push(',');
        }
        result.push(ch as char);
    }

    result
}

/// Calculate number of cards per row based on available width
fn cards_per_row(width: u16) -> usize {
    let usable_width = width.saturating_sub(4); // padding
    let cards = (usable_width / (CARD_WIDTH + 2)) as usize; // +2 for spacing
    cards.clamp(1, FIXED_COLS)
}

/// Summary view widget
pub struct SummaryView<'a> {
    summary: &'a TickerSummary,
    theme: Theme,
}

impl<'a> SummaryView<'a> {
    pub fn new(summary: &'a TickerSummary, theme: Theme) -> Self {
        Self { summary, theme }
    }
}

impl Widget for SummaryView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if self.summary.total_days == 0 {
            NoData::new(&self.summary.ticker, self.theme).render(area, buf);
            return;
        }

        let cols = cards_per_row(area.width);
        let cards = self.build_cards();
        let rows = cards.len().div_ceil(cols);
        let grid_height = (rows as u16) * (CARD_HEIGHT + 1);

        let chunks = Layout::vertical([
            Constraint::Length(grid_height), // Card grid
            Constraint::Length(1),           // Recent anomalies title
            Constraint::Length(1),           // Table header
            Constraint::Min(0),              // Table rows
        ])
        .split(area);

        self.render_card_grid(chunks[0], buf, &cards, cols);
        self.render_recent_title(chunks[1], buf);
        self.render_recent_table(chunks[2], chunks[3], buf);
    }
}

impl SummaryView<'_> {
    fn build_cards(&self) -> Vec<StatCard> {
        let s = self.summary;
        vec![
            StatCard {
                title: "Trading Days".to_string(),
                value: format_number(s.total_days as u64),
                color: self.theme.accent(),
            },
            StatCard {
                title: "Smart Anomalies".to_string(),
                value: format_number(s.anomaly_count as u64),
                color: self.theme.anomaly(),
            },
            StatCard {
                title: "Anomaly Rate".to_string(),
                value: format!("{:.1}%", s.anomaly_rate),
                color: self.theme.anomaly(),
            },
            StatCard {
                title: "Avg Volatility".to_string(),
                value: format!("{:.2}%", s.avg_volatility),
                color: self.theme.volatility(),
            },
            StatCard {
                title: "Max Daily Move".to_string(),
                value: format!("{:.2}%", s.max_return),
                color: self.theme.date(),
            },
            StatCard {
                title: format!("Volume > {:.0}x Avg", HIGH_VOLUME_RATIO),
                value: format_number(s.high_volume_anomalies as u64),
                color: self.theme.volume(),
            },
        ]
    }

    fn render_card_grid(&self, area: Rect, buf: &mut Buffer, cards: &[StatCard], cols: usize) {
        let total_cards_width = (cols as u16) * CARD_WIDTH + ((cols - 1) as u16) * 2;
        let start_x = area.x + (area.width.saturating_sub(total_cards_width)) / 2;

        for (i, card) in cards.iter().enumerate() {
            let row = i / cols;
            let col = i % cols;

            let card_area = Rect {
                x: start_x + (col as u16) * (CARD_WIDTH + 2),
                y: area.y + (row as u16) * (CARD_HEIGHT + 1),
                width: CARD_WIDTH.min(area.width),
                height: CARD_HEIGHT,
            };

            // Skip if card is outside area
            if card_area.y + CARD_HEIGHT > area.y + area.height {
                continue;
            }

            render_card(card_area, buf, card);
        }
    }

    fn render_recent_title(&self, area: Rect, buf: &mut Buffer) {
        let title = Paragraph::new(Line::from(Span::styled(
            format!("Recent anomalies (last {})", RECENT_ANOMALY_LIMIT),
            Style::default()
                .fg(self.theme.text())
                .add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center);
        title.render(area, buf);
    }

    fn render_recent_table(&self, header_area: Rect, rows_area: Rect, buf: &mut Buffer) {
        let header = format!(
            "{:<12}{:>10}{:>10}{:>14}{:>9}{:>8}",
            "Date", "Close", "Return", "Volume", "Ratio", "Score"
        );
        let x = header_area.x + header_area.width.saturating_sub(header.len() as u16) / 2;
        buf.set_string(
            x,
            header_area.y,
            &header,
            Style::default().fg(self.theme.muted()),
        );

        if self.summary.recent_anomalies.is_empty() {
            buf.set_string(
                x,
                rows_area.y,
                "No smart anomalies detected",
                Style::default().fg(self.theme.muted()),
            );
            return;
        }

        // Newest first
        for (i, r) in self.summary.recent_anomalies.iter().rev().enumerate() {
            let y = rows_area.y + i as u16;
            if y >= rows_area.y + rows_area.height {
                break;
            }
            let score = r
                .anomaly_score
                .map(|s| format!("{:.2}", s))
                .unwrap_or_else(|| "-".to_string());

            let line = Line::from(vec![
                Span::styled(
                    format!("{:<12}", r.date),
                    Style::default().fg(self.theme.date()),
                ),
                Span::styled(
                    format!("{:>10.2}", r.close),
                    Style::default().fg(self.theme.text()),
                ),
                Span::styled(
                    format!("{:>+9.2}%", r.daily_return),
                    Style::default().fg(self.theme.return_color(r.daily_return)),
                ),
                Span::styled(
                    format!("{:>14}", format_number(r.volume)),
                    Style::default().fg(self.theme.text()),
                ),
                Span::styled(
                    format!("{:>8.2}x", r.volume_ratio_20d),
                    Style::default().fg(if r.volume_ratio_20d > HIGH_VOLUME_RATIO {
                        self.theme.volume()
                    } else {
                        self.theme.text()
                    }),
                ),
                Span::styled(
                    format!("{:>8}", score),
                    Style::default().fg(self.theme.anomaly()),
                ),
            ]);
            buf.set_line(x, y, &line, rows_area.width.saturating_sub(x - rows_area.x));
        }
    }
}

fn render_card(area: Rect, buf: &mut Buffer, card: &StatCard) {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(card.color))
        .render(area, buf);

    if area.height > 2 {
        let title_x = area.x + (area.width.saturating_sub(card.title.len() as u16)) / 2;
        buf.set_string(
            title_x,
            area.y + 1,
            &card.title,
            Style::default().fg(card.color),
        );
    }

    if area.height > 3 {
        let value_x = area.x + (area.width.saturating_sub(card.value.len() as u16)) / 2;
        buf.set_string(
            value_x,
            area.y + 3,
            &card.value,
            Style::default()
                .fg(card.color)
                .add_modifier(Modifier::BOLD),
        );
    }
}

/// Internal card representation
struct StatCard {
    title: String,
    value: String,
    color: Color,
}
