//! Common view frame: tab bar, ticker selector and key hints

use std::ops::Range;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use super::tabs::{Tab, TabBar};
use crate::tui::theme::Theme;

/// Maximum content width (keeps charts readable on wide terminals)
const MAX_CONTENT_WIDTH: u16 = 170;

/// Gap between ticker labels
const TICKER_GAP: usize = 2;

/// Frame drawn around every view
pub struct ViewChrome<'a> {
    tab: Tab,
    tickers: &'a [String],
    selected: usize,
    theme: Theme,
}

impl<'a> ViewChrome<'a> {
    pub fn new(tab: Tab, tickers: &'a [String], selected: usize, theme: Theme) -> Self {
        Self {
            tab,
            tickers,
            selected,
            theme,
        }
    }

    /// Render the frame and return the body area inside it
    pub fn render(self, area: Rect, buf: &mut Buffer) -> Rect {
        let content_width = area.width.min(MAX_CONTENT_WIDTH);
        let x_offset = (area.width.saturating_sub(content_width)) / 2;
        let centered_area = Rect {
            x: area.x + x_offset,
            y: area.y,
            width: content_width,
            height: area.height,
        };

        let chunks = Layout::vertical([
            Constraint::Length(1), // 0: TabBar
            Constraint::Length(1), // 1: Separator
            Constraint::Length(1), // 2: Tickers
            Constraint::Length(1), // 3: Blank
            Constraint::Fill(1),   // 4: Body
            Constraint::Length(1), // 5: Separator
            Constraint::Length(1), // 6: Keybindings
        ])
        .split(centered_area);

        TabBar::new(self.tab, self.theme).render(chunks[0], buf);
        self.render_separator(chunks[1], buf);
        self.render_tickers(chunks[2], buf);
        self.render_separator(chunks[5], buf);
        self.render_keybindings(chunks[6], buf);

        chunks[4]
    }

    fn render_separator(&self, area: Rect, buf: &mut Buffer) {
        let line = "─".repeat(area.width as usize);
        buf.set_string(
            area.x,
            area.y,
            &line,
            Style::default().fg(self.theme.muted()),
        );
    }

    fn render_tickers(&self, area: Rect, buf: &mut Buffer) {
        // Room for the scroll arrows on both sides
        let budget = (area.width as usize).saturating_sub(4);
        let window = ticker_window(self.tickers, self.selected, budget);

        let mut spans = Vec::new();
        spans.push(Span::styled(
            if window.start > 0 { "◂ " } else { "  " },
            Style::default().fg(self.theme.muted()),
        ));
        for i in window.clone() {
            if i > window.start {
                spans.push(Span::raw(" ".repeat(TICKER_GAP)));
            }
            let ticker = &self.tickers[i];
            if i == self.selected {
                spans.push(Span::styled(
                    format!("[{}]", ticker),
                    Style::default()
                        .fg(self.theme.accent())
                        .add_modifier(Modifier::BOLD),
                ));
            } else {
                spans.push(Span::styled(
                    ticker.clone(),
                    Style::default().fg(self.theme.text()),
                ));
            }
        }
        spans.push(Span::styled(
            if window.end < self.tickers.len() {
                " ▸"
            } else {
                "  "
            },
            Style::default().fg(self.theme.muted()),
        ));

        Paragraph::new(Line::from(spans))
            .alignment(Alignment::Center)
            .render(area, buf);
    }

    fn render_keybindings(&self, area: Rect, buf: &mut Buffer) {
        let bindings = Paragraph::new(Line::from(vec![
            Span::styled("Tab", Style::default().fg(self.theme.accent())),
            Span::styled(": Switch view", Style::default().fg(self.theme.muted())),
            Span::raw("  "),
            Span::styled("←→", Style::default().fg(self.theme.accent())),
            Span::styled(": Ticker", Style::default().fg(self.theme.muted())),
            Span::raw("  "),
            Span::styled("r", Style::default().fg(self.theme.accent())),
            Span::styled(": Reload", Style::default().fg(self.theme.muted())),
            Span::raw("  "),
            Span::styled("?", Style::default().fg(self.theme.accent())),
            Span::styled(": Help", Style::default().fg(self.theme.muted())),
            Span::raw("  "),
            Span::styled("q", Style::default().fg(self.theme.accent())),
            Span::styled(": Quit", Style::default().fg(self.theme.muted())),
        ]))
        .alignment(Alignment::Center);

        bindings.render(area, buf);
    }
}

/// Contiguous range of tickers that fits in `width` columns and contains
/// `selected` (rendered as `[TICKER]`)
pub fn ticker_window(tickers: &[String], selected: usize, width: usize) -> Range<usize> {
    if tickers.is_empty() {
        return 0..0;
    }
    let selected = selected.min(tickers.len() - 1);
    let label_width = |i: usize| tickers[i].chars().count() + if i == selected { 2 } else { 0 };

    let mut start = selected;
    let mut end = selected + 1;
    let mut used = label_width(selected);

    // Grow right first, then left, one ticker at a time
    loop {
        let mut grew = false;
        if end < tickers.len() && used + TICKER_GAP + label_width(end) <= width {
            used += TICKER_GAP + label_width(end);
            end += 1;
            grew = true;
        }
        if start > 0 && used + TICKER_GAP + label_width(start - 1) <= width {
            start -= 1;
            used += TICKER_GAP + label_width(start);
            grew = true;
        }
        if !grew {
            break;
        }
    }
    start..end
}
