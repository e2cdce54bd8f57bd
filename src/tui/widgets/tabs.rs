//! Tab bar widget for view navigation

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::Widget,
};

use crate::tui::theme::Theme;

/// Available views, one per tab
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Price,
    Volatility,
    Volume,
    Summary,
}

impl Tab {
    /// Get the display label for this tab
    pub fn label(self) -> &'static str {
        match self {
            Self::Price => "Price",
            Self::Volatility => "Volatility",
            Self::Volume => "Volume",
            Self::Summary => "Summary",
        }
    }

    /// Get all tabs in order
    pub fn all() -> &'static [Tab] {
        &[Tab::Price, Tab::Volatility, Tab::Volume, Tab::Summary]
    }

    /// Get the next tab (wrapping)
    pub fn next(self) -> Self {
        match self {
            Self::Price => Self::Volatility,
            Self::Volatility => Self::Volume,
            Self::Volume => Self::Summary,
            Self::Summary => Self::Price,
        }
    }

    /// Get the previous tab (wrapping)
    pub fn prev(self) -> Self {
        match self {
            Self::Price => Self::Summary,
            Self::Volatility => Self::Price,
            Self::Volume => Self::Volatility,
            Self::Summary => Self::Volume,
        }
    }

    /// Get tab from number key (1-4)
    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(Self::Price),
            2 => Some(Self::Volatility),
            3 => Some(Self::Volume),
            4 => Some(Self::Summary),
            _ => None,
        }
    }
}

/// Tab bar widget showing available views
pub struct TabBar {
    selected: Tab,
    theme: Theme,
}

impl TabBar {
    pub fn new(selected: Tab, theme: Theme) -> Self {
        Self { selected, theme }
    }
}

impl Widget for TabBar {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        // Calculate total width of all tabs for centering
        let total_width: u16 = Tab::all()
            .iter()
            .map(|tab| {
                let label = tab.label();
                let display_len = if *tab == self.selected {
                    label.len() + 2 // "[label]"
                } else {
                    label.len()
                };
                display_len as u16 + 2 // + spacing
            })
            .sum::<u16>()
            .saturating_sub(2); // Remove trailing spacing

        let start_x = area.x + (area.width.saturating_sub(total_width)) / 2;
        let mut x = start_x;

        for tab in Tab::all() {
            let is_selected = *tab == self.selected;
            let label = tab.label();

            let display = if is_selected {
                format!("[{}]", label)
            } else {
                label.to_string()
            };

            let display_len = display.len() as u16;
            if x + display_len > area.x + area.width {
                break;
            }

            let style = if is_selected {
                Style::default()
                    .fg(self.theme.accent())
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(self.theme.muted())
            };

            buf.set_string(x, area.y, &display, style);
            x += display_len + 2;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tab_labels() {
        assert_eq!(Tab::Price.label(), "Price");
        assert_eq!(Tab::Volatility.label(), "Volatility");
        assert_eq!(Tab::Volume.label(), "Volume");
        assert_eq!(Tab::Summary.label(), "Summary");
    }

    #[test]
    fn test_tab_all() {
        assert_eq!(
            Tab::all(),
            &[Tab::Price, Tab::Volatility, Tab::Volume, Tab::Summary]
        );
    }

    #[test]
    fn test_tab_next_wraps() {
        assert_eq!(Tab::Price.next(), Tab::Volatility);
        assert_eq!(Tab::Volatility.next(), Tab::Volume);
        assert_eq!(Tab::Volume.next(), Tab::Summary);
        assert_eq!(Tab::Summary.next(), Tab::Price);
    }

    #[test]
    fn test_tab_prev_wraps() {
        assert_eq!(Tab::Price.prev(), Tab::Summary);
        assert_eq!(Tab::Summary.prev(), Tab::Volume);
        assert_eq!(Tab::Volume.prev(), Tab::Volatility);
        assert_eq!(Tab::Volatility.prev(), Tab::Price);
    }

    #[test]
    fn test_tab_default() {
        assert_eq!(Tab::default(), Tab::Price);
    }

    #[test]
    fn test_tab_from_number() {
        assert_eq!(Tab::from_number(1), Some(Tab::Price));
        assert_eq!(Tab::from_number(4), Some(Tab::Summary));
        assert_eq!(Tab::from_number(0), None);
        assert_eq!(Tab::from_number(5), None);
    }

    #[test]
    fn test_tab_bar_highlights_selected() {
        let area = Rect::new(0, 0, 60, 1);
        let mut buf = Buffer::empty(area);
        TabBar::new(Tab::Volume, Theme::Dark).render(area, &mut buf);

        let row: String = buf.content().iter().map(|c| c.symbol()).collect();
        assert!(row.contains("[Volume]"));
        assert!(row.contains("Price"));
        assert!(!row.contains("[Price]"));
    }
}
