//! Application state and event loop

use std::sync::mpsc::{self, TryRecvError};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    widgets::Widget,
    DefaultTerminal, Frame,
};

use crate::services::{Aggregator, Dashboard};
use crate::types::{DailyRecord, TickerSummary};

use super::theme::Theme;
use super::widgets::{
    chrome::ViewChrome,
    help::HelpPopup,
    price_chart::PriceChart,
    spinner::{LoadingStage, Spinner},
    summary::SummaryView,
    tabs::Tab,
    volatility_chart::VolatilityChart,
    volume_chart::VolumeChart,
};

/// Application state
pub enum AppState {
    /// Loading data with spinner animation
    Loading {
        spinner_frame: usize,
        stage: LoadingStage,
    },
    /// Ready with loaded data
    Ready { data: Box<AppData> },
    /// Error state
    Error { message: String },
}

/// Loaded data for the selected ticker
pub struct AppData {
    /// Catalog at load time (never empty)
    pub tickers: Vec<String>,
    pub selected: usize,
    pub series: Vec<DailyRecord>,
    pub summary: TickerSummary,
}

impl AppData {
    pub fn ticker(&self) -> &str {
        &self.summary.ticker
    }
}

/// Ask the event loop to (re)load data in the background
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadRequest {
    /// Ticker to show; first catalog entry when None or no longer listed
    pub ticker: Option<String>,
}

/// Progress message from the background loader
pub enum LoadEvent {
    Stage(LoadingStage),
    Done(Result<Box<AppData>, String>),
}

/// Main application
pub struct App {
    state: AppState,
    should_quit: bool,
    current_tab: Tab,
    show_help: bool,
    theme: Theme,
    pending_request: Option<LoadRequest>,
}

impl App {
    /// Create a new app in loading state with the initial load queued
    pub fn new(theme: Theme) -> Self {
        Self {
            state: AppState::Loading {
                spinner_frame: 0,
                stage: LoadingStage::Listing,
            },
            should_quit: false,
            current_tab: Tab::default(),
            show_help: false,
            theme,
            pending_request: Some(LoadRequest { ticker: None }),
        }
    }

    /// Handle keyboard events
    pub fn handle_event(&mut self, event: Event) {
        if let Event::Key(key) = event {
            if key.kind == KeyEventKind::Press {
                match key.code {
                    KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                        self.should_quit = true;
                    }
                    KeyCode::Tab => {
                        self.current_tab = self.current_tab.next();
                    }
                    KeyCode::BackTab => {
                        self.current_tab = self.current_tab.prev();
                    }
                    KeyCode::Char(c @ '1'..='4') => {
                        if let Some(tab) = Tab::from_number(c as u8 - b'0') {
                            self.current_tab = tab;
                        }
                    }
                    KeyCode::Left | KeyCode::Char('h') => {
                        self.step_ticker(false);
                    }
                    KeyCode::Right | KeyCode::Char('l') => {
                        self.step_ticker(true);
                    }
                    KeyCode::Char('r') | KeyCode::Char('R') => {
                        self.reload();
                    }
                    KeyCode::Char('?') => {
                        self.show_help = !self.show_help;
                    }
                    _ => {}
                }
            }
        }
    }

    /// Move to the neighbouring ticker (wrapping) and queue its load
    fn step_ticker(&mut self, forward: bool) {
        let AppState::Ready { data } = &self.state else {
            return;
        };
        let len = data.tickers.len();
        if len < 2 {
            return;
        }
        let next = if forward {
            (data.selected + 1) % len
        } else {
            (data.selected + len - 1) % len
        };
        let ticker = data.tickers[next].clone();
        self.start_loading(LoadRequest {
            ticker: Some(ticker),
        });
    }

    /// Reload the current ticker (or the first one after an error)
    fn reload(&mut self) {
        let ticker = match &self.state {
            AppState::Loading { .. } => return,
            AppState::Ready { data } => Some(data.ticker().to_string()),
            AppState::Error { .. } => None,
        };
        self.start_loading(LoadRequest { ticker });
    }

    fn start_loading(&mut self, request: LoadRequest) {
        self.state = AppState::Loading {
            spinner_frame: 0,
            stage: LoadingStage::Listing,
        };
        self.pending_request = Some(request);
    }

    /// Take the queued load request, if any
    pub fn take_load_request(&mut self) -> Option<LoadRequest> {
        self.pending_request.take()
    }

    /// Apply a progress message from the background loader
    pub fn apply_load_event(&mut self, event: LoadEvent) {
        match event {
            LoadEvent::Stage(stage) => {
                if let AppState::Loading { spinner_frame, .. } = self.state {
                    self.state = AppState::Loading {
                        spinner_frame,
                        stage,
                    };
                }
            }
            LoadEvent::Done(Ok(data)) => self.state = AppState::Ready { data },
            LoadEvent::Done(Err(message)) => self.state = AppState::Error { message },
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, AppState::Loading { .. })
    }

    /// Update spinner animation
    pub fn tick(&mut self) {
        if let AppState::Loading {
            spinner_frame,
            stage,
        } = &self.state
        {
            self.state = AppState::Loading {
                spinner_frame: Spinner::next_frame(*spinner_frame),
                stage: *stage,
            };
        }
    }

    /// Check if app should quit
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Draw the application
    pub fn draw(&self, frame: &mut Frame) {
        frame.render_widget(self, frame.area());
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new(Theme::default())
    }
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        match &self.state {
            AppState::Loading {
                spinner_frame,
                stage,
            } => {
                Spinner::new(*spinner_frame, *stage, self.theme).render(area, buf);
            }
            AppState::Ready { data } => {
                let body = ViewChrome::new(self.current_tab, &data.tickers, data.selected, self.theme)
                    .render(area, buf);

                match self.current_tab {
                    Tab::Price => {
                        PriceChart::new(data.ticker(), &data.series, self.theme).render(body, buf)
                    }
                    Tab::Volatility => {
                        VolatilityChart::new(data.ticker(), &data.series, self.theme)
                            .render(body, buf)
                    }
                    Tab::Volume => {
                        VolumeChart::new(data.ticker(), &data.series, self.theme).render(body, buf)
                    }
                    Tab::Summary => SummaryView::new(&data.summary, self.theme).render(body, buf),
                }

                // Render help popup overlay if active
                if self.show_help {
                    let popup_area = HelpPopup::centered_area(area);
                    HelpPopup::new(self.theme).render(popup_area, buf);
                }
            }
            AppState::Error { message } => {
                let y = area.y + area.height / 2;
                let text = format!("Error: {}", message);
                let x = area.x + (area.width.saturating_sub(text.len() as u16)) / 2;
                buf.set_string(x, y, &text, Style::default().fg(self.theme.loss()));

                let hint = "r: Retry  q: Quit";
                let x = area.x + (area.width.saturating_sub(hint.len() as u16)) / 2;
                if y + 2 < area.y + area.height {
                    buf.set_string(x, y + 2, hint, Style::default().fg(self.theme.muted()));
                }
            }
        }
    }
}

/// Run the TUI application
pub fn run(dashboard: Dashboard) -> anyhow::Result<()> {
    // Theme detection queries the terminal, so it must precede raw mode
    let theme = Theme::detect();
    let mut terminal = ratatui::init();
    let result = run_app(&mut terminal, Arc::new(dashboard), theme);
    ratatui::restore();
    result
}

/// Load the catalog and one ticker's series (extracted for background thread)
fn load_data_sync(
    dashboard: &Dashboard,
    request: &LoadRequest,
    progress: impl Fn(LoadingStage),
) -> Result<Box<AppData>, String> {
    progress(LoadingStage::Listing);
    let tickers = dashboard.available_tickers();
    if tickers.is_empty() {
        return Err("No tickers found (check data_dir or tickers in config)".to_string());
    }

    let selected = request
        .ticker
        .as_deref()
        .and_then(|wanted| tickers.iter().position(|t| t == wanted))
        .unwrap_or(0);
    let ticker = tickers[selected].clone();

    progress(LoadingStage::Loading);
    let series = dashboard.series(&ticker);

    progress(LoadingStage::Summarizing);
    let summary = Aggregator::summarize(&ticker, &series);
    tracing::debug!(ticker, days = series.len(), "tui data loaded");

    Ok(Box::new(AppData {
        tickers,
        selected,
        series,
        summary,
    }))
}

fn spawn_load(dashboard: Arc<Dashboard>, request: LoadRequest) -> mpsc::Receiver<LoadEvent> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let result = load_data_sync(&dashboard, &request, |stage| {
            let _ = tx.send(LoadEvent::Stage(stage));
        });
        let _ = tx.send(LoadEvent::Done(result));
    });
    rx
}

fn run_app(
    terminal: &mut DefaultTerminal,
    dashboard: Arc<Dashboard>,
    theme: Theme,
) -> anyhow::Result<()> {
    let mut app = App::new(theme);
    let mut load_rx: Option<mpsc::Receiver<LoadEvent>> = None;

    loop {
        if let Some(request) = app.take_load_request() {
            load_rx = Some(spawn_load(Arc::clone(&dashboard), request));
        }

        terminal.draw(|frame| app.draw(frame))?;

        if app.should_quit() {
            break;
        }

        // Drain loader progress (non-blocking)
        let mut finished = false;
        if let Some(rx) = &load_rx {
            loop {
                match rx.try_recv() {
                    Ok(event) => app.apply_load_event(event),
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => {
                        if app.is_loading() {
                            app.apply_load_event(LoadEvent::Done(Err(
                                "data loading stopped unexpectedly".to_string(),
                            )));
                        }
                        finished = true;
                        break;
                    }
                }
            }
        }
        if finished {
            load_rx = None;
        }

        // Poll for events with 100ms timeout for spinner animation
        if event::poll(Duration::from_millis(100))? {
            app.handle_event(event::read()?);
        } else {
            app.tick();
        }
    }

    Ok(())
}
