//! Query surface shared by the CLI and TUI
//!
//! Every call reloads from the source; nothing is cached between calls.

use rayon::prelude::*;

use crate::config::AppConfig;
use crate::services::catalog::CatalogProvider;
use crate::services::loader::SeriesLoader;
use crate::services::Aggregator;
use crate::types::{DailyRecord, Result, TickerSummary};

pub struct Dashboard {
    catalog: Box<dyn CatalogProvider>,
    loader: SeriesLoader,
}

impl Dashboard {
    pub fn new(catalog: Box<dyn CatalogProvider>, loader: SeriesLoader) -> Self {
        Self { catalog, loader }
    }

    /// Wire catalog, source and fallback from configuration
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let source = config.build_source()?;
        let loader = SeriesLoader::new(source).with_fallback(config.fallback);
        tracing::debug!(
            source = loader.source_name(),
            fallback = ?config.fallback,
            "dashboard configured"
        );
        Ok(Self::new(config.build_catalog(), loader))
    }

    pub fn loader(&self) -> &SeriesLoader {
        &self.loader
    }

    /// Tickers the dashboard can show
    pub fn available_tickers(&self) -> Vec<String> {
        self.catalog.list_available_tickers()
    }

    /// Normalized series for one ticker (never fails)
    pub fn series(&self, ticker: &str) -> Vec<DailyRecord> {
        self.loader.load(ticker)
    }

    /// Series for one ticker, surfacing source errors
    pub fn try_series(&self, ticker: &str) -> Result<Vec<DailyRecord>> {
        self.loader.try_load(ticker)
    }

    /// Summary for one ticker; zeroed when it has no data
    pub fn summary(&self, ticker: &str) -> TickerSummary {
        Aggregator::summarize(ticker, &self.series(ticker))
    }

    /// Summaries for every catalog ticker, in catalog order
    pub fn summaries(&self) -> Vec<TickerSummary> {
        self.available_tickers()
            .par_iter()
            .map(|ticker| self.summary(ticker))
            .collect()
    }
}
