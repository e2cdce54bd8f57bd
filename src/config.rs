//! Configuration: `~/.anomdash/config.toml` plus command-line overrides
//!
//! ```toml
//! data_dir = "data"
//! tickers = ["AAPL", "MSFT"]   # omit to list data_dir
//! fallback = "empty"           # or "placeholder"
//!
//! [source]
//! kind = "file"                # or "http"
//! format = "auto"              # "csv" | "json"
//! base_url = "https://example.com/data"
//! timeout_secs = 10
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::services::catalog::{CatalogProvider, DirectoryCatalog, StaticCatalog};
use crate::services::loader::FallbackPolicy;
use crate::sources::{
    CsvFileSource, DirectorySource, HttpSource, JsonFileSource, RecordSource, SourceFormat,
    DEFAULT_TIMEOUT_SECS,
};
use crate::types::{AnomdashError, Result};

const CONFIG_DIR: &str = ".anomdash";
const CONFIG_FILE: &str = "config.toml";

/// Where raw rows are read from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    #[default]
    File,
    Http,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub kind: SourceKind,
    pub format: SourceFormat,
    pub base_url: Option<String>,
    pub timeout_secs: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            kind: SourceKind::File,
            format: SourceFormat::Auto,
            base_url: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    /// Explicit catalog; `None` lists `data_dir`
    pub tickers: Option<Vec<String>>,
    pub fallback: FallbackPolicy,
    pub source: SourceConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            tickers: None,
            fallback: FallbackPolicy::Empty,
            source: SourceConfig::default(),
        }
    }
}

/// Command-line values that take precedence over the config file
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub data_dir: Option<PathBuf>,
    pub base_url: Option<String>,
    pub format: Option<SourceFormat>,
    pub tickers: Option<Vec<String>>,
    pub placeholder: bool,
}

impl AppConfig {
    /// Load from an explicit path (must exist), else the default path if
    /// present, else built-in defaults
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        match Self::default_path() {
            Some(path) if path.is_file() => Self::from_file(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Default config path (~/.anomdash/config.toml)
    pub fn default_path() -> Option<PathBuf> {
        directories::BaseDirs::new().map(|d| d.home_dir().join(CONFIG_DIR).join(CONFIG_FILE))
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            AnomdashError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        let config = Self::from_toml_str(&content)?;
        tracing::info!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| AnomdashError::Config(e.to_string()))
    }

    pub fn apply(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(dir) = overrides.data_dir {
            self.data_dir = dir;
        }
        if let Some(url) = overrides.base_url {
            self.source.kind = SourceKind::Http;
            self.source.base_url = Some(url);
        }
        if let Some(format) = overrides.format {
            self.source.format = format;
        }
        if let Some(tickers) = overrides.tickers {
            self.tickers = Some(tickers);
        }
        if overrides.placeholder {
            self.fallback = FallbackPolicy::Placeholder;
        }
        self
    }

    /// Build the configured record source
    pub fn build_source(&self) -> Result<Box<dyn RecordSource>> {
        match self.source.kind {
            SourceKind::File => {
                let source: Box<dyn RecordSource> = match self.source.format {
                    SourceFormat::Csv => Box::new(CsvFileSource::new(&self.data_dir)),
                    SourceFormat::Json => Box::new(JsonFileSource::new(&self.data_dir)),
                    SourceFormat::Auto => {
                        Box::new(DirectorySource::new(&self.data_dir, SourceFormat::Auto))
                    }
                };
                Ok(source)
            }
            SourceKind::Http => {
                let base_url = self.source.base_url.as_deref().ok_or_else(|| {
                    AnomdashError::Config("source.kind = \"http\" requires base_url".into())
                })?;
                let source = HttpSource::with_timeout(
                    base_url,
                    self.source.format,
                    Duration::from_secs(self.source.timeout_secs),
                )?;
                Ok(Box::new(source))
            }
        }
    }

    /// Build the configured ticker catalog
    pub fn build_catalog(&self) -> Box<dyn CatalogProvider> {
        match &self.tickers {
            Some(tickers) => Box::new(StaticCatalog::new(tickers)),
            None => Box::new(DirectoryCatalog::new(&self.data_dir)),
        }
    }
}
