mod output;

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};

use crate::config::{AppConfig, ConfigOverrides};
use crate::services::Dashboard;
use crate::sources::SourceFormat;

/// Terminal dashboard for pre-computed stock price anomaly data
#[derive(Parser)]
#[command(name = "anomdash")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Config file (default: ~/.anomdash/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Directory holding <TICKER>.csv / <TICKER>.json files
    #[arg(long, global = true, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Fetch ticker files over HTTP from this base URL
    #[arg(long, global = true, value_name = "URL")]
    base_url: Option<String>,

    /// Source encoding: auto, csv or json
    #[arg(long, global = true, value_parser = parse_format)]
    format: Option<SourceFormat>,

    /// Comma-separated ticker list, replacing the data-directory listing
    #[arg(long, global = true, value_name = "LIST", value_delimiter = ',')]
    tickers: Option<Vec<String>>,

    /// Show a demo series when a source is unavailable
    #[arg(long, global = true)]
    placeholder: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Launch interactive TUI (default)
    Tui,

    /// List available tickers
    Tickers {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the daily series for one ticker
    Series {
        ticker: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,

        /// Fail when the source is unavailable instead of printing nothing
        #[arg(long)]
        strict: bool,
    },

    /// Show anomaly summaries (all tickers when none is given)
    Summary {
        ticker: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn parse_format(value: &str) -> Result<SourceFormat, String> {
    SourceFormat::from_name(value)
        .ok_or_else(|| format!("unknown format {:?} (expected auto, csv or json)", value))
}

impl Cli {
    /// Whether this invocation launches the TUI
    pub fn is_interactive(&self) -> bool {
        matches!(self.command, None | Some(Commands::Tui))
    }

    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            data_dir: self.data_dir.clone(),
            base_url: self.base_url.clone(),
            format: self.format,
            tickers: self.tickers.clone(),
            placeholder: self.placeholder,
        }
    }

    pub fn run(self) -> anyhow::Result<()> {
        let config = AppConfig::load(self.config.as_deref())
            .context("failed to load configuration")?
            .apply(self.overrides());
        let dashboard =
            Dashboard::from_config(&config).context("failed to configure data source")?;

        let stdout = io::stdout();
        let mut out = stdout.lock();

        match self.command.unwrap_or(Commands::Tui) {
            Commands::Tui => {
                drop(out);
                crate::tui::run(dashboard)
            }
            Commands::Tickers { json } => {
                output::write_tickers(&mut out, &dashboard.available_tickers(), json)?;
                out.flush()?;
                Ok(())
            }
            Commands::Series {
                ticker,
                json,
                strict,
            } => {
                let series = if strict {
                    dashboard
                        .try_series(&ticker)
                        .with_context(|| format!("failed to load {}", ticker))?
                } else {
                    dashboard.series(&ticker)
                };
                output::write_series(&mut out, &ticker, &series, json)?;
                out.flush()?;
                Ok(())
            }
            Commands::Summary { ticker, json } => {
                match ticker {
                    Some(ticker) => {
                        output::write_summary(&mut out, &dashboard.summary(&ticker), json)?
                    }
                    None => output::write_summaries(&mut out, &dashboard.summaries(), json)?,
                }
                out.flush()?;
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_no_args() {
        let cli = Cli::try_parse_from(["anomdash"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.is_interactive());
    }

    #[test]
    fn test_cli_parse_tickers_json() {
        let cli = Cli::try_parse_from(["anomdash", "tickers", "--json"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Tickers { json: true })));
        assert!(!cli.is_interactive());
    }

    #[test]
    fn test_cli_parse_series() {
        let cli = Cli::try_parse_from(["anomdash", "series", "AAPL", "--strict"]).unwrap();
        match cli.command {
            Some(Commands::Series {
                ticker,
                json,
                strict,
            }) => {
                assert_eq!(ticker, "AAPL");
                assert!(!json);
                assert!(strict);
            }
            _ => panic!("expected series command"),
        }
    }

    #[test]
    fn test_cli_series_requires_ticker() {
        assert!(Cli::try_parse_from(["anomdash", "series"]).is_err());
    }

    #[test]
    fn test_cli_parse_summary_optional_ticker() {
        let cli = Cli::try_parse_from(["anomdash", "summary"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Summary {
                ticker: None,
                json: false
            })
        ));

        let cli = Cli::try_parse_from(["anomdash", "summary", "MSFT", "--json"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Summary { ticker: Some(ref t), json: true }) if t == "MSFT"
        ));
    }

    #[test]
    fn test_cli_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "anomdash",
            "tickers",
            "--data-dir",
            "/srv/data",
            "--format",
            "CSV",
            "--placeholder",
        ])
        .unwrap();

        let overrides = cli.overrides();
        assert_eq!(overrides.data_dir, Some(PathBuf::from("/srv/data")));
        assert_eq!(overrides.format, Some(SourceFormat::Csv));
        assert!(overrides.placeholder);
        assert!(overrides.base_url.is_none());
    }

    #[test]
    fn test_cli_tickers_flag_splits_on_commas() {
        let cli =
            Cli::try_parse_from(["anomdash", "summary", "--tickers", "TSLA,AAPL"]).unwrap();
        assert_eq!(
            cli.overrides().tickers,
            Some(vec!["TSLA".to_string(), "AAPL".to_string()])
        );

        let cli = Cli::try_parse_from(["anomdash", "tickers"]).unwrap();
        assert!(cli.overrides().tickers.is_none());
    }

    #[test]
    fn test_cli_rejects_unknown_format() {
        assert!(Cli::try_parse_from(["anomdash", "--format", "xml", "tickers"]).is_err());
    }
}
