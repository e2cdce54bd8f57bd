//! Ticker catalog providers

use std::collections::{BTreeSet, HashSet};
use std::path::{Path, PathBuf};

use crate::sources::is_valid_ticker;

/// Source of the tickers a dashboard can show
pub trait CatalogProvider: Send + Sync {
    /// Stable, deduplicated ticker list usable as `load` keys
    fn list_available_tickers(&self) -> Vec<String>;
}

/// Explicitly configured ticker list
pub struct StaticCatalog {
    tickers: Vec<String>,
}

impl StaticCatalog {
    /// Trims entries, drops blanks and duplicates, keeps first-seen order
    pub fn new<I, S>(tickers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let tickers = tickers
            .into_iter()
            .map(|t| t.as_ref().trim().to_string())
            .filter(|t| !t.is_empty() && seen.insert(t.clone()))
            .collect();
        Self { tickers }
    }
}

impl CatalogProvider for StaticCatalog {
    fn list_available_tickers(&self) -> Vec<String> {
        self.tickers.clone()
    }
}

/// Tickers discovered from `<TICKER>.csv` / `<TICKER>.json` files
pub struct DirectoryCatalog {
    data_dir: PathBuf,
}

impl DirectoryCatalog {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn collect_files(&self, ext: &str) -> Vec<PathBuf> {
        let dir = glob::Pattern::escape(&self.data_dir.to_string_lossy());
        let pattern = Path::new(&dir).join(format!("*.{}", ext));
        match glob::glob(&pattern.to_string_lossy()) {
            Ok(paths) => paths.filter_map(|e| e.ok()).collect(),
            Err(e) => {
                tracing::warn!(dir = %self.data_dir.display(), error = %e, "bad catalog pattern");
                Vec::new()
            }
        }
    }
}

impl CatalogProvider for DirectoryCatalog {
    fn list_available_tickers(&self) -> Vec<String> {
        let tickers: BTreeSet<String> = ["csv", "json"]
            .iter()
            .flat_map(|ext| self.collect_files(ext))
            .filter(|p| p.is_file())
            .filter_map(|p| p.file_stem().and_then(|s| s.to_str()).map(String::from))
            .filter(|stem| {
                let ok = is_valid_ticker(stem);
                if !ok {
                    tracing::debug!(stem, "ignoring file with invalid ticker name");
                }
                ok
            })
            .collect();

        if tickers.is_empty() {
            tracing::warn!(dir = %self.data_dir.display(), "no ticker files found");
        }
        tickers.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    // ========== StaticCatalog ==========

    #[test]
    fn test_static_preserves_order() {
        let catalog = StaticCatalog::new(["MSFT", "AAPL", "TSLA"]);
        assert_eq!(catalog.list_available_tickers(), ["MSFT", "AAPL", "TSLA"]);
    }

    #[test]
    fn test_static_dedups_keeping_first() {
        let catalog = StaticCatalog::new(["AAPL", "MSFT", "AAPL", " MSFT ", ""]);
        assert_eq!(catalog.list_available_tickers(), ["AAPL", "MSFT"]);
    }

    #[test]
    fn test_static_empty() {
        let catalog = StaticCatalog::new(Vec::<String>::new());
        assert!(catalog.list_available_tickers().is_empty());
    }

    // ========== DirectoryCatalog ==========

    #[test]
    fn test_directory_fixture_listing() {
        let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("tests")
            .join("fixtures")
            .join("data");
        let tickers = DirectoryCatalog::new(dir).list_available_tickers();
        // README.txt and bad..name.csv are skipped
        assert_eq!(tickers, ["AAPL", "BROKEN", "EMPTY", "MSFT", "TSLA"]);
    }

    #[test]
    fn test_directory_dedups_csv_and_json() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("JPM.csv"), "Date\n").unwrap();
        fs::write(dir.path().join("JPM.json"), "[]").unwrap();
        fs::write(dir.path().join("AMZN.json"), "[]").unwrap();

        let tickers = DirectoryCatalog::new(dir.path()).list_available_tickers();
        assert_eq!(tickers, ["AMZN", "JPM"]);
    }

    #[test]
    fn test_directory_ignores_subdirectories() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("OLD.csv")).unwrap();
        assert!(DirectoryCatalog::new(dir.path())
            .list_available_tickers()
            .is_empty());
    }

    #[test]
    fn test_directory_with_glob_metacharacters() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("data [2024]");
        fs::create_dir(&dir).unwrap();
        fs::write(dir.join("NVDA.csv"), "Date\n").unwrap();
        // Sibling that an unescaped pattern would match instead
        let decoy = root.path().join("data 2");
        fs::create_dir(&decoy).unwrap();
        fs::write(decoy.join("IBM.csv"), "Date\n").unwrap();

        assert_eq!(DirectoryCatalog::new(&dir).list_available_tickers(), ["NVDA"]);
    }

    #[test]
    fn test_directory_missing_is_empty() {
        let catalog = DirectoryCatalog::new("tests/fixtures/nonexistent");
        assert!(catalog.list_available_tickers().is_empty());
    }
}
