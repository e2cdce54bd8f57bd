//! Directory record source with format auto-detection

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::{read_ticker_file, RecordSource, SourceFormat};
use crate::types::{AnomdashError, RawRecord, Result};

/// Reads `<data_dir>/<TICKER>.<ext>` for each extension of its format,
/// first existing file wins
pub struct DirectorySource {
    data_dir: PathBuf,
    format: SourceFormat,
}

impl DirectorySource {
    pub fn new(data_dir: impl Into<PathBuf>, format: SourceFormat) -> Self {
        Self {
            data_dir: data_dir.into(),
            format,
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

impl RecordSource for DirectorySource {
    fn name(&self) -> &str {
        "directory"
    }

    fn fetch(&self, ticker: &str) -> Result<Vec<RawRecord>> {
        let mut last_err = None;
        for ext in self.format.extensions() {
            match read_ticker_file(&self.data_dir, ticker, ext) {
                Err(AnomdashError::Io(e)) if e.kind() == ErrorKind::NotFound => {
                    last_err = Some(AnomdashError::Io(e));
                }
                other => return other,
            }
        }
        Err(last_err.unwrap_or_else(|| AnomdashError::InvalidTicker(ticker.to_string())))
    }
}
