use thiserror::Error;

/// anomdash error types
#[derive(Error, Debug)]
pub enum AnomdashError {
    /// Failed to parse CSV/JSON source data
    #[error("parse error: {0}")]
    Parse(String),

    /// File I/O error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Remote source request failed
    #[error("http error: {0}")]
    Http(String),

    /// Ticker cannot be used as a source key
    #[error("invalid ticker: {0:?}")]
    InvalidTicker(String),

    /// Configuration error
    #[error("config error: {0}")]
    Config(String),
}

/// Result type alias for anomdash
pub type Result<T> = std::result::Result<T, AnomdashError>;
