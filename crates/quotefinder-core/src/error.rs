use thiserror::Error;

/// Top-level error type for Find My Quote.
///
/// The skill crate defines its own error types and converts into this one
/// where a failure has to cross into the host layer.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuoteFinderError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Cursor index {next_index} is past the end of a result set of {len} items")]
    InvalidCursor { next_index: usize, len: usize },
}

impl From<toml::de::Error> for QuoteFinderError {
    fn from(err: toml::de::Error) -> Self {
        QuoteFinderError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for QuoteFinderError {
    fn from(err: toml::ser::Error) -> Self {
        QuoteFinderError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for QuoteFinderError {
    fn from(err: serde_json::Error) -> Self {
        QuoteFinderError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for Find My Quote operations.
pub type Result<T> = std::result::Result<T, QuoteFinderError>;
