//! Error types for the gex-profile library.

use thiserror::Error;

/// Result type alias using the library's [`enum@Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced while loading a chain or computing a GEX profile.
#[derive(Debug, Error)]
pub enum Error {
    /// No API key was supplied, so no fetch was attempted.
    #[error("missing market data API key")]
    MissingApiKey,

    /// The chain for a ticker produced no usable contracts.
    #[error("no data for {ticker}")]
    NoData {
        /// The ticker (or context) that produced no data.
        ticker: String,
    },

    /// The ticker is not part of the supported set.
    #[error("unknown ticker: {0}")]
    UnknownTicker(String),

    /// An input value is outside its valid domain.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A numeric step could not be evaluated.
    #[error("computation failed: {0}")]
    Computation(String),

    /// The HTTP request to the market data API failed.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// A response body could not be decoded.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// A configuration value is invalid.
    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Creates a [`Error::NoData`] error.
    pub fn no_data(ticker: impl Into<String>) -> Self {
        Self::NoData {
            ticker: ticker.into(),
        }
    }

    /// Creates an [`Error::InvalidInput`] error.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Creates an [`Error::Computation`] error.
    pub fn computation(msg: impl Into<String>) -> Self {
        Self::Computation(msg.into())
    }

    /// Returns true if this error means "nothing to show" rather than a failure.
    #[must_use]
    pub const fn is_no_data(&self) -> bool {
        matches!(self, Self::NoData { .. })
    }
}
