//! GEX pipeline.
//!
//! [`GexPipeline`] wires a [`ChainSource`] and a [`ChainCache`] to the
//! exposure computation. One call of [`GexPipeline::run`] takes a ticker,
//! spot price and API key and returns a [`GexProfile`]; the caller decides
//! when to invoke it.

use crate::chain::{ChainCache, ChainSource, Ticker};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::exposure::{GexProfile, filter_and_enrich};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::{info, warn};

/// Inputs for one pipeline run.
#[derive(Clone)]
pub struct GexRequest {
    /// The underlying to profile.
    pub ticker: Ticker,
    /// Spot price of the underlying.
    pub spot_price: Decimal,
    /// Market data API key.
    pub api_key: Option<String>,
}

impl GexRequest {
    /// Creates a new request.
    #[must_use]
    pub fn new(ticker: Ticker, spot_price: Decimal, api_key: Option<String>) -> Self {
        Self {
            ticker,
            spot_price,
            api_key,
        }
    }

    /// Returns the API key if one is present and not blank.
    #[must_use]
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }
}

impl std::fmt::Debug for GexRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GexRequest")
            .field("ticker", &self.ticker)
            .field("spot_price", &self.spot_price)
            .field("api_key", &self.api_key().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Fetches, caches and profiles option chains.
pub struct GexPipeline<S> {
    /// Provider of contract listings.
    source: S,
    /// Per-ticker chain cache.
    cache: ChainCache,
}

impl<S: ChainSource> GexPipeline<S> {
    /// Creates a pipeline over `source` with an explicit cache.
    #[must_use]
    pub const fn new(source: S, cache: ChainCache) -> Self {
        Self { source, cache }
    }

    /// Creates a pipeline whose cache uses the configured time-to-live.
    #[must_use]
    pub fn with_config(source: S, config: &Config) -> Self {
        Self::new(source, ChainCache::new(config.cache_ttl))
    }

    /// Returns the chain source.
    #[must_use]
    pub const fn source(&self) -> &S {
        &self.source
    }

    /// Returns the chain cache.
    #[must_use]
    pub const fn cache(&self) -> &ChainCache {
        &self.cache
    }

    /// Runs the pipeline at the current time.
    ///
    /// # Errors
    ///
    /// See [`GexPipeline::run_at`].
    pub fn run(&self, request: &GexRequest) -> Result<GexProfile> {
        self.run_at(request, Utc::now())
    }

    /// Runs the pipeline with `now` as the clock.
    ///
    /// Expired contracts are filtered relative to the snapshot's fetch time.
    ///
    /// # Errors
    ///
    /// - `Error::MissingApiKey` if the request has no key (nothing is fetched)
    /// - `Error::InvalidInput` if the spot price is not positive
    /// - `Error::NoData` if the chain is empty or has no live contracts
    pub fn run_at(&self, request: &GexRequest, now: DateTime<Utc>) -> Result<GexProfile> {
        let api_key = request.api_key().ok_or(Error::MissingApiKey)?;
        if request.spot_price <= Decimal::ZERO {
            return Err(Error::invalid_input(format!(
                "spot price must be positive, got {}",
                request.spot_price
            )));
        }

        let ticker = request.ticker.symbol();
        let snapshot = self.cache.get_or_fetch(ticker, now, || {
            info!(ticker, "fetching option chain");
            self.source.fetch_contracts(ticker, api_key)
        });

        if snapshot.is_empty() {
            warn!(ticker, "option chain is empty");
            return Err(Error::no_data(ticker));
        }

        let live = filter_and_enrich(snapshot.contracts(), snapshot.fetched_at());
        if live.is_empty() {
            warn!(ticker, "no unexpired contracts in option chain");
            return Err(Error::no_data(ticker));
        }

        GexProfile::compute(ticker, request.spot_price, snapshot.fetched_at(), &live)
    }
}
