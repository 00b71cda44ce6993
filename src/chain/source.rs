//! Option chain sources.
//!
//! [`ChainSource`] is the seam between the pipeline and the market data
//! provider. [`PolygonClient`] talks to the Polygon.io reference contracts
//! endpoint; [`StaticChainSource`] serves fixed chains for demos, benches and
//! tests.

use crate::error::Result;
use crate::exposure::Contract;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, warn};

/// Default Polygon.io API base URL.
pub const DEFAULT_POLYGON_BASE_URL: &str = "https://api.polygon.io";

/// Default number of contracts requested per ticker.
pub const DEFAULT_CONTRACT_LIMIT: u32 = 1000;

const CONTRACTS_PATH: &str = "/v3/reference/options/contracts";

/// A provider of option chain snapshots.
pub trait ChainSource {
    /// Fetches the contract listing for `ticker`.
    ///
    /// # Errors
    ///
    /// Returns an error on transport, status or decoding failures.
    fn fetch_contracts(&self, ticker: &str, api_key: &str) -> Result<Vec<Contract>>;
}

impl<S: ChainSource + ?Sized> ChainSource for &S {
    fn fetch_contracts(&self, ticker: &str, api_key: &str) -> Result<Vec<Contract>> {
        (**self).fetch_contracts(ticker, api_key)
    }
}

impl<S: ChainSource + ?Sized> ChainSource for Box<S> {
    fn fetch_contracts(&self, ticker: &str, api_key: &str) -> Result<Vec<Contract>> {
        (**self).fetch_contracts(ticker, api_key)
    }
}

#[derive(Debug, Deserialize)]
struct ContractsResponse {
    #[serde(default)]
    results: Vec<serde_json::Value>,
}

/// Decodes a reference-contracts response body.
///
/// A missing `results` array yields an empty chain. Individual records that
/// lack a strike or expiration are skipped.
///
/// # Errors
///
/// Returns `Error::Json` if the body is not a JSON object.
pub fn parse_contracts_response(body: &str) -> Result<Vec<Contract>> {
    let response: ContractsResponse = serde_json::from_str(body)?;
    let total = response.results.len();

    let contracts: Vec<Contract> = response
        .results
        .into_iter()
        .filter_map(|value| match serde_json::from_value::<Contract>(value) {
            Ok(contract) => Some(contract),
            Err(e) => {
                debug!(error = %e, "skipping malformed contract record");
                None
            }
        })
        .collect();

    if contracts.len() < total {
        warn!(
            skipped = total - contracts.len(),
            total, "dropped malformed contract records"
        );
    }

    Ok(contracts)
}

/// Blocking client for the Polygon.io reference contracts endpoint.
#[derive(Debug, Clone)]
pub struct PolygonClient {
    /// Underlying HTTP client.
    client: reqwest::blocking::Client,
    /// API base URL without trailing slash.
    base_url: String,
    /// Maximum contracts requested per ticker.
    contract_limit: u32,
}

impl PolygonClient {
    /// Creates a new client.
    ///
    /// # Arguments
    ///
    /// * `base_url` - API base URL (e.g. [`DEFAULT_POLYGON_BASE_URL`])
    /// * `contract_limit` - Maximum contracts requested per ticker
    ///
    /// # Errors
    ///
    /// Returns `Error::Http` if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>, contract_limit: u32) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            contract_limit,
        })
    }

    /// Returns the contracts endpoint URL.
    #[must_use]
    pub fn contracts_url(&self) -> String {
        format!("{}{}", self.base_url, CONTRACTS_PATH)
    }

    /// Returns the contract limit.
    #[must_use]
    pub const fn contract_limit(&self) -> u32 {
        self.contract_limit
    }
}

impl ChainSource for PolygonClient {
    fn fetch_contracts(&self, ticker: &str, api_key: &str) -> Result<Vec<Contract>> {
        let limit = self.contract_limit.to_string();

        // reqwest errors carry the request URL, which includes the key.
        let body = self
            .client
            .get(self.contracts_url())
            .query(&[
                ("underlying_ticker", ticker),
                ("limit", limit.as_str()),
                ("apiKey", api_key),
            ])
            .send()
            .and_then(reqwest::blocking::Response::error_for_status)
            .and_then(reqwest::blocking::Response::text)
            .map_err(reqwest::Error::without_url)?;

        let contracts = parse_contracts_response(&body)?;
        debug!(ticker, contracts = contracts.len(), "fetched option chain");
        Ok(contracts)
    }
}

/// Serves fixed chains keyed by ticker and counts fetches.
#[derive(Debug, Default)]
pub struct StaticChainSource {
    /// Chains indexed by ticker symbol.
    chains: HashMap<String, Vec<Contract>>,
    /// Number of fetches served.
    fetches: AtomicUsize,
}

impl StaticChainSource {
    /// Creates an empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) the chain for a ticker.
    #[must_use]
    pub fn with_chain(mut self, ticker: impl Into<String>, contracts: Vec<Contract>) -> Self {
        self.chains.insert(ticker.into(), contracts);
        self
    }

    /// Returns how many fetches were served.
    #[must_use]
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::Relaxed)
    }
}

impl ChainSource for StaticChainSource {
    fn fetch_contracts(&self, ticker: &str, _api_key: &str) -> Result<Vec<Contract>> {
        self.fetches.fetch_add(1, Ordering::Relaxed);
        Ok(self.chains.get(ticker).cloned().unwrap_or_default())
    }
}
