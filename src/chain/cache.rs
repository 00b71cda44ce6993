//! Chain cache module.
//!
//! This module provides the [`ChainCache`], a per-ticker memo of fetched
//! option chains with a fixed time-to-live, and the [`ChainSnapshot`] it
//! stores.

use crate::error::Result;
use crate::exposure::Contract;
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Default time-to-live for cached chains: 10 minutes.
pub const DEFAULT_CACHE_TTL_SECS: i64 = 600;

/// An option chain as fetched for one ticker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainSnapshot {
    /// The ticker symbol.
    ticker: String,
    /// Contracts as returned by the source.
    contracts: Vec<Contract>,
    /// When the chain was fetched.
    fetched_at: DateTime<Utc>,
}

impl ChainSnapshot {
    /// Creates a new snapshot.
    #[must_use]
    pub fn new(ticker: impl Into<String>, contracts: Vec<Contract>, fetched_at: DateTime<Utc>) -> Self {
        Self {
            ticker: ticker.into(),
            contracts,
            fetched_at,
        }
    }

    /// Returns the ticker symbol.
    #[must_use]
    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    /// Returns the contracts.
    #[must_use]
    pub fn contracts(&self) -> &[Contract] {
        &self.contracts
    }

    /// Returns when the chain was fetched.
    #[must_use]
    pub const fn fetched_at(&self) -> DateTime<Utc> {
        self.fetched_at
    }

    /// Returns true if the snapshot has no contracts.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.contracts.is_empty()
    }

    /// Returns true if the snapshot is younger than `ttl` at `now`.
    #[must_use]
    pub fn is_fresh(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        now - self.fetched_at < ttl
    }
}

/// Per-ticker cache of fetched chains.
///
/// Uses `DashMap` so a shared reference can serve lookups and refreshes.
/// Failed or empty fetches are never stored.
#[derive(Debug)]
pub struct ChainCache {
    /// Snapshots indexed by ticker symbol.
    entries: DashMap<String, Arc<ChainSnapshot>>,
    /// Maximum age of a served snapshot.
    ttl: Duration,
}

impl Default for ChainCache {
    fn default() -> Self {
        Self::new(Duration::seconds(DEFAULT_CACHE_TTL_SECS))
    }
}

impl ChainCache {
    /// Creates a cache with the given time-to-live.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
        }
    }

    /// Returns the time-to-live.
    #[must_use]
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns the number of cached tickers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the cached snapshot for `ticker` if it is still fresh at `now`.
    #[must_use]
    pub fn get(&self, ticker: &str, now: DateTime<Utc>) -> Option<Arc<ChainSnapshot>> {
        self.entries
            .get(ticker)
            .filter(|e| e.value().is_fresh(now, self.ttl))
            .map(|e| Arc::clone(e.value()))
    }

    /// Returns the fresh snapshot for `ticker`, fetching and storing a new
    /// one when absent or stale.
    ///
    /// A failing `fetch` is logged and yields an empty snapshot.
    pub fn get_or_fetch<F>(&self, ticker: &str, now: DateTime<Utc>, fetch: F) -> Arc<ChainSnapshot>
    where
        F: FnOnce() -> Result<Vec<Contract>>,
    {
        if let Some(snapshot) = self.get(ticker, now) {
            debug!(ticker, fetched_at = %snapshot.fetched_at(), "chain cache hit");
            return snapshot;
        }

        let contracts = match fetch() {
            Ok(contracts) => contracts,
            Err(e) => {
                warn!(ticker, error = %e, "chain fetch failed");
                Vec::new()
            }
        };

        let snapshot = Arc::new(ChainSnapshot::new(ticker, contracts, now));
        if snapshot.is_empty() {
            self.entries.remove(ticker);
        } else {
            info!(ticker, contracts = snapshot.contracts().len(), "chain cache refreshed");
            self.entries.insert(ticker.to_string(), Arc::clone(&snapshot));
        }
        snapshot
    }

    /// Removes the snapshot for `ticker`.
    ///
    /// Returns true if an entry was removed.
    pub fn invalidate(&self, ticker: &str) -> bool {
        self.entries.remove(ticker).is_some()
    }

    /// Removes every snapshot that is stale at `now`, returning how many.
    pub fn purge_expired(&self, now: DateTime<Utc>) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, s| s.is_fresh(now, self.ttl));
        before - self.entries.len()
    }

    /// Removes every snapshot.
    pub fn clear(&self) {
        self.entries.clear();
    }
}
