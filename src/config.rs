//! Runtime configuration.
//!
//! Loaded from environment variables (a `.env` file is honoured by the
//! binary). Unparseable values fall back to their defaults.
//!
//! | Variable | Default |
//! |----------|---------|
//! | `POLYGON_API_KEY` | unset |
//! | `GEX_POLYGON_BASE_URL` | `https://api.polygon.io` |
//! | `GEX_CONTRACT_LIMIT` | `1000` |
//! | `GEX_CACHE_TTL_SECS` | `600` |
//! | `GEX_DEFAULT_SPOT` | `585.0` |

use crate::chain::{DEFAULT_CACHE_TTL_SECS, DEFAULT_CONTRACT_LIMIT, DEFAULT_POLYGON_BASE_URL};
use crate::error::{Error, Result};
use chrono::Duration;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::str::FromStr;
use tracing::warn;

/// Spot price used when none is given.
pub const DEFAULT_SPOT_PRICE: Decimal = dec!(585.0);

/// Configuration for the market data client, cache and pipeline.
#[derive(Clone)]
pub struct Config {
    /// Polygon.io API key.
    pub api_key: Option<String>,
    /// API base URL.
    pub base_url: String,
    /// Contracts requested per ticker.
    pub contract_limit: u32,
    /// Time-to-live of cached chains.
    pub cache_ttl: Duration,
    /// Spot price used when the caller gives none.
    pub default_spot: Decimal,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("base_url", &self.base_url)
            .field("contract_limit", &self.contract_limit)
            .field("cache_ttl", &self.cache_ttl)
            .field("default_spot", &self.default_spot)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_POLYGON_BASE_URL.to_string(),
            contract_limit: DEFAULT_CONTRACT_LIMIT,
            cache_ttl: Duration::seconds(DEFAULT_CACHE_TTL_SECS),
            default_spot: DEFAULT_SPOT_PRICE,
        }
    }
}

impl Config {
    /// Creates configuration from process environment variables.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if a value is present but out of range.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Creates configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if a value is present but out of range.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let config = Self {
            api_key: get("POLYGON_API_KEY"),
            base_url: get("GEX_POLYGON_BASE_URL").unwrap_or(defaults.base_url),
            contract_limit: parse_or(
                "GEX_CONTRACT_LIMIT",
                get("GEX_CONTRACT_LIMIT"),
                defaults.contract_limit,
            ),
            cache_ttl: Duration::seconds(parse_or(
                "GEX_CACHE_TTL_SECS",
                get("GEX_CACHE_TTL_SECS"),
                DEFAULT_CACHE_TTL_SECS,
            )),
            default_spot: parse_or(
                "GEX_DEFAULT_SPOT",
                get("GEX_DEFAULT_SPOT"),
                defaults.default_spot,
            ),
        };

        config.validate()?;
        Ok(config)
    }

    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` describing the first invalid value.
    pub fn validate(&self) -> Result<()> {
        if self.contract_limit == 0 {
            return Err(Error::Config("GEX_CONTRACT_LIMIT must be positive".to_string()));
        }
        if self.cache_ttl < Duration::zero() {
            return Err(Error::Config("GEX_CACHE_TTL_SECS must not be negative".to_string()));
        }
        if self.default_spot <= Decimal::ZERO {
            return Err(Error::Config("GEX_DEFAULT_SPOT must be positive".to_string()));
        }
        Ok(())
    }
}

fn parse_or<T: FromStr>(key: &str, value: Option<String>, default: T) -> T {
    match value {
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            warn!(key, value = %raw, "ignoring unparseable configuration value");
            default
        }),
        None => default,
    }
}
