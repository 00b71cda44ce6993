//! Option chain loading.
//!
//! ## Components
//!
//! - [`Ticker`]: The supported underlyings
//! - [`ChainSource`]: Provider of contract listings
//! - [`PolygonClient`]: Polygon.io reference contracts client
//! - [`StaticChainSource`]: Fixed chains for offline use
//! - [`ChainCache`]: Per-ticker memo with a time-to-live
//! - [`ChainSnapshot`]: A fetched chain and its fetch time

mod cache;
mod source;
mod ticker;

pub use cache::{ChainCache, ChainSnapshot, DEFAULT_CACHE_TTL_SECS};
pub use source::{
    ChainSource, DEFAULT_CONTRACT_LIMIT, DEFAULT_POLYGON_BASE_URL, PolygonClient,
    StaticChainSource, parse_contracts_response,
};
pub use ticker::Ticker;
