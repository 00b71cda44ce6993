//! # GEX Profile - Options Gamma Exposure by Strike
//!
//! A Rust library and command-line tool that estimates the aggregate dealer
//! gamma exposure (GEX) of an options chain, strike by strike, and finds the
//! **king node**: the strike with the largest aggregated exposure, read as
//! the strongest price magnet.
//!
//! ## Key Features
//!
//! - **Decimal Arithmetic**: Prices, time-to-expiration and exposures use
//!   [`rust_decimal`](https://crates.io/crates/rust_decimal) end to end.
//!
//! - **Pure Computation Core**: Filtering, gamma estimation, aggregation and
//!   selection are plain functions over slices, testable without I/O.
//!
//! - **Pluggable Chain Sources**: The [`chain::ChainSource`] trait separates
//!   the pipeline from the market data provider. A Polygon.io client ships
//!   with the crate.
//!
//! - **Explicit Caching**: [`chain::ChainCache`] memoizes chains per ticker
//!   for a fixed time-to-live and is passed to the pipeline as a dependency.
//!
//! - **Result-Based Error Handling**: All fallible operations return
//!   `Result<T, Error>` with descriptive error types.
//!
//! ## Pipeline
//!
//! ```text
//! GexPipeline::run(ticker, spot, api_key)
//!   └── ChainCache (per ticker, 10 minute TTL)
//!         └── ChainSource (PolygonClient)
//!               └── filter_and_enrich      drop expired, T = max(days/365, 0.002)
//!                     └── contract_exposure      gamma = 0.4 / (K * 0.2 * sqrt(T))
//!                           └── StrikeExposureBook     sum by strike
//!                                 └── select_king_node      argmax
//!                                       └── GexReport / TextReport
//! ```
//!
//! ## Module Structure
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`exposure`] | Contracts, gamma heuristic, aggregation, king node, profiles |
//! | [`chain`] | Tickers, chain sources, the Polygon.io client and the cache |
//! | [`pipeline`] | The end-to-end entry point |
//! | [`report`] | JSON and terminal presentation |
//! | [`config`] | Environment configuration |
//! | [`error`] | Error types and `Result` type alias |
//! | [`utils`] | Date and number formatting helpers |
//!
//! ## Model
//!
//! For each live contract with strike `K`, whole days to expiration `d` and
//! open interest `OI` (1000 when unreported):
//!
//! ```text
//! T       = max(d / 365, 0.002)
//! gamma   = 0.4 / (K * 0.2 * sqrt(T))
//! gex_raw = -OI * gamma * 100 * spot^2 / 100
//! ```
//!
//! The gamma term is a fixed heuristic. It does not take implied
//! volatility, and calls and puts are treated alike. The leading minus sign
//! models dealers as short gamma.
//!
//! ## Example Usage
//!
//! ### Computing a Profile From a Fixed Chain
//!
//! ```rust
//! use chrono::{NaiveDate, TimeZone, Utc};
//! use gex_profile::chain::{ChainCache, StaticChainSource, Ticker};
//! use gex_profile::exposure::Contract;
//! use gex_profile::pipeline::{GexPipeline, GexRequest};
//! use rust_decimal_macros::dec;
//!
//! let expiry = NaiveDate::from_ymd_opt(2025, 4, 2).unwrap();
//! let source = StaticChainSource::new().with_chain(
//!     "SPY",
//!     vec![
//!         Contract::new(dec!(100), expiry, Some(500)),
//!         Contract::new(dec!(105), expiry, Some(2000)),
//!     ],
//! );
//! let pipeline = GexPipeline::new(source, ChainCache::default());
//!
//! let request = GexRequest::new(Ticker::Spy, dec!(102), Some("demo-key".to_string()));
//! let now = Utc.with_ymd_and_hms(2025, 3, 3, 0, 0, 0).unwrap();
//! let profile = pipeline.run_at(&request, now).unwrap();
//!
//! assert_eq!(profile.king_strike(), dec!(100));
//! assert_eq!(profile.strikes().len(), 2);
//! ```
//!
//! ### Rendering
//!
//! ```rust,ignore
//! use gex_profile::report::{DEFAULT_BAR_WIDTH, render_text};
//!
//! println!("{}", render_text(&profile, DEFAULT_BAR_WIDTH));
//! ```
//!
//! ## Command Line
//!
//! ```bash
//! export POLYGON_API_KEY=...
//! gex-profile --ticker SPY --spot 585.0
//! gex-profile --ticker QQQ --spot 512.3 --format json
//! ```
//!
//! ## Dependencies
//!
//! - **rust_decimal** (1.39): Precise decimal arithmetic
//! - **chrono** (0.4): Dates and timestamps
//! - **dashmap** (6): Concurrent map behind the chain cache
//! - **reqwest** (0.12): Blocking HTTP client for Polygon.io
//! - **thiserror** (2.0): Error handling
//! - **serde** (1.0): Serialization support
//! - **tracing** (0.1): Structured logging

pub mod chain;
pub mod config;
pub mod error;
pub mod exposure;
pub mod pipeline;
pub mod report;
pub mod utils;

pub use error::{Error, Result};
