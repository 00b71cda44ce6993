//! Offline GEX Profile Example
//!
//! This example runs the full pipeline against a synthetic SPY chain:
//! - Serving a fixed chain through `StaticChainSource`
//! - Computing the per-strike profile and king node
//! - Reusing the cached chain on a second run
//! - Rendering the terminal report
//!
//! Run with: `cargo run --example offline_profile`

use chrono::{Duration, Utc};
use gex_profile::chain::{ChainCache, StaticChainSource, Ticker};
use gex_profile::exposure::Contract;
use gex_profile::pipeline::{GexPipeline, GexRequest};
use gex_profile::report::{DEFAULT_BAR_WIDTH, render_text};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::info;

/// Builds a chain of strikes around 585 over four weekly expirations.
fn synthetic_chain() -> Vec<Contract> {
    let today = Utc::now().date_naive();
    let mut contracts = Vec::new();

    for week in 1..=4_i64 {
        let expiry = today + Duration::days(7 * week);
        for step in -10_i64..=10 {
            let strike = dec!(585) + Decimal::from(step * 5);
            // Open interest peaks near the money and thins out in the wings.
            let open_interest = if step % 4 == 0 {
                None
            } else {
                Some(5_000 / (step.unsigned_abs() + 1) * week.unsigned_abs())
            };
            contracts.push(Contract::new(strike, expiry, open_interest));
        }
    }
    contracts
}

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    info!("=== Offline GEX Profile Example ===");

    let source = StaticChainSource::new().with_chain("SPY", synthetic_chain());
    let pipeline = GexPipeline::new(source, ChainCache::default());
    let request = GexRequest::new(Ticker::Spy, dec!(587.25), Some("offline".to_string()));

    let profile = match pipeline.run(&request) {
        Ok(profile) => profile,
        Err(e) => {
            info!("Pipeline failed: {}", e);
            return;
        }
    };
    info!("{}", profile.stats());

    // Second run within the TTL is served from the cache.
    if let Ok(again) = pipeline.run(&request) {
        info!(
            "Second run: king node {} with {} fetch(es) served",
            again.king_strike(),
            pipeline.source().fetch_count()
        );
    }

    println!("{}", render_text(&profile, DEFAULT_BAR_WIDTH));

    info!("=== Example Complete ===");
}
