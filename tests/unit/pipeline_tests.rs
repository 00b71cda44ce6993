//! Integration tests for the pipeline, cache and presenter.

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use gex_profile::Error;
use gex_profile::chain::{ChainCache, ChainSource, StaticChainSource, Ticker};
use gex_profile::exposure::Contract;
use gex_profile::pipeline::{GexPipeline, GexRequest};
use gex_profile::report::{GexReport, TextReport, render_text};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::atomic::{AtomicUsize, Ordering};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 3, 14, 30, 0).unwrap()
}

fn expiry() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 4, 2).unwrap()
}

fn spy_chain() -> Vec<Contract> {
    vec![
        Contract::new(dec!(100), expiry(), Some(500)),
        Contract::new(dec!(100), expiry(), Some(250)),
        Contract::new(dec!(105), expiry(), Some(2000)),
        Contract::new(dec!(95), expiry(), None),
    ]
}

fn keyed(ticker: Ticker) -> GexRequest {
    GexRequest::new(ticker, dec!(102), Some("test-key".to_string()))
}

/// Source that always fails, counting attempts.
#[derive(Default)]
struct FailingSource {
    attempts: AtomicUsize,
}

impl ChainSource for FailingSource {
    fn fetch_contracts(&self, ticker: &str, _api_key: &str) -> gex_profile::Result<Vec<Contract>> {
        self.attempts.fetch_add(1, Ordering::Relaxed);
        Err(Error::computation(format!("upstream unavailable for {ticker}")))
    }
}

#[test]
fn test_pipeline_end_to_end() {
    let source = StaticChainSource::new().with_chain("SPY", spy_chain());
    let pipeline = GexPipeline::new(source, ChainCache::default());

    let profile = pipeline.run_at(&keyed(Ticker::Spy), now()).unwrap();
    assert_eq!(profile.ticker(), "SPY");
    assert_eq!(profile.strikes().len(), 3);
    assert_eq!(profile.contract_count(), 4);
    assert_eq!(profile.total_open_interest(), dec!(3750));

    let strikes: Vec<_> = profile.strikes().iter().map(|s| s.strike).collect();
    assert_eq!(strikes, vec![dec!(95), dec!(100), dec!(105)]);
    assert!(profile.strikes().iter().all(|s| s.gex <= profile.king_node().gex));
}

#[test]
fn test_pipeline_caches_within_ttl() {
    let source = StaticChainSource::new().with_chain("SPY", spy_chain());
    let pipeline = GexPipeline::new(source, ChainCache::default());
    let request = keyed(Ticker::Spy);

    let first = pipeline.run_at(&request, now()).unwrap();
    let second = pipeline
        .run_at(&request, now() + Duration::minutes(9))
        .unwrap();
    assert_eq!(pipeline.source().fetch_count(), 1);
    assert_eq!(first.king_strike(), second.king_strike());
    assert_eq!(second.as_of(), now());

    let third = pipeline
        .run_at(&request, now() + Duration::minutes(11))
        .unwrap();
    assert_eq!(pipeline.source().fetch_count(), 2);
    assert_eq!(third.as_of(), now() + Duration::minutes(11));
}

#[test]
fn test_pipeline_cache_is_per_ticker() {
    let source = StaticChainSource::new()
        .with_chain("SPY", spy_chain())
        .with_chain("QQQ", vec![Contract::new(dec!(500), expiry(), Some(10))]);
    let pipeline = GexPipeline::new(source, ChainCache::default());

    pipeline.run_at(&keyed(Ticker::Spy), now()).unwrap();
    let qqq = pipeline.run_at(&keyed(Ticker::Qqq), now()).unwrap();
    assert_eq!(qqq.king_strike(), dec!(500));
    assert_eq!(pipeline.source().fetch_count(), 2);
    assert_eq!(pipeline.cache().len(), 2);
}

#[test]
fn test_pipeline_missing_key_never_fetches() {
    let source = StaticChainSource::new().with_chain("SPY", spy_chain());
    let pipeline = GexPipeline::new(source, ChainCache::default());

    let request = GexRequest::new(Ticker::Spy, dec!(102), None);
    assert!(matches!(
        pipeline.run_at(&request, now()),
        Err(Error::MissingApiKey)
    ));
    assert_eq!(pipeline.source().fetch_count(), 0);
    assert!(pipeline.cache().is_empty());
}

#[test]
fn test_pipeline_unknown_chain_is_no_data() {
    let pipeline = GexPipeline::new(StaticChainSource::new(), ChainCache::default());
    let err = pipeline.run_at(&keyed(Ticker::Coin), now()).unwrap_err();
    assert!(err.is_no_data());
    assert!(pipeline.cache().is_empty());
}

#[test]
fn test_pipeline_fetch_failure_is_no_data_and_retried() {
    let pipeline = GexPipeline::new(FailingSource::default(), ChainCache::default());
    let request = keyed(Ticker::Spy);

    assert!(pipeline.run_at(&request, now()).unwrap_err().is_no_data());
    assert!(pipeline.run_at(&request, now()).unwrap_err().is_no_data());
    assert_eq!(pipeline.source().attempts.load(Ordering::Relaxed), 2);
}

#[test]
fn test_pipeline_expired_chain_is_no_data() {
    let expired = NaiveDate::from_ymd_opt(2025, 3, 3).unwrap();
    let source =
        StaticChainSource::new().with_chain("SPY", vec![Contract::new(dec!(100), expired, None)]);
    let pipeline = GexPipeline::new(source, ChainCache::default());

    let err = pipeline.run_at(&keyed(Ticker::Spy), now()).unwrap_err();
    assert!(err.is_no_data());
}

#[test]
fn test_pipeline_huge_spot_returns_error() {
    let source = StaticChainSource::new().with_chain("SPY", spy_chain());
    let pipeline = GexPipeline::new(source, ChainCache::default());
    let request = GexRequest::new(
        Ticker::Spy,
        Decimal::from(u64::MAX),
        Some("test-key".to_string()),
    );

    let err = pipeline.run_at(&request, now()).unwrap_err();
    assert!(matches!(err, Error::Computation(_)));
}

#[test]
fn test_report_from_pipeline() {
    let source = StaticChainSource::new().with_chain("SPY", spy_chain());
    let pipeline = GexPipeline::new(source, ChainCache::default());
    let profile = pipeline.run_at(&keyed(Ticker::Spy), now()).unwrap();

    let report = GexReport::new(&profile, 2);
    assert_eq!(report.top_strikes.len(), 2);
    assert_eq!(report.top_strikes[0].strike, profile.king_strike());
    assert_eq!(report.strikes.len(), 3);

    let text = TextReport::new(&report, 12).to_string();
    assert_eq!(text.matches("◀ KING NODE").count(), 1);
    assert_eq!(text.matches("SPOT $102").count(), 1);
    assert!(text.contains("3,750"));

    let full = render_text(&profile, 12);
    assert!(full.contains("Dealers want SPY at"));
}
