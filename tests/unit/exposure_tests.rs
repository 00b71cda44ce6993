//! Integration tests for the exposure module.

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use gex_profile::Error;
use gex_profile::exposure::{
    Contract, GexProfile, MIN_TIME_TO_EXPIRY, aggregate_by_strike, contract_exposure,
    estimate_gamma, filter_and_enrich, select_king_node,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 2, 0, 0, 0).unwrap()
}

fn in_days(days: i64) -> NaiveDate {
    (now() + Duration::days(days)).date_naive()
}

fn assert_close(actual: Decimal, expected: Decimal, tolerance: Decimal) {
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {expected} +/- {tolerance}, got {actual}"
    );
}

/// Synthetic chain: several expirations, repeated strikes, some expired,
/// some without open interest.
fn synthetic_chain() -> Vec<Contract> {
    let mut chain = Vec::new();
    for (i, strike) in (570..=600).step_by(5).enumerate() {
        for days in [-2_i64, 0, 1, 7, 30, 90] {
            let oi = if i % 3 == 0 { None } else { Some(100 * (i as u64 + 1)) };
            chain.push(Contract::new(Decimal::from(strike), in_days(days), oi));
        }
    }
    chain
}

#[test]
fn test_end_to_end_two_strikes() {
    let contracts = vec![
        Contract::new(dec!(100), in_days(30), Some(500)),
        Contract::new(dec!(105), in_days(30), Some(2000)),
    ];

    let live = filter_and_enrich(&contracts, now());
    assert_eq!(live.len(), 2);
    for c in &live {
        assert_eq!(c.days_to_exp(), 30);
    }

    let gamma_100 = estimate_gamma(dec!(100), live[0].time_to_expiry()).unwrap();
    let gamma_105 = estimate_gamma(dec!(105), live[1].time_to_expiry()).unwrap();
    assert_close(gamma_100, dec!(0.0697615), dec!(0.000001));
    assert_close(gamma_105, dec!(0.0664395), dec!(0.000001));

    let profile = GexProfile::compute("SPY", dec!(102), now(), &live).unwrap();
    let rows = profile.strikes();
    assert_eq!(rows.len(), 2);
    assert_close(rows[0].gex, dec!(-362899.31), dec!(1));
    assert_close(rows[1].gex, dec!(-1382473.58), dec!(1));

    // Both values negative: the less negative strike wins.
    assert_eq!(profile.king_strike(), dec!(100));
}

#[test]
fn test_aggregation_preserves_total_mass() {
    let live = filter_and_enrich(&synthetic_chain(), now());
    let exposures: Vec<_> = live
        .iter()
        .map(|c| contract_exposure(c, dec!(585)).unwrap())
        .collect();

    let contract_total: Decimal = exposures.iter().map(|e| e.gex_raw).sum();
    let rows = aggregate_by_strike(&exposures).unwrap();
    let strike_total: Decimal = rows.iter().map(|r| r.gex).sum();

    assert_eq!(rows.len(), 7);
    assert_eq!(strike_total, contract_total);
}

#[test]
fn test_filter_keeps_only_future_expirations() {
    let chain = synthetic_chain();
    let live = filter_and_enrich(&chain, now());

    // -2 and 0 day expirations are gone; 1, 7, 30, 90 remain.
    assert_eq!(live.len(), 7 * 4);
    for c in &live {
        assert!(c.contract().is_live_at(now()));
        assert!(c.time_to_expiry() >= MIN_TIME_TO_EXPIRY);
    }
}

#[test]
fn test_exposure_sign_and_gamma_positive() {
    for c in filter_and_enrich(&synthetic_chain(), now()) {
        let exposure = contract_exposure(&c, dec!(585)).unwrap();
        assert!(exposure.gamma > Decimal::ZERO);
        assert!(exposure.gex_raw <= Decimal::ZERO);
    }
}

#[test]
fn test_king_node_is_maximal_and_present() {
    let live = filter_and_enrich(&synthetic_chain(), now());
    let profile = GexProfile::compute("SPY", dec!(585), now(), &live).unwrap();
    let king = select_king_node(profile.strikes()).unwrap();

    assert_eq!(king, profile.king_node());
    assert!(profile.strikes().contains(&king));
    assert!(profile.strikes().iter().all(|r| r.gex <= king.gex));
}

#[test]
fn test_unrepresentable_exposure_is_an_error() {
    let live = filter_and_enrich(&synthetic_chain(), now());
    for spot in [Decimal::from(u64::MAX), Decimal::MAX] {
        let err = GexProfile::compute("SPY", spot, now(), &live).unwrap_err();
        assert!(matches!(err, Error::Computation(_)), "spot {spot}: {err}");
    }
}

#[test]
fn test_missing_open_interest_defaults() {
    let live = filter_and_enrich(&[Contract::new(dec!(585), in_days(30), None)], now());
    let profile = GexProfile::compute("SPY", dec!(585), now(), &live).unwrap();
    assert_eq!(profile.total_open_interest(), dec!(1000));
    assert_eq!(profile.contract_count(), 1);
}

#[test]
fn test_all_expired_is_no_data() {
    let contracts = vec![Contract::new(dec!(585), in_days(-1), Some(10))];
    let live = filter_and_enrich(&contracts, now());
    assert!(live.is_empty());
    assert!(
        GexProfile::compute("SPY", dec!(585), now(), &live)
            .unwrap_err()
            .is_no_data()
    );
}
