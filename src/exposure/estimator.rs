//! Exposure estimator.
//!
//! Per-contract gamma and signed dollar-gamma exposure. The gamma value is a
//! fixed heuristic, `0.4 / (K * 0.2 * sqrt(T))`: it is strike and time
//! sensitive but takes no volatility input, and is reproduced literally.

use super::contract::EnrichedContract;
use crate::error::{Error, Result};
use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;
use serde::Serialize;

/// Numerator of the gamma heuristic.
const GAMMA_NUMERATOR: Decimal = dec!(0.4);

/// Volatility-like scale applied to the strike in the gamma heuristic.
const GAMMA_STRIKE_SCALE: Decimal = dec!(0.2);

/// Open interest assumed when the source does not report one.
pub const DEFAULT_OPEN_INTEREST: u64 = 1000;

/// Shares per contract.
pub const CONTRACT_MULTIPLIER: Decimal = dec!(100);

/// Exposure is quoted per 1% move of the underlying.
const PERCENT_MOVE: Decimal = dec!(0.01);

/// Exposure of a single contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ContractExposure {
    /// The strike price the exposure is attributed to.
    pub strike_price: Decimal,
    /// Estimated gamma.
    pub gamma: Decimal,
    /// Open interest used (after defaulting).
    pub open_interest: Decimal,
    /// Signed dollar gamma exposure (dealer short gamma, so `<= 0`).
    pub gex_raw: Decimal,
}

/// Estimates gamma for a strike and normalized time-to-expiration.
///
/// # Errors
///
/// Returns `Error::InvalidInput` if the strike or `T` is not positive.
pub fn estimate_gamma(strike_price: Decimal, time_to_expiry: Decimal) -> Result<Decimal> {
    if strike_price <= Decimal::ZERO {
        return Err(Error::invalid_input(format!(
            "strike price must be positive, got {strike_price}"
        )));
    }
    if time_to_expiry <= Decimal::ZERO {
        return Err(Error::invalid_input(format!(
            "time to expiry must be positive, got {time_to_expiry}"
        )));
    }

    let sqrt_t = time_to_expiry
        .sqrt()
        .ok_or_else(|| Error::computation(format!("sqrt({time_to_expiry})")))?;

    strike_price
        .checked_mul(GAMMA_STRIKE_SCALE)
        .and_then(|scaled| scaled.checked_mul(sqrt_t))
        .and_then(|denominator| GAMMA_NUMERATOR.checked_div(denominator))
        .ok_or_else(|| Error::computation(format!("gamma for strike {strike_price}")))
}

/// Returns the open interest to use, defaulting missing values.
#[must_use]
pub fn effective_open_interest(open_interest: Option<u64>) -> Decimal {
    Decimal::from(open_interest.unwrap_or(DEFAULT_OPEN_INTEREST))
}

/// Computes the signed exposure of one enriched contract at `spot_price`.
///
/// `gex_raw = -OI * gamma * 100 * spot^2 * 0.01`
///
/// # Errors
///
/// Returns `Error::InvalidInput` for a non-positive strike or spot price, and
/// `Error::Computation` if the exposure does not fit in a `Decimal`.
pub fn contract_exposure(
    contract: &EnrichedContract,
    spot_price: Decimal,
) -> Result<ContractExposure> {
    if spot_price <= Decimal::ZERO {
        return Err(Error::invalid_input(format!(
            "spot price must be positive, got {spot_price}"
        )));
    }

    let gamma = estimate_gamma(contract.strike_price(), contract.time_to_expiry())?;
    let open_interest = effective_open_interest(contract.open_interest());
    let exposure = [CONTRACT_MULTIPLIER, spot_price, spot_price, PERCENT_MOVE, open_interest]
        .into_iter()
        .try_fold(gamma, Decimal::checked_mul)
        .ok_or_else(|| {
            Error::computation(format!(
                "exposure overflow for strike {} at spot {spot_price}",
                contract.strike_price()
            ))
        })?;

    Ok(ContractExposure {
        strike_price: contract.strike_price(),
        gamma,
        open_interest,
        gex_raw: -exposure,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exposure::contract::{Contract, MIN_TIME_TO_EXPIRY};
    use chrono::{NaiveDate, TimeZone, Utc};

    fn enriched(strike: Decimal, oi: Option<u64>) -> EnrichedContract {
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let exp = NaiveDate::from_ymd_opt(2025, 1, 31).unwrap();
        EnrichedContract::from_contract(Contract::new(strike, exp, oi), now).unwrap()
    }

    fn assert_close(actual: Decimal, expected: Decimal, tolerance: Decimal) {
        assert!(
            (actual - expected).abs() <= tolerance,
            "expected {expected} +/- {tolerance}, got {actual}"
        );
    }

    #[test]
    fn test_gamma_heuristic_value() {
        let gamma = estimate_gamma(dec!(100), dec!(30) / dec!(365)).unwrap();
        assert_close(gamma, dec!(0.0697615), dec!(0.000001));
    }

    #[test]
    fn test_gamma_positive() {
        for strike in [dec!(1), dec!(50), dec!(585), dec!(5000)] {
            for t in [MIN_TIME_TO_EXPIRY, dec!(0.1), dec!(1), dec!(2.5)] {
                assert!(estimate_gamma(strike, t).unwrap() > Decimal::ZERO);
            }
        }
    }

    #[test]
    fn test_gamma_rejects_non_positive_strike() {
        assert!(estimate_gamma(Decimal::ZERO, dec!(0.1)).is_err());
        assert!(estimate_gamma(dec!(-5), dec!(0.1)).is_err());
    }

    #[test]
    fn test_gamma_rejects_non_positive_time() {
        assert!(estimate_gamma(dec!(100), Decimal::ZERO).is_err());
    }

    #[test]
    fn test_exposure_defaults_open_interest() {
        let exposure = contract_exposure(&enriched(dec!(100), None), dec!(102)).unwrap();
        assert_eq!(exposure.open_interest, dec!(1000));
    }

    #[test]
    fn test_exposure_value_and_sign() {
        let exposure = contract_exposure(&enriched(dec!(100), Some(500)), dec!(102)).unwrap();
        assert_close(exposure.gex_raw, dec!(-362899.31), dec!(1));
        assert!(exposure.gex_raw < Decimal::ZERO);
    }

    #[test]
    fn test_exposure_zero_open_interest() {
        let exposure = contract_exposure(&enriched(dec!(100), Some(0)), dec!(102)).unwrap();
        assert!(exposure.gex_raw.is_zero());
    }

    #[test]
    fn test_exposure_overflow_is_an_error() {
        let contract = enriched(dec!(100), Some(500));
        let err = contract_exposure(&contract, Decimal::from(u64::MAX)).unwrap_err();
        assert!(matches!(err, Error::Computation(_)));

        let err = contract_exposure(&enriched(dec!(1), None), Decimal::MAX).unwrap_err();
        assert!(matches!(err, Error::Computation(_)));
    }

    #[test]
    fn test_exposure_rejects_non_positive_spot() {
        assert!(contract_exposure(&enriched(dec!(100), Some(1)), Decimal::ZERO).is_err());
    }
}
