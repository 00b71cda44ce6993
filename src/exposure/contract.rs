//! Contract module.
//!
//! This module provides the raw [`Contract`] record, its [`EnrichedContract`]
//! form, and [`filter_and_enrich`], which drops expired contracts and derives
//! the time-to-expiration used by the estimator.

use crate::utils::expiration_instant;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal_macros::dec;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::debug;

/// Days per year used to normalize time-to-expiration.
pub const DAYS_PER_YEAR: Decimal = dec!(365);

/// Lower bound for the normalized time-to-expiration `T`.
pub const MIN_TIME_TO_EXPIRY: Decimal = dec!(0.002);

/// A single options contract as listed by the market data source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contract {
    /// The strike price.
    pub strike_price: Decimal,
    /// The expiration date.
    pub expiration_date: NaiveDate,
    /// Open interest, when the source reports a usable one.
    #[serde(default, deserialize_with = "deserialize_open_interest")]
    pub open_interest: Option<u64>,
}

impl Contract {
    /// Creates a new contract.
    ///
    /// # Arguments
    ///
    /// * `strike_price` - The strike price
    /// * `expiration_date` - The expiration date
    /// * `open_interest` - Open interest, `None` when unknown
    #[must_use]
    pub const fn new(
        strike_price: Decimal,
        expiration_date: NaiveDate,
        open_interest: Option<u64>,
    ) -> Self {
        Self {
            strike_price,
            expiration_date,
            open_interest,
        }
    }

    /// Returns true if the contract expires strictly after `now`.
    #[must_use]
    pub fn is_live_at(&self, now: DateTime<Utc>) -> bool {
        expiration_instant(self.expiration_date) > now
    }
}

/// Reads open interest from an integer, a float or a numeric string.
///
/// Floats are rounded to whole contracts. Negative, non-numeric and null
/// values decode as `None`, so the contract is kept and the default open
/// interest applies.
fn deserialize_open_interest<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let open_interest = value.as_ref().and_then(open_interest_from_value);
    if open_interest.is_none() && value.as_ref().is_some_and(|v| !v.is_null()) {
        debug!(?value, "unusable open interest, using default");
    }
    Ok(open_interest)
}

fn open_interest_from_value(value: &Value) -> Option<u64> {
    let decimal = match value {
        Value::Number(n) => {
            if let Some(whole) = n.as_u64() {
                return Some(whole);
            }
            n.as_f64().and_then(Decimal::from_f64)?
        }
        Value::String(s) => s.trim().parse::<Decimal>().ok()?,
        _ => return None,
    };
    decimal.round().to_u64()
}

/// A live contract with its derived time-to-expiration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichedContract {
    /// The source contract.
    contract: Contract,
    /// Whole days until expiration.
    days_to_exp: i64,
    /// Fraction of a year until expiration, floored at [`MIN_TIME_TO_EXPIRY`].
    time_to_expiry: Decimal,
}

impl EnrichedContract {
    /// Enriches a contract relative to the reference timestamp `now`.
    ///
    /// Returns `None` if the contract is already expired at `now`.
    #[must_use]
    pub fn from_contract(contract: Contract, now: DateTime<Utc>) -> Option<Self> {
        let expires_at = expiration_instant(contract.expiration_date);
        if expires_at <= now {
            return None;
        }

        let days_to_exp = (expires_at - now).num_days();
        let time_to_expiry = (Decimal::from(days_to_exp) / DAYS_PER_YEAR).max(MIN_TIME_TO_EXPIRY);

        Some(Self {
            contract,
            days_to_exp,
            time_to_expiry,
        })
    }

    /// Returns the source contract.
    #[must_use]
    pub const fn contract(&self) -> &Contract {
        &self.contract
    }

    /// Returns the strike price.
    #[must_use]
    pub const fn strike_price(&self) -> Decimal {
        self.contract.strike_price
    }

    /// Returns the expiration date.
    #[must_use]
    pub const fn expiration_date(&self) -> NaiveDate {
        self.contract.expiration_date
    }

    /// Returns the reported open interest, if any.
    #[must_use]
    pub const fn open_interest(&self) -> Option<u64> {
        self.contract.open_interest
    }

    /// Returns the whole days until expiration.
    #[must_use]
    pub const fn days_to_exp(&self) -> i64 {
        self.days_to_exp
    }

    /// Returns the normalized time-to-expiration `T`.
    #[must_use]
    pub const fn time_to_expiry(&self) -> Decimal {
        self.time_to_expiry
    }
}

/// Keeps contracts expiring strictly after `now` and derives `days_to_exp` and `T`.
///
/// An empty input yields an empty output; callers treat that as "no data".
#[must_use]
pub fn filter_and_enrich(contracts: &[Contract], now: DateTime<Utc>) -> Vec<EnrichedContract> {
    let enriched: Vec<EnrichedContract> = contracts
        .iter()
        .filter_map(|c| EnrichedContract::from_contract(c.clone(), now))
        .collect();

    debug!(
        total = contracts.len(),
        live = enriched.len(),
        dropped = contracts.len() - enriched.len(),
        "filtered option chain"
    );

    enriched
}
