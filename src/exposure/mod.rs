//! Gamma exposure computation.
//!
//! The core of the crate: turning a raw option chain into a per-strike
//! exposure series and picking the king node.
//!
//! ## Stages
//!
//! ```text
//! [Contract]                      (raw chain from a ChainSource)
//!   └── filter_and_enrich         drop expired, derive days_to_exp and T
//!         └── contract_exposure   gamma heuristic, signed dollar gamma
//!               └── StrikeExposureBook   sum by strike
//!                     └── select_king_node   argmax, lowest strike on ties
//! ```
//!
//! [`GexProfile::compute`] runs the last three stages and keeps the totals
//! the presenter needs.
//!
//! ## Example
//!
//! ```rust
//! use chrono::{NaiveDate, TimeZone, Utc};
//! use gex_profile::exposure::{Contract, GexProfile, filter_and_enrich};
//! use rust_decimal_macros::dec;
//!
//! let now = Utc.with_ymd_and_hms(2025, 3, 3, 0, 0, 0).unwrap();
//! let expiry = NaiveDate::from_ymd_opt(2025, 4, 2).unwrap();
//! let chain = vec![
//!     Contract::new(dec!(100), expiry, Some(500)),
//!     Contract::new(dec!(105), expiry, Some(2000)),
//! ];
//!
//! let live = filter_and_enrich(&chain, now);
//! let profile = GexProfile::compute("SPY", dec!(102), now, &live).unwrap();
//! assert_eq!(profile.king_strike(), dec!(100));
//! ```

mod contract;
mod estimator;
mod profile;
mod strike;

// Re-export all public types
pub use contract::{
    Contract, DAYS_PER_YEAR, EnrichedContract, MIN_TIME_TO_EXPIRY, filter_and_enrich,
};
pub use estimator::{
    CONTRACT_MULTIPLIER, ContractExposure, DEFAULT_OPEN_INTEREST, contract_exposure,
    effective_open_interest, estimate_gamma,
};
pub use profile::{DEFAULT_TOP_STRIKES, GexProfile, GexProfileStats};
pub use strike::{StrikeExposure, StrikeExposureBook, aggregate_by_strike, select_king_node};
