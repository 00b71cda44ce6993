//! Strike exposure module.
//!
//! This module provides the aggregated [`StrikeExposure`] row, the
//! [`StrikeExposureBook`] that sums contract exposures by strike, and the
//! king node selection rule.

use super::estimator::ContractExposure;
use crate::error::{Error, Result};
use crate::utils::checked_sum;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Aggregated exposure at one strike price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrikeExposure {
    /// The strike price.
    pub strike: Decimal,
    /// Sum of the exposures of every contract at this strike.
    pub gex: Decimal,
}

impl StrikeExposure {
    /// Creates a new strike exposure row.
    #[must_use]
    pub const fn new(strike: Decimal, gex: Decimal) -> Self {
        Self { strike, gex }
    }

    /// Orders rows by `gex` descending, then by strike ascending.
    ///
    /// The first row under this ordering is the king node.
    #[must_use]
    pub fn rank_cmp(&self, other: &Self) -> Ordering {
        other
            .gex
            .cmp(&self.gex)
            .then_with(|| self.strike.cmp(&other.strike))
    }
}

/// Accumulates contract exposures grouped by exact strike price.
///
/// Strikes compare by decimal value, so `100` and `100.00` share a row.
#[derive(Debug, Clone, Default)]
pub struct StrikeExposureBook {
    /// Exposure sums indexed by strike price.
    strikes: BTreeMap<Decimal, Decimal>,
    /// Number of contracts added.
    contract_count: usize,
}

impl StrikeExposureBook {
    /// Creates an empty book.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a book from contract exposures.
    ///
    /// # Errors
    ///
    /// Returns `Error::Computation` if a strike's sum overflows.
    pub fn from_exposures(exposures: &[ContractExposure]) -> Result<Self> {
        let mut book = Self::new();
        for exposure in exposures {
            book.add(exposure)?;
        }
        Ok(book)
    }

    /// Adds one contract's exposure to its strike.
    ///
    /// # Errors
    ///
    /// Returns `Error::Computation` if the strike's sum overflows. The book
    /// is left unchanged in that case.
    pub fn add(&mut self, exposure: &ContractExposure) -> Result<()> {
        let strike = exposure.strike_price.normalize();
        let current = self.strikes.get(&strike).copied().unwrap_or(Decimal::ZERO);
        let sum = current.checked_add(exposure.gex_raw).ok_or_else(|| {
            Error::computation(format!("exposure overflow at strike {strike}"))
        })?;

        self.strikes.insert(strike, sum);
        self.contract_count += 1;
        Ok(())
    }

    /// Returns the number of distinct strikes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.strikes.len()
    }

    /// Returns true if no exposure was added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.strikes.is_empty()
    }

    /// Returns the number of contracts added.
    #[must_use]
    pub const fn contract_count(&self) -> usize {
        self.contract_count
    }

    /// Returns the aggregated exposure at a strike.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidInput` if the strike has no contracts.
    pub fn get(&self, strike: Decimal) -> Result<Decimal> {
        self.strikes
            .get(&strike.normalize())
            .copied()
            .ok_or_else(|| Error::invalid_input(format!("strike {strike} not found")))
    }

    /// Returns the sum of exposure across all strikes.
    ///
    /// # Errors
    ///
    /// Returns `Error::Computation` if the total overflows.
    pub fn total(&self) -> Result<Decimal> {
        checked_sum(self.strikes.values().copied())
            .ok_or_else(|| Error::computation("net exposure overflow"))
    }

    /// Returns one row per strike, ascending by strike.
    #[must_use]
    pub fn rows(&self) -> Vec<StrikeExposure> {
        self.strikes
            .iter()
            .map(|(&strike, &gex)| StrikeExposure::new(strike, gex))
            .collect()
    }
}

/// Sums contract exposures by strike, returning rows ascending by strike.
///
/// # Errors
///
/// Returns `Error::Computation` if a strike's sum overflows.
pub fn aggregate_by_strike(exposures: &[ContractExposure]) -> Result<Vec<StrikeExposure>> {
    Ok(StrikeExposureBook::from_exposures(exposures)?.rows())
}

/// Selects the king node: the strike with the largest aggregated exposure.
///
/// Ties on `gex` resolve to the lowest strike.
///
/// # Errors
///
/// Returns `Error::NoData` if `rows` is empty.
pub fn select_king_node(rows: &[StrikeExposure]) -> Result<StrikeExposure> {
    rows.iter()
        .copied()
        .min_by(StrikeExposure::rank_cmp)
        .ok_or_else(|| Error::no_data("no strikes to select from"))
}
