//! GEX profile module.
//!
//! A [`GexProfile`] is the complete result of one computation: the per-strike
//! exposure series for a ticker, the king node, and the totals the presenter
//! shows next to them.

use super::contract::EnrichedContract;
use super::estimator::{ContractExposure, contract_exposure};
use super::strike::{StrikeExposure, StrikeExposureBook, select_king_node};
use crate::error::{Error, Result};
use crate::utils::{checked_sum, format_fixed};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

/// Number of strikes shown in the summary table.
pub const DEFAULT_TOP_STRIKES: usize = 25;

/// Per-strike gamma exposure profile for one ticker.
#[derive(Debug, Clone, Serialize)]
pub struct GexProfile {
    /// The underlying ticker symbol.
    ticker: String,
    /// Spot price the exposures were computed at.
    spot_price: Decimal,
    /// Reference timestamp used to filter expired contracts.
    as_of: DateTime<Utc>,
    /// Aggregated rows, ascending by strike.
    strikes: Vec<StrikeExposure>,
    /// The strike with the largest aggregated exposure.
    king: StrikeExposure,
    /// Net exposure summed over all strikes.
    total_gex: Decimal,
    /// Sum of open interest across contracts (after defaulting).
    total_open_interest: Decimal,
    /// Number of contracts that contributed.
    contract_count: usize,
}

impl GexProfile {
    /// Computes a profile from enriched contracts.
    ///
    /// # Arguments
    ///
    /// * `ticker` - The underlying ticker symbol
    /// * `spot_price` - Spot price of the underlying
    /// * `as_of` - Reference timestamp the contracts were enriched at
    /// * `contracts` - Live contracts for the ticker
    ///
    /// # Errors
    ///
    /// Returns `Error::NoData` if `contracts` is empty, `Error::InvalidInput`
    /// for a non-positive spot or strike, or `Error::Computation` if an
    /// exposure or total overflows.
    pub fn compute(
        ticker: impl Into<String>,
        spot_price: Decimal,
        as_of: DateTime<Utc>,
        contracts: &[EnrichedContract],
    ) -> Result<Self> {
        let ticker = ticker.into();
        if contracts.is_empty() {
            return Err(Error::no_data(ticker));
        }

        let exposures = contracts
            .iter()
            .map(|c| contract_exposure(c, spot_price))
            .collect::<Result<Vec<ContractExposure>>>()?;

        let book = StrikeExposureBook::from_exposures(&exposures)?;
        let strikes = book.rows();
        let king = select_king_node(&strikes)?;
        let total_gex = book.total()?;
        let total_open_interest = checked_sum(exposures.iter().map(|e| e.open_interest))
            .ok_or_else(|| Error::computation("open interest overflow"))?;

        debug!(
            %ticker,
            contracts = exposures.len(),
            strikes = strikes.len(),
            king = %king.strike,
            "computed gex profile"
        );

        Ok(Self {
            ticker,
            spot_price,
            as_of,
            strikes,
            king,
            total_gex,
            total_open_interest,
            contract_count: book.contract_count(),
        })
    }

    /// Returns the underlying ticker symbol.
    #[must_use]
    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    /// Returns the spot price.
    #[must_use]
    pub const fn spot_price(&self) -> Decimal {
        self.spot_price
    }

    /// Returns the reference timestamp.
    #[must_use]
    pub const fn as_of(&self) -> DateTime<Utc> {
        self.as_of
    }

    /// Returns the aggregated rows, ascending by strike.
    #[must_use]
    pub fn strikes(&self) -> &[StrikeExposure] {
        &self.strikes
    }

    /// Returns the king node row.
    #[must_use]
    pub const fn king_node(&self) -> StrikeExposure {
        self.king
    }

    /// Returns the king node strike.
    #[must_use]
    pub const fn king_strike(&self) -> Decimal {
        self.king.strike
    }

    /// Returns `spot - king_strike`.
    #[must_use]
    pub fn distance_from_spot(&self) -> Decimal {
        self.spot_price - self.king.strike
    }

    /// Returns the total open interest.
    #[must_use]
    pub const fn total_open_interest(&self) -> Decimal {
        self.total_open_interest
    }

    /// Returns the number of contributing contracts.
    #[must_use]
    pub const fn contract_count(&self) -> usize {
        self.contract_count
    }

    /// Returns the net exposure summed over all strikes.
    #[must_use]
    pub const fn total_gex(&self) -> Decimal {
        self.total_gex
    }

    /// Returns the `n` strikes with the largest exposure, descending.
    #[must_use]
    pub fn top_strikes(&self, n: usize) -> Vec<StrikeExposure> {
        let mut ranked = self.strikes.clone();
        ranked.sort_by(StrikeExposure::rank_cmp);
        ranked.truncate(n);
        ranked
    }

    /// Returns summary statistics about this profile.
    #[must_use]
    pub fn stats(&self) -> GexProfileStats {
        GexProfileStats {
            ticker: self.ticker.clone(),
            strike_count: self.strikes.len(),
            contract_count: self.contract_count,
            king_strike: self.king.strike,
            total_gex: self.total_gex,
        }
    }
}

/// Statistics about a GEX profile.
#[derive(Debug, Clone)]
pub struct GexProfileStats {
    /// The underlying ticker symbol.
    pub ticker: String,
    /// Number of distinct strikes.
    pub strike_count: usize,
    /// Number of contributing contracts.
    pub contract_count: usize,
    /// The king node strike.
    pub king_strike: Decimal,
    /// Net exposure across strikes.
    pub total_gex: Decimal,
}

impl std::fmt::Display for GexProfileStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {} strikes, {} contracts, king node {}, net gex {}",
            self.ticker,
            self.strike_count,
            self.contract_count,
            format_fixed(self.king_strike, 2),
            format_fixed(self.total_gex, 0)
        )
    }
}
