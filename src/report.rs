//! Presentation of GEX profiles.
//!
//! [`GexReport`] is the serializable view of a [`GexProfile`] (chart series,
//! summary metrics and the top-strikes table). [`TextReport`] renders the same
//! data for a terminal: a horizontal bar chart in millions with spot and king
//! node markers, three metrics and the table.

use crate::exposure::{DEFAULT_TOP_STRIKES, GexProfile};
use crate::utils::{format_fixed, format_signed, format_thousands, to_millions};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;
use std::fmt;

/// Default width of the chart bars, in characters.
pub const DEFAULT_BAR_WIDTH: usize = 40;

/// One bar of the chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartBar {
    /// The strike price.
    #[serde(with = "rust_decimal::serde::float")]
    pub strike: Decimal,
    /// Net exposure in dollars.
    #[serde(with = "rust_decimal::serde::float")]
    pub gex: Decimal,
    /// Net exposure in millions of dollars.
    #[serde(with = "rust_decimal::serde::float")]
    pub gex_millions: Decimal,
}

/// One row of the top-strikes table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableRow {
    /// 1-based rank by exposure.
    pub rank: usize,
    /// The strike price.
    #[serde(with = "rust_decimal::serde::float")]
    pub strike: Decimal,
    /// Net exposure in millions, rounded to 2 decimals.
    #[serde(with = "rust_decimal::serde::float")]
    pub gex_millions: Decimal,
}

/// Serializable summary of a GEX profile.
#[derive(Debug, Clone, Serialize)]
pub struct GexReport {
    /// The underlying ticker symbol.
    pub ticker: String,
    /// Spot price used.
    #[serde(with = "rust_decimal::serde::float")]
    pub spot_price: Decimal,
    /// Reference timestamp of the chain.
    pub as_of: DateTime<Utc>,
    /// The king node strike.
    #[serde(with = "rust_decimal::serde::float")]
    pub king_strike: Decimal,
    /// `spot - king_strike`.
    #[serde(with = "rust_decimal::serde::float")]
    pub distance_from_spot: Decimal,
    /// Sum of open interest.
    #[serde(with = "rust_decimal::serde::float")]
    pub total_contracts: Decimal,
    /// Net exposure summed over all strikes, in dollars.
    #[serde(with = "rust_decimal::serde::float")]
    pub net_gex: Decimal,
    /// Chart series, ascending by strike.
    pub strikes: Vec<ChartBar>,
    /// Top strikes by exposure, descending.
    pub top_strikes: Vec<TableRow>,
}

impl GexReport {
    /// Builds a report showing the `top` largest strikes in the table.
    #[must_use]
    pub fn new(profile: &GexProfile, top: usize) -> Self {
        let strikes = profile
            .strikes()
            .iter()
            .map(|s| ChartBar {
                strike: s.strike,
                gex: s.gex,
                gex_millions: to_millions(s.gex),
            })
            .collect();

        let top_strikes = profile
            .top_strikes(top)
            .iter()
            .enumerate()
            .map(|(i, s)| TableRow {
                rank: i + 1,
                strike: s.strike,
                gex_millions: to_millions(s.gex).round_dp(2),
            })
            .collect();

        Self {
            ticker: profile.ticker().to_string(),
            spot_price: profile.spot_price(),
            as_of: profile.as_of(),
            king_strike: profile.king_strike(),
            distance_from_spot: profile.distance_from_spot(),
            total_contracts: profile.total_open_interest(),
            net_gex: profile.total_gex(),
            strikes,
            top_strikes,
        }
    }

    /// Returns the chart title.
    ///
    /// The king strike is fixed to 2 decimals; the spot is shown as it was
    /// entered, so `585.0` stays `585.0` and `102` stays `102`.
    #[must_use]
    pub fn title(&self) -> String {
        format!(
            "{} → King Node ${} (Spot ${})",
            self.ticker,
            format_fixed(self.king_strike, 2),
            self.spot_price
        )
    }

    /// Returns the closing headline.
    #[must_use]
    pub fn headline(&self) -> String {
        format!(
            "Dealers want {} at ${}, target acquired!",
            self.ticker,
            format_fixed(self.king_strike, 2)
        )
    }
}

impl From<&GexProfile> for GexReport {
    fn from(profile: &GexProfile) -> Self {
        Self::new(profile, DEFAULT_TOP_STRIKES)
    }
}

/// Terminal rendering of a [`GexReport`].
pub struct TextReport<'a> {
    /// The report to render.
    report: &'a GexReport,
    /// Width of the widest bar.
    bar_width: usize,
}

impl<'a> TextReport<'a> {
    /// Creates a renderer.
    ///
    /// # Arguments
    ///
    /// * `report` - The report to render
    /// * `bar_width` - Characters used by the largest bar on either side
    #[must_use]
    pub fn new(report: &'a GexReport, bar_width: usize) -> Self {
        Self {
            report,
            bar_width: bar_width.max(1),
        }
    }

    fn bar_len(&self, gex: Decimal, max_abs: Decimal) -> usize {
        if max_abs.is_zero() {
            return 0;
        }
        (gex.abs() / max_abs * Decimal::from(self.bar_width))
            .round()
            .to_usize()
            .unwrap_or(0)
    }

    fn write_bar(
        &self,
        f: &mut fmt::Formatter<'_>,
        bar: &ChartBar,
        max_abs: Decimal,
    ) -> fmt::Result {
        let len = self.bar_len(bar.gex, max_abs);
        let (left, right) = if bar.gex.is_sign_negative() {
            ("▒".repeat(len), String::new())
        } else {
            (String::new(), "█".repeat(len))
        };

        write!(
            f,
            "  {:>10} {:>10} {:>width$}│{:<width$}",
            format!("${}", format_fixed(bar.strike, 2)),
            format_fixed(bar.gex_millions, 2),
            left,
            right,
            width = self.bar_width
        )?;
        if bar.strike == self.report.king_strike {
            write!(f, " ◀ KING NODE")?;
        }
        writeln!(f)
    }

    fn write_spot_marker(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "  {:>21} {}┼{} SPOT ${}",
            "",
            "┄".repeat(self.bar_width),
            "┄".repeat(self.bar_width),
            self.report.spot_price
        )
    }
}

impl fmt::Display for TextReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.report;
        writeln!(f, "{}", report.title())?;
        writeln!(f)?;
        writeln!(f, "  {:>10} {:>10}", "Strike", "GEX ($M)")?;

        let max_abs = report
            .strikes
            .iter()
            .map(|b| b.gex.abs())
            .max()
            .unwrap_or(Decimal::ZERO);

        let mut spot_drawn = false;
        for bar in &report.strikes {
            if !spot_drawn && bar.strike >= report.spot_price {
                self.write_spot_marker(f)?;
                spot_drawn = true;
            }
            self.write_bar(f, bar, max_abs)?;
        }
        if !spot_drawn {
            self.write_spot_marker(f)?;
        }

        writeln!(f)?;
        writeln!(
            f,
            "  {:<20} ${}",
            "KING NODE",
            format_fixed(report.king_strike, 2)
        )?;
        writeln!(
            f,
            "  {:<20} {}",
            "Distance from Spot",
            format_signed(report.distance_from_spot, 2)
        )?;
        writeln!(
            f,
            "  {:<20} {}",
            "Total Contracts",
            format_thousands(report.total_contracts)
        )?;
        writeln!(f)?;
        writeln!(f, "{}", report.headline())?;
        writeln!(f)?;

        writeln!(f, "  {:>4}  {:>10}  {:>10}", "#", "Strike", "GEX_M")?;
        for row in &report.top_strikes {
            writeln!(
                f,
                "  {:>4}  {:>10}  {:>10}",
                row.rank,
                format!("${}", format_fixed(row.strike, 2)),
                format!("${}M", format_fixed(row.gex_millions, 1))
            )?;
        }
        Ok(())
    }
}

/// Renders a profile as text with the default table size.
#[must_use]
pub fn render_text(profile: &GexProfile, bar_width: usize) -> String {
    let report = GexReport::from(profile);
    TextReport::new(&report, bar_width).to_string()
}
