//! Supported underlying tickers.

use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Underlyings the tool offers GEX profiles for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Ticker {
    /// SPDR S&P 500 ETF.
    #[default]
    Spy,
    /// Invesco QQQ.
    Qqq,
    /// iShares Russell 2000 ETF.
    Iwm,
    /// Apple.
    Aapl,
    /// Tesla.
    Tsla,
    /// NVIDIA.
    Nvda,
    /// Advanced Micro Devices.
    Amd,
    /// Meta Platforms.
    Meta,
    /// Alphabet class A.
    Googl,
    /// Microsoft.
    Msft,
    /// Amazon.
    Amzn,
    /// VanEck Semiconductor ETF.
    Smh,
    /// Robinhood.
    Hood,
    /// Coinbase.
    Coin,
}

impl Ticker {
    /// All supported tickers, in display order.
    pub const ALL: [Self; 14] = [
        Self::Spy,
        Self::Qqq,
        Self::Iwm,
        Self::Aapl,
        Self::Tsla,
        Self::Nvda,
        Self::Amd,
        Self::Meta,
        Self::Googl,
        Self::Msft,
        Self::Amzn,
        Self::Smh,
        Self::Hood,
        Self::Coin,
    ];

    /// Returns the exchange symbol.
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::Spy => "SPY",
            Self::Qqq => "QQQ",
            Self::Iwm => "IWM",
            Self::Aapl => "AAPL",
            Self::Tsla => "TSLA",
            Self::Nvda => "NVDA",
            Self::Amd => "AMD",
            Self::Meta => "META",
            Self::Googl => "GOOGL",
            Self::Msft => "MSFT",
            Self::Amzn => "AMZN",
            Self::Smh => "SMH",
            Self::Hood => "HOOD",
            Self::Coin => "COIN",
        }
    }
}

impl std::fmt::Display for Ticker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Ticker {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|t| t.symbol().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| Error::UnknownTicker(s.to_string()))
    }
}
