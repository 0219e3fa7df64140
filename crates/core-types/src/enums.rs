use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle state of a journaled trade.
///
/// Only `Closed` trades carry realized P&L. Any status string the journal
/// does not recognise decodes as `Unknown` rather than failing the import.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeStatus {
    #[default]
    Open,
    Closed,
    #[serde(other)]
    Unknown,
}

/// Selects the notional each trade's return is normalized by when
/// computing the Sharpe ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SharpeBasis {
    /// Each trade's return is `pnl / (entry_price * quantity)` for that trade.
    #[default]
    PerTrade,
    /// Every return is normalized by the first closed trade's notional.
    /// Kept for compatibility with journals that reported Sharpe this way.
    FirstTrade,
}

impl fmt::Display for SharpeBasis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SharpeBasis::PerTrade => write!(f, "per_trade"),
            SharpeBasis::FirstTrade => write!(f, "first_trade"),
        }
    }
}

impl FromStr for SharpeBasis {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "per_trade" => Ok(SharpeBasis::PerTrade),
            "first_trade" => Ok(SharpeBasis::FirstTrade),
            other => Err(CoreError::InvalidInput(
                "sharpe_basis".to_string(),
                other.to_string(),
            )),
        }
    }
}
