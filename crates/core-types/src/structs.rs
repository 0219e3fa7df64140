use crate::enums::TradeStatus;
use crate::lenient;
use chrono::{DateTime, NaiveDate, NaiveTime, Timelike, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Label used when a trade was logged without a strategy.
pub const NO_STRATEGY_LABEL: &str = "No Strategy";
/// Label used when a trade was logged without an instrument.
pub const UNKNOWN_INSTRUMENT_LABEL: &str = "Unknown";

/// A single journaled trade, as exported by the journal's data layer.
///
/// The analytics crate only ever reads these. Every field except `id` and
/// `status` is optional because journals carry partially filled records
/// (open positions, imported history, hand edits).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trade {
    #[serde(default, deserialize_with = "lenient::identifier")]
    pub id: String,
    #[serde(default)]
    pub status: TradeStatus,
    #[serde(default, deserialize_with = "lenient::date")]
    pub entry_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient::date")]
    pub exit_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient::timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    /// Wall-clock entry time, `HH:MM` or `HH:MM:SS`.
    #[serde(default, deserialize_with = "lenient::text")]
    pub entry_time: Option<String>,
    /// Realized profit or loss. Only meaningful once the trade is closed.
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub pnl: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub instrument: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub strategy: Option<String>,
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub entry_price: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub quantity: Option<Decimal>,
}

impl Trade {
    /// Creates a closed trade with the given P&L and nothing else set.
    pub fn closed(id: impl Into<String>, pnl: Decimal) -> Self {
        Self {
            id: id.into(),
            status: TradeStatus::Closed,
            pnl: Some(pnl),
            ..Self::default()
        }
    }

    pub fn is_closed(&self) -> bool {
        self.status == TradeStatus::Closed
    }

    /// Realized P&L, treating an absent value as zero.
    pub fn pnl_or_zero(&self) -> Decimal {
        self.pnl.unwrap_or(Decimal::ZERO)
    }

    pub fn is_win(&self) -> bool {
        self.pnl_or_zero() > Decimal::ZERO
    }

    pub fn is_loss(&self) -> bool {
        self.pnl_or_zero() < Decimal::ZERO
    }

    pub fn strategy_label(&self) -> &str {
        label_or(self.strategy.as_deref(), NO_STRATEGY_LABEL)
    }

    pub fn instrument_label(&self) -> &str {
        label_or(self.instrument.as_deref(), UNKNOWN_INSTRUMENT_LABEL)
    }

    /// Hour component (0-23) of `entry_time`, if it parses.
    pub fn entry_hour(&self) -> Option<u32> {
        let raw = self.entry_time.as_deref()?.trim();
        NaiveTime::parse_from_str(raw, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
            .map(|t| t.hour())
            .ok()
    }

    /// Position size in currency terms: `entry_price * quantity`. `None` when
    /// either is missing or the product is out of range.
    pub fn notional(&self) -> Option<Decimal> {
        self.entry_price?.checked_mul(self.quantity?)
    }

    /// The date a closed trade's P&L is booked on: the exit date, or the
    /// creation date when no exit date was recorded.
    pub fn settled_date(&self) -> Option<NaiveDate> {
        self.exit_date
            .or_else(|| self.created_at.map(|at| at.date_naive()))
    }
}

fn label_or<'a>(value: Option<&'a str>, fallback: &'a str) -> &'a str {
    match value {
        Some(v) if !v.trim().is_empty() => v,
        _ => fallback,
    }
}
