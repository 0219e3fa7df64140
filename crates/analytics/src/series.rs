use crate::filter::filter_closed;
use crate::math::{accumulate, mean, round2};
use chrono::NaiveDate;
use core_types::Trade;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Net P&L booked on one calendar date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyPnl {
    pub date: NaiveDate,
    pub daily_pnl: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CumulativePoint {
    pub date: NaiveDate,
    pub daily_pnl: Decimal,
    pub cumulative_pnl: Decimal,
}

/// Which dates a cumulative series carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayPolicy {
    /// Every date with closed trades, including days that netted to zero.
    /// Used for the cumulative-balance curve.
    #[default]
    AllDates,
    /// Only dates whose net P&L is non-zero. Used for candle-style charts.
    TradingDaysOnly,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DailySummary {
    pub trading_days: usize,
    pub profitable_days: usize,
    pub losing_days: usize,
    pub best_day: Option<DailyPnl>,
    pub worst_day: Option<DailyPnl>,
    pub avg_daily_pnl: Decimal,
}

/// Sums closed-trade P&L per settlement date (exit date, falling back to the
/// creation date), ascending by date. Trades with neither are left out.
pub fn build_daily_series<'a, I>(trades: I) -> Vec<DailyPnl>
where
    I: IntoIterator<Item = &'a Trade>,
{
    let mut days: BTreeMap<NaiveDate, Decimal> = BTreeMap::new();
    for trade in filter_closed(trades) {
        if let Some(date) = trade.settled_date() {
            accumulate(days.entry(date).or_default(), trade.pnl_or_zero(), "daily_pnl");
        }
    }
    days.into_iter()
        .map(|(date, daily_pnl)| DailyPnl { date, daily_pnl })
        .collect()
}

/// Running sum over a daily series under the given [`DayPolicy`].
pub fn build_cumulative_series(daily: &[DailyPnl], policy: DayPolicy) -> Vec<CumulativePoint> {
    let mut cumulative_pnl = Decimal::ZERO;
    daily
        .iter()
        .filter(|day| policy == DayPolicy::AllDates || !day.daily_pnl.is_zero())
        .map(|day| {
            accumulate(&mut cumulative_pnl, day.daily_pnl, "cumulative_pnl");
            CumulativePoint {
                date: day.date,
                daily_pnl: day.daily_pnl,
                cumulative_pnl,
            }
        })
        .collect()
}

/// Best and worst days, day counts and the mean daily result.
///
/// Ties for best or worst day resolve to the earliest date.
pub fn daily_summary(daily: &[DailyPnl]) -> DailySummary {
    let mut summary = DailySummary {
        trading_days: daily.len(),
        ..DailySummary::default()
    };
    let mut total = Decimal::ZERO;

    for day in daily {
        accumulate(&mut total, day.daily_pnl, "daily_total");
        if day.daily_pnl > Decimal::ZERO {
            summary.profitable_days += 1;
        } else if day.daily_pnl < Decimal::ZERO {
            summary.losing_days += 1;
        }
        if summary.best_day.as_ref().is_none_or(|best| day.daily_pnl > best.daily_pnl) {
            summary.best_day = Some(day.clone());
        }
        if summary.worst_day.as_ref().is_none_or(|worst| day.daily_pnl < worst.daily_pnl) {
            summary.worst_day = Some(day.clone());
        }
    }

    summary.avg_daily_pnl = round2(mean(total, daily.len()));
    summary
}
