//! Bucketed performance: per strategy, instrument, hour, weekday and month.
//!
//! Every breakdown is a single pass over the closed trades into a tally per
//! bucket, followed by one pass deriving the ratios.

use crate::error::AnalyticsError;
use crate::filter::filter_closed;
use crate::math::{accumulate, mean, percent, round2, weighted_ratio};
use chrono::{Datelike, NaiveDate, Weekday};
use core_types::Trade;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Profit factor reported for a bucket with wins and no losses.
pub const UNDEFEATED_PROFIT_FACTOR: Decimal = Decimal::from_parts(999, 0, 0, false, 0);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupStats {
    pub total_trades: usize,
    pub wins: usize,
    pub losses: usize,
    pub total_pnl: Decimal,
    pub win_rate: Decimal,
    pub avg_win: Decimal,
    pub avg_loss: Decimal,
    /// [`UNDEFEATED_PROFIT_FACTOR`] for wins without losses, zero when there
    /// is nothing to compare.
    pub profit_factor: Decimal,
}

/// One row of a breakdown: the bucket key, its rendered label and its stats.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupBreakdown<K> {
    pub key: K,
    pub label: String,
    pub stats: GroupStats,
}

#[derive(Debug, Clone, Default)]
struct Tally {
    trades: usize,
    wins: usize,
    losses: usize,
    total_pnl: Decimal,
    gross_profit: Decimal,
    gross_loss: Decimal,
}

impl Tally {
    fn record(&mut self, trade: &Trade) {
        let pnl = trade.pnl_or_zero();
        self.trades += 1;
        accumulate(&mut self.total_pnl, pnl, "total_pnl");
        if pnl > Decimal::ZERO {
            self.wins += 1;
            accumulate(&mut self.gross_profit, pnl, "gross_profit");
        } else if pnl < Decimal::ZERO {
            self.losses += 1;
            accumulate(&mut self.gross_loss, pnl.abs(), "gross_loss");
        }
    }

    fn finish(&self) -> GroupStats {
        let avg_win = mean(self.gross_profit, self.wins);
        let avg_loss = mean(self.gross_loss, self.losses);
        let profit_factor = if self.losses == 0 {
            if self.wins > 0 { UNDEFEATED_PROFIT_FACTOR } else { Decimal::ZERO }
        } else {
            weighted_ratio(avg_win, self.wins, avg_loss, self.losses, "profit_factor")
        };

        GroupStats {
            total_trades: self.trades,
            wins: self.wins,
            losses: self.losses,
            total_pnl: round2(self.total_pnl),
            win_rate: round2(percent(self.wins, self.trades)),
            avg_win: round2(avg_win),
            avg_loss: round2(avg_loss),
            profit_factor: round2(profit_factor),
        }
    }
}

/// Hour of the day a trade was entered, 0-23.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct HourOfDay(pub u32);

impl fmt::Display for HourOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:00", self.0)
    }
}

/// Weekday of the entry date, ordered Monday first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DayOfWeek(u32);

impl DayOfWeek {
    pub fn weekday(&self) -> Weekday {
        match self.0 {
            0 => Weekday::Mon,
            1 => Weekday::Tue,
            2 => Weekday::Wed,
            3 => Weekday::Thu,
            4 => Weekday::Fri,
            5 => Weekday::Sat,
            _ => Weekday::Sun,
        }
    }
}

impl From<Weekday> for DayOfWeek {
    fn from(day: Weekday) -> Self {
        DayOfWeek(day.num_days_from_monday())
    }
}

impl fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self.weekday() {
            Weekday::Mon => "Monday",
            Weekday::Tue => "Tuesday",
            Weekday::Wed => "Wednesday",
            Weekday::Thu => "Thursday",
            Weekday::Fri => "Friday",
            Weekday::Sat => "Saturday",
            Weekday::Sun => "Sunday",
        };
        f.write_str(name)
    }
}

/// Calendar month of the entry date, ordered chronologically, shown as `Jan 2024`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MonthKey {
    pub year: i32,
    pub month: u32,
}

impl From<NaiveDate> for MonthKey {
    fn from(date: NaiveDate) -> Self {
        MonthKey { year: date.year(), month: date.month() }
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match NaiveDate::from_ymd_opt(self.year, self.month, 1) {
            Some(first) => write!(f, "{}", first.format("%b %Y")),
            None => write!(f, "{:02}/{}", self.month, self.year),
        }
    }
}

/// Groups closed trades by `key_fn`. Trades for which it returns `None` are skipped.
pub fn group_by<'a, I, K, F>(trades: I, mut key_fn: F) -> BTreeMap<K, GroupStats>
where
    I: IntoIterator<Item = &'a Trade>,
    K: Ord,
    F: FnMut(&Trade) -> Option<K>,
{
    let mut tallies: BTreeMap<K, Tally> = BTreeMap::new();
    for trade in filter_closed(trades) {
        if let Some(key) = key_fn(trade) {
            tallies.entry(key).or_default().record(trade);
        }
    }
    tallies
        .into_iter()
        .map(|(key, tally)| (key, tally.finish()))
        .collect()
}

/// Like [`group_by`], as rows sorted by total P&L descending. Buckets with
/// equal P&L stay in key order.
pub fn breakdown<'a, I, K, F>(trades: I, key_fn: F) -> Vec<GroupBreakdown<K>>
where
    I: IntoIterator<Item = &'a Trade>,
    K: Ord + fmt::Display,
    F: FnMut(&Trade) -> Option<K>,
{
    let mut rows: Vec<GroupBreakdown<K>> = group_by(trades, key_fn)
        .into_iter()
        .map(|(key, stats)| GroupBreakdown { label: key.to_string(), key, stats })
        .collect();
    sort_by_pnl(&mut rows);
    rows
}

fn sort_by_pnl<K>(rows: &mut [GroupBreakdown<K>]) {
    rows.sort_by(|a, b| b.stats.total_pnl.cmp(&a.stats.total_pnl));
}

/// Re-sorts rows alphabetically by label, for stable display.
pub fn sort_by_label<K>(rows: &mut [GroupBreakdown<K>]) {
    rows.sort_by(|a, b| a.label.cmp(&b.label));
}

pub fn by_strategy<'a, I>(trades: I) -> Vec<GroupBreakdown<String>>
where
    I: IntoIterator<Item = &'a Trade>,
{
    breakdown(trades, |t| Some(t.strategy_label().to_string()))
}

pub fn by_instrument<'a, I>(trades: I) -> Vec<GroupBreakdown<String>>
where
    I: IntoIterator<Item = &'a Trade>,
{
    breakdown(trades, |t| Some(t.instrument_label().to_string()))
}

/// Breakdown by entry hour. All 24 hours are tallied; hours without trades
/// are dropped from the output.
pub fn by_hour<'a, I>(trades: I) -> Vec<GroupBreakdown<HourOfDay>>
where
    I: IntoIterator<Item = &'a Trade>,
{
    let mut hours: [Tally; 24] = std::array::from_fn(|_| Tally::default());
    for trade in filter_closed(trades) {
        let Some(hour) = trade.entry_hour() else {
            continue;
        };
        if let Some(tally) = hours.get_mut(hour as usize) {
            tally.record(trade);
        }
    }

    let mut rows: Vec<GroupBreakdown<HourOfDay>> = hours
        .iter()
        .zip(0u32..)
        .filter(|(tally, _)| tally.trades > 0)
        .map(|(tally, hour)| {
            let key = HourOfDay(hour);
            GroupBreakdown { label: key.to_string(), key, stats: tally.finish() }
        })
        .collect();
    sort_by_pnl(&mut rows);
    rows
}

/// The `n` most profitable entry hours.
pub fn top_hours<'a, I>(trades: I, n: usize) -> Vec<GroupBreakdown<HourOfDay>>
where
    I: IntoIterator<Item = &'a Trade>,
{
    let mut rows = by_hour(trades);
    rows.truncate(n);
    rows
}

pub fn by_weekday<'a, I>(trades: I) -> Vec<GroupBreakdown<DayOfWeek>>
where
    I: IntoIterator<Item = &'a Trade>,
{
    breakdown(trades, |t| t.entry_date.map(|d| DayOfWeek::from(d.weekday())))
}

pub fn by_month<'a, I>(trades: I) -> Vec<GroupBreakdown<MonthKey>>
where
    I: IntoIterator<Item = &'a Trade>,
{
    breakdown(trades, |t| t.entry_date.map(MonthKey::from))
}

/// Selects one of the standard breakdowns by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Grouping {
    Strategy,
    Instrument,
    Hour,
    Weekday,
    Month,
}

impl FromStr for Grouping {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strategy" => Ok(Grouping::Strategy),
            "instrument" | "symbol" => Ok(Grouping::Instrument),
            "hour" => Ok(Grouping::Hour),
            "weekday" | "day" => Ok(Grouping::Weekday),
            "month" => Ok(Grouping::Month),
            _ => Err(AnalyticsError::UnknownGrouping(s.to_string())),
        }
    }
}

impl fmt::Display for Grouping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Grouping::Strategy => "strategy",
            Grouping::Instrument => "instrument",
            Grouping::Hour => "hour",
            Grouping::Weekday => "weekday",
            Grouping::Month => "month",
        };
        f.write_str(name)
    }
}

/// Runs the selected breakdown, keyed by rendered label.
pub fn breakdown_by<'a, I>(trades: I, grouping: Grouping) -> Vec<GroupBreakdown<String>>
where
    I: IntoIterator<Item = &'a Trade>,
{
    match grouping {
        Grouping::Strategy => by_strategy(trades),
        Grouping::Instrument => by_instrument(trades),
        Grouping::Hour => relabel(by_hour(trades)),
        Grouping::Weekday => relabel(by_weekday(trades)),
        Grouping::Month => relabel(by_month(trades)),
    }
}

fn relabel<K>(rows: Vec<GroupBreakdown<K>>) -> Vec<GroupBreakdown<String>> {
    rows.into_iter()
        .map(|row| GroupBreakdown { key: row.label.clone(), label: row.label, stats: row.stats })
        .collect()
}
