//! Trade selection shared by every calculator in this crate.
//!
//! Filters borrow from the caller's slice and preserve the input order, so
//! the input collection is never reordered or mutated.

use crate::error::AnalyticsError;
use chrono::{Datelike, Duration, NaiveDate};
use core_types::Trade;

/// An inclusive window over trade entry dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateRange {
    /// No filtering at all. Undated trades are kept.
    #[default]
    All,
    /// `start..=end`; a `None` bound is open-ended. Trades without an entry
    /// date never fall inside a bounded range.
    Between {
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    },
}

impl DateRange {
    pub fn between(start: NaiveDate, end: NaiveDate) -> Self {
        DateRange::Between { start: Some(start), end: Some(end) }
    }

    /// The `days` calendar days before `today`, plus `today` itself.
    pub fn last_days(days: u32, today: NaiveDate) -> Self {
        DateRange::Between {
            start: today.checked_sub_signed(Duration::days(i64::from(days))),
            end: Some(today),
        }
    }

    pub fn year_to_date(today: NaiveDate) -> Self {
        DateRange::Between {
            start: NaiveDate::from_ymd_opt(today.year(), 1, 1),
            end: Some(today),
        }
    }

    /// Parses `all`, `<n>d` (e.g. `30d`), `ytd`, or `YYYY-MM-DD..YYYY-MM-DD`
    /// where either side of `..` may be left empty.
    pub fn parse(input: &str, today: NaiveDate) -> Result<Self, AnalyticsError> {
        let s = input.trim().to_ascii_lowercase();
        let invalid = || AnalyticsError::InvalidRange(input.to_string());

        match s.as_str() {
            "all" | "" => return Ok(DateRange::All),
            "ytd" => return Ok(DateRange::year_to_date(today)),
            _ => {}
        }

        if let Some((from, to)) = s.split_once("..") {
            let bound = |part: &str| -> Result<Option<NaiveDate>, AnalyticsError> {
                let part = part.trim();
                if part.is_empty() {
                    return Ok(None);
                }
                NaiveDate::parse_from_str(part, "%Y-%m-%d")
                    .map(Some)
                    .map_err(|_| invalid())
            };
            let (start, end) = (bound(from)?, bound(to)?);
            if let (Some(s), Some(e)) = (start, end) {
                if s > e {
                    return Err(invalid());
                }
            }
            return Ok(DateRange::Between { start, end });
        }

        let days = s
            .strip_suffix('d')
            .and_then(|n| n.parse::<u32>().ok())
            .ok_or_else(invalid)?;
        Ok(DateRange::last_days(days, today))
    }

    pub fn contains(&self, date: Option<NaiveDate>) -> bool {
        match self {
            DateRange::All => true,
            DateRange::Between { start, end } => match date {
                Some(d) => start.is_none_or(|s| d >= s) && end.is_none_or(|e| d <= e),
                None => false,
            },
        }
    }
}

/// Closed trades, in input order.
pub fn filter_closed<'a, I>(trades: I) -> Vec<&'a Trade>
where
    I: IntoIterator<Item = &'a Trade>,
{
    trades.into_iter().filter(|t| t.is_closed()).collect()
}

/// Trades whose entry date falls inside `range`, in input order.
pub fn filter_by_date_range<'a, I>(trades: I, range: &DateRange) -> Vec<&'a Trade>
where
    I: IntoIterator<Item = &'a Trade>,
{
    trades
        .into_iter()
        .filter(|t| range.contains(t.entry_date))
        .collect()
}

pub fn filter_closed_in_range<'a, I>(trades: I, range: &DateRange) -> Vec<&'a Trade>
where
    I: IntoIterator<Item = &'a Trade>,
{
    trades
        .into_iter()
        .filter(|t| t.is_closed() && range.contains(t.entry_date))
        .collect()
}
