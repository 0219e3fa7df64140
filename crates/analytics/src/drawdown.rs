use crate::math::{accumulate, percent, percent_of, round2};
use chrono::NaiveDate;
use core_types::Trade;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One step of the running-balance curve, emitted per closed trade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawdownPoint {
    pub date: NaiveDate,
    pub running_total: Decimal,
    pub peak: Decimal,
    pub drawdown: Decimal,
    /// `drawdown / peak * 100`, zero while the peak is not positive.
    pub drawdown_percent: Decimal,
    /// 1-based position of the trade in chronological order.
    pub trade_index: usize,
    pub trade_pnl: Decimal,
    pub instrument: String,
}

/// The drawdown curve together with the statistics derived from it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DrawdownAnalysis {
    pub series: Vec<DrawdownPoint>,
    pub max_drawdown: Decimal,
    pub max_drawdown_pct: Decimal,
    /// Date of the first point that reached `max_drawdown`.
    pub max_drawdown_date: Option<NaiveDate>,
    /// Longest drawdown period, in trades. Includes an unrecovered period.
    pub longest_drawdown: usize,
    /// Mean period length in trades, rounded to the nearest trade.
    pub avg_drawdown_length: usize,
    pub drawdown_periods: usize,
    /// Number of times the balance climbed back to its peak.
    pub recovery_trades: usize,
    /// Share of points spent below the peak, in percent.
    pub time_in_drawdown: Decimal,
}

/// Drawdown-period statistics over an already built series.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrawdownPeriods {
    pub longest: usize,
    pub periods: usize,
    pub points_in_drawdown: usize,
    pub recoveries: usize,
}

impl DrawdownPeriods {
    pub fn avg_length(&self) -> usize {
        if self.periods == 0 {
            return 0;
        }
        (2 * self.points_in_drawdown + self.periods) / (2 * self.periods)
    }
}

/// Builds the drawdown curve from closed trades and derives its statistics.
///
/// Trades are ordered by entry date; trades sharing a date keep their input
/// order. Closed trades without an entry date cannot be placed on the curve
/// and are left out.
pub fn analyze_drawdown<'a, I>(trades: I) -> DrawdownAnalysis
where
    I: IntoIterator<Item = &'a Trade>,
{
    let series = drawdown_series(trades);
    if series.is_empty() {
        return DrawdownAnalysis::default();
    }

    let mut max_drawdown = Decimal::ZERO;
    let mut max_drawdown_pct = Decimal::ZERO;
    let mut max_drawdown_date = None;
    for point in &series {
        if point.drawdown > max_drawdown {
            max_drawdown = point.drawdown;
            max_drawdown_date = Some(point.date);
        }
        max_drawdown_pct = max_drawdown_pct.max(point.drawdown_percent);
    }

    let periods = drawdown_periods(&series);
    tracing::debug!(
        points = series.len(),
        %max_drawdown,
        periods = periods.periods,
        "Drawdown curve built"
    );

    DrawdownAnalysis {
        max_drawdown: round2(max_drawdown),
        max_drawdown_pct,
        max_drawdown_date,
        longest_drawdown: periods.longest,
        avg_drawdown_length: periods.avg_length(),
        drawdown_periods: periods.periods,
        recovery_trades: periods.recoveries,
        time_in_drawdown: round2(percent(periods.points_in_drawdown, series.len())),
        series,
    }
}

/// The running balance, peak and drawdown after each dated closed trade.
pub fn drawdown_series<'a, I>(trades: I) -> Vec<DrawdownPoint>
where
    I: IntoIterator<Item = &'a Trade>,
{
    let mut dated: Vec<(NaiveDate, &Trade)> = trades
        .into_iter()
        .filter(|t| t.is_closed())
        .filter_map(|t| t.entry_date.map(|d| (d, t)))
        .collect();
    dated.sort_by_key(|(date, _)| *date);

    let mut running_total = Decimal::ZERO;
    let mut peak = Decimal::ZERO;

    dated
        .into_iter()
        .enumerate()
        .map(|(i, (date, trade))| {
            let trade_pnl = trade.pnl_or_zero();
            accumulate(&mut running_total, trade_pnl, "running_total");
            peak = peak.max(running_total);
            let drawdown = peak.checked_sub(running_total).unwrap_or_else(|| {
                tracing::warn!(%peak, %running_total, "Decimal overflow; drawdown reported as zero");
                Decimal::ZERO
            });
            let drawdown_percent = if peak > Decimal::ZERO {
                round2(percent_of(drawdown, peak, "drawdown_percent"))
            } else {
                Decimal::ZERO
            };

            DrawdownPoint {
                date,
                running_total,
                peak,
                drawdown,
                drawdown_percent,
                trade_index: i + 1,
                trade_pnl,
                instrument: trade.instrument_label().to_string(),
            }
        })
        .collect()
}

/// A period opens on the first point below the peak and closes when the
/// balance returns to it.
pub fn drawdown_periods(series: &[DrawdownPoint]) -> DrawdownPeriods {
    let mut stats = DrawdownPeriods::default();
    let mut current = 0usize;

    for point in series {
        if point.drawdown > Decimal::ZERO {
            if current == 0 {
                stats.periods += 1;
            }
            current += 1;
            stats.points_in_drawdown += 1;
            stats.longest = stats.longest.max(current);
        } else {
            if current > 0 {
                stats.recoveries += 1;
            }
            current = 0;
        }
    }

    stats
}
