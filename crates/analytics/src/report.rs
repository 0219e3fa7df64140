use crate::drawdown::DrawdownAnalysis;
use crate::grouping::{DayOfWeek, GroupBreakdown, HourOfDay, MonthKey};
use crate::metrics::TradeMetrics;
use crate::series::{CumulativePoint, DailyPnl, DailySummary};
use crate::streaks::StreakStats;
use serde::{Deserialize, Serialize};

/// Everything the journal's dashboards show for one selection of trades.
///
/// This struct is the final output of the `AnalyticsEngine` and the data
/// transfer object handed to whatever renders it. It owns all of its data
/// and holds no reference to the trades it was built from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PerformanceReport {
    // I. Aggregate statistics
    pub metrics: TradeMetrics,
    pub streaks: StreakStats,

    // II. Risk and drawdown
    pub drawdown: DrawdownAnalysis,

    // III. Time series
    pub daily: Vec<DailyPnl>,
    /// Cumulative balance over every settlement date.
    pub equity_curve: Vec<CumulativePoint>,
    /// Cumulative balance over days with a non-zero result.
    pub trading_days: Vec<CumulativePoint>,
    pub daily_summary: DailySummary,

    // IV. Breakdowns, each sorted by total P&L descending
    pub by_strategy: Vec<GroupBreakdown<String>>,
    pub by_instrument: Vec<GroupBreakdown<String>>,
    pub by_hour: Vec<GroupBreakdown<HourOfDay>>,
    pub by_weekday: Vec<GroupBreakdown<DayOfWeek>>,
    pub by_month: Vec<GroupBreakdown<MonthKey>>,
}

impl PerformanceReport {
    /// Creates a new, zeroed-out PerformanceReport.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.metrics.total_trades == 0
    }
}
