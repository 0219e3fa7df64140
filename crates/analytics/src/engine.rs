use crate::drawdown::analyze_drawdown;
use crate::filter::{DateRange, filter_closed_in_range};
use crate::grouping::{by_hour, by_instrument, by_month, by_strategy, by_weekday};
use crate::metrics::calculate_metrics;
use crate::report::PerformanceReport;
use crate::series::{DayPolicy, build_cumulative_series, build_daily_series, daily_summary};
use crate::streaks::streaks;
use core_types::{SharpeBasis, Trade};

/// A stateless calculator for deriving performance statistics from a journal.
///
/// The only setting it carries is how Sharpe returns are normalized; every
/// call recomputes from the trades it is given.
#[derive(Debug, Default, Clone, Copy)]
pub struct AnalyticsEngine {
    sharpe_basis: SharpeBasis,
}

impl AnalyticsEngine {
    pub fn new(sharpe_basis: SharpeBasis) -> Self {
        Self { sharpe_basis }
    }

    pub fn sharpe_basis(&self) -> SharpeBasis {
        self.sharpe_basis
    }

    /// The main entry point for calculating a dashboard report.
    ///
    /// # Arguments
    ///
    /// * `trades` - The journal snapshot. It is only read.
    /// * `range` - Entry-date window selecting which trades are reported on.
    ///
    /// # Returns
    ///
    /// A `PerformanceReport`. With no closed trades in range, every statistic
    /// is zero and every series is empty.
    #[tracing::instrument(name = "analytics_calculate", skip(self, trades), fields(trades = trades.len()))]
    pub fn calculate(&self, trades: &[Trade], range: &DateRange) -> PerformanceReport {
        let selected = filter_closed_in_range(trades, range);
        if selected.is_empty() {
            tracing::info!("No closed trades in range; returning an empty report.");
            return PerformanceReport::new();
        }

        let daily = build_daily_series(selected.iter().copied());
        let report = PerformanceReport {
            metrics: calculate_metrics(selected.iter().copied(), self.sharpe_basis),
            streaks: streaks(selected.iter().copied()),
            drawdown: analyze_drawdown(selected.iter().copied()),
            equity_curve: build_cumulative_series(&daily, DayPolicy::AllDates),
            trading_days: build_cumulative_series(&daily, DayPolicy::TradingDaysOnly),
            daily_summary: daily_summary(&daily),
            daily,
            by_strategy: by_strategy(selected.iter().copied()),
            by_instrument: by_instrument(selected.iter().copied()),
            by_hour: by_hour(selected.iter().copied()),
            by_weekday: by_weekday(selected.iter().copied()),
            by_month: by_month(selected.iter().copied()),
        };

        tracing::info!(
            closed_trades = report.metrics.total_trades,
            total_pnl = %report.metrics.total_pnl,
            "Performance report calculated"
        );
        report
    }
}
