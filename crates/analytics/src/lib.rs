//! # Tradelog Analytics Engine
//!
//! This crate turns a trading journal (a list of `Trade` records) into the
//! statistics its dashboards display: win rate, profit factor, expectancy,
//! Sharpe ratio, drawdown curves, daily and cumulative P&L, and breakdowns by
//! strategy, instrument, hour, weekday and month.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It has no knowledge of where
//!   trades are stored or how results are drawn. It depends only on `core-types`.
//! - **Never fails on data:** Empty journals, missing fields and malformed values
//!   produce zeroed or empty outputs instead of errors. The only errors in this
//!   crate come from parsing user-supplied selectors (`DateRange`, `Grouping`).
//! - **Read-only input:** Every function borrows the trades and builds new,
//!   owned outputs. Repeated calls on the same input give identical results.
//!
//! ## Public API
//!
//! - `AnalyticsEngine` / `PerformanceReport`: one call, every view.
//! - `filter`, `metrics`, `drawdown`, `grouping`, `series`, `streaks`: the
//!   individual calculators, usable on their own.

pub mod drawdown;
pub mod engine;
pub mod error;
pub mod filter;
pub mod grouping;
pub mod math;
pub mod metrics;
pub mod report;
pub mod series;
pub mod streaks;

// Re-export the key components to create a clean, public-facing API.
pub use drawdown::{DrawdownAnalysis, DrawdownPoint, analyze_drawdown};
pub use engine::AnalyticsEngine;
pub use error::AnalyticsError;
pub use filter::{DateRange, filter_by_date_range, filter_closed, filter_closed_in_range};
pub use grouping::{
    DayOfWeek, GroupBreakdown, GroupStats, Grouping, HourOfDay, MonthKey,
    UNDEFEATED_PROFIT_FACTOR, breakdown_by, group_by, top_hours,
};
pub use metrics::{TradeMetrics, calculate_metrics};
pub use report::PerformanceReport;
pub use series::{
    CumulativePoint, DailyPnl, DailySummary, DayPolicy, build_cumulative_series,
    build_daily_series, daily_summary,
};
pub use streaks::{StreakStats, streaks};
