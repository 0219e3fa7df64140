use analytics::{
    AnalyticsEngine, DateRange, DayPolicy, Grouping, UNDEFEATED_PROFIT_FACTOR, analyze_drawdown,
    breakdown_by, build_cumulative_series, build_daily_series, calculate_metrics, group_by,
};
use chrono::NaiveDate;
use core_types::{SharpeBasis, Trade};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

const JOURNAL: &str = r#"[
    {"id": 1, "status": "closed", "entryDate": "2024-04-01", "exitDate": "2024-04-01",
     "entryTime": "09:35", "pnl": 100, "instrument": "ES", "strategy": "A",
     "entryPrice": 5000, "quantity": 1},
    {"id": 2, "status": "closed", "entryDate": "2024-04-02", "exitDate": "2024-04-02",
     "entryTime": "10:05", "pnl": "-50", "instrument": "ES", "strategy": "A",
     "entryPrice": 5000, "quantity": 1},
    {"id": 3, "status": "closed", "entryDate": "2024-04-03", "exitDate": "2024-04-03",
     "entryTime": "09:50", "pnl": 200, "instrument": "NQ", "strategy": "B",
     "entryPrice": 18000, "quantity": 1},
    {"id": 4, "status": "closed", "entryDate": "2024-04-04", "exitDate": "2024-04-04",
     "entryTime": "13:20", "pnl": -300, "instrument": "NQ",
     "entryPrice": 18000, "quantity": 1},
    {"id": 5, "status": "closed", "entryDate": "2024-04-05",
     "createdAt": "2024-04-05T16:00:00Z",
     "pnl": 50, "instrument": "", "strategy": "B"},
    {"id": "6", "status": "open", "entryDate": "2024-04-05", "instrument": "CL"},
    {"id": "7", "status": "closed", "entryDate": "not a date", "pnl": "???"}
]"#;

fn journal() -> Vec<Trade> {
    serde_json::from_str(JOURNAL).expect("journal should decode leniently")
}

#[test]
fn lenient_import_keeps_every_record() {
    let trades = journal();
    assert_eq!(trades.len(), 7);
    assert_eq!(trades[6].entry_date, None);
    assert_eq!(trades[6].pnl, None);
    assert_eq!(trades[4].instrument_label(), "Unknown");
}

#[test]
fn metrics_over_closed_trades() {
    let trades = journal();
    let m = calculate_metrics(&trades, SharpeBasis::PerTrade);

    // Six closed trades, one of which has no usable P&L.
    assert_eq!(m.total_trades, 6);
    assert_eq!(m.total_pnl, Decimal::ZERO);
    assert_eq!(m.breakeven_trades, 1);
    assert_eq!(m.win_rate, dec!(50));
    assert!(m.win_rate >= Decimal::ZERO && m.win_rate <= dec!(100));
    assert_eq!(m.max_drawdown, dec!(300));
}

#[test]
fn drawdown_matches_the_documented_sequence() {
    let trades = journal();
    let analysis = analyze_drawdown(&trades);
    let drawdowns: Vec<_> = analysis.series.iter().map(|p| p.drawdown).collect();

    // Trade 7 has no entry date and cannot be placed on the curve.
    assert_eq!(drawdowns, vec![dec!(0), dec!(50), dec!(0), dec!(300), dec!(250)]);
    assert_eq!(analysis.max_drawdown, dec!(300));
    assert!(analysis.series.iter().all(|p| p.drawdown >= Decimal::ZERO));
    assert_eq!(analysis, analyze_drawdown(&trades));
}

#[test]
fn strategy_groups() {
    let trades = journal();
    let groups = group_by(&trades, |t| Some(t.strategy_label().to_string()));

    assert_eq!(groups["A"].total_trades, 2);
    assert_eq!(groups["A"].total_pnl, dec!(50));
    assert_eq!(groups["A"].win_rate, dec!(50));
    assert_eq!(groups["B"].total_pnl, dec!(250));
    assert_eq!(groups["B"].profit_factor, UNDEFEATED_PROFIT_FACTOR);
    assert_eq!(groups["No Strategy"].total_trades, 2);
}

#[test]
fn hour_breakdown_ignores_trades_without_time() {
    let trades = journal();
    let rows = breakdown_by(&trades, Grouping::Hour);
    let labels: Vec<_> = rows.iter().map(|r| r.label.as_str()).collect();
    assert_eq!(labels, vec!["09:00", "10:00", "13:00"]);
    assert_eq!(rows[0].stats.total_pnl, dec!(300));
}

#[test]
fn cumulative_series_round_trip() {
    let trades = journal();
    let daily = build_daily_series(&trades);
    // Trade 5 settles on its creation date; trade 7 has no date at all.
    assert_eq!(daily.len(), 5);
    assert_eq!(daily[4].date, NaiveDate::from_ymd_opt(2024, 4, 5).unwrap());

    for policy in [DayPolicy::AllDates, DayPolicy::TradingDaysOnly] {
        let series = build_cumulative_series(&daily, policy);
        let sum: Decimal = series.iter().map(|p| p.daily_pnl).sum();
        assert_eq!(series.last().map(|p| p.cumulative_pnl), Some(sum));
    }
}

#[test]
fn engine_report_is_deterministic_and_serializable() {
    let trades = journal();
    let engine = AnalyticsEngine::new(SharpeBasis::PerTrade);
    let first = engine.calculate(&trades, &DateRange::All);
    let second = engine.calculate(&trades, &DateRange::All);
    assert_eq!(first, second);

    let json = serde_json::to_string(&first).unwrap();
    let decoded: analytics::PerformanceReport = serde_json::from_str(&json).unwrap();
    assert_eq!(decoded.metrics, first.metrics);
}

#[test]
fn input_is_not_mutated() {
    let trades = journal();
    let snapshot = trades.clone();
    let _ = AnalyticsEngine::default().calculate(&trades, &DateRange::All);
    assert_eq!(trades, snapshot);
}

#[test]
fn extreme_values_degrade_instead_of_failing() {
    // Micro-sized position: returns around 1e15 percent square out of range.
    let tiny_notional: Vec<Trade> = serde_json::from_str(
        r#"[
        {"id": 1, "status": "closed", "entryDate": "2024-04-01", "pnl": 10000,
         "entryPrice": 0.000001, "quantity": 0.001},
        {"id": 2, "status": "closed", "entryDate": "2024-04-02", "pnl": 10,
         "entryPrice": 100, "quantity": 1}
    ]"#,
    )
    .unwrap();
    let report = AnalyticsEngine::new(SharpeBasis::PerTrade).calculate(&tiny_notional, &DateRange::All);
    assert_eq!(report.metrics.total_trades, 2);
    assert_eq!(report.metrics.total_pnl, dec!(10010));
    assert_eq!(report.metrics.sharpe_ratio, Decimal::ZERO);

    // A peak of 1e-28 cannot divide a drawdown of 10.
    let dust_peak: Vec<Trade> = serde_json::from_str(
        r#"[
        {"id": 1, "status": "closed", "entryDate": "2024-04-01", "pnl": "0.0000000000000000000000000001"},
        {"id": 2, "status": "closed", "entryDate": "2024-04-02", "pnl": -10}
    ]"#,
    )
    .unwrap();
    let report = AnalyticsEngine::default().calculate(&dust_peak, &DateRange::All);
    assert_eq!(report.drawdown.max_drawdown, dec!(10));
    assert_eq!(report.drawdown.max_drawdown_pct, Decimal::ZERO);
    assert_eq!(report.metrics.max_drawdown, dec!(10));

    // The second 5e28 would push every sum past Decimal::MAX and is left out.
    let huge: Vec<Trade> = serde_json::from_str(
        r#"[
        {"id": 1, "status": "closed", "entryDate": "2024-04-01", "exitDate": "2024-04-01",
         "pnl": "50000000000000000000000000000", "strategy": "A"},
        {"id": 2, "status": "closed", "entryDate": "2024-04-02", "exitDate": "2024-04-02",
         "pnl": "50000000000000000000000000000", "strategy": "A"}
    ]"#,
    )
    .unwrap();
    let report = AnalyticsEngine::default().calculate(&huge, &DateRange::All);
    let cap = dec!(50000000000000000000000000000);
    assert_eq!(report.metrics.total_trades, 2);
    assert_eq!(report.metrics.winning_trades, 2);
    assert_eq!(report.metrics.total_pnl, cap);
    assert_eq!(report.by_strategy[0].stats.total_pnl, cap);
    assert_eq!(report.equity_curve.last().map(|p| p.cumulative_pnl), Some(cap));
    assert_eq!(report.drawdown.max_drawdown, Decimal::ZERO);
}
