use analytics::{
    AnalyticsEngine, DateRange, DayPolicy, GroupBreakdown, Grouping, PerformanceReport,
    breakdown_by, build_cumulative_series, build_daily_series, filter_closed_in_range, top_hours,
};
use anyhow::Context;
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use comfy_table::{Cell, CellAlignment, Table, presets::UTF8_FULL};
use configuration::{Config, load_config};
use core_types::{SharpeBasis, Trade};
use rust_decimal::Decimal;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// The main entry point for the Tradelog journal analytics tool.
fn main() -> anyhow::Result<()> {
    // Load TRADELOG_* overrides from a .env file, if there is one.
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    // Parse command-line arguments
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref()).context("Failed to load configuration")?;
    let today = Local::now().date_naive();

    // Execute the appropriate command
    match cli.command {
        Commands::Summary(args) => handle_summary(&args, &config, today),
        Commands::Drawdown(args) => handle_drawdown(&args, &config, today),
        Commands::Breakdown(args) => handle_breakdown(&args, &config, today),
        Commands::Equity(args) => handle_equity(&args, &config, today),
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Performance analytics over an exported trading journal.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the configuration file. Defaults to `config.toml` if present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Headline statistics: win rate, profit factor, expectancy, Sharpe.
    Summary(JournalArgs),
    /// Drawdown statistics and the worst points of the balance curve.
    Drawdown(JournalArgs),
    /// Performance grouped by strategy, instrument, hour, weekday or month.
    Breakdown(BreakdownArgs),
    /// Daily and cumulative P&L.
    Equity(EquityArgs),
}

#[derive(Parser)]
struct JournalArgs {
    /// JSON file holding an array of trades.
    #[arg(long)]
    trades: PathBuf,

    /// Entry-date window: "all", "30d", "ytd" or "YYYY-MM-DD..YYYY-MM-DD".
    /// Falls back to `analytics.default_range` from the configuration.
    #[arg(long)]
    range: Option<String>,
}

#[derive(Parser)]
struct BreakdownArgs {
    #[command(flatten)]
    journal: JournalArgs,

    /// strategy, instrument, hour, weekday or month.
    #[arg(long)]
    by: Grouping,
}

#[derive(Parser)]
struct EquityArgs {
    #[command(flatten)]
    journal: JournalArgs,

    /// Leave out days whose trades netted to zero.
    #[arg(long)]
    trading_days_only: bool,
}

// ==============================================================================
// Command Logic
// ==============================================================================

fn handle_summary(args: &JournalArgs, config: &Config, today: NaiveDate) -> anyhow::Result<()> {
    let trades = read_journal(&args.trades)?;
    let range = resolve_range(args, config, today)?;
    let engine = AnalyticsEngine::new(config.analytics.sharpe_basis);
    let report = engine.calculate(&trades, &range);

    if report.is_empty() {
        println!("No closed trades in the selected range.");
        return Ok(());
    }
    println!("{}", summary_table(&report, engine.sharpe_basis()));

    let selected = filter_closed_in_range(&trades, &range);
    let hours = top_hours(selected, config.analytics.top_hours);
    if !hours.is_empty() {
        println!("Best entry hours");
        println!("{}", breakdown_table(&hours, config.display.max_rows));
    }
    Ok(())
}

fn handle_drawdown(args: &JournalArgs, config: &Config, today: NaiveDate) -> anyhow::Result<()> {
    let trades = read_journal(&args.trades)?;
    let range = resolve_range(args, config, today)?;
    let report = AnalyticsEngine::new(config.analytics.sharpe_basis).calculate(&trades, &range);
    let dd = &report.drawdown;

    let mut table = new_table(&["Statistic", "Value"]);
    let max_date = dd.max_drawdown_date.map(|d| d.to_string()).unwrap_or_else(|| "-".to_string());
    table.add_row(vec![Cell::new("Max drawdown"), money_cell(dd.max_drawdown)]);
    table.add_row(vec![Cell::new("Max drawdown %"), Cell::new(format!("{}%", dd.max_drawdown_pct))]);
    table.add_row(vec![Cell::new("Max drawdown date"), Cell::new(max_date)]);
    table.add_row(vec![Cell::new("Longest drawdown (trades)"), Cell::new(dd.longest_drawdown)]);
    table.add_row(vec![Cell::new("Avg drawdown length (trades)"), Cell::new(dd.avg_drawdown_length)]);
    table.add_row(vec![Cell::new("Drawdown periods"), Cell::new(dd.drawdown_periods)]);
    table.add_row(vec![Cell::new("Recoveries"), Cell::new(dd.recovery_trades)]);
    table.add_row(vec![Cell::new("Time in drawdown"), Cell::new(format!("{}%", dd.time_in_drawdown))]);
    println!("{table}");

    let mut worst: Vec<_> = dd.series.iter().filter(|p| p.drawdown > Decimal::ZERO).collect();
    worst.sort_by(|a, b| b.drawdown.cmp(&a.drawdown));
    worst.truncate(config.display.max_rows);
    if !worst.is_empty() {
        let mut table = new_table(&["#", "Date", "Instrument", "Trade P&L", "Balance", "Peak", "Drawdown"]);
        for point in worst {
            table.add_row(vec![
                Cell::new(point.trade_index),
                Cell::new(point.date),
                Cell::new(&point.instrument),
                money_cell(point.trade_pnl),
                money_cell(point.running_total),
                money_cell(point.peak),
                money_cell(point.drawdown),
            ]);
        }
        println!("{table}");
    }
    Ok(())
}

fn handle_breakdown(args: &BreakdownArgs, config: &Config, today: NaiveDate) -> anyhow::Result<()> {
    let trades = read_journal(&args.journal.trades)?;
    let range = resolve_range(&args.journal, config, today)?;
    let selected = filter_closed_in_range(&trades, &range);
    let rows = breakdown_by(selected, args.by);

    tracing::info!(grouping = %args.by, buckets = rows.len(), "Breakdown calculated");
    println!("{}", breakdown_table(&rows, config.display.max_rows));
    Ok(())
}

fn handle_equity(args: &EquityArgs, config: &Config, today: NaiveDate) -> anyhow::Result<()> {
    let trades = read_journal(&args.journal.trades)?;
    let range = resolve_range(&args.journal, config, today)?;
    let selected = filter_closed_in_range(&trades, &range);

    let policy = if args.trading_days_only {
        DayPolicy::TradingDaysOnly
    } else {
        DayPolicy::AllDates
    };
    let daily = build_daily_series(selected);
    let series = build_cumulative_series(&daily, policy);

    let mut table = new_table(&["Date", "Daily P&L", "Cumulative P&L"]);
    for point in &series {
        table.add_row(vec![
            Cell::new(point.date),
            money_cell(point.daily_pnl),
            money_cell(point.cumulative_pnl),
        ]);
    }
    println!("{table}");
    Ok(())
}

// ==============================================================================
// Helpers
// ==============================================================================

fn read_journal(path: &Path) -> anyhow::Result<Vec<Trade>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read trade journal {}", path.display()))?;
    let trades: Vec<Trade> = serde_json::from_str(&raw)
        .with_context(|| format!("{} is not a JSON array of trades", path.display()))?;
    tracing::info!(trades = trades.len(), path = %path.display(), "Journal loaded");
    Ok(trades)
}

fn resolve_range(args: &JournalArgs, config: &Config, today: NaiveDate) -> anyhow::Result<DateRange> {
    let raw = args.range.as_deref().unwrap_or(&config.analytics.default_range);
    Ok(DateRange::parse(raw, today)?)
}

fn new_table(header: &[&str]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(header.to_vec());
    table
}

fn money_cell(value: Decimal) -> Cell {
    Cell::new(format!("{value:.2}")).set_alignment(CellAlignment::Right)
}

fn summary_table(report: &PerformanceReport, basis: SharpeBasis) -> Table {
    let m = &report.metrics;
    let mut table = new_table(&["Metric", "Value"]);
    table.add_row(vec![Cell::new("Closed trades"), Cell::new(m.total_trades)]);
    table.add_row(vec![
        Cell::new("Wins / losses / breakeven"),
        Cell::new(format!("{} / {} / {}", m.winning_trades, m.losing_trades, m.breakeven_trades)),
    ]);
    table.add_row(vec![Cell::new("Win rate"), Cell::new(format!("{}%", m.win_rate))]);
    table.add_row(vec![Cell::new("Total P&L"), money_cell(m.total_pnl)]);
    table.add_row(vec![Cell::new("Average win"), money_cell(m.avg_win)]);
    table.add_row(vec![Cell::new("Average loss"), money_cell(m.avg_loss)]);
    table.add_row(vec![Cell::new("Largest win"), money_cell(m.largest_win)]);
    table.add_row(vec![Cell::new("Largest loss"), money_cell(m.largest_loss)]);
    table.add_row(vec![Cell::new("Profit factor"), Cell::new(m.profit_factor)]);
    table.add_row(vec![Cell::new("Expectancy"), money_cell(m.expectancy)]);
    table.add_row(vec![Cell::new(format!("Sharpe ratio ({basis})")), Cell::new(m.sharpe_ratio)]);
    table.add_row(vec![Cell::new("Max drawdown"), money_cell(m.max_drawdown)]);
    table.add_row(vec![
        Cell::new("Longest win / loss streak"),
        Cell::new(format!(
            "{} / {}",
            report.streaks.max_consecutive_wins, report.streaks.max_consecutive_losses
        )),
    ]);
    if let (Some(best), Some(worst)) = (&report.daily_summary.best_day, &report.daily_summary.worst_day) {
        table.add_row(vec![Cell::new(format!("Best day ({})", best.date)), money_cell(best.daily_pnl)]);
        table.add_row(vec![Cell::new(format!("Worst day ({})", worst.date)), money_cell(worst.daily_pnl)]);
    }
    table
}

fn breakdown_table<K>(rows: &[GroupBreakdown<K>], max_rows: usize) -> Table {
    let mut table = new_table(&["Bucket", "Trades", "Wins", "Losses", "Win %", "Total P&L", "Avg win", "Avg loss", "PF"]);
    for row in rows.iter().take(max_rows) {
        let s = &row.stats;
        table.add_row(vec![
            Cell::new(&row.label),
            Cell::new(s.total_trades),
            Cell::new(s.wins),
            Cell::new(s.losses),
            Cell::new(s.win_rate),
            money_cell(s.total_pnl),
            money_cell(s.avg_win),
            money_cell(s.avg_loss),
            Cell::new(s.profit_factor),
        ]);
    }
    table
}
