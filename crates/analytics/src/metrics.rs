use crate::drawdown::analyze_drawdown;
use crate::filter::filter_closed;
use crate::math::{accumulate, mean, mean_and_std_dev, percent, round2, weighted_ratio};
use core_types::{SharpeBasis, Trade};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Aggregate statistics over the closed trades of a journal.
///
/// Every field is zero when there are no closed trades. Currency and ratio
/// fields are rounded to two decimal places.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TradeMetrics {
    pub total_trades: usize,
    pub winning_trades: usize,
    pub losing_trades: usize,
    pub breakeven_trades: usize,
    pub win_rate: Decimal,
    pub total_pnl: Decimal,
    pub gross_profit: Decimal,
    pub gross_loss: Decimal,
    pub avg_win: Decimal,
    /// Mean size of a losing trade, as a positive number.
    pub avg_loss: Decimal,
    /// `(avg_win * wins) / (avg_loss * losses)`. Zero when there are no
    /// losses, including the all-wins case.
    pub profit_factor: Decimal,
    pub max_drawdown: Decimal,
    pub largest_win: Decimal,
    /// Most negative P&L among losing trades.
    pub largest_loss: Decimal,
    pub expectancy: Decimal,
    pub sharpe_ratio: Decimal,
}

/// Computes [`TradeMetrics`] over the closed subset of `trades`.
pub fn calculate_metrics<'a, I>(trades: I, sharpe_basis: SharpeBasis) -> TradeMetrics
where
    I: IntoIterator<Item = &'a Trade>,
{
    let closed = filter_closed(trades);
    if closed.is_empty() {
        return TradeMetrics::default();
    }

    let mut winning_trades = 0;
    let mut losing_trades = 0;
    let mut total_pnl = Decimal::ZERO;
    let mut gross_profit = Decimal::ZERO;
    let mut gross_loss = Decimal::ZERO;
    let mut largest_win = Decimal::ZERO;
    let mut largest_loss = Decimal::ZERO;

    for trade in &closed {
        let pnl = trade.pnl_or_zero();
        accumulate(&mut total_pnl, pnl, "total_pnl");
        if pnl > Decimal::ZERO {
            winning_trades += 1;
            accumulate(&mut gross_profit, pnl, "gross_profit");
            largest_win = largest_win.max(pnl);
        } else if pnl < Decimal::ZERO {
            losing_trades += 1;
            accumulate(&mut gross_loss, pnl.abs(), "gross_loss");
            largest_loss = largest_loss.min(pnl);
        }
    }

    let total_trades = closed.len();
    let win_rate = percent(winning_trades, total_trades);
    let avg_win = mean(gross_profit, winning_trades);
    let avg_loss = mean(gross_loss, losing_trades);

    let profit_factor = weighted_ratio(avg_win, winning_trades, avg_loss, losing_trades, "profit_factor");

    let win_share = win_rate / Decimal::ONE_HUNDRED;
    let expectancy = win_share * avg_win - (Decimal::ONE - win_share) * avg_loss;

    let max_drawdown = analyze_drawdown(closed.iter().copied()).max_drawdown;
    let sharpe_ratio = sharpe_ratio(&closed, sharpe_basis);

    tracing::debug!(
        total_trades,
        winning_trades,
        losing_trades,
        %total_pnl,
        "Trade metrics calculated"
    );

    TradeMetrics {
        total_trades,
        winning_trades,
        losing_trades,
        breakeven_trades: total_trades - winning_trades - losing_trades,
        win_rate: round2(win_rate),
        total_pnl: round2(total_pnl),
        gross_profit: round2(gross_profit),
        gross_loss: round2(gross_loss),
        avg_win: round2(avg_win),
        avg_loss: round2(avg_loss),
        profit_factor: round2(profit_factor),
        max_drawdown,
        largest_win: round2(largest_win),
        largest_loss: round2(largest_loss),
        expectancy: round2(expectancy),
        sharpe_ratio: round2(sharpe_ratio),
    }
}

/// Per-trade Sharpe ratio: mean return over the population standard
/// deviation of returns, where a return is `pnl / notional * 100`.
///
/// Zero when no return can be formed or the returns do not vary.
pub fn sharpe_ratio(closed: &[&Trade], basis: SharpeBasis) -> Decimal {
    let returns: Vec<Decimal> = match basis {
        SharpeBasis::PerTrade => closed
            .iter()
            .filter_map(|t| trade_return(t, t.notional()?))
            .collect(),
        SharpeBasis::FirstTrade => {
            let Some(notional) = closed.first().and_then(|t| t.notional()) else {
                return Decimal::ZERO;
            };
            let returns: Option<Vec<Decimal>> =
                closed.iter().map(|t| trade_return(t, notional)).collect();
            returns.unwrap_or_default()
        }
    };

    match mean_and_std_dev(&returns) {
        Some((mean, std_dev)) if !std_dev.is_zero() => mean.checked_div(std_dev).unwrap_or_default(),
        _ => Decimal::ZERO,
    }
}

fn trade_return(trade: &Trade, notional: Decimal) -> Option<Decimal> {
    if notional.is_zero() {
        return None;
    }
    trade
        .pnl_or_zero()
        .checked_div(notional)?
        .checked_mul(Decimal::ONE_HUNDRED)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use core_types::TradeStatus;
    use rust_decimal_macros::dec;

    fn sized(id: &str, pnl: Decimal, entry_price: Decimal, quantity: Decimal) -> Trade {
        Trade {
            entry_price: Some(entry_price),
            quantity: Some(quantity),
            ..Trade::closed(id, pnl)
        }
    }

    fn closed(pnls: &[Decimal]) -> Vec<Trade> {
        pnls.iter()
            .enumerate()
            .map(|(i, pnl)| Trade {
                entry_date: NaiveDate::from_ymd_opt(2024, 1, i as u32 + 1),
                ..Trade::closed(format!("t{i}"), *pnl)
            })
            .collect()
    }

    #[test]
    fn basic_aggregates() {
        let trades = closed(&[dec!(100), dec!(-50), dec!(200), dec!(-300), dec!(50)]);
        let m = calculate_metrics(&trades, SharpeBasis::PerTrade);

        assert_eq!(m.total_trades, 5);
        assert_eq!(m.winning_trades, 3);
        assert_eq!(m.losing_trades, 2);
        assert_eq!(m.win_rate, dec!(60));
        assert_eq!(m.total_pnl, dec!(0));
        assert_eq!(m.avg_win, dec!(116.67));
        assert_eq!(m.avg_loss, dec!(175));
        assert_eq!(m.profit_factor, dec!(1));
        assert_eq!(m.largest_win, dec!(200));
        assert_eq!(m.largest_loss, dec!(-300));
        assert_eq!(m.max_drawdown, dec!(300));
        // 0.6 * 116.666.. - 0.4 * 175
        assert_eq!(m.expectancy, dec!(0));
    }

    #[test]
    fn only_closed_trades_count() {
        let mut trades = closed(&[dec!(10), dec!(-5)]);
        trades.push(Trade {
            status: TradeStatus::Open,
            pnl: Some(dec!(1000)),
            ..Trade::default()
        });
        let m = calculate_metrics(&trades, SharpeBasis::PerTrade);
        assert_eq!(m.total_trades, 2);
        assert_eq!(m.total_pnl, dec!(5));
    }

    #[test]
    fn all_wins_report_zero_profit_factor() {
        let trades = closed(&[dec!(10), dec!(20)]);
        let m = calculate_metrics(&trades, SharpeBasis::PerTrade);
        assert_eq!(m.win_rate, dec!(100));
        assert_eq!(m.profit_factor, Decimal::ZERO);
        assert_eq!(m.avg_loss, Decimal::ZERO);
        assert_eq!(m.largest_loss, Decimal::ZERO);
    }

    #[test]
    fn breakeven_trades_dilute_the_win_rate() {
        let trades = closed(&[dec!(30), dec!(0), dec!(-10)]);
        let m = calculate_metrics(&trades, SharpeBasis::PerTrade);
        assert_eq!(m.breakeven_trades, 1);
        assert_eq!(m.win_rate, dec!(33.33));
        // (1/3) * 30 - (2/3) * 10
        assert_eq!(m.expectancy, dec!(3.33));
    }

    #[test]
    fn no_closed_trades_is_all_zero() {
        let open = vec![Trade { status: TradeStatus::Open, ..Trade::default() }];
        assert_eq!(calculate_metrics(&open, SharpeBasis::PerTrade), TradeMetrics::default());
        assert_eq!(calculate_metrics(&Vec::<Trade>::new(), SharpeBasis::FirstTrade), TradeMetrics::default());
    }

    #[test]
    fn totals_do_not_depend_on_input_order() {
        let trades = closed(&[dec!(12.5), dec!(-3.25), dec!(40), dec!(-18)]);
        let mut reversed = trades.clone();
        reversed.reverse();
        let a = calculate_metrics(&trades, SharpeBasis::PerTrade);
        let b = calculate_metrics(&reversed, SharpeBasis::PerTrade);
        assert_eq!(a.total_pnl, dec!(31.25));
        assert_eq!(a.total_pnl, b.total_pnl);
        assert_eq!(a.win_rate, b.win_rate);
    }

    #[test]
    fn sharpe_uses_each_trades_notional() {
        // Returns: +10%, -5%, +10%, -5% => mean 2.5, sd 7.5
        let trades = vec![
            sized("a", dec!(100), dec!(100), dec!(10)),
            sized("b", dec!(-100), dec!(200), dec!(10)),
            sized("c", dec!(10), dec!(10), dec!(10)),
            sized("d", dec!(-5), dec!(10), dec!(10)),
        ];
        let closed: Vec<&Trade> = trades.iter().collect();
        assert_eq!(round2(sharpe_ratio(&closed, SharpeBasis::PerTrade)), dec!(0.33));
    }

    #[test]
    fn sharpe_first_trade_basis_normalizes_by_the_first_notional() {
        // Every return uses 1000 as notional: +10%, -10% => mean 0
        let trades = vec![
            sized("a", dec!(100), dec!(100), dec!(10)),
            sized("b", dec!(-100), dec!(5), dec!(1)),
        ];
        let closed: Vec<&Trade> = trades.iter().collect();
        assert_eq!(sharpe_ratio(&closed, SharpeBasis::FirstTrade), Decimal::ZERO);
        // Per trade: +10%, -2000% => clearly negative
        assert!(sharpe_ratio(&closed, SharpeBasis::PerTrade) < Decimal::ZERO);
    }

    #[test]
    fn sharpe_is_zero_without_variation_or_notional() {
        let flat = vec![
            sized("a", dec!(10), dec!(100), dec!(1)),
            sized("b", dec!(10), dec!(100), dec!(1)),
        ];
        let closed: Vec<&Trade> = flat.iter().collect();
        assert_eq!(sharpe_ratio(&closed, SharpeBasis::PerTrade), Decimal::ZERO);

        let unsized_trades = vec![Trade::closed("a", dec!(10)), Trade::closed("b", dec!(-4))];
        let closed: Vec<&Trade> = unsized_trades.iter().collect();
        assert_eq!(sharpe_ratio(&closed, SharpeBasis::PerTrade), Decimal::ZERO);
        assert_eq!(sharpe_ratio(&closed, SharpeBasis::FirstTrade), Decimal::ZERO);
    }
}
