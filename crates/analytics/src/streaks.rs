use chrono::NaiveDate;
use core_types::Trade;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakStats {
    pub max_consecutive_wins: usize,
    pub max_consecutive_losses: usize,
    /// Positive while on a winning run, negative on a losing run.
    pub current_streak: i64,
}

/// Win and loss runs over dated closed trades in entry-date order.
/// A breakeven trade ends either run.
pub fn streaks<'a, I>(trades: I) -> StreakStats
where
    I: IntoIterator<Item = &'a Trade>,
{
    let mut ordered: Vec<(NaiveDate, Decimal)> = trades
        .into_iter()
        .filter(|t| t.is_closed())
        .filter_map(|t| t.entry_date.map(|d| (d, t.pnl_or_zero())))
        .collect();
    ordered.sort_by_key(|(date, _)| *date);

    let mut stats = StreakStats::default();
    let mut current: i64 = 0;
    for (_, pnl) in ordered {
        current = if pnl > Decimal::ZERO {
            current.max(0) + 1
        } else if pnl < Decimal::ZERO {
            current.min(0) - 1
        } else {
            0
        };
        if current > 0 {
            stats.max_consecutive_wins = stats.max_consecutive_wins.max(current.unsigned_abs() as usize);
        } else if current < 0 {
            stats.max_consecutive_losses = stats.max_consecutive_losses.max(current.unsigned_abs() as usize);
        }
    }
    stats.current_streak = current;
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn run(pnls: &[Decimal]) -> StreakStats {
        let trades: Vec<Trade> = pnls
            .iter()
            .zip(1..)
            .map(|(pnl, d)| Trade {
                entry_date: NaiveDate::from_ymd_opt(2024, 8, d),
                ..Trade::closed("t", *pnl)
            })
            .collect();
        streaks(&trades)
    }

    #[test]
    fn counts_runs() {
        let stats = run(&[dec!(1), dec!(2), dec!(3), dec!(-1), dec!(-1), dec!(4)]);
        assert_eq!(stats.max_consecutive_wins, 3);
        assert_eq!(stats.max_consecutive_losses, 2);
        assert_eq!(stats.current_streak, 1);
    }

    #[test]
    fn breakeven_resets() {
        let stats = run(&[dec!(-1), dec!(-1), dec!(0), dec!(-1)]);
        assert_eq!(stats.max_consecutive_losses, 2);
        assert_eq!(stats.current_streak, -1);

        assert_eq!(run(&[dec!(5), dec!(0)]).current_streak, 0);
    }

    #[test]
    fn no_trades() {
        assert_eq!(run(&[]), StreakStats::default());
    }
}
