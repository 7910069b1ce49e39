//! Aggregate statistics over completed trades.

use serde::Serialize;

use super::backtest::Trade;

/// Summary of a trade list. Percent-valued fields are in percent, not fractions.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Stats {
    pub total_trades: usize,
    pub win_rate: f64,
    pub avg_profit: f64,
    pub total_profit: f64,
    pub max_profit: f64,
    pub max_loss: f64,
    pub avg_hold_days: f64,
}

impl Stats {
    /// Recomputes every figure from scratch. An empty list gives all zeros.
    pub fn compute(trades: &[Trade]) -> Self {
        if trades.is_empty() {
            return Stats::default();
        }

        let total_trades = trades.len();
        let n = total_trades as f64;

        let mut wins = 0usize;
        let mut total_profit = 0.0_f64;
        let mut sum_percent = 0.0_f64;
        let mut max_profit = f64::NEG_INFINITY;
        let mut max_loss = f64::INFINITY;
        let mut total_hold_days = 0i64;

        for trade in trades {
            if trade.profit > 0.0 {
                wins += 1;
            }
            total_profit += trade.profit;
            sum_percent += trade.profit_percent;
            max_profit = max_profit.max(trade.profit_percent);
            max_loss = max_loss.min(trade.profit_percent);
            total_hold_days += trade.hold_days();
        }

        Stats {
            total_trades,
            win_rate: wins as f64 / n * 100.0,
            avg_profit: sum_percent / n,
            total_profit,
            max_profit,
            max_loss,
            avg_hold_days: total_hold_days as f64 / n,
        }
    }
}
