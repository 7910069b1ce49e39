//! Single-position signal replay with a post-entry cooldown.
//!
//! The simulator holds at most one position. A buy opens it, a sell closes it
//! once at least `cooldown_days` whole days have passed since the buy. Sells
//! inside the cooldown and buys while already long are ignored. A position
//! still open at the end is reported separately and never counted in stats.

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::domain::bar::BarSeries;
use crate::domain::metrics::Stats;
use crate::domain::signal::{Signal, SignalKind};
use crate::domain::strategy::{Mode, Strategy};

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestConfig {
    /// Trailing window of bars to simulate over; 0 means the whole history.
    pub lookback_days: usize,
    pub cooldown_days: i64,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        Self {
            lookback_days: 0,
            cooldown_days: 8,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trade {
    pub buy_date: NaiveDateTime,
    pub buy_price: f64,
    pub sell_date: NaiveDateTime,
    pub sell_price: f64,
    pub profit: f64,
    pub profit_percent: f64,
}

impl Trade {
    pub fn close(open: &OpenPosition, sell_date: NaiveDateTime, sell_price: f64) -> Self {
        let profit = sell_price - open.buy_price;
        let profit_percent = if open.buy_price != 0.0 {
            profit / open.buy_price * 100.0
        } else {
            0.0
        };
        Self {
            buy_date: open.buy_date,
            buy_price: open.buy_price,
            sell_date,
            sell_price,
            profit,
            profit_percent,
        }
    }

    pub fn hold_days(&self) -> i64 {
        (self.sell_date - self.buy_date).num_days()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OpenPosition {
    pub buy_date: NaiveDateTime,
    pub buy_price: f64,
}

#[derive(Debug, Clone, PartialEq)]
enum PositionState {
    Flat,
    Long(OpenPosition),
}

/// Replays chronologically ordered signals through the position state machine.
pub fn simulate(signals: &[Signal], cooldown_days: i64) -> (Vec<Trade>, Option<OpenPosition>) {
    let mut state = PositionState::Flat;
    let mut trades = Vec::new();

    for signal in signals {
        state = match (state, signal.kind) {
            (PositionState::Flat, SignalKind::Buy) => {
                tracing::debug!(price = signal.price, at = %signal.timestamp, "open position");
                PositionState::Long(OpenPosition {
                    buy_date: signal.timestamp,
                    buy_price: signal.price,
                })
            }
            (PositionState::Long(open), SignalKind::Sell) => {
                let held = (signal.timestamp - open.buy_date).num_days();
                if held < cooldown_days {
                    PositionState::Long(open)
                } else {
                    let trade = Trade::close(&open, signal.timestamp, signal.price);
                    tracing::debug!(
                        profit_percent = trade.profit_percent,
                        hold_days = held,
                        "close position"
                    );
                    trades.push(trade);
                    PositionState::Flat
                }
            }
            (state, _) => state,
        };
    }

    let open = match state {
        PositionState::Long(open) => Some(open),
        PositionState::Flat => None,
    };
    (trades, open)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BacktestReport {
    pub strategy: String,
    pub trades: Vec<Trade>,
    pub open_position: Option<OpenPosition>,
    pub stats: Stats,
}

/// Backtest results for every strategy on one asset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssetBacktest {
    pub id: String,
    pub name: String,
    pub reports: Vec<BacktestReport>,
}

/// Runs `strategy` in full mode over the whole series, then simulates trades
/// on the signals that fall inside the lookback window.
pub fn run_backtest(
    strategy: &Strategy,
    series: &BarSeries,
    config: &BacktestConfig,
) -> BacktestReport {
    let mut signals = strategy.detect(series, Mode::Full);

    if config.lookback_days > 0 {
        let start = series.tail_start(config.lookback_days);
        if let Some(cutoff) = series.bars().get(start).map(|b| b.timestamp) {
            signals.retain(|s| s.timestamp >= cutoff);
        }
    }

    let (trades, open_position) = simulate(&signals, config.cooldown_days);
    let stats = Stats::compute(&trades);
    tracing::info!(
        strategy = %strategy.name(),
        signals = signals.len(),
        trades = stats.total_trades,
        "backtest complete"
    );

    BacktestReport {
        strategy: strategy.name(),
        trades,
        open_position,
        stats,
    }
}
