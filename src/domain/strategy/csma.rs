//! Close / triple-SMA strategy.
//!
//! Conditions are checked in order and the first match wins:
//! 1. sell: close crosses below the fast MA
//! 2. buy: fast MA crosses above the medium MA
//! 3. buy: close crosses back above the slow MA
//!
//! Both buys only count in an uptrend, i.e. while the medium MA is above the
//! slow MA.

use crate::domain::bar::Bar;
use crate::domain::indicator::csma::{CsMaLines, calculate_csma};
use crate::domain::indicator::first_common_index;
use crate::domain::signal::{ChartPanel, SignalKind, details};
use crate::domain::strategy::{Hit, SignalRule, StrategyError, invalid};

#[derive(Debug, Clone, PartialEq)]
pub struct CsMaStrategy {
    pub fast: usize,
    pub medium: usize,
    pub slow: usize,
}

impl CsMaStrategy {
    pub fn new(fast: usize, medium: usize, slow: usize) -> Result<Self, StrategyError> {
        if fast == 0 {
            return Err(invalid("CsMa", "periods must be positive"));
        }
        if !(fast < medium && medium < slow) {
            return Err(invalid("CsMa", "periods must be strictly increasing"));
        }
        Ok(Self { fast, medium, slow })
    }
}

impl Default for CsMaStrategy {
    fn default() -> Self {
        Self {
            fast: 7,
            medium: 56,
            slow: 112,
        }
    }
}

struct Point {
    close: f64,
    fast: f64,
    medium: f64,
    slow: f64,
}

fn point(bars: &[Bar], lines: &CsMaLines, i: usize) -> Option<Point> {
    Some(Point {
        close: bars.get(i)?.close,
        fast: lines.fast.get(i)?,
        medium: lines.medium.get(i)?,
        slow: lines.slow.get(i)?,
    })
}

impl SignalRule for CsMaStrategy {
    type Indicators = CsMaLines;

    fn name(&self) -> String {
        format!("CsMa_{}_{}_{}", self.fast, self.medium, self.slow)
    }

    fn panel(&self) -> ChartPanel {
        ChartPanel::Main
    }

    fn required_bars(&self) -> usize {
        self.slow
    }

    fn indicators(&self, bars: &[Bar]) -> CsMaLines {
        calculate_csma(bars, self.fast, self.medium, self.slow)
    }

    fn first_index(&self, lines: &CsMaLines) -> Option<usize> {
        first_common_index(&[&lines.fast, &lines.medium, &lines.slow])
    }

    fn check(&self, bars: &[Bar], lines: &CsMaLines, i: usize) -> Option<Hit> {
        let prev = point(bars, lines, i.checked_sub(1)?)?;
        let curr = point(bars, lines, i)?;

        let uptrend = curr.medium > curr.slow;
        let (kind, condition) = if prev.close > prev.fast && curr.close < curr.fast {
            (SignalKind::Sell, "close crossed below fast MA")
        } else if uptrend && prev.fast < prev.medium && curr.fast > curr.medium {
            (SignalKind::Buy, "fast MA crossed above medium MA")
        } else if uptrend && prev.close < prev.slow && curr.close > curr.slow {
            (SignalKind::Buy, "close crossed above slow MA")
        } else {
            return None;
        };

        Some(Hit {
            kind,
            price: curr.close,
            details: details([
                ("close_price", curr.close.into()),
                ("ma_fast", curr.fast.into()),
                ("ma_medium", curr.medium.into()),
                ("ma_slow", curr.slow.into()),
                ("condition", condition.into()),
            ]),
        })
    }
}
