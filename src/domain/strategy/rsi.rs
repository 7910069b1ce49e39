//! RSI threshold strategy: buy when oversold, sell when overbought.

use crate::domain::bar::Bar;
use crate::domain::indicator::IndicatorSeries;
use crate::domain::indicator::rsi::calculate_rsi;
use crate::domain::signal::{ChartPanel, SignalKind, details};
use crate::domain::strategy::{Hit, SignalRule, StrategyError, invalid};

#[derive(Debug, Clone, PartialEq)]
pub struct RsiStrategy {
    pub period: usize,
    pub oversold: f64,
    pub overbought: f64,
}

impl RsiStrategy {
    pub fn new(period: usize, oversold: f64, overbought: f64) -> Result<Self, StrategyError> {
        if period == 0 {
            return Err(invalid("RSI", "period must be positive"));
        }
        if !(0.0..=100.0).contains(&oversold) || !(0.0..=100.0).contains(&overbought) {
            return Err(invalid("RSI", "thresholds must be within 0..=100"));
        }
        if oversold >= overbought {
            return Err(invalid("RSI", "oversold must be below overbought"));
        }
        Ok(Self {
            period,
            oversold,
            overbought,
        })
    }
}

impl Default for RsiStrategy {
    fn default() -> Self {
        Self {
            period: 14,
            oversold: 35.0,
            overbought: 75.0,
        }
    }
}

impl SignalRule for RsiStrategy {
    type Indicators = IndicatorSeries;

    fn name(&self) -> String {
        format!("RSI_{}_{}", self.oversold, self.overbought)
    }

    fn panel(&self) -> ChartPanel {
        ChartPanel::Rsi
    }

    fn required_bars(&self) -> usize {
        self.period + 1
    }

    fn indicators(&self, bars: &[Bar]) -> IndicatorSeries {
        calculate_rsi(bars, self.period)
    }

    fn first_index(&self, rsi: &IndicatorSeries) -> Option<usize> {
        rsi.first_defined()
    }

    fn check(&self, bars: &[Bar], rsi: &IndicatorSeries, i: usize) -> Option<Hit> {
        let value = rsi.get(i)?;
        let (kind, threshold) = if value < self.oversold {
            (SignalKind::Buy, self.oversold)
        } else if value > self.overbought {
            (SignalKind::Sell, self.overbought)
        } else {
            return None;
        };

        Some(Hit {
            kind,
            price: bars[i].close,
            details: details([
                ("rsi_value", value.into()),
                ("threshold", threshold.into()),
            ]),
        })
    }
}
