//! Bollinger band touch strategy.
//!
//! Buy when the bar's low reaches the lower band (widened by `tolerance_lower`),
//! sell when its high reaches the upper band (narrowed by `tolerance_upper`).
//! A bar touching both bands is a buy. The signal price is the touching
//! extreme, not the close.

use crate::domain::bar::Bar;
use crate::domain::indicator::bollinger::{BollingerBands, calculate_bollinger};
use crate::domain::indicator::first_common_index;
use crate::domain::signal::{ChartPanel, SignalKind, details};
use crate::domain::strategy::{Hit, SignalRule, StrategyError, invalid};

#[derive(Debug, Clone, PartialEq)]
pub struct BollingerStrategy {
    pub period: usize,
    pub k: f64,
    pub tolerance_upper: f64,
    pub tolerance_lower: f64,
}

impl BollingerStrategy {
    pub fn new(
        period: usize,
        k: f64,
        tolerance_upper: f64,
        tolerance_lower: f64,
    ) -> Result<Self, StrategyError> {
        if period < 2 {
            return Err(invalid("Bollinger", "period must be at least 2"));
        }
        if !k.is_finite() || k <= 0.0 {
            return Err(invalid("Bollinger", "band multiplier must be positive"));
        }
        for tol in [tolerance_upper, tolerance_lower] {
            if !(0.0..1.0).contains(&tol) {
                return Err(invalid("Bollinger", "tolerance must be in [0, 1)"));
            }
        }
        Ok(Self {
            period,
            k,
            tolerance_upper,
            tolerance_lower,
        })
    }
}

impl Default for BollingerStrategy {
    fn default() -> Self {
        Self {
            period: 20,
            k: 2.0,
            tolerance_upper: 0.01,
            tolerance_lower: 0.01,
        }
    }
}

impl SignalRule for BollingerStrategy {
    type Indicators = BollingerBands;

    fn name(&self) -> String {
        format!("Bollinger_{}_{}", self.period, self.k)
    }

    fn panel(&self) -> ChartPanel {
        ChartPanel::Main
    }

    fn required_bars(&self) -> usize {
        self.period
    }

    fn indicators(&self, bars: &[Bar]) -> BollingerBands {
        calculate_bollinger(bars, self.period, self.k)
    }

    fn first_index(&self, bands: &BollingerBands) -> Option<usize> {
        first_common_index(&[&bands.upper, &bands.middle, &bands.lower])
    }

    fn check(&self, bars: &[Bar], bands: &BollingerBands, i: usize) -> Option<Hit> {
        let upper = bands.upper.get(i)?;
        let middle = bands.middle.get(i)?;
        let lower = bands.lower.get(i)?;
        let bar = &bars[i];

        let touches_lower = bar.low <= lower * (1.0 + self.tolerance_lower);
        let touches_upper = bar.high >= upper * (1.0 - self.tolerance_upper);

        let (kind, price) = if touches_lower {
            (SignalKind::Buy, bar.low)
        } else if touches_upper {
            (SignalKind::Sell, bar.high)
        } else {
            return None;
        };

        Some(Hit {
            kind,
            price,
            details: details([
                ("close_price", bar.close.into()),
                ("high_price", bar.high.into()),
                ("low_price", bar.low.into()),
                ("upper_band", upper.into()),
                ("middle_band", middle.into()),
                ("lower_band", lower.into()),
            ]),
        })
    }
}
