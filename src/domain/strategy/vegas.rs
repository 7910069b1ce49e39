//! Vegas tunnel strategy.
//!
//! Only trades while the tunnel points up (medium EMA at or above slow EMA).
//! Buy: the bar opened at or below the slow EMA and closed back at or above
//! the medium EMA. Sell: a down bar closing under the fast EMA.

use crate::domain::bar::Bar;
use crate::domain::indicator::first_common_index;
use crate::domain::indicator::vegas::{VegasTunnel, calculate_vegas};
use crate::domain::signal::{ChartPanel, SignalKind, details};
use crate::domain::strategy::{Hit, SignalRule, StrategyError, invalid};

#[derive(Debug, Clone, PartialEq)]
pub struct VegasStrategy {
    pub fast: usize,
    pub medium: usize,
    pub slow: usize,
}

impl VegasStrategy {
    pub fn new(fast: usize, medium: usize, slow: usize) -> Result<Self, StrategyError> {
        if fast == 0 {
            return Err(invalid("Vegas", "spans must be positive"));
        }
        if !(fast < medium && medium < slow) {
            return Err(invalid("Vegas", "spans must be strictly increasing"));
        }
        Ok(Self { fast, medium, slow })
    }
}

impl Default for VegasStrategy {
    fn default() -> Self {
        Self {
            fast: 12,
            medium: 144,
            slow: 169,
        }
    }
}

impl SignalRule for VegasStrategy {
    type Indicators = VegasTunnel;

    fn name(&self) -> String {
        format!("Vegas_{}_{}_{}", self.fast, self.medium, self.slow)
    }

    fn panel(&self) -> ChartPanel {
        ChartPanel::Main
    }

    fn required_bars(&self) -> usize {
        self.slow
    }

    fn indicators(&self, bars: &[Bar]) -> VegasTunnel {
        calculate_vegas(bars, self.fast, self.medium, self.slow)
    }

    fn first_index(&self, tunnel: &VegasTunnel) -> Option<usize> {
        first_common_index(&[&tunnel.fast, &tunnel.medium, &tunnel.slow])
    }

    fn check(&self, bars: &[Bar], tunnel: &VegasTunnel, i: usize) -> Option<Hit> {
        let fast = tunnel.fast.get(i)?;
        let medium = tunnel.medium.get(i)?;
        let slow = tunnel.slow.get(i)?;
        if medium < slow {
            return None;
        }
        let bar = &bars[i];

        let kind = if bar.open <= slow && bar.close >= medium {
            SignalKind::Buy
        } else if bar.close < bar.open && bar.close < fast {
            SignalKind::Sell
        } else {
            return None;
        };

        Some(Hit {
            kind,
            price: bar.close,
            details: details([
                ("open_price", bar.open.into()),
                ("close_price", bar.close.into()),
                ("ema_fast", fast.into()),
                ("ema_medium", medium.into()),
                ("ema_slow", slow.into()),
            ]),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::bar::BarSeries;
    use crate::domain::indicator::{IndicatorSeries, IndicatorType};
    use crate::domain::strategy::test_support::bar;
    use crate::domain::strategy::{Mode, evaluate, evaluate_with};

    fn tunnel(fast: f64, medium: f64, slow: f64) -> VegasTunnel {
        VegasTunnel {
            fast: IndicatorSeries::new(IndicatorType::Ema(12), vec![fast]),
            medium: IndicatorSeries::new(IndicatorType::Ema(144), vec![medium]),
            slow: IndicatorSeries::new(IndicatorType::Ema(169), vec![slow]),
        }
    }

    fn run(open: f64, close: f64, t: &VegasTunnel) -> Vec<crate::domain::signal::Signal> {
        let bars = vec![bar(0, open, close, open.max(close), open.min(close))];
        evaluate_with(&VegasStrategy::default(), &bars, t, Mode::Newest)
    }

    #[test]
    fn buy_on_tunnel_reclaim() {
        let signals = run(7.5, 9.5, &tunnel(10.0, 9.0, 8.0));
        assert_eq!(signals.len(), 1);
        assert_eq!(signals[0].kind, SignalKind::Buy);
        assert_eq!(signals[0].price, 9.5);
    }

    #[test]
    fn sell_on_down_bar_below_fast() {
        let signals = run(12.0, 9.5, &tunnel(10.0, 9.0, 8.0));
        assert_eq!(signals.len(), 1);
        assert_eq!(signals[0].kind, SignalKind::Sell);
    }

    #[test]
    fn down_tunnel_suppresses_everything() {
        assert!(run(7.5, 9.5, &tunnel(10.0, 8.0, 9.0)).is_empty());
        assert!(run(12.0, 9.5, &tunnel(10.0, 8.0, 9.0)).is_empty());
    }

    #[test]
    fn flat_tunnel_still_trades() {
        let signals = run(7.5, 9.5, &tunnel(10.0, 8.0, 8.0));
        assert_eq!(signals.len(), 1);
    }

    #[test]
    fn open_above_slow_is_no_buy() {
        assert!(run(8.5, 9.5, &tunnel(9.0, 9.0, 8.0)).is_empty());
    }

    #[test]
    fn undefined_tunnel_is_no_signal() {
        let t = tunnel(10.0, 9.0, f64::NAN);
        assert!(run(7.5, 9.5, &t).is_empty());
    }

    #[test]
    fn needs_slow_span_of_history() {
        let bars: Vec<Bar> = (0..168).map(|i| bar(i, 10.0, 10.0, 10.0, 10.0)).collect();
        let series = BarSeries::from_bars(bars);
        assert!(evaluate(&VegasStrategy::default(), &series, Mode::Full).is_empty());
    }

    #[test]
    fn new_validates() {
        assert!(VegasStrategy::new(0, 144, 169).is_err());
        assert!(VegasStrategy::new(12, 169, 144).is_err());
        assert!(VegasStrategy::new(5, 10, 20).is_ok());
    }
}
