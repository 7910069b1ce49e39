//! MACD crossover strategy.
//!
//! Golden cross (line moves from below to above the signal line) buys,
//! death cross sells. A cross needs defined values on two consecutive bars.

use crate::domain::bar::Bar;
use crate::domain::indicator::macd::{MacdLines, calculate_macd};
use crate::domain::indicator::first_common_index;
use crate::domain::signal::{ChartPanel, SignalKind, details};
use crate::domain::strategy::{Hit, SignalRule, StrategyError, invalid};

#[derive(Debug, Clone, PartialEq)]
pub struct MacdStrategy {
    pub fast: usize,
    pub slow: usize,
    pub signal: usize,
}

impl MacdStrategy {
    pub fn new(fast: usize, slow: usize, signal: usize) -> Result<Self, StrategyError> {
        if fast == 0 || signal == 0 {
            return Err(invalid("MACD", "periods must be positive"));
        }
        if fast >= slow {
            return Err(invalid("MACD", "fast period must be below slow period"));
        }
        Ok(Self { fast, slow, signal })
    }
}

impl Default for MacdStrategy {
    fn default() -> Self {
        Self {
            fast: 12,
            slow: 26,
            signal: 9,
        }
    }
}

/// Direction of a strict line/signal crossing between two consecutive bars.
pub fn crossover(
    prev_line: f64,
    prev_signal: f64,
    curr_line: f64,
    curr_signal: f64,
) -> Option<SignalKind> {
    if prev_line < prev_signal && curr_line > curr_signal {
        Some(SignalKind::Buy)
    } else if prev_line > prev_signal && curr_line < curr_signal {
        Some(SignalKind::Sell)
    } else {
        None
    }
}

impl SignalRule for MacdStrategy {
    type Indicators = MacdLines;

    fn name(&self) -> String {
        format!("MACD_Cross_{}_{}_{}", self.fast, self.slow, self.signal)
    }

    fn panel(&self) -> ChartPanel {
        ChartPanel::Macd
    }

    fn required_bars(&self) -> usize {
        self.slow + self.signal
    }

    fn indicators(&self, bars: &[Bar]) -> MacdLines {
        calculate_macd(bars, self.fast, self.slow, self.signal)
    }

    fn first_index(&self, macd: &MacdLines) -> Option<usize> {
        first_common_index(&[&macd.line, &macd.signal])
    }

    fn check(&self, bars: &[Bar], macd: &MacdLines, i: usize) -> Option<Hit> {
        let prev = i.checked_sub(1)?;
        let prev_line = macd.line.get(prev)?;
        let prev_signal = macd.signal.get(prev)?;
        let curr_line = macd.line.get(i)?;
        let curr_signal = macd.signal.get(i)?;

        let kind = crossover(prev_line, prev_signal, curr_line, curr_signal)?;
        let cross_type = match kind {
            SignalKind::Buy => "Golden Cross",
            SignalKind::Sell => "Death Cross",
        };

        Some(Hit {
            kind,
            price: bars[i].close,
            details: details([
                ("cross_type", cross_type.into()),
                ("macd_line", curr_line.into()),
                ("signal_line", curr_signal.into()),
                ("histogram", (curr_line - curr_signal).into()),
            ]),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::bar::BarSeries;
    use crate::domain::indicator::{IndicatorSeries, IndicatorType};
    use crate::domain::strategy::test_support::flat_bars;
    use crate::domain::strategy::{Mode, evaluate, evaluate_with};

    fn lines(line: Vec<f64>, signal: Vec<f64>) -> MacdLines {
        let histogram = line.iter().zip(&signal).map(|(l, s)| l - s).collect();
        MacdLines {
            line: IndicatorSeries::new(IndicatorType::MacdLine { fast: 12, slow: 26 }, line),
            signal: IndicatorSeries::new(
                IndicatorType::MacdSignal {
                    fast: 12,
                    slow: 26,
                    signal: 9,
                },
                signal,
            ),
            histogram: IndicatorSeries::new(
                IndicatorType::MacdHistogram {
                    fast: 12,
                    slow: 26,
                    signal: 9,
                },
                histogram,
            ),
        }
    }

    #[test]
    fn crossover_predicate() {
        assert_eq!(crossover(-1.0, 0.0, 1.0, 0.0), Some(SignalKind::Buy));
        assert_eq!(crossover(1.0, 0.0, -1.0, 0.0), Some(SignalKind::Sell));
        // touching is not crossing
        assert_eq!(crossover(-1.0, 0.0, 0.0, 0.0), None);
        assert_eq!(crossover(0.0, 0.0, 1.0, 0.0), None);
        assert_eq!(crossover(1.0, 0.0, 2.0, 0.0), None);
    }

    #[test]
    fn line_crossing_flat_signal_buys_once() {
        let bars = flat_bars(&[10.0, 11.0, 12.0, 13.0, 14.0, 15.0]);
        let macd = lines(vec![-1.0, -1.0, -1.0, 1.0, 1.0, 1.0], vec![0.0; 6]);

        let signals = evaluate_with(&MacdStrategy::default(), &bars, &macd, Mode::Full);
        assert_eq!(signals.len(), 1);
        let s = &signals[0];
        assert_eq!(s.kind, SignalKind::Buy);
        assert_eq!(s.timestamp, bars[3].timestamp);
        assert_eq!(s.price, 13.0);
        assert_eq!(
            s.detail("cross_type").map(|d| d.to_string()).as_deref(),
            Some("Golden Cross")
        );
        assert_eq!(s.detail_number("macd_line"), Some(1.0));
        assert_eq!(s.detail_number("signal_line"), Some(0.0));
    }

    #[test]
    fn death_cross_sells() {
        let bars = flat_bars(&[10.0, 11.0, 12.0]);
        let macd = lines(vec![0.5, 0.5, -0.5], vec![0.0; 3]);
        let signals = evaluate_with(&MacdStrategy::default(), &bars, &macd, Mode::Newest);
        assert_eq!(signals.len(), 1);
        assert_eq!(signals[0].kind, SignalKind::Sell);
    }

    #[test]
    fn cross_needs_defined_previous_point() {
        let bars = flat_bars(&[10.0, 11.0, 12.0]);
        let macd = lines(vec![f64::NAN, -1.0, 1.0], vec![f64::NAN, 0.0, 0.0]);
        let full = evaluate_with(&MacdStrategy::default(), &bars, &macd, Mode::Full);
        assert_eq!(full.len(), 1);

        let macd = lines(vec![-1.0, f64::NAN, 1.0], vec![0.0, f64::NAN, 0.0]);
        assert!(evaluate_with(&MacdStrategy::default(), &bars, &macd, Mode::Newest).is_empty());
    }

    #[test]
    fn single_bar_has_no_cross() {
        let bars = flat_bars(&[10.0]);
        let macd = lines(vec![1.0], vec![0.0]);
        assert!(evaluate_with(&MacdStrategy::default(), &bars, &macd, Mode::Full).is_empty());
    }

    #[test]
    fn v_shaped_prices_produce_golden_cross() {
        let mut closes: Vec<f64> = (0..40).map(|i| 200.0 - i as f64).collect();
        closes.extend((1..=30).map(|i| 161.0 + i as f64 * 2.0));
        let series = BarSeries::from_bars(flat_bars(&closes));

        let signals = evaluate(&MacdStrategy::default(), &series, Mode::Full);
        assert!(signals.iter().any(|s| s.kind == SignalKind::Buy));
        let first = &signals[0];
        assert!(first.timestamp > series.bars()[39].timestamp);
    }

    #[test]
    fn needs_slow_plus_signal_bars() {
        let closes: Vec<f64> = (0..34).map(|i| 100.0 + i as f64).collect();
        let series = BarSeries::from_bars(flat_bars(&closes));
        assert!(evaluate(&MacdStrategy::default(), &series, Mode::Full).is_empty());
    }

    #[test]
    fn new_validates() {
        assert!(MacdStrategy::new(26, 12, 9).is_err());
        assert!(MacdStrategy::new(12, 26, 0).is_err());
        assert!(MacdStrategy::new(0, 26, 9).is_err());
        assert!(MacdStrategy::new(5, 35, 5).is_ok());
    }
}
