//! MACD (Moving Average Convergence Divergence).
//!
//! MACD Line = EMA(fast) - EMA(slow)
//! Signal Line = EMA(signal) of MACD Line
//! Histogram = MACD Line - Signal Line
//!
//! All EMAs use the recursive seed-with-first-value form over the whole
//! history. Only the reported values are masked:
//! line before (slow-1), signal and histogram before (slow-1 + signal-1).

use crate::domain::bar::Bar;
use crate::domain::indicator::ema::ema_values;
use crate::domain::indicator::{IndicatorSeries, IndicatorType, mask_warmup};

pub const DEFAULT_FAST: usize = 12;
pub const DEFAULT_SLOW: usize = 26;
pub const DEFAULT_SIGNAL: usize = 9;

#[derive(Debug, Clone, PartialEq)]
pub struct MacdLines {
    pub line: IndicatorSeries,
    pub signal: IndicatorSeries,
    pub histogram: IndicatorSeries,
}

pub fn calculate_macd(bars: &[Bar], fast: usize, slow: usize, signal_period: usize) -> MacdLines {
    let line_type = IndicatorType::MacdLine { fast, slow };
    let signal_type = IndicatorType::MacdSignal {
        fast,
        slow,
        signal: signal_period,
    };
    let histogram_type = IndicatorType::MacdHistogram {
        fast,
        slow,
        signal: signal_period,
    };

    if fast == 0 || slow == 0 || signal_period == 0 {
        return MacdLines {
            line: IndicatorSeries::undefined(line_type, bars.len()),
            signal: IndicatorSeries::undefined(signal_type, bars.len()),
            histogram: IndicatorSeries::undefined(histogram_type, bars.len()),
        };
    }

    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let ema_fast = ema_values(&closes, fast);
    let ema_slow = ema_values(&closes, slow);

    let mut line: Vec<f64> = ema_fast.iter().zip(&ema_slow).map(|(f, s)| f - s).collect();
    let mut signal = ema_values(&line, signal_period);
    let mut histogram: Vec<f64> = line.iter().zip(&signal).map(|(l, s)| l - s).collect();

    let line_warmup = fast.max(slow) - 1;
    let signal_warmup = line_warmup + signal_period - 1;
    mask_warmup(&mut line, line_warmup);
    mask_warmup(&mut signal, signal_warmup);
    mask_warmup(&mut histogram, signal_warmup);

    MacdLines {
        line: IndicatorSeries::new(line_type, line),
        signal: IndicatorSeries::new(signal_type, signal),
        histogram: IndicatorSeries::new(histogram_type, histogram),
    }
}

pub fn calculate_macd_default(bars: &[Bar]) -> MacdLines {
    calculate_macd(bars, DEFAULT_FAST, DEFAULT_SLOW, DEFAULT_SIGNAL)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::indicator::ema::calculate_ema;
    use chrono::DateTime;

    fn make_bars(prices: &[f64]) -> Vec<Bar> {
        prices
            .iter()
            .enumerate()
            .map(|(i, &close)| Bar {
                timestamp: DateTime::from_timestamp(1_700_000_000 + i as i64 * 86_400, 0)
                    .unwrap()
                    .naive_utc(),
                open: close,
                close,
                high: close,
                low: close,
                volume: 1000.0,
                amount: 0.0,
            })
            .collect()
    }

    fn rising(n: usize) -> Vec<Bar> {
        let prices: Vec<f64> = (0..n).map(|i| 100.0 + i as f64).collect();
        make_bars(&prices)
    }

    #[test]
    fn macd_warmup_default() {
        let macd = calculate_macd_default(&rising(40));
        let line_warmup = DEFAULT_SLOW - 1;
        let signal_warmup = DEFAULT_SLOW - 1 + DEFAULT_SIGNAL - 1;

        assert_eq!(macd.line.first_defined(), Some(line_warmup));
        assert_eq!(macd.signal.first_defined(), Some(signal_warmup));
        assert_eq!(macd.histogram.first_defined(), Some(signal_warmup));
    }

    #[test]
    fn macd_histogram_equals_line_minus_signal() {
        let macd = calculate_macd_default(&rising(40));
        for i in 0..40 {
            if let (Some(l), Some(s), Some(h)) =
                (macd.line.get(i), macd.signal.get(i), macd.histogram.get(i))
            {
                assert!((h - (l - s)).abs() < f64::EPSILON);
            }
        }
    }

    #[test]
    fn macd_line_is_ema_fast_minus_ema_slow() {
        let bars = make_bars(&[10.0, 20.0, 30.0, 40.0, 50.0, 60.0, 70.0, 80.0, 90.0, 100.0]);
        let macd = calculate_macd(&bars, 3, 5, 2);
        let ema_fast = calculate_ema(&bars, 3);
        let ema_slow = calculate_ema(&bars, 5);

        for i in 4..bars.len() {
            let expected = ema_fast.values[i] - ema_slow.values[i];
            assert!(
                (macd.line.values[i] - expected).abs() < f64::EPSILON,
                "MACD line mismatch at index {}",
                i
            );
        }
    }

    #[test]
    fn macd_rising_prices_line_positive() {
        let macd = calculate_macd_default(&rising(40));
        assert!(macd.line.get(39).unwrap() > 0.0);
    }

    #[test]
    fn macd_indicator_types() {
        let macd = calculate_macd(&rising(3), 5, 10, 3);
        assert_eq!(
            macd.line.indicator_type,
            IndicatorType::MacdLine { fast: 5, slow: 10 }
        );
        assert_eq!(
            macd.signal.indicator_type,
            IndicatorType::MacdSignal {
                fast: 5,
                slow: 10,
                signal: 3
            }
        );
    }

    #[test]
    fn macd_empty_bars() {
        let macd = calculate_macd_default(&[]);
        assert!(macd.line.is_empty());
        assert!(macd.signal.is_empty());
    }

    #[test]
    fn macd_zero_period_is_undefined() {
        let bars = rising(30);
        for (f, s, g) in [(0, 26, 9), (12, 0, 9), (12, 26, 0)] {
            let macd = calculate_macd(&bars, f, s, g);
            assert_eq!(macd.line.len(), 30);
            assert_eq!(macd.signal.first_defined(), None);
        }
    }

    #[test]
    fn macd_custom_parameters() {
        let macd = calculate_macd(&rising(20), 5, 10, 3);
        let warmup = 10 - 1 + 3 - 1;
        assert!(macd.signal.get(warmup - 1).is_none());
        assert!(macd.signal.get(warmup).is_some());
    }
}
