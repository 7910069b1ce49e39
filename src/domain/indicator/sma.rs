//! Simple Moving Average.
//!
//! SMA[i] = mean(C[i-n+1..=i]). Warmup: first (n-1) bars are NaN.

use crate::domain::bar::Bar;
use crate::domain::indicator::{IndicatorSeries, IndicatorType};

/// Trailing mean over at most `window` values, defined once `min_periods`
/// values are available.
pub fn rolling_mean(values: &[f64], window: usize, min_periods: usize) -> Vec<f64> {
    if window == 0 {
        return vec![f64::NAN; values.len()];
    }
    let min_periods = min_periods.clamp(1, window);

    (0..values.len())
        .map(|i| {
            let start = (i + 1).saturating_sub(window);
            let slice = &values[start..=i];
            if slice.len() < min_periods {
                f64::NAN
            } else {
                slice.iter().sum::<f64>() / slice.len() as f64
            }
        })
        .collect()
}

pub fn calculate_sma(bars: &[Bar], period: usize) -> IndicatorSeries {
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    IndicatorSeries::new(
        IndicatorType::Sma(period),
        rolling_mean(&closes, period, period),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
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
                amount: close * 1000.0,
            })
            .collect()
    }

    #[test]
    fn sma_warmup_is_nan() {
        let bars = make_bars(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        let series = calculate_sma(&bars, 3);
        assert_eq!(series.len(), 5);
        assert!(series.values[0].is_nan());
        assert!(series.values[1].is_nan());
        assert_eq!(series.first_defined(), Some(2));
    }

    #[test]
    fn sma_values() {
        let bars = make_bars(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        let series = calculate_sma(&bars, 3);
        assert!((series.values[2] - 2.0).abs() < f64::EPSILON);
        assert!((series.values[3] - 3.0).abs() < f64::EPSILON);
        assert!((series.values[4] - 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn sma_shorter_than_period_is_all_nan() {
        let bars = make_bars(&[1.0, 2.0]);
        let series = calculate_sma(&bars, 5);
        assert_eq!(series.len(), 2);
        assert_eq!(series.first_defined(), None);
    }

    #[test]
    fn sma_empty_and_zero_period() {
        assert!(calculate_sma(&[], 3).is_empty());
        let series = calculate_sma(&make_bars(&[1.0, 2.0]), 0);
        assert_eq!(series.first_defined(), None);
    }

    #[test]
    fn rolling_mean_with_min_periods_one_has_no_nan() {
        let means = rolling_mean(&[10.0, 20.0, 30.0, 40.0], 3, 1);
        assert_eq!(means, vec![10.0, 15.0, 20.0, 30.0]);
    }
}
