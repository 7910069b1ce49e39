//! Rolling standard deviation of closing prices.
//!
//! Sample deviation (divisor n-1) over the trailing n closes.
//! Warmup: first (n-1) bars are NaN. A window of one close has no sample
//! deviation, so n < 2 yields an all-NaN series.

use crate::domain::bar::Bar;
use crate::domain::indicator::{IndicatorSeries, IndicatorType};

pub(crate) fn rolling_sample_stddev(values: &[f64], period: usize) -> Vec<f64> {
    if period < 2 {
        return vec![f64::NAN; values.len()];
    }
    let warmup = period - 1;

    (0..values.len())
        .map(|i| {
            if i < warmup {
                return f64::NAN;
            }
            let window = &values[i + 1 - period..=i];
            let mean = window.iter().sum::<f64>() / period as f64;
            let variance = window
                .iter()
                .map(|v| {
                    let diff = v - mean;
                    diff * diff
                })
                .sum::<f64>()
                / (period - 1) as f64;
            variance.sqrt()
        })
        .collect()
}

pub fn calculate_stddev(bars: &[Bar], period: usize) -> IndicatorSeries {
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    IndicatorSeries::new(
        IndicatorType::Stddev(period),
        rolling_sample_stddev(&closes, period),
    )
}
