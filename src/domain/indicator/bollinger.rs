//! Bollinger Bands indicator.
//!
//! - Middle: SMA(close, n)
//! - Upper: Middle + k × StdDev
//! - Lower: Middle - k × StdDev
//!
//! StdDev is the sample deviation (divides by N-1).
//! Default parameters: period=20, k=2.0.
//! Warmup: first (period-1) bars are NaN on all three bands.

use crate::domain::bar::Bar;
use crate::domain::indicator::sma::rolling_mean;
use crate::domain::indicator::stddev::rolling_sample_stddev;
use crate::domain::indicator::{IndicatorSeries, IndicatorType, mult_x100};

#[derive(Debug, Clone, PartialEq)]
pub struct BollingerBands {
    pub middle: IndicatorSeries,
    pub upper: IndicatorSeries,
    pub lower: IndicatorSeries,
}

pub fn calculate_bollinger(bars: &[Bar], period: usize, k: f64) -> BollingerBands {
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let middle = rolling_mean(&closes, period, period);
    let std = rolling_sample_stddev(&closes, period);

    let upper = middle.iter().zip(&std).map(|(m, s)| m + k * s).collect();
    let lower = middle.iter().zip(&std).map(|(m, s)| m - k * s).collect();
    let stddev_mult_x100 = mult_x100(k);

    BollingerBands {
        middle: IndicatorSeries::new(IndicatorType::BollingerMiddle { period }, middle),
        upper: IndicatorSeries::new(
            IndicatorType::BollingerUpper {
                period,
                stddev_mult_x100,
            },
            upper,
        ),
        lower: IndicatorSeries::new(
            IndicatorType::BollingerLower {
                period,
                stddev_mult_x100,
            },
            lower,
        ),
    }
}
