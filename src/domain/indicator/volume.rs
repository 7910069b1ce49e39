//! Volume moving averages.
//!
//! SMA of volume with min-periods 1, so the early windows average whatever
//! is available and the series never contains NaN.

use crate::domain::bar::Bar;
use crate::domain::indicator::sma::rolling_mean;
use crate::domain::indicator::{IndicatorSeries, IndicatorType};

#[derive(Debug, Clone, PartialEq)]
pub struct VolumeAverages {
    pub short: IndicatorSeries,
    pub medium: IndicatorSeries,
    pub long: IndicatorSeries,
}

pub fn calculate_volume_ma(bars: &[Bar], window: usize) -> IndicatorSeries {
    let volumes: Vec<f64> = bars.iter().map(|b| b.volume).collect();
    IndicatorSeries::new(IndicatorType::VolumeMa(window), rolling_mean(&volumes, window, 1))
}

pub fn calculate_volume_averages(
    bars: &[Bar],
    short: usize,
    medium: usize,
    long: usize,
) -> VolumeAverages {
    VolumeAverages {
        short: calculate_volume_ma(bars, short),
        medium: calculate_volume_ma(bars, medium),
        long: calculate_volume_ma(bars, long),
    }
}
