//! Triple SMA of close (fast / medium / slow), default 7 / 56 / 112.

use crate::domain::bar::Bar;
use crate::domain::indicator::IndicatorSeries;
use crate::domain::indicator::sma::calculate_sma;

#[derive(Debug, Clone, PartialEq)]
pub struct CsMaLines {
    pub fast: IndicatorSeries,
    pub medium: IndicatorSeries,
    pub slow: IndicatorSeries,
}

pub fn calculate_csma(bars: &[Bar], fast: usize, medium: usize, slow: usize) -> CsMaLines {
    CsMaLines {
        fast: calculate_sma(bars, fast),
        medium: calculate_sma(bars, medium),
        slow: calculate_sma(bars, slow),
    }
}
