//! Technical indicators.
//!
//! Every indicator is a pure function of a bar slice and returns values
//! aligned 1:1 with it. Positions before warm-up hold NaN, never zero, so a
//! consumer can always tell "not yet computable" from a real reading.
//!
//! - `IndicatorType`: indicator identity + parameters (column names on export)
//! - `IndicatorSeries`: one named, aligned value sequence
//! - `IndicatorEngine`: configured entry point that computes every family

pub mod bollinger;
pub mod csma;
pub mod ema;
pub mod engine;
pub mod macd;
pub mod rsi;
pub mod sma;
pub mod stddev;
pub mod vegas;
pub mod volume;

pub use engine::{IndicatorConfig, IndicatorEngine, IndicatorTable};

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IndicatorType {
    Sma(usize),
    Ema(usize),
    Stddev(usize),
    VolumeMa(usize),
    Rsi(usize),
    MacdLine {
        fast: usize,
        slow: usize,
    },
    MacdSignal {
        fast: usize,
        slow: usize,
        signal: usize,
    },
    MacdHistogram {
        fast: usize,
        slow: usize,
        signal: usize,
    },
    BollingerMiddle {
        period: usize,
    },
    BollingerUpper {
        period: usize,
        stddev_mult_x100: u32,
    },
    BollingerLower {
        period: usize,
        stddev_mult_x100: u32,
    },
}

impl fmt::Display for IndicatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorType::Sma(period) => write!(f, "SMA({})", period),
            IndicatorType::Ema(span) => write!(f, "EMA({})", span),
            IndicatorType::Stddev(period) => write!(f, "STDDEV({})", period),
            IndicatorType::VolumeMa(window) => write!(f, "VOLUME_MA({})", window),
            IndicatorType::Rsi(period) => write!(f, "RSI({})", period),
            IndicatorType::MacdLine { fast, slow } => write!(f, "MACD({},{})", fast, slow),
            IndicatorType::MacdSignal { fast, slow, signal } => {
                write!(f, "MACD_SIGNAL({},{},{})", fast, slow, signal)
            }
            IndicatorType::MacdHistogram { fast, slow, signal } => {
                write!(f, "MACD_HIST({},{},{})", fast, slow, signal)
            }
            IndicatorType::BollingerMiddle { period } => write!(f, "BOLL_MIDDLE({})", period),
            IndicatorType::BollingerUpper {
                period,
                stddev_mult_x100,
            } => {
                let mult = *stddev_mult_x100 as f64 / 100.0;
                write!(f, "BOLL_UPPER({},{})", period, mult)
            }
            IndicatorType::BollingerLower {
                period,
                stddev_mult_x100,
            } => {
                let mult = *stddev_mult_x100 as f64 / 100.0;
                write!(f, "BOLL_LOWER({},{})", period, mult)
            }
        }
    }
}

/// Converts a band multiplier to the integer key form used by `IndicatorType`.
pub(crate) fn mult_x100(mult: f64) -> u32 {
    (mult * 100.0).round().max(0.0) as u32
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSeries {
    pub indicator_type: IndicatorType,
    pub values: Vec<f64>,
}

impl IndicatorSeries {
    pub fn new(indicator_type: IndicatorType, values: Vec<f64>) -> Self {
        Self {
            indicator_type,
            values,
        }
    }

    /// A series of `len` undefined points.
    pub fn undefined(indicator_type: IndicatorType, len: usize) -> Self {
        Self::new(indicator_type, vec![f64::NAN; len])
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Defined value at `index`, or `None` during warm-up or past the end.
    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied().filter(|v| v.is_finite())
    }

    pub fn first_defined(&self) -> Option<usize> {
        self.values.iter().position(|v| v.is_finite())
    }
}

/// First index at which every series is defined.
pub fn first_common_index(series: &[&IndicatorSeries]) -> Option<usize> {
    series
        .iter()
        .map(|s| s.first_defined())
        .try_fold(0usize, |acc, first| first.map(|f| acc.max(f)))
}

/// Replaces everything before `warmup` with NaN.
pub(crate) fn mask_warmup(values: &mut [f64], warmup: usize) {
    for v in values.iter_mut().take(warmup) {
        *v = f64::NAN;
    }
}
