//! Exponential Moving Average, recursive form.
//!
//! alpha = 2/(span+1), seeded with the first value:
//! EMA[0] = C[0], EMA[i] = EMA[i-1] + alpha*(C[i] - EMA[i-1]).
//! The recursion runs from the first bar, but the first (span-1) outputs are
//! reported as NaN because they are still dominated by the seed.

use crate::domain::bar::Bar;
use crate::domain::indicator::{IndicatorSeries, IndicatorType, mask_warmup};

/// Unmasked recursive EMA over raw values.
pub(crate) fn ema_values(values: &[f64], span: usize) -> Vec<f64> {
    if span == 0 {
        return vec![f64::NAN; values.len()];
    }
    let alpha = 2.0 / (span as f64 + 1.0);
    let mut out = Vec::with_capacity(values.len());
    let mut prev: Option<f64> = None;

    for &v in values {
        let next = match prev {
            None => v,
            Some(e) => e + alpha * (v - e),
        };
        out.push(next);
        prev = Some(next);
    }
    out
}

pub fn calculate_ema(bars: &[Bar], span: usize) -> IndicatorSeries {
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let mut values = ema_values(&closes, span);
    mask_warmup(&mut values, span.saturating_sub(1));
    IndicatorSeries::new(IndicatorType::Ema(span), values)
}
