//! Vegas tunnel: three recursive EMAs of close.
//!
//! The medium/slow pair forms the tunnel; the fast EMA is the filter line.
//! Default spans: 12, 144, 169.

use crate::domain::bar::Bar;
use crate::domain::indicator::IndicatorSeries;
use crate::domain::indicator::ema::calculate_ema;

#[derive(Debug, Clone, PartialEq)]
pub struct VegasTunnel {
    pub fast: IndicatorSeries,
    pub medium: IndicatorSeries,
    pub slow: IndicatorSeries,
}

pub fn calculate_vegas(bars: &[Bar], fast: usize, medium: usize, slow: usize) -> VegasTunnel {
    VegasTunnel {
        fast: calculate_ema(bars, fast),
        medium: calculate_ema(bars, medium),
        slow: calculate_ema(bars, slow),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::indicator::IndicatorType;
    use chrono::DateTime;

    fn make_bars(n: usize) -> Vec<Bar> {
        (0..n)
            .map(|i| {
                let close = 100.0 + (i as f64 * 0.3).sin() * 5.0;
                Bar {
                    timestamp: DateTime::from_timestamp(1_700_000_000 + i as i64 * 86_400, 0)
                        .unwrap()
                        .naive_utc(),
                    open: close,
                    close,
                    high: close,
                    low: close,
                    volume: 1000.0,
                    amount: 0.0,
                }
            })
            .collect()
    }

    #[test]
    fn vegas_warmups_follow_spans() {
        let tunnel = calculate_vegas(&make_bars(200), 12, 144, 169);
        assert_eq!(tunnel.fast.first_defined(), Some(11));
        assert_eq!(tunnel.medium.first_defined(), Some(143));
        assert_eq!(tunnel.slow.first_defined(), Some(168));
    }

    #[test]
    fn vegas_types() {
        let tunnel = calculate_vegas(&make_bars(3), 12, 144, 169);
        assert_eq!(tunnel.fast.indicator_type, IndicatorType::Ema(12));
        assert_eq!(tunnel.slow.indicator_type, IndicatorType::Ema(169));
        assert_eq!(tunnel.slow.first_defined(), None);
    }
}
