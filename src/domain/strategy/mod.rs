//! Signal strategies.
//!
//! Each strategy is one per-bar predicate over precomputed indicators. The
//! two evaluation modes only differ in which bar indices the predicate sees:
//! `Newest` checks the final bar, `Full` checks every bar from the first index
//! where all of the strategy's indicators are defined.

pub mod bollinger;
pub mod csma;
pub mod macd;
pub mod rsi;
pub mod vegas;

pub use bollinger::BollingerStrategy;
pub use csma::CsMaStrategy;
pub use macd::MacdStrategy;
pub use rsi::RsiStrategy;
pub use vegas::VegasStrategy;

use std::fmt;
use std::str::FromStr;

use crate::domain::bar::{Bar, BarSeries};
use crate::domain::indicator::IndicatorConfig;
use crate::domain::signal::{ChartPanel, Details, Signal, SignalKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Only the most recent bar.
    Newest,
    /// Every bar with defined indicators.
    Full,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Newest => write!(f, "newest"),
            Mode::Full => write!(f, "full"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StrategyError {
    #[error("unknown strategy: {0}")]
    Unknown(String),

    #[error("invalid parameter for {strategy}: {reason}")]
    InvalidParameter { strategy: String, reason: String },
}

pub(crate) fn invalid(strategy: &str, reason: impl Into<String>) -> StrategyError {
    StrategyError::InvalidParameter {
        strategy: strategy.to_string(),
        reason: reason.into(),
    }
}

/// Tunables that are not indicator periods.
#[derive(Debug, Clone, PartialEq)]
pub struct StrategyParams {
    pub boll_tolerance_upper: f64,
    pub boll_tolerance_lower: f64,
    pub rsi_oversold: f64,
    pub rsi_overbought: f64,
}

impl Default for StrategyParams {
    fn default() -> Self {
        Self {
            boll_tolerance_upper: 0.01,
            boll_tolerance_lower: 0.01,
            rsi_oversold: 35.0,
            rsi_overbought: 75.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StrategyKind {
    Bollinger,
    Vegas,
    Rsi,
    Macd,
    CsMa,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 5] = [
        StrategyKind::Bollinger,
        StrategyKind::Vegas,
        StrategyKind::Rsi,
        StrategyKind::Macd,
        StrategyKind::CsMa,
    ];

    /// Short label used in notification tables.
    pub fn shorthand(&self) -> &'static str {
        match self {
            StrategyKind::Bollinger => "Boll",
            StrategyKind::Vegas => "Vegas",
            StrategyKind::Rsi => "RSI",
            StrategyKind::Macd => "MACD",
            StrategyKind::CsMa => "CsMa",
        }
    }

    /// Recovers the kind from a signal's strategy label, e.g. `MACD_Cross_12_26_9`.
    pub fn from_label(label: &str) -> Option<Self> {
        let prefix = label.split('_').next().unwrap_or(label);
        prefix.parse().ok()
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StrategyKind::Bollinger => "Bollinger",
            StrategyKind::Vegas => "Vegas",
            StrategyKind::Rsi => "RSI",
            StrategyKind::Macd => "MACD",
            StrategyKind::CsMa => "CsMa",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for StrategyKind {
    type Err = StrategyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bollinger" | "boll" => Ok(StrategyKind::Bollinger),
            "vegas" => Ok(StrategyKind::Vegas),
            "rsi" => Ok(StrategyKind::Rsi),
            "macd" => Ok(StrategyKind::Macd),
            "csma" => Ok(StrategyKind::CsMa),
            _ => Err(StrategyError::Unknown(s.trim().to_string())),
        }
    }
}

/// Outcome of the per-bar predicate before it is stamped with bar metadata.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Hit {
    pub kind: SignalKind,
    pub price: f64,
    pub details: Details,
}

pub(crate) trait SignalRule {
    type Indicators;

    fn name(&self) -> String;
    fn panel(&self) -> ChartPanel;
    /// Minimum history length before the strategy is worth evaluating.
    fn required_bars(&self) -> usize;
    fn indicators(&self, bars: &[Bar]) -> Self::Indicators;
    fn first_index(&self, indicators: &Self::Indicators) -> Option<usize>;
    /// `None` when nothing fires or any input at `i` is undefined.
    fn check(&self, bars: &[Bar], indicators: &Self::Indicators, i: usize) -> Option<Hit>;
}

pub(crate) fn evaluate<R: SignalRule>(rule: &R, series: &BarSeries, mode: Mode) -> Vec<Signal> {
    let bars = series.bars();
    let required = rule.required_bars();
    if bars.is_empty() || bars.len() < required {
        tracing::warn!(
            strategy = %rule.name(),
            bars = bars.len(),
            required,
            "insufficient data"
        );
        return Vec::new();
    }
    let indicators = rule.indicators(bars);
    evaluate_with(rule, bars, &indicators, mode)
}

pub(crate) fn evaluate_with<R: SignalRule>(
    rule: &R,
    bars: &[Bar],
    indicators: &R::Indicators,
    mode: Mode,
) -> Vec<Signal> {
    let Some(last) = bars.len().checked_sub(1) else {
        return Vec::new();
    };
    let start = match mode {
        Mode::Newest => last,
        Mode::Full => match rule.first_index(indicators) {
            Some(first) => first,
            None => return Vec::new(),
        },
    };

    let name = rule.name();
    let panel = rule.panel();
    (start..=last)
        .filter_map(|i| {
            rule.check(bars, indicators, i).map(|hit| Signal {
                strategy: name.clone(),
                kind: hit.kind,
                price: hit.price,
                timestamp: bars[i].timestamp,
                panel,
                details: hit.details,
            })
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub enum Strategy {
    Bollinger(BollingerStrategy),
    Vegas(VegasStrategy),
    Rsi(RsiStrategy),
    Macd(MacdStrategy),
    CsMa(CsMaStrategy),
}

impl Strategy {
    /// Builds one strategy from explicit configuration, validating its parameters.
    pub fn build(
        kind: StrategyKind,
        indicators: &IndicatorConfig,
        params: &StrategyParams,
    ) -> Result<Self, StrategyError> {
        let c = indicators;
        Ok(match kind {
            StrategyKind::Bollinger => Strategy::Bollinger(BollingerStrategy::new(
                c.bollinger_period,
                c.bollinger_std,
                params.boll_tolerance_upper,
                params.boll_tolerance_lower,
            )?),
            StrategyKind::Vegas => Strategy::Vegas(VegasStrategy::new(
                c.vegas_fast,
                c.vegas_medium,
                c.vegas_slow,
            )?),
            StrategyKind::Rsi => Strategy::Rsi(RsiStrategy::new(
                c.rsi_period,
                params.rsi_oversold,
                params.rsi_overbought,
            )?),
            StrategyKind::Macd => {
                Strategy::Macd(MacdStrategy::new(c.macd_fast, c.macd_slow, c.macd_signal)?)
            }
            StrategyKind::CsMa => {
                Strategy::CsMa(CsMaStrategy::new(c.csma_fast, c.csma_medium, c.csma_slow)?)
            }
        })
    }

    /// Parses `name` and builds the matching strategy.
    pub fn from_name(
        name: &str,
        indicators: &IndicatorConfig,
        params: &StrategyParams,
    ) -> Result<Self, StrategyError> {
        Self::build(name.parse()?, indicators, params)
    }

    pub fn kind(&self) -> StrategyKind {
        match self {
            Strategy::Bollinger(_) => StrategyKind::Bollinger,
            Strategy::Vegas(_) => StrategyKind::Vegas,
            Strategy::Rsi(_) => StrategyKind::Rsi,
            Strategy::Macd(_) => StrategyKind::Macd,
            Strategy::CsMa(_) => StrategyKind::CsMa,
        }
    }

    pub fn name(&self) -> String {
        match self {
            Strategy::Bollinger(s) => s.name(),
            Strategy::Vegas(s) => s.name(),
            Strategy::Rsi(s) => s.name(),
            Strategy::Macd(s) => s.name(),
            Strategy::CsMa(s) => s.name(),
        }
    }

    pub fn panel(&self) -> ChartPanel {
        match self {
            Strategy::Bollinger(s) => s.panel(),
            Strategy::Vegas(s) => s.panel(),
            Strategy::Rsi(s) => s.panel(),
            Strategy::Macd(s) => s.panel(),
            Strategy::CsMa(s) => s.panel(),
        }
    }

    pub fn required_bars(&self) -> usize {
        match self {
            Strategy::Bollinger(s) => s.required_bars(),
            Strategy::Vegas(s) => s.required_bars(),
            Strategy::Rsi(s) => s.required_bars(),
            Strategy::Macd(s) => s.required_bars(),
            Strategy::CsMa(s) => s.required_bars(),
        }
    }

    /// Evaluates the strategy against a prepared series.
    pub fn detect(&self, series: &BarSeries, mode: Mode) -> Vec<Signal> {
        match self {
            Strategy::Bollinger(s) => evaluate(s, series, mode),
            Strategy::Vegas(s) => evaluate(s, series, mode),
            Strategy::Rsi(s) => evaluate(s, series, mode),
            Strategy::Macd(s) => evaluate(s, series, mode),
            Strategy::CsMa(s) => evaluate(s, series, mode),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    fn all_strategies() -> Vec<Strategy> {
        let c = IndicatorConfig::default();
        let p = StrategyParams::default();
        StrategyKind::ALL
            .iter()
            .map(|k| Strategy::build(*k, &c, &p).unwrap())
            .collect()
    }

    #[test]
    fn kind_parses_case_insensitively() {
        assert_eq!("RSI".parse::<StrategyKind>().unwrap(), StrategyKind::Rsi);
        assert_eq!("csma".parse::<StrategyKind>().unwrap(), StrategyKind::CsMa);
        assert_eq!(
            " Bollinger ".parse::<StrategyKind>().unwrap(),
            StrategyKind::Bollinger
        );
        assert_eq!(
            "Ichimoku".parse::<StrategyKind>(),
            Err(StrategyError::Unknown("Ichimoku".into()))
        );
    }

    #[test]
    fn kind_display_round_trips_registry_names() {
        for kind in StrategyKind::ALL {
            assert_eq!(kind.to_string().parse::<StrategyKind>().unwrap(), kind);
        }
    }

    #[test]
    fn kind_from_label() {
        assert_eq!(
            StrategyKind::from_label("MACD_Cross_12_26_9"),
            Some(StrategyKind::Macd)
        );
        assert_eq!(
            StrategyKind::from_label("Bollinger_20_2"),
            Some(StrategyKind::Bollinger)
        );
        assert_eq!(StrategyKind::from_label("Mystery"), None);
    }

    #[test]
    fn default_names() {
        let names: Vec<String> = all_strategies().iter().map(|s| s.name()).collect();
        assert_eq!(
            names,
            vec![
                "Bollinger_20_2",
                "Vegas_12_144_169",
                "RSI_35_75",
                "MACD_Cross_12_26_9",
                "CsMa_7_56_112"
            ]
        );
    }

    #[test]
    fn panels() {
        let panels: Vec<ChartPanel> = all_strategies().iter().map(|s| s.panel()).collect();
        assert_eq!(
            panels,
            vec![
                ChartPanel::Main,
                ChartPanel::Main,
                ChartPanel::Rsi,
                ChartPanel::Macd,
                ChartPanel::Main
            ]
        );
    }

    #[test]
    fn from_name_rejects_unknown() {
        let err = Strategy::from_name(
            "Turtle",
            &IndicatorConfig::default(),
            &StrategyParams::default(),
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "unknown strategy: Turtle");
    }

    #[test]
    fn build_rejects_invalid_parameters() {
        let config = IndicatorConfig {
            macd_fast: 30,
            ..IndicatorConfig::default()
        };
        let err = Strategy::build(StrategyKind::Macd, &config, &StrategyParams::default());
        assert!(matches!(err, Err(StrategyError::InvalidParameter { .. })));
    }

    #[test]
    fn empty_series_yields_nothing() {
        let empty = BarSeries::default();
        for s in all_strategies() {
            assert!(s.detect(&empty, Mode::Newest).is_empty());
            assert!(s.detect(&empty, Mode::Full).is_empty());
        }
    }

    #[test]
    fn short_series_yields_nothing() {
        let series = BarSeries::from_bars(flat_bars(&[100.0; 10]));
        for s in all_strategies() {
            assert!(s.detect(&series, Mode::Full).is_empty(), "{}", s.name());
        }
    }

    #[test]
    fn full_last_matches_newest() {
        let closes: Vec<f64> = (0..300)
            .map(|i| 100.0 + (i as f64 * 0.15).sin() * 12.0 + (i as f64 * 0.031).cos() * 6.0)
            .collect();
        let bars: Vec<Bar> = closes
            .iter()
            .enumerate()
            .map(|(i, &c)| bar(i, c - 0.4, c, c + 1.5, c - 1.5))
            .collect();

        for end in 200..300 {
            let series = BarSeries::from_bars(bars[..end].to_vec());
            for s in all_strategies() {
                let newest = s.detect(&series, Mode::Newest);
                let full = s.detect(&series, Mode::Full);
                let last_ts = series.last().unwrap().timestamp;
                let full_last = full.last().filter(|sig| sig.timestamp == last_ts);
                assert_eq!(newest.first(), full_last, "{} at {}", s.name(), end);
            }
        }
    }
}
