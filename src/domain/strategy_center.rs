//! Runs an ordered set of strategies against one asset history.

use crate::domain::backtest::{BacktestConfig, BacktestReport, run_backtest};
use crate::domain::bar::{BarSeries, RawBar};
use crate::domain::indicator::IndicatorConfig;
use crate::domain::signal::Signal;
use crate::domain::strategy::{Mode, Strategy, StrategyError, StrategyParams};

#[derive(Debug, Clone, Default)]
pub struct StrategyCenter {
    strategies: Vec<Strategy>,
}

impl StrategyCenter {
    /// Builds strategies in the given order. Unknown names and strategies with
    /// unusable parameters are logged and left out.
    pub fn new<S: AsRef<str>>(
        names: &[S],
        indicators: &IndicatorConfig,
        params: &StrategyParams,
    ) -> Self {
        let mut strategies = Vec::with_capacity(names.len());
        for name in names {
            match Strategy::from_name(name.as_ref(), indicators, params) {
                Ok(strategy) => strategies.push(strategy),
                Err(StrategyError::Unknown(unknown)) => {
                    tracing::warn!(strategy = %unknown, "unknown strategy, skipping");
                }
                Err(err) => {
                    tracing::error!(strategy = name.as_ref(), error = %err, "strategy disabled");
                }
            }
        }
        Self { strategies }
    }

    pub fn from_strategies(strategies: Vec<Strategy>) -> Self {
        Self { strategies }
    }

    pub fn strategies(&self) -> &[Strategy] {
        &self.strategies
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    /// Prepares the raw history once and runs every strategy over it.
    pub fn run(&self, raw: &[RawBar], mode: Mode) -> Vec<Signal> {
        let series = BarSeries::prepare(raw);
        self.run_prepared(&series, mode)
    }

    /// Signals grouped by strategy in configuration order, chronological within a group.
    pub fn run_prepared(&self, series: &BarSeries, mode: Mode) -> Vec<Signal> {
        if series.is_empty() {
            tracing::warn!("empty bar series, nothing to evaluate");
            return Vec::new();
        }

        let mut all = Vec::new();
        for strategy in &self.strategies {
            let signals = strategy.detect(series, mode);
            tracing::debug!(
                strategy = %strategy.name(),
                %mode,
                count = signals.len(),
                "strategy evaluated"
            );
            all.extend(signals);
        }
        tracing::info!(%mode, total = all.len(), "signal detection complete");
        all
    }

    /// One backtest report per configured strategy.
    pub fn backtest(&self, series: &BarSeries, config: &BacktestConfig) -> Vec<BacktestReport> {
        self.strategies
            .iter()
            .map(|strategy| run_backtest(strategy, series, config))
            .collect()
    }
}
