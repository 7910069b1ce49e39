//! Configured indicator computation over a whole bar series.

use crate::domain::bar::{Bar, BarSeries};
use crate::domain::indicator::IndicatorSeries;
use crate::domain::indicator::bollinger::{BollingerBands, calculate_bollinger};
use crate::domain::indicator::csma::{CsMaLines, calculate_csma};
use crate::domain::indicator::macd::{MacdLines, calculate_macd};
use crate::domain::indicator::rsi::calculate_rsi;
use crate::domain::indicator::vegas::{VegasTunnel, calculate_vegas};
use crate::domain::indicator::volume::{VolumeAverages, calculate_volume_averages};

/// Periods and spans for every indicator family.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorConfig {
    pub bollinger_period: usize,
    pub bollinger_std: f64,
    pub vegas_fast: usize,
    pub vegas_medium: usize,
    pub vegas_slow: usize,
    pub volume_short: usize,
    pub volume_medium: usize,
    pub volume_long: usize,
    pub rsi_period: usize,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    pub csma_fast: usize,
    pub csma_medium: usize,
    pub csma_slow: usize,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            bollinger_period: 20,
            bollinger_std: 2.0,
            vegas_fast: 12,
            vegas_medium: 144,
            vegas_slow: 169,
            volume_short: 5,
            volume_medium: 10,
            volume_long: 20,
            rsi_period: 14,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            csma_fast: 7,
            csma_medium: 56,
            csma_slow: 112,
        }
    }
}

/// Stateless calculator bound to one `IndicatorConfig`.
#[derive(Debug, Clone, Default)]
pub struct IndicatorEngine {
    config: IndicatorConfig,
}

impl IndicatorEngine {
    pub fn new(config: IndicatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &IndicatorConfig {
        &self.config
    }

    pub fn bollinger(&self, bars: &[Bar]) -> BollingerBands {
        calculate_bollinger(bars, self.config.bollinger_period, self.config.bollinger_std)
    }

    pub fn vegas(&self, bars: &[Bar]) -> VegasTunnel {
        let c = &self.config;
        calculate_vegas(bars, c.vegas_fast, c.vegas_medium, c.vegas_slow)
    }

    pub fn volume(&self, bars: &[Bar]) -> VolumeAverages {
        let c = &self.config;
        calculate_volume_averages(bars, c.volume_short, c.volume_medium, c.volume_long)
    }

    pub fn rsi(&self, bars: &[Bar]) -> IndicatorSeries {
        calculate_rsi(bars, self.config.rsi_period)
    }

    pub fn macd(&self, bars: &[Bar]) -> MacdLines {
        let c = &self.config;
        calculate_macd(bars, c.macd_fast, c.macd_slow, c.macd_signal)
    }

    pub fn csma(&self, bars: &[Bar]) -> CsMaLines {
        let c = &self.config;
        calculate_csma(bars, c.csma_fast, c.csma_medium, c.csma_slow)
    }

    /// Every indicator column over the entire series.
    pub fn compute_all(&self, series: &BarSeries) -> IndicatorTable {
        let bars = series.bars();
        let boll = self.bollinger(bars);
        let vegas = self.vegas(bars);
        let volume = self.volume(bars);
        let macd = self.macd(bars);
        let csma = self.csma(bars);

        let columns = vec![
            boll.upper,
            boll.middle,
            boll.lower,
            vegas.fast,
            vegas.medium,
            vegas.slow,
            volume.short,
            volume.medium,
            volume.long,
            self.rsi(bars),
            macd.line,
            macd.signal,
            macd.histogram,
            csma.fast,
            csma.medium,
            csma.slow,
        ];

        IndicatorTable {
            bars: bars.to_vec(),
            columns,
        }
    }
}

/// Bars plus aligned indicator columns, ready for export.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorTable {
    pub bars: Vec<Bar>,
    pub columns: Vec<IndicatorSeries>,
}

impl IndicatorTable {
    /// Keeps only the last `count` rows. Values already computed on the full
    /// history are carried over unchanged.
    pub fn tail(mut self, count: usize) -> Self {
        let start = self.bars.len().saturating_sub(count);
        self.bars.drain(..start);
        for column in &mut self.columns {
            column.values.drain(..start.min(column.values.len()));
        }
        self
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }
}
