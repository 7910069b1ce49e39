//! Typed run settings assembled from a `ConfigPort`.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::domain::backtest::BacktestConfig;
use crate::domain::config_validation::validate_config;
use crate::domain::error::SkintraderError;
use crate::domain::indicator::IndicatorConfig;
use crate::domain::strategy::StrategyParams;
use crate::ports::config_port::ConfigPort;

pub const INDICATORS: &str = "indicators";
pub const STRATEGY: &str = "strategy";
pub const BACKTEST: &str = "backtest";
pub const DATA: &str = "data";
pub const REPORT: &str = "report";
pub const LOGGING: &str = "logging";

pub const DEFAULT_STRATEGIES: [&str; 5] = ["Bollinger", "Vegas", "RSI", "MACD", "CsMa"];

/// On-disk layout of asset histories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataFormat {
    Json,
    Csv,
}

impl FromStr for DataFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(DataFormat::Json),
            "csv" => Ok(DataFormat::Csv),
            other => Err(format!("unsupported data format '{}', expected json or csv", other)),
        }
    }
}

impl fmt::Display for DataFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataFormat::Json => write!(f, "json"),
            DataFormat::Csv => write!(f, "csv"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DataSettings {
    pub items_dir: PathBuf,
    pub format: DataFormat,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportSettings {
    /// Trailing bars kept when exporting indicator tables.
    pub chart_days: usize,
    pub output_dir: PathBuf,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub indicators: IndicatorConfig,
    pub strategies: Vec<String>,
    pub params: StrategyParams,
    pub backtest: BacktestConfig,
    pub data: DataSettings,
    pub report: ReportSettings,
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            indicators: IndicatorConfig::default(),
            strategies: DEFAULT_STRATEGIES.iter().map(|s| s.to_string()).collect(),
            params: StrategyParams::default(),
            backtest: BacktestConfig::default(),
            data: DataSettings {
                items_dir: PathBuf::from("data/items"),
                format: DataFormat::Json,
            },
            report: ReportSettings {
                chart_days: 90,
                output_dir: PathBuf::from("data/signals"),
            },
            log_level: "info".to_string(),
        }
    }
}

fn period(config: &dyn ConfigPort, section: &str, key: &str, default: usize) -> usize {
    config.get_int(section, key, default as i64).max(0) as usize
}

impl Settings {
    /// Validates `config` and builds settings, falling back to defaults for absent keys.
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, SkintraderError> {
        validate_config(config)?;
        let d = Settings::default();
        let di = &d.indicators;

        let indicators = IndicatorConfig {
            bollinger_period: period(config, INDICATORS, "bollinger_period", di.bollinger_period),
            bollinger_std: config.get_double(INDICATORS, "bollinger_std", di.bollinger_std),
            vegas_fast: period(config, INDICATORS, "vegas_ema1", di.vegas_fast),
            vegas_medium: period(config, INDICATORS, "vegas_ema2", di.vegas_medium),
            vegas_slow: period(config, INDICATORS, "vegas_ema3", di.vegas_slow),
            volume_short: period(config, INDICATORS, "volume_ma1", di.volume_short),
            volume_medium: period(config, INDICATORS, "volume_ma2", di.volume_medium),
            volume_long: period(config, INDICATORS, "volume_ma3", di.volume_long),
            rsi_period: period(config, INDICATORS, "rsi_period", di.rsi_period),
            macd_fast: period(config, INDICATORS, "macd_fast", di.macd_fast),
            macd_slow: period(config, INDICATORS, "macd_slow", di.macd_slow),
            macd_signal: period(config, INDICATORS, "macd_signal", di.macd_signal),
            csma_fast: period(config, INDICATORS, "csma_fast", di.csma_fast),
            csma_medium: period(config, INDICATORS, "csma_medium", di.csma_medium),
            csma_slow: period(config, INDICATORS, "csma_slow", di.csma_slow),
        };

        let dp = &d.params;
        let params = StrategyParams {
            boll_tolerance_upper: config.get_double(
                STRATEGY,
                "boll_tolerance_upper",
                dp.boll_tolerance_upper,
            ),
            boll_tolerance_lower: config.get_double(
                STRATEGY,
                "boll_tolerance_lower",
                dp.boll_tolerance_lower,
            ),
            rsi_oversold: config.get_double(STRATEGY, "rsi_oversold", dp.rsi_oversold),
            rsi_overbought: config.get_double(STRATEGY, "rsi_overbought", dp.rsi_overbought),
        };

        let strategies = config
            .get_list(STRATEGY, "strategies")
            .unwrap_or(d.strategies);

        let backtest = BacktestConfig {
            lookback_days: period(config, BACKTEST, "lookback_days", d.backtest.lookback_days),
            cooldown_days: config.get_int(BACKTEST, "cooldown_days", d.backtest.cooldown_days),
        };

        let format = match config.get_string(DATA, "format") {
            Some(raw) => raw
                .parse()
                .map_err(|reason: String| SkintraderError::invalid(DATA, "format", reason))?,
            None => d.data.format,
        };
        let data = DataSettings {
            items_dir: config
                .get_string(DATA, "items_dir")
                .map(PathBuf::from)
                .unwrap_or(d.data.items_dir),
            format,
        };

        let report = ReportSettings {
            chart_days: period(config, REPORT, "chart_days", d.report.chart_days),
            output_dir: config
                .get_string(REPORT, "output_dir")
                .map(PathBuf::from)
                .unwrap_or(d.report.output_dir),
        };

        let log_level = config
            .get_string(LOGGING, "level")
            .map(|l| l.trim().to_ascii_lowercase())
            .unwrap_or(d.log_level);

        Ok(Settings {
            indicators,
            strategies,
            params,
            backtest,
            data,
            report,
            log_level,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::file_config_adapter::FileConfigAdapter;

    #[test]
    fn empty_config_gives_defaults() {
        let adapter = FileConfigAdapter::from_string("[logging]\n").unwrap();
        let settings = Settings::from_config(&adapter).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.strategies, vec!["Bollinger", "Vegas", "RSI", "MACD", "CsMa"]);
        assert_eq!(settings.backtest.cooldown_days, 8);
        assert_eq!(settings.report.chart_days, 90);
    }

    #[test]
    fn upper_case_keys_are_accepted() {
        let adapter = FileConfigAdapter::from_string(
            "[indicators]\nBOLLINGER_PERIOD = 30\nBOLLINGER_STD = 2.5\nVEGAS_EMA1 = 10\n\
             [strategy]\nBOLL_TOLERANCE_UPPER = 0.02\n",
        )
        .unwrap();
        let settings = Settings::from_config(&adapter).unwrap();
        assert_eq!(settings.indicators.bollinger_period, 30);
        assert_eq!(settings.indicators.bollinger_std, 2.5);
        assert_eq!(settings.indicators.vegas_fast, 10);
        assert_eq!(settings.params.boll_tolerance_upper, 0.02);
        assert_eq!(settings.params.boll_tolerance_lower, 0.01);
    }

    #[test]
    fn strategy_list_keeps_order() {
        let adapter =
            FileConfigAdapter::from_string("[strategy]\nstrategies = MACD, RSI ,Bollinger\n")
                .unwrap();
        let settings = Settings::from_config(&adapter).unwrap();
        assert_eq!(settings.strategies, vec!["MACD", "RSI", "Bollinger"]);
    }

    #[test]
    fn data_and_report_sections() {
        let adapter = FileConfigAdapter::from_string(
            "[data]\nitems_dir = /tmp/items\nformat = CSV\n\
             [report]\nchart_days = 30\noutput_dir = out\n\
             [logging]\nlevel = DEBUG\n\
             [backtest]\nlookback_days = 180\ncooldown_days = 3\n",
        )
        .unwrap();
        let settings = Settings::from_config(&adapter).unwrap();
        assert_eq!(settings.data.items_dir, PathBuf::from("/tmp/items"));
        assert_eq!(settings.data.format, DataFormat::Csv);
        assert_eq!(settings.report.chart_days, 30);
        assert_eq!(settings.report.output_dir, PathBuf::from("out"));
        assert_eq!(settings.log_level, "debug");
        assert_eq!(settings.backtest.lookback_days, 180);
        assert_eq!(settings.backtest.cooldown_days, 3);
    }

    #[test]
    fn invalid_values_are_rejected() {
        let adapter = FileConfigAdapter::from_string("[data]\nformat = parquet\n").unwrap();
        let err = Settings::from_config(&adapter).unwrap_err();
        assert!(matches!(err, SkintraderError::ConfigInvalid { ref key, .. } if key == "format"));
    }

    #[test]
    fn data_format_parsing() {
        assert_eq!("json".parse::<DataFormat>(), Ok(DataFormat::Json));
        assert_eq!(" Csv ".parse::<DataFormat>(), Ok(DataFormat::Csv));
        assert!("xml".parse::<DataFormat>().is_err());
        assert_eq!(DataFormat::Csv.to_string(), "csv");
    }
}
