//! Configuration validation.
//!
//! Checks every configured value before any asset is loaded. Absent keys
//! fall back to defaults and are always valid.

use crate::domain::error::SkintraderError;
use crate::domain::settings::{BACKTEST, DATA, DataFormat, INDICATORS, LOGGING, REPORT, STRATEGY};
use crate::ports::config_port::ConfigPort;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

pub fn validate_config(config: &dyn ConfigPort) -> Result<(), SkintraderError> {
    validate_numeric_values(config)?;
    validate_indicator_periods(config)?;
    validate_indicator_ordering(config)?;
    validate_bollinger_std(config)?;
    validate_tolerances(config)?;
    validate_rsi_thresholds(config)?;
    validate_strategy_list(config)?;
    validate_backtest_days(config)?;
    validate_data_format(config)?;
    validate_chart_days(config)?;
    validate_log_level(config)?;
    Ok(())
}

/// `ConfigPort` getters silently fall back to defaults on garbage, so reject
/// unparseable numbers here instead.
fn validate_numeric_values(config: &dyn ConfigPort) -> Result<(), SkintraderError> {
    let integer_keys: &[(&str, &[&str])] = &[
        (
            INDICATORS,
            &[
                "bollinger_period",
                "vegas_ema1",
                "vegas_ema2",
                "vegas_ema3",
                "volume_ma1",
                "volume_ma2",
                "volume_ma3",
                "rsi_period",
                "macd_fast",
                "macd_slow",
                "macd_signal",
                "csma_fast",
                "csma_medium",
                "csma_slow",
            ],
        ),
        (BACKTEST, &["lookback_days", "cooldown_days"]),
        (REPORT, &["chart_days"]),
    ];
    for (section, keys) in integer_keys {
        for key in *keys {
            if let Some(raw) = config.get_string(section, key) {
                if raw.trim().parse::<i64>().is_err() {
                    return Err(SkintraderError::invalid(section, key, "expected an integer"));
                }
            }
        }
    }

    let float_keys: &[(&str, &str)] = &[
        (INDICATORS, "bollinger_std"),
        (STRATEGY, "boll_tolerance_upper"),
        (STRATEGY, "boll_tolerance_lower"),
        (STRATEGY, "rsi_oversold"),
        (STRATEGY, "rsi_overbought"),
    ];
    for (section, key) in float_keys {
        if let Some(raw) = config.get_string(section, key) {
            if !raw.trim().parse::<f64>().is_ok_and(f64::is_finite) {
                return Err(SkintraderError::invalid(section, key, "expected a number"));
            }
        }
    }
    Ok(())
}

fn validate_indicator_periods(config: &dyn ConfigPort) -> Result<(), SkintraderError> {
    let minimums: [(&str, i64, i64); 14] = [
        ("bollinger_period", 20, 2),
        ("vegas_ema1", 12, 1),
        ("vegas_ema2", 144, 1),
        ("vegas_ema3", 169, 1),
        ("volume_ma1", 5, 1),
        ("volume_ma2", 10, 1),
        ("volume_ma3", 20, 1),
        ("rsi_period", 14, 1),
        ("macd_fast", 12, 1),
        ("macd_slow", 26, 1),
        ("macd_signal", 9, 1),
        ("csma_fast", 7, 1),
        ("csma_medium", 56, 1),
        ("csma_slow", 112, 1),
    ];
    for (key, default, min) in minimums {
        if config.get_int(INDICATORS, key, default) < min {
            return Err(SkintraderError::invalid(
                INDICATORS,
                key,
                format!("{} must be at least {}", key, min),
            ));
        }
    }
    Ok(())
}

fn validate_indicator_ordering(config: &dyn ConfigPort) -> Result<(), SkintraderError> {
    let chains: [&[(&str, i64)]; 3] = [
        &[("vegas_ema1", 12), ("vegas_ema2", 144), ("vegas_ema3", 169)],
        &[("macd_fast", 12), ("macd_slow", 26)],
        &[("csma_fast", 7), ("csma_medium", 56), ("csma_slow", 112)],
    ];
    for chain in chains {
        for pair in chain.windows(2) {
            let (lower_key, lower_default) = pair[0];
            let (upper_key, upper_default) = pair[1];
            let lower = config.get_int(INDICATORS, lower_key, lower_default);
            let upper = config.get_int(INDICATORS, upper_key, upper_default);
            if lower >= upper {
                return Err(SkintraderError::invalid(
                    INDICATORS,
                    lower_key,
                    format!("{} must be less than {}", lower_key, upper_key),
                ));
            }
        }
    }
    Ok(())
}

fn validate_bollinger_std(config: &dyn ConfigPort) -> Result<(), SkintraderError> {
    let value = config.get_double(INDICATORS, "bollinger_std", 2.0);
    if value <= 0.0 {
        return Err(SkintraderError::invalid(
            INDICATORS,
            "bollinger_std",
            "bollinger_std must be positive",
        ));
    }
    Ok(())
}

fn validate_tolerances(config: &dyn ConfigPort) -> Result<(), SkintraderError> {
    for key in ["boll_tolerance_upper", "boll_tolerance_lower"] {
        let value = config.get_double(STRATEGY, key, 0.01);
        if !(0.0..1.0).contains(&value) {
            return Err(SkintraderError::invalid(
                STRATEGY,
                key,
                format!("{} must be between 0 and 1", key),
            ));
        }
    }
    Ok(())
}

fn validate_rsi_thresholds(config: &dyn ConfigPort) -> Result<(), SkintraderError> {
    let oversold = config.get_double(STRATEGY, "rsi_oversold", 35.0);
    let overbought = config.get_double(STRATEGY, "rsi_overbought", 75.0);
    for (key, value) in [("rsi_oversold", oversold), ("rsi_overbought", overbought)] {
        if !(0.0..=100.0).contains(&value) {
            return Err(SkintraderError::invalid(
                STRATEGY,
                key,
                format!("{} must be between 0 and 100", key),
            ));
        }
    }
    if oversold >= overbought {
        return Err(SkintraderError::invalid(
            STRATEGY,
            "rsi_oversold",
            "rsi_oversold must be below rsi_overbought",
        ));
    }
    Ok(())
}

fn validate_strategy_list(config: &dyn ConfigPort) -> Result<(), SkintraderError> {
    match config.get_list(STRATEGY, "strategies") {
        Some(list) if list.is_empty() => Err(SkintraderError::invalid(
            STRATEGY,
            "strategies",
            "at least one strategy must be listed",
        )),
        _ => Ok(()),
    }
}

fn validate_backtest_days(config: &dyn ConfigPort) -> Result<(), SkintraderError> {
    for (key, default) in [("lookback_days", 0), ("cooldown_days", 8)] {
        if config.get_int(BACKTEST, key, default) < 0 {
            return Err(SkintraderError::invalid(
                BACKTEST,
                key,
                format!("{} must be non-negative", key),
            ));
        }
    }
    Ok(())
}

fn validate_data_format(config: &dyn ConfigPort) -> Result<(), SkintraderError> {
    match config.get_string(DATA, "format") {
        Some(raw) => raw
            .parse::<DataFormat>()
            .map(|_| ())
            .map_err(|reason| SkintraderError::invalid(DATA, "format", reason)),
        None => Ok(()),
    }
}

fn validate_chart_days(config: &dyn ConfigPort) -> Result<(), SkintraderError> {
    if config.get_int(REPORT, "chart_days", 90) < 1 {
        return Err(SkintraderError::invalid(
            REPORT,
            "chart_days",
            "chart_days must be at least 1",
        ));
    }
    Ok(())
}

fn validate_log_level(config: &dyn ConfigPort) -> Result<(), SkintraderError> {
    match config.get_string(LOGGING, "level") {
        Some(level) if !LOG_LEVELS.contains(&level.trim().to_ascii_lowercase().as_str()) => {
            Err(SkintraderError::invalid(
                LOGGING,
                "level",
                format!("level must be one of {}", LOG_LEVELS.join(", ")),
            ))
        }
        _ => Ok(()),
    }
}
