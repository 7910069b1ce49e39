//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_adapter::{CsvAdapter, TIME_FORMAT, write_indicator_csv};
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::json_item_adapter::JsonItemAdapter;
use crate::adapters::markdown_report::MarkdownReportAdapter;
use crate::adapters::notification_text::format_signal_table;
use crate::domain::backtest::{AssetBacktest, BacktestConfig};
use crate::domain::bar::BarSeries;
use crate::domain::error::SkintraderError;
use crate::domain::indicator::IndicatorEngine;
use crate::domain::settings::{DataFormat, DataSettings, Settings};
use crate::domain::signal::{AssetSignals, Signal};
use crate::domain::strategy::Mode;
use crate::domain::strategy_center::StrategyCenter;
use crate::ports::data_port::{AssetHistory, DataPort};
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "skintrader", about = "Trading signal scanner and backtester")]
pub struct Cli {
    /// Overrides `[logging] level` (error, warn, info, debug, trace)
    #[arg(long, global = true)]
    pub log_level: Option<String>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Check the newest bar of every item for signals
    Scan {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        item: Option<String>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Replay full signal history through the cooldown simulator
    Backtest {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        item: Option<String>,
        #[arg(short, long)]
        strategy: Option<String>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print every historical signal for one item
    Signals {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        item: String,
    },
    /// Export indicator columns for one item as CSV
    Indicators {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        item: String,
        #[arg(long)]
        days: Option<usize>,
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    let log_level = cli.log_level;
    match cli.command {
        Command::Scan {
            config,
            item,
            output,
        } => run_scan(&config, log_level, item.as_deref(), output.as_deref()),
        Command::Backtest {
            config,
            item,
            strategy,
            output,
        } => run_backtest(
            &config,
            log_level,
            item.as_deref(),
            strategy.as_deref(),
            output.as_deref(),
        ),
        Command::Signals { config, item } => run_signals(&config, log_level, &item),
        Command::Indicators {
            config,
            item,
            days,
            output,
        } => run_indicators(&config, log_level, &item, days, &output),
        Command::Validate { config } => run_validate(&config),
    }
}

fn fail(err: SkintraderError) -> ExitCode {
    eprintln!("error: {err}");
    (&err).into()
}

/// Installs a stderr subscriber. Safe to call more than once; later calls are no-ops.
pub fn init_logging(level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_new(level)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

pub fn load_settings(path: &Path) -> Result<Settings, SkintraderError> {
    let adapter = FileConfigAdapter::from_file(path)?;
    Settings::from_config(&adapter)
}

fn start(config_path: &Path, log_level: Option<String>) -> Result<Settings, ExitCode> {
    let settings = load_settings(config_path).map_err(fail)?;
    init_logging(log_level.as_deref().unwrap_or(&settings.log_level));
    tracing::info!(config = %config_path.display(), "settings loaded");
    Ok(settings)
}

pub fn open_data_port(data: &DataSettings) -> Box<dyn DataPort> {
    match data.format {
        DataFormat::Json => Box::new(JsonItemAdapter::new(data.items_dir.clone())),
        DataFormat::Csv => Box::new(CsvAdapter::new(data.items_dir.clone())),
    }
}

pub fn build_center(
    settings: &Settings,
    strategy_override: Option<&str>,
) -> Result<StrategyCenter, SkintraderError> {
    let names = match strategy_override {
        Some(name) => vec![name.to_string()],
        None => settings.strategies.clone(),
    };
    let center = StrategyCenter::new(names.as_slice(), &settings.indicators, &settings.params);
    if center.is_empty() {
        return Err(SkintraderError::invalid(
            "strategy",
            "strategies",
            format!("no usable strategy in '{}'", names.join(",")),
        ));
    }
    Ok(center)
}

/// A single requested item, or every stored item.
pub fn resolve_items(
    port: &dyn DataPort,
    item: Option<&str>,
) -> Result<Vec<String>, SkintraderError> {
    let ids = match item {
        Some(id) => vec![id.to_string()],
        None => port.list_assets()?,
    };
    if ids.is_empty() {
        return Err(SkintraderError::NoData {
            item: "*".to_string(),
        });
    }
    Ok(ids)
}

fn load_series(
    port: &dyn DataPort,
    id: &str,
) -> Result<(AssetHistory, BarSeries), SkintraderError> {
    let history = port.load_asset(id)?;
    let series = BarSeries::prepare(&history.bars);
    if series.is_empty() {
        return Err(SkintraderError::NoData {
            item: id.to_string(),
        });
    }
    Ok((history, series))
}

/// `<dir>/<prefix>_<YYYYmmdd_HHMMSS>.md`, stamped with the local time.
pub fn default_report_path(dir: &Path, prefix: &str) -> PathBuf {
    let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    dir.join(format!("{}_{}.md", prefix, stamp))
}

/// Live mode over every item. Items that fail to load are logged and skipped.
pub fn scan_items(
    port: &dyn DataPort,
    center: &StrategyCenter,
    ids: &[String],
) -> Vec<AssetSignals> {
    let mut results = Vec::with_capacity(ids.len());
    for id in ids {
        let (history, series) = match load_series(port, id) {
            Ok(loaded) => loaded,
            Err(e) => {
                tracing::warn!(item = %id, error = %e, "skipping item");
                continue;
            }
        };
        let signals = center.run_prepared(&series, Mode::Newest);
        results.push(AssetSignals {
            id: id.clone(),
            name: history.name,
            last_bar: series.last().cloned(),
            last_updated: history.last_updated,
            signals,
        });
    }
    results
}

pub fn backtest_items(
    port: &dyn DataPort,
    center: &StrategyCenter,
    ids: &[String],
    config: &BacktestConfig,
) -> Vec<AssetBacktest> {
    let mut results = Vec::with_capacity(ids.len());
    for id in ids {
        let (history, series) = match load_series(port, id) {
            Ok(loaded) => loaded,
            Err(e) => {
                tracing::warn!(item = %id, error = %e, "skipping item");
                continue;
            }
        };
        results.push(AssetBacktest {
            id: id.clone(),
            name: history.name,
            reports: center.backtest(&series, config),
        });
    }
    results
}

pub fn format_signal_line(id: &str, name: &str, signal: &Signal) -> String {
    format!(
        "{} {:<4} {:<20} {:>10.2} {} ({})",
        signal.timestamp.format(TIME_FORMAT),
        signal.kind,
        signal.strategy,
        signal.price,
        name,
        id
    )
}

fn run_scan(
    config_path: &Path,
    log_level: Option<String>,
    item: Option<&str>,
    output: Option<&Path>,
) -> ExitCode {
    // Stage 1: Load settings
    let settings = match start(config_path, log_level) {
        Ok(s) => s,
        Err(code) => return code,
    };

    // Stage 2: Build strategies and open the data directory
    let center = match build_center(&settings, None) {
        Ok(c) => c,
        Err(e) => return fail(e),
    };
    let port = open_data_port(&settings.data);
    let ids = match resolve_items(port.as_ref(), item) {
        Ok(ids) => ids,
        Err(e) => return fail(e),
    };

    // Stage 3: Newest-bar detection
    let results = scan_items(port.as_ref(), &center, &ids);
    if results.is_empty() {
        return fail(SkintraderError::NoData {
            item: item.unwrap_or("*").to_string(),
        });
    }

    // Stage 4: Print and persist
    for entry in &results {
        for signal in &entry.signals {
            println!("{}", format_signal_line(&entry.id, &entry.name, signal));
        }
    }
    let table = format_signal_table(&results);
    if table.is_empty() {
        eprintln!("No signals on the newest bar ({} items scanned)", results.len());
    } else {
        println!("\n{}", table);
    }

    let any_signal = results.iter().any(|e| !e.signals.is_empty());
    let path = match output {
        Some(path) => Some(path.to_path_buf()),
        None if any_signal => Some(default_report_path(
            &settings.report.output_dir,
            "signals",
        )),
        None => None,
    };
    if let Some(path) = path {
        let path = path.to_string_lossy();
        if let Err(e) = MarkdownReportAdapter::new().write_signals(&results, &path) {
            return fail(e);
        }
        eprintln!("Signal summary written to: {}", path);
    }
    ExitCode::SUCCESS
}

fn run_backtest(
    config_path: &Path,
    log_level: Option<String>,
    item: Option<&str>,
    strategy: Option<&str>,
    output: Option<&Path>,
) -> ExitCode {
    // Stage 1: Load settings
    let settings = match start(config_path, log_level) {
        Ok(s) => s,
        Err(code) => return code,
    };

    // Stage 2: Build strategies and open the data directory
    let center = match build_center(&settings, strategy) {
        Ok(c) => c,
        Err(e) => return fail(e),
    };
    let port = open_data_port(&settings.data);
    let ids = match resolve_items(port.as_ref(), item) {
        Ok(ids) => ids,
        Err(e) => return fail(e),
    };

    // Stage 3: Simulate
    let results = backtest_items(port.as_ref(), &center, &ids, &settings.backtest);
    if results.is_empty() {
        return fail(SkintraderError::NoData {
            item: item.unwrap_or("*").to_string(),
        });
    }

    // Stage 4: Console summary
    for entry in &results {
        println!("=== {} ({}) ===", entry.name, entry.id);
        for report in &entry.reports {
            let s = &report.stats;
            println!(
                "  {:<20} trades {:>3}  win {:>6.2}%  avg {:>7.2}%  total {:>10.2}  best {:>7.2}%  worst {:>7.2}%  hold {:>5.1}d",
                report.strategy,
                s.total_trades,
                s.win_rate,
                s.avg_profit,
                s.total_profit,
                s.max_profit,
                s.max_loss,
                s.avg_hold_days,
            );
            if let Some(open) = &report.open_position {
                println!(
                    "  {:<20} open since {} at {:.2}",
                    "",
                    open.buy_date.format(TIME_FORMAT),
                    open.buy_price
                );
            }
        }
    }

    // Stage 5: Report
    let path = match output {
        Some(path) => path.to_path_buf(),
        None => default_report_path(&settings.report.output_dir, "backtest"),
    };
    let path = path.to_string_lossy();
    if let Err(e) = MarkdownReportAdapter::new().write_backtests(&results, &path) {
        return fail(e);
    }
    eprintln!("Backtest report written to: {}", path);
    ExitCode::SUCCESS
}

fn run_signals(config_path: &Path, log_level: Option<String>, item: &str) -> ExitCode {
    let settings = match start(config_path, log_level) {
        Ok(s) => s,
        Err(code) => return code,
    };
    let center = match build_center(&settings, None) {
        Ok(c) => c,
        Err(e) => return fail(e),
    };
    let port = open_data_port(&settings.data);
    let (history, series) = match load_series(port.as_ref(), item) {
        Ok(loaded) => loaded,
        Err(e) => return fail(e),
    };

    let mut signals = center.run_prepared(&series, Mode::Full);
    signals.sort_by_key(|s| s.timestamp);
    for signal in &signals {
        println!("{}", format_signal_line(item, &history.name, signal));
    }
    eprintln!("{} signals over {} bars", signals.len(), series.len());
    ExitCode::SUCCESS
}

fn run_indicators(
    config_path: &Path,
    log_level: Option<String>,
    item: &str,
    days: Option<usize>,
    output: &Path,
) -> ExitCode {
    let settings = match start(config_path, log_level) {
        Ok(s) => s,
        Err(code) => return code,
    };
    let port = open_data_port(&settings.data);
    let (_, series) = match load_series(port.as_ref(), item) {
        Ok(loaded) => loaded,
        Err(e) => return fail(e),
    };

    // Computed over the whole history first so the tail keeps warmed-up values.
    let table = IndicatorEngine::new(settings.indicators.clone())
        .compute_all(&series)
        .tail(days.unwrap_or(settings.report.chart_days));

    match write_indicator_csv(output, &table) {
        Ok(()) => {
            eprintln!("Indicators written to: {}", output.display());
            ExitCode::SUCCESS
        }
        Err(e) => fail(e),
    }
}

fn run_validate(config_path: &Path) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let settings = match load_settings(config_path) {
        Ok(s) => s,
        Err(e) => return fail(e),
    };
    init_logging(&settings.log_level);
    let center = match build_center(&settings, None) {
        Ok(c) => c,
        Err(e) => return fail(e),
    };

    eprintln!("Strategies:");
    for strategy in center.strategies() {
        eprintln!(
            "  {} (needs {} bars)",
            strategy.name(),
            strategy.required_bars()
        );
    }
    eprintln!(
        "Data: {} ({})",
        settings.data.items_dir.display(),
        settings.data.format
    );
    eprintln!(
        "Backtest: lookback {} days, cooldown {} days",
        settings.backtest.lookback_days, settings.backtest.cooldown_days
    );
    eprintln!("Configuration is valid");
    ExitCode::SUCCESS
}
