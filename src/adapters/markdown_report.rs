//! Markdown report adapter implementing ReportPort.
//!
//! Writes the live signal summary table and per-asset backtest tables.

use std::fs;
use std::path::Path;

use crate::adapters::csv_adapter::TIME_FORMAT;
use crate::domain::backtest::{AssetBacktest, BacktestReport};
use crate::domain::error::SkintraderError;
use crate::domain::signal::{AssetSignals, Signal, SignalKind};
use crate::ports::report_port::ReportPort;

const MARKDOWN_SPECIAL: [char; 15] = [
    '|', '*', '`', '_', '{', '}', '[', ']', '(', ')', '#', '+', '-', '.', '!',
];

/// Replaces characters that break markdown tables with spaces and collapses
/// runs of whitespace.
pub fn clean_item_name(name: &str) -> String {
    let replaced: String = name
        .chars()
        .map(|c| if MARKDOWN_SPECIAL.contains(&c) { ' ' } else { c })
        .collect();
    replaced.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn kind_label(kind: SignalKind) -> &'static str {
    match kind {
        SignalKind::Buy => "Buy",
        SignalKind::Sell => "Sell",
    }
}

fn render_details(signal: &Signal) -> String {
    signal
        .details
        .iter()
        .map(|(k, v)| format!("{} {}", clean_item_name(k), v))
        .collect::<Vec<_>>()
        .join(", ")
}

/// One row per signal; assets without signals are left out.
pub fn render_signal_summary(entries: &[AssetSignals]) -> String {
    let mut output = String::from("# Signal Summary\n\n");
    let total: usize = entries.iter().map(|e| e.signals.len()).sum();
    if total == 0 {
        output.push_str("No signals.\n");
        return output;
    }

    output.push_str(
        "| Item ID | Name | Type | Strategy | Price | Open | Close | Details | Volume | Time | Updated |\n",
    );
    output.push_str("| --- | --- | --- | --- | --- | --- | --- | --- | --- | --- | --- |\n");

    for entry in entries {
        let name = clean_item_name(&entry.name);
        let updated = entry.last_updated.as_deref().unwrap_or("-");
        for signal in &entry.signals {
            let bar = entry
                .last_bar
                .as_ref()
                .filter(|b| b.timestamp == signal.timestamp);
            let (open, close, volume) = match bar {
                Some(b) => (
                    format!("{:.2}", b.open),
                    format!("{:.2}", b.close),
                    format!("{}", b.volume as i64),
                ),
                None => ("-".into(), "-".into(), "-".into()),
            };
            output.push_str(&format!(
                "| {} | {} | {} | {} | {:.2} | {} | {} | {} | {} | {} | {} |\n",
                entry.id,
                name,
                kind_label(signal.kind),
                signal.strategy,
                signal.price,
                open,
                close,
                render_details(signal),
                volume,
                signal.timestamp.format(TIME_FORMAT),
                updated,
            ));
        }
    }

    output
}

fn render_report(report: &BacktestReport) -> String {
    let stats = &report.stats;
    let mut output = format!("### {}\n\n", report.strategy);
    output.push_str(&format!(
        "Trades: {} | Win rate: {:.2}% | Avg: {:.2}% | Total profit: {:.2} | Best: {:.2}% | Worst: {:.2}% | Avg hold: {:.1} days\n\n",
        stats.total_trades,
        stats.win_rate,
        stats.avg_profit,
        stats.total_profit,
        stats.max_profit,
        stats.max_loss,
        stats.avg_hold_days,
    ));

    if report.trades.is_empty() {
        output.push_str("No completed trades.\n\n");
    } else {
        output.push_str("| # | Buy Date | Buy Price | Sell Date | Sell Price | Profit | Profit % | Days |\n");
        output.push_str("| --- | --- | --- | --- | --- | --- | --- | --- |\n");
        for (i, trade) in report.trades.iter().enumerate() {
            output.push_str(&format!(
                "| {} | {} | {:.2} | {} | {:.2} | {:.2} | {:.2}% | {} |\n",
                i + 1,
                trade.buy_date.format(TIME_FORMAT),
                trade.buy_price,
                trade.sell_date.format(TIME_FORMAT),
                trade.sell_price,
                trade.profit,
                trade.profit_percent,
                trade.hold_days(),
            ));
        }
        output.push('\n');
    }

    if let Some(open) = &report.open_position {
        output.push_str(&format!(
            "Open position: bought {} at {:.2}\n\n",
            open.buy_date.format(TIME_FORMAT),
            open.buy_price
        ));
    }

    output
}

pub fn render_backtests(entries: &[AssetBacktest]) -> String {
    let mut output = String::from("# Backtest Report\n\n");
    if entries.is_empty() {
        output.push_str("No items.\n");
        return output;
    }
    for entry in entries {
        output.push_str(&format!(
            "## {} ({})\n\n",
            clean_item_name(&entry.name),
            entry.id
        ));
        for report in &entry.reports {
            output.push_str(&render_report(report));
        }
    }
    output
}

pub struct MarkdownReportAdapter;

impl MarkdownReportAdapter {
    pub fn new() -> Self {
        Self
    }

    fn write(content: &str, output_path: &str) -> Result<(), SkintraderError> {
        let path = Path::new(output_path);
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)?;
        tracing::info!(path = output_path, "report written");
        Ok(())
    }
}

impl Default for MarkdownReportAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportPort for MarkdownReportAdapter {
    fn write_signals(
        &self,
        entries: &[AssetSignals],
        output_path: &str,
    ) -> Result<(), SkintraderError> {
        Self::write(&render_signal_summary(entries), output_path)
    }

    fn write_backtests(
        &self,
        entries: &[AssetBacktest],
        output_path: &str,
    ) -> Result<(), SkintraderError> {
        Self::write(&render_backtests(entries), output_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::backtest::{OpenPosition, Trade};
    use crate::domain::bar::Bar;
    use crate::domain::metrics::Stats;
    use crate::domain::signal::{ChartPanel, details};
    use chrono::{DateTime, NaiveDateTime};
    use tempfile::TempDir;

    fn ts(secs: i64) -> NaiveDateTime {
        DateTime::from_timestamp(secs, 0).unwrap().naive_utc()
    }

    fn sample_entry() -> AssetSignals {
        let t = ts(1_700_000_000);
        AssetSignals {
            id: "525873303".into(),
            name: "AK-47 | Redline (Field-Tested)".into(),
            last_bar: Some(Bar {
                timestamp: t,
                open: 84.0,
                close: 86.5,
                high: 88.0,
                low: 85.0,
                volume: 1234.7,
                amount: 0.0,
            }),
            last_updated: Some("2023-11-15 08:00:00".into()),
            signals: vec![Signal {
                strategy: "Bollinger_20_2".into(),
                kind: SignalKind::Buy,
                price: 85.0,
                timestamp: t,
                panel: ChartPanel::Main,
                details: details([("lower_band", 85.49.into())]),
            }],
        }
    }

    #[test]
    fn clean_item_name_strips_markdown() {
        assert_eq!(
            clean_item_name("AK-47 | Redline (Field-Tested)"),
            "AK 47 Redline Field Tested"
        );
        assert_eq!(clean_item_name("  **Star**  Knife!  "), "Star Knife");
        assert_eq!(clean_item_name("印花 | 战队"), "印花 战队");
        assert_eq!(clean_item_name(""), "");
    }

    #[test]
    fn signal_summary_has_row_per_signal() {
        let md = render_signal_summary(&[sample_entry()]);
        assert!(md.starts_with("# Signal Summary"));
        assert!(md.contains("| Item ID | Name | Type |"));
        assert!(md.contains(
            "| 525873303 | AK 47 Redline Field Tested | Buy | Bollinger_20_2 | 85.00 | 84.00 | 86.50 | lower band 85.49 | 1234 | 2023-11-14 22:13:20 | 2023-11-15 08:00:00 |"
        ));
    }

    #[test]
    fn signal_summary_marks_unknown_refresh_time() {
        let mut entry = sample_entry();
        entry.last_updated = None;
        let md = render_signal_summary(&[entry]);
        assert!(md.contains("| 2023-11-14 22:13:20 | - |"));
    }

    #[test]
    fn signal_summary_without_signals() {
        let mut entry = sample_entry();
        entry.signals.clear();
        assert_eq!(render_signal_summary(&[entry]), "# Signal Summary\n\nNo signals.\n");
    }

    #[test]
    fn backtest_report_lists_trades_and_open_position() {
        let trade = Trade {
            buy_date: ts(1_700_000_000),
            buy_price: 100.0,
            sell_date: ts(1_700_000_000 + 10 * 86_400),
            sell_price: 110.0,
            profit: 10.0,
            profit_percent: 10.0,
        };
        let stats = Stats::compute(std::slice::from_ref(&trade));
        let entry = AssetBacktest {
            id: "1".into(),
            name: "Case".into(),
            reports: vec![BacktestReport {
                strategy: "RSI_35_75".into(),
                trades: vec![trade],
                open_position: Some(OpenPosition {
                    buy_date: ts(1_700_000_000 + 20 * 86_400),
                    buy_price: 95.0,
                }),
                stats,
            }],
        };
        let md = render_backtests(&[entry]);
        assert!(md.contains("## Case (1)"));
        assert!(md.contains("### RSI_35_75"));
        assert!(md.contains("Trades: 1 | Win rate: 100.00%"));
        assert!(md.contains("| 1 | 2023-11-14 22:13:20 | 100.00 |"));
        assert!(md.contains("| 10.00 | 10.00% | 10 |"));
        assert!(md.contains("Open position: bought"));
    }

    #[test]
    fn write_signals_creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("signals").join("summary.md");
        let adapter = MarkdownReportAdapter::new();
        adapter
            .write_signals(&[sample_entry()], path.to_str().unwrap())
            .unwrap();
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("525873303"));
    }
}
