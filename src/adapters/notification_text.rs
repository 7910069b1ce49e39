//! Plain-text notification body for live signals.
//!
//! Signals are grouped by type, then merged per item: the strategies that
//! fired are shown as sorted shorthands (`Boll/MACD`) and every trigger price
//! is listed. Columns are aligned for monospace display where CJK ideographs
//! occupy two cells.

use std::collections::BTreeSet;

use crate::domain::signal::{AssetSignals, SignalKind};
use crate::domain::strategy::StrategyKind;

const HEADER: [&str; 3] = ["Item", "Strategies", "Price"];

struct ItemRow {
    name: String,
    strategies: BTreeSet<&'static str>,
    prices: Vec<f64>,
}

/// Display width of `s`, counting CJK unified ideographs as two cells.
pub fn display_width(s: &str) -> usize {
    s.chars()
        .map(|c| if ('\u{4e00}'..='\u{9fff}').contains(&c) { 2 } else { 1 })
        .sum()
}

fn pad(s: &str, width: usize) -> String {
    let fill = width.saturating_sub(display_width(s));
    format!("{}{}", s, " ".repeat(fill))
}

fn shorthand(label: &str) -> &'static str {
    StrategyKind::from_label(label)
        .map(|k| k.shorthand())
        .unwrap_or("Unknown")
}

fn collect_rows(entries: &[AssetSignals], kind: SignalKind) -> Vec<ItemRow> {
    let mut rows: Vec<ItemRow> = Vec::new();
    for entry in entries {
        for signal in entry.signals.iter().filter(|s| s.kind == kind) {
            let idx = match rows.iter().position(|r| r.name == entry.name) {
                Some(idx) => idx,
                None => {
                    rows.push(ItemRow {
                        name: entry.name.clone(),
                        strategies: BTreeSet::new(),
                        prices: Vec::new(),
                    });
                    rows.len() - 1
                }
            };
            rows[idx].strategies.insert(shorthand(&signal.strategy));
            rows[idx].prices.push(signal.price);
        }
    }
    rows
}

fn render_table(rows: &[ItemRow]) -> Vec<String> {
    let cells: Vec<[String; 3]> = rows
        .iter()
        .map(|r| {
            [
                r.name.clone(),
                r.strategies.iter().copied().collect::<Vec<_>>().join("/"),
                r.prices
                    .iter()
                    .map(|p| format!("{:.2}", p))
                    .collect::<Vec<_>>()
                    .join(", "),
            ]
        })
        .collect();

    let mut widths = HEADER.map(display_width);
    for row in &cells {
        for (w, cell) in widths.iter_mut().zip(row.iter()) {
            *w = (*w).max(display_width(cell));
        }
    }

    let line = |row: [&str; 3]| {
        row.iter()
            .zip(widths.iter())
            .map(|(cell, w)| pad(cell, *w))
            .collect::<Vec<_>>()
            .join(" | ")
            .trim_end()
            .to_string()
    };

    let mut lines = vec![line(HEADER)];
    lines.push(
        widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("-+-"),
    );
    for row in &cells {
        lines.push(line([row[0].as_str(), row[1].as_str(), row[2].as_str()]));
    }
    lines
}

/// Formats live signals into a notification body. Returns an empty string
/// when there is nothing to report.
pub fn format_signal_table(entries: &[AssetSignals]) -> String {
    let mut lines = Vec::new();
    for (kind, title) in [
        (SignalKind::Buy, "Buy Signals"),
        (SignalKind::Sell, "Sell Signals"),
    ] {
        let rows = collect_rows(entries, kind);
        if rows.is_empty() {
            continue;
        }
        if !lines.is_empty() {
            lines.push(String::new());
        }
        lines.push(format!("--- {} ---", title));
        lines.extend(render_table(&rows));
    }
    lines.join("\n")
}
