#![allow(dead_code)]

use skintrader::domain::bar::RawBar;
use skintrader::domain::error::SkintraderError;
use skintrader::ports::data_port::{AssetHistory, DataPort};
use std::collections::HashMap;
use std::path::Path;

pub const T0: i64 = 1_700_000_000;
pub const DAY: i64 = 86_400;

pub struct MockDataPort {
    pub data: HashMap<String, AssetHistory>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_history(mut self, id: &str, name: &str, bars: Vec<RawBar>) -> Self {
        self.data.insert(
            id.to_string(),
            AssetHistory {
                id: id.to_string(),
                name: name.to_string(),
                bars,
                last_updated: None,
            },
        );
        self
    }

    pub fn with_error(mut self, id: &str, reason: &str) -> Self {
        self.errors.insert(id.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn list_assets(&self) -> Result<Vec<String>, SkintraderError> {
        let mut ids: Vec<String> = self
            .data
            .keys()
            .chain(self.errors.keys())
            .cloned()
            .collect();
        ids.sort();
        ids.dedup();
        Ok(ids)
    }

    fn load_asset(&self, id: &str) -> Result<AssetHistory, SkintraderError> {
        if let Some(reason) = self.errors.get(id) {
            return Err(SkintraderError::DataLoad {
                reason: reason.clone(),
            });
        }
        self.data
            .get(id)
            .cloned()
            .ok_or_else(|| SkintraderError::NoData {
                item: id.to_string(),
            })
    }
}

/// Daily bar `i` with the given close; open/high/low hug the close.
pub fn make_raw_bar(i: usize, close: f64) -> RawBar {
    RawBar::from_values([
        (T0 + i as i64 * DAY) as f64,
        close - 0.5,
        close,
        close + 1.0,
        close - 1.0,
        100.0 + i as f64,
        close * 10.0,
    ])
}

pub fn raw_from_closes(closes: &[f64]) -> Vec<RawBar> {
    closes
        .iter()
        .enumerate()
        .map(|(i, c)| make_raw_bar(i, *c))
        .collect()
}

/// Oscillating closes that trip RSI thresholds repeatedly.
pub fn sine_closes(n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| 100.0 + (i as f64 * 0.1).sin() * 20.0)
        .collect()
}

/// Writes `<dir>/<id>.json` in the envelope format.
pub fn write_json_item(dir: &Path, id: &str, name: &str, closes: &[f64]) {
    let rows: Vec<String> = closes
        .iter()
        .enumerate()
        .map(|(i, c)| {
            format!(
                "[{}, {}, {}, {}, {}, {}, {}]",
                T0 + i as i64 * DAY,
                c - 0.5,
                c,
                c + 1.0,
                c - 1.0,
                100 + i,
                c * 10.0
            )
        })
        .collect();
    let body = format!(
        "{{\"name\": \"{}\", \"last_updated\": \"2024-01-01 00:00:00\", \"data\": [{}]}}",
        name,
        rows.join(",")
    );
    std::fs::write(dir.join(format!("{}.json", id)), body).unwrap();
}

pub fn write_ini(dir: &Path, content: &str) -> std::path::PathBuf {
    let path = dir.join("settings.ini");
    std::fs::write(&path, content).unwrap();
    path
}
