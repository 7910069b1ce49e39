//! CSV file data adapter.
//!
//! Reads `<id>.csv` files with the header `time,open,close,high,low,volume,amount`
//! and writes indicator tables for charting.

use crate::adapters::json_item_adapter::default_name;
use crate::domain::bar::{RAW_FIELDS, RawBar, RawValue};
use crate::domain::error::SkintraderError;
use crate::domain::indicator::IndicatorTable;
use crate::ports::data_port::{AssetHistory, DataPort};
use std::fs;
use std::path::{Path, PathBuf};

const EXTENSION: &str = ".csv";
pub(crate) const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, id: &str) -> PathBuf {
        self.base_path.join(format!("{}{}", id, EXTENSION))
    }
}

impl DataPort for CsvAdapter {
    fn list_assets(&self) -> Result<Vec<String>, SkintraderError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| SkintraderError::DataLoad {
            reason: format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ),
        })?;

        let mut ids = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| SkintraderError::DataLoad {
                reason: format!("directory entry error: {}", e),
            })?;

            let name = entry.file_name();
            let name_str = name.to_string_lossy();
            if let Some(id) = name_str.strip_suffix(EXTENSION) {
                if !id.is_empty() {
                    ids.push(id.to_string());
                }
            }
        }

        ids.sort();
        Ok(ids)
    }

    fn load_asset(&self, id: &str) -> Result<AssetHistory, SkintraderError> {
        let path = self.csv_path(id);
        if !path.exists() {
            return Err(SkintraderError::NoData {
                item: id.to_string(),
            });
        }
        let content = fs::read_to_string(&path).map_err(|e| SkintraderError::DataLoad {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(content.as_bytes());
        let mut bars = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| SkintraderError::DataLoad {
                reason: format!("CSV parse error: {}", e),
            })?;

            // Fields stay untyped here; coercion happens in BarSeries::prepare.
            let row = (0..RAW_FIELDS)
                .map(|i| {
                    record
                        .get(i)
                        .map(str::trim)
                        .filter(|s| !s.is_empty())
                        .map(|s| RawValue::Text(s.to_string()))
                })
                .collect();
            bars.push(RawBar::Row(row));
        }

        if bars.is_empty() {
            return Err(SkintraderError::NoData {
                item: id.to_string(),
            });
        }

        Ok(AssetHistory {
            id: id.to_string(),
            name: default_name(id),
            bars,
            last_updated: None,
        })
    }
}

/// Writes bars and indicator columns as CSV. Undefined values become empty cells.
pub fn write_indicator_csv(path: &Path, table: &IndicatorTable) -> Result<(), SkintraderError> {
    let write_err = |e: csv::Error| SkintraderError::DataLoad {
        reason: format!("failed to write {}: {}", path.display(), e),
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let mut wtr = csv::Writer::from_path(path).map_err(write_err)?;

    let mut header: Vec<String> = ["time", "open", "close", "high", "low", "volume", "amount"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    header.extend(table.columns.iter().map(|c| c.indicator_type.to_string()));
    wtr.write_record(&header).map_err(write_err)?;

    for (i, bar) in table.bars.iter().enumerate() {
        let mut record = vec![
            bar.timestamp.format(TIME_FORMAT).to_string(),
            bar.open.to_string(),
            bar.close.to_string(),
            bar.high.to_string(),
            bar.low.to_string(),
            bar.volume.to_string(),
            bar.amount.to_string(),
        ];
        for column in &table.columns {
            let cell = match column.get(i) {
                Some(v) => format!("{:.4}", v),
                None => String::new(),
            };
            record.push(cell);
        }
        wtr.write_record(&record).map_err(write_err)?;
    }

    wtr.flush()?;
    tracing::info!(path = %path.display(), rows = table.len(), "wrote indicator table");
    Ok(())
}
