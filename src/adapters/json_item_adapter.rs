//! JSON item directory adapter.
//!
//! Each asset lives in `<items_dir>/<id>.json`, either as an envelope
//! `{"name": .., "data": [..], "last_updated": ..}` or as a bare array of rows.

use crate::domain::bar::RawBar;
use crate::domain::error::SkintraderError;
use crate::ports::data_port::{AssetHistory, DataPort};
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

const EXTENSION: &str = ".json";

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ItemFile {
    Envelope {
        name: Option<String>,
        #[serde(default)]
        data: Vec<RawBar>,
        last_updated: Option<serde_json::Value>,
    },
    Bare(Vec<RawBar>),
}

pub struct JsonItemAdapter {
    dir: PathBuf,
}

impl JsonItemAdapter {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn item_path(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{}{}", id, EXTENSION))
    }
}

pub(crate) fn default_name(id: &str) -> String {
    format!("Item-{}", id)
}

fn stamp_to_string(value: serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

impl DataPort for JsonItemAdapter {
    fn list_assets(&self) -> Result<Vec<String>, SkintraderError> {
        let entries = fs::read_dir(&self.dir).map_err(|e| SkintraderError::DataLoad {
            reason: format!("failed to read directory {}: {}", self.dir.display(), e),
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
        let path = self.item_path(id);
        if !path.exists() {
            return Err(SkintraderError::NoData {
                item: id.to_string(),
            });
        }
        let content = fs::read_to_string(&path).map_err(|e| SkintraderError::DataLoad {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let parsed: ItemFile =
            serde_json::from_str(&content).map_err(|e| SkintraderError::DataLoad {
                reason: format!("invalid JSON in {}: {}", path.display(), e),
            })?;

        let (name, bars, last_updated) = match parsed {
            ItemFile::Envelope {
                name,
                data,
                last_updated,
            } => (name, data, last_updated.and_then(stamp_to_string)),
            ItemFile::Bare(data) => (None, data, None),
        };

        if bars.is_empty() {
            return Err(SkintraderError::NoData {
                item: id.to_string(),
            });
        }

        tracing::debug!(item = id, rows = bars.len(), "loaded item history");
        Ok(AssetHistory {
            id: id.to_string(),
            name: name
                .filter(|n| !n.trim().is_empty())
                .unwrap_or_else(|| default_name(id)),
            bars,
            last_updated,
        })
    }
}
