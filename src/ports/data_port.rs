//! Asset history access port trait.

use crate::domain::bar::RawBar;
use crate::domain::error::SkintraderError;

/// One asset's unprepared price history as delivered by storage.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetHistory {
    pub id: String,
    pub name: String,
    pub bars: Vec<RawBar>,
    pub last_updated: Option<String>,
}

pub trait DataPort {
    /// Identifiers of every stored asset, sorted.
    fn list_assets(&self) -> Result<Vec<String>, SkintraderError>;

    fn load_asset(&self, id: &str) -> Result<AssetHistory, SkintraderError>;
}
