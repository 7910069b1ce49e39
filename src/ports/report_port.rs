//! Report generation port trait.

use crate::domain::backtest::AssetBacktest;
use crate::domain::error::SkintraderError;
use crate::domain::signal::AssetSignals;

/// Port for writing scan and backtest reports.
pub trait ReportPort {
    fn write_signals(
        &self,
        entries: &[AssetSignals],
        output_path: &str,
    ) -> Result<(), SkintraderError>;

    fn write_backtests(
        &self,
        entries: &[AssetBacktest],
        output_path: &str,
    ) -> Result<(), SkintraderError>;
}
