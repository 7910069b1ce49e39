//! Concrete adapter implementations for ports.

pub mod csv_adapter;
pub mod file_config_adapter;
pub mod json_item_adapter;
pub mod markdown_report;
pub mod notification_text;
