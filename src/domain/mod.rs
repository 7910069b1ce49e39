//! Core domain types and logic.

pub mod bar;
pub mod indicator;
pub mod signal;
pub mod strategy;
pub mod strategy_center;
pub mod backtest;
pub mod metrics;
pub mod settings;
pub mod config_validation;
pub mod error;
