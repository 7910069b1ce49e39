//! skintrader: technical-analysis signal scanner and backtester for
//! marketplace item price histories.
//!
//! Hexagonal architecture: domain logic in [`domain`], port traits in [`ports`],
//! concrete implementations in [`adapters`], command-line shell in [`cli`].

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod cli;
