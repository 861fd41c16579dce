//! Core domain types and logic.

pub mod ohlcv;
pub mod indicator;
pub mod signal;
pub mod idea;
pub mod ledger;
pub mod portfolio;
pub mod settings;
pub mod error;
