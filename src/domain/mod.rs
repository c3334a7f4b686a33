//! Core domain types and logic.

pub mod ohlcv;
pub mod signal;
pub mod condition;
pub mod account;
pub mod execution;
pub mod ledger;
pub mod backtest;
pub mod indicator;
pub mod indicator_helpers;
pub mod signal_provider;
pub mod metrics;
pub mod batch;
pub mod universe;
pub mod config_validation;
pub mod error;
