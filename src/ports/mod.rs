//! Port traits the domain depends on; adapters implement them.

pub mod config_port;
pub mod data_port;
pub mod ledger_port;
pub mod signal_port;
