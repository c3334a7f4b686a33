//! Domain error types.

use std::fmt;

use crate::domain::ledger::Action;

/// Which of the two signal series an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalSeries {
    Trend,
    Threshold,
}

impl fmt::Display for SignalSeries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignalSeries::Trend => write!(f, "trend"),
            SignalSeries::Threshold => write!(f, "threshold"),
        }
    }
}

/// Malformed simulation input. Raised before any account state exists.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SimulationError {
    #[error("empty input: no bars to simulate")]
    EmptyInput,

    #[error("{series} signal is undefined for every bar")]
    UndefinedSignal { series: SignalSeries },

    #[error("signal length {signals} does not match bar count {bars}")]
    LengthMismatch { bars: usize, signals: usize },

    #[error("initial cash must be positive, got {value}")]
    InvalidInitialCash { value: f64 },

    #[error("close price at bar {index} must be positive, got {price}")]
    InvalidPrice { index: usize, price: f64 },

    #[error("out-of-order trade: expected {expected}, got {actual}")]
    OutOfOrderTrade { expected: Action, actual: Action },
}

/// Top-level error type for signaltester.
#[derive(Debug, thiserror::Error)]
pub enum SignalTesterError {
    #[error("data error: {reason}")]
    Data { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error(transparent)]
    Universe(#[from] crate::domain::universe::UniverseError),

    #[error("no data for {ticker}")]
    NoData { ticker: String },

    /// The simulation bought nothing, so the ticker has no return.
    #[error("no trades for {ticker}")]
    NoTrades { ticker: String },

    #[error(transparent)]
    Simulation(#[from] SimulationError),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&SignalTesterError> for std::process::ExitCode {
    fn from(err: &SignalTesterError) -> Self {
        let code: u8 = match err {
            SignalTesterError::Io(_) | SignalTesterError::Csv(_) => 1,
            SignalTesterError::ConfigParse { .. }
            | SignalTesterError::ConfigMissing { .. }
            | SignalTesterError::ConfigInvalid { .. }
            | SignalTesterError::Universe(_) => 2,
            SignalTesterError::Data { .. } => 3,
            SignalTesterError::Simulation(_) => 4,
            SignalTesterError::NoData { .. } | SignalTesterError::NoTrades { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
