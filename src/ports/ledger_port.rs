//! Ledger persistence port trait.

use crate::domain::error::SignalTesterError;
use crate::domain::ledger::SimulationResult;
use std::path::PathBuf;

pub trait LedgerPort {
    /// Persist one ticker's trade ledger, returning where it was written.
    fn write_ledger(
        &self,
        ticker: &str,
        result: &SimulationResult,
    ) -> Result<PathBuf, SignalTesterError>;
}
