//! Market data access port trait.

use crate::domain::error::SignalTesterError;
use crate::domain::ohlcv::OhlcvBar;
use chrono::NaiveDate;

/// Source of daily bars. Shared across worker threads during a batch run.
pub trait DataPort: Sync {
    /// Bars for `ticker` within `[start_date, end_date]`, sorted by date.
    fn fetch_ohlcv(
        &self,
        ticker: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<OhlcvBar>, SignalTesterError>;

    fn list_symbols(&self) -> Result<Vec<String>, SignalTesterError>;
}
