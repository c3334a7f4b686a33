//! Signal provider port trait.
//!
//! The engine only sees `(trend, threshold)` pairs; which indicators produce
//! them is decided by the provider.

use crate::domain::ohlcv::OhlcvBar;
use crate::domain::signal::SignalPair;

pub trait SignalProvider: Sync {
    /// Short label for logs, e.g. `TTM_TREND(40) vs SQUEEZE(24,2,1.5,10)`.
    fn describe(&self) -> String;

    /// One signal pair per bar, aligned with `bars`.
    fn signals(&self, bars: &[OhlcvBar]) -> Vec<SignalPair>;
}
