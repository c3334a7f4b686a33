//! Single-ticker simulation engine.
//!
//! Walks the bars in date order from the first bar at which both signals
//! are defined. Each bar evaluates the entry guard, then the exit guard,
//! against the account state left by the previous bar, and records
//! `cash + quantity * close` into the trajectory whether or not a trade fired.
//!
//! BacktestConfig holds the per-run parameters shared by every ticker.

use chrono::NaiveDate;
use tracing::debug;

use super::account::Account;
use super::condition::{Condition, evaluate_conditions};
use super::error::SimulationError;
use super::execution::{enter_long, exit_long};
use super::ledger::{EquityPoint, Ledger, SimulationResult};
use super::ohlcv::OhlcvBar;
use super::signal::{SignalPair, start_index};

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestConfig {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub initial_cash: f64,
    pub parallel: bool,
}

/// Run the trading rule over one ticker's bars.
///
/// `signals` must be aligned with `bars` index for index. Input is checked
/// up front; on success the run cannot fail and is fully deterministic.
pub fn simulate(
    bars: &[OhlcvBar],
    signals: &[SignalPair],
    initial_cash: f64,
) -> Result<SimulationResult, SimulationError> {
    if bars.is_empty() {
        return Err(SimulationError::EmptyInput);
    }
    if signals.len() != bars.len() {
        return Err(SimulationError::LengthMismatch {
            bars: bars.len(),
            signals: signals.len(),
        });
    }
    if !(initial_cash.is_finite() && initial_cash > 0.0) {
        return Err(SimulationError::InvalidInitialCash {
            value: initial_cash,
        });
    }

    let start = start_index(signals)?;

    if let Some((index, bar)) = bars
        .iter()
        .enumerate()
        .skip(start)
        .find(|(_, b)| !(b.close.is_finite() && b.close > 0.0))
    {
        return Err(SimulationError::InvalidPrice {
            index,
            price: bar.close,
        });
    }

    let conditions = evaluate_conditions(&signals[start..]);
    run_bars(&bars[start..], &conditions, start, initial_cash)
}

fn run_bars(
    bars: &[OhlcvBar],
    conditions: &[Condition],
    start_index: usize,
    initial_cash: f64,
) -> Result<SimulationResult, SimulationError> {
    let mut account = Account::new(initial_cash);
    let mut ledger = Ledger::new();
    let mut trajectory = Vec::with_capacity(bars.len());

    for (bar, condition) in bars.iter().zip(conditions) {
        if condition.buy && account.can_buy() {
            let tx = enter_long(&mut account, bar.date, bar.close);
            debug!(
                code = %bar.code,
                date = %bar.date,
                price = bar.close,
                quantity = tx.quantity,
                "buy"
            );
            ledger.record(tx)?;
        } else if condition.sell && account.can_sell() {
            let tx = exit_long(&mut account, bar.date, bar.close);
            debug!(
                code = %bar.code,
                date = %bar.date,
                price = bar.close,
                cash = tx.cash,
                "sell"
            );
            ledger.record(tx)?;
        }

        trajectory.push(EquityPoint {
            date: bar.date,
            equity: account.value_at(bar.close),
        });
    }

    Ok(SimulationResult {
        start_index,
        initial_cash,
        ledger,
        trajectory,
    })
}
