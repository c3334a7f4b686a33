//! Per-ticker performance metrics derived from a simulation result.

use super::ledger::{EquityPoint, SimulationResult};

#[derive(Debug, Clone, PartialEq)]
pub struct Metrics {
    /// (final - initial_cash) / initial_cash
    pub total_return: f64,
    /// Return against the first Buy's notional, in percent. `None` without trades.
    pub ticker_return_pct: Option<f64>,
    pub max_drawdown: f64,
    pub max_drawdown_duration: i64,
    pub round_trips: usize,
    pub trades_won: usize,
    pub trades_lost: usize,
    pub win_rate: f64,
    pub open_position: bool,
}

impl Metrics {
    pub fn compute(result: &SimulationResult) -> Self {
        let initial_cash = result.initial_cash;
        let final_value = result.final_value();

        let total_return = if initial_cash > 0.0 {
            (final_value - initial_cash) / initial_cash
        } else {
            0.0
        };

        let (max_drawdown, max_drawdown_duration) = compute_drawdown(&result.trajectory);

        let mut round_trips = 0usize;
        let mut trades_won = 0usize;
        let mut trades_lost = 0usize;
        for (entry, exit) in result.ledger.round_trips() {
            round_trips += 1;
            if exit.price > entry.price {
                trades_won += 1;
            } else if exit.price < entry.price {
                trades_lost += 1;
            }
        }

        let win_rate = if round_trips > 0 {
            trades_won as f64 / round_trips as f64
        } else {
            0.0
        };

        Metrics {
            total_return,
            ticker_return_pct: result.ticker_return_pct(),
            max_drawdown,
            max_drawdown_duration,
            round_trips,
            trades_won,
            trades_lost,
            win_rate,
            open_position: result.ledger.len() % 2 == 1,
        }
    }
}

fn compute_drawdown(equity_curve: &[EquityPoint]) -> (f64, i64) {
    let Some(first) = equity_curve.first() else {
        return (0.0, 0);
    };

    let mut peak = first.equity;
    let mut max_dd = 0.0_f64;
    let mut max_dd_duration = 0i64;
    let mut current_dd_duration = 0i64;

    for point in equity_curve {
        if point.equity >= peak {
            peak = point.equity;
            current_dd_duration = 0;
        } else if peak > 0.0 {
            let dd = (peak - point.equity) / peak;
            if dd > max_dd {
                max_dd = dd;
            }
            current_dd_duration += 1;
            if current_dd_duration > max_dd_duration {
                max_dd_duration = current_dd_duration;
            }
        }
    }

    (max_dd, max_dd_duration)
}
