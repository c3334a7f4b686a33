//! Property tests for simulation engine invariants.
//!
//! Uses proptest to verify:
//! 1. Ledger alternation: entries alternate and the first is always a Buy
//! 2. Buy sizing: whole shares only, remainder stays in cash
//! 3. Trajectory accounting: every point equals the replayed ledger marked to its close
//! 4. Warmup skip: nothing happens before both signals are defined
//! 5. Determinism: identical inputs give identical results

mod common;

use common::*;
use proptest::prelude::*;
use signaltester::domain::backtest::simulate;
use signaltester::domain::execution::affordable_quantity;
use signaltester::domain::ledger::Action;

// ── Strategies (proptest) ────────────────────────────────────────────

fn arb_price() -> impl Strategy<Value = f64> {
    (1.0..500.0_f64).prop_map(|p| (p * 100.0).round() / 100.0)
}

fn arb_cash() -> impl Strategy<Value = f64> {
    (100.0..1_000_000.0_f64).prop_map(|c| (c * 100.0).round() / 100.0)
}

/// `(close, signal)` per bar, signal in {-1, 0, 1}.
fn arb_script(max_len: usize) -> impl Strategy<Value = Vec<(f64, f64)>> {
    prop::collection::vec((arb_price(), -1i8..=1), 1..max_len)
        .prop_map(|v| v.into_iter().map(|(p, s)| (p, s as f64)).collect())
}

fn pairs_for(bars: &[OhlcvBar]) -> Vec<SignalPair> {
    bars.iter()
        .map(|b| SignalPair::defined(b.open, b.close))
        .collect()
}

// ── 1. Ledger alternation ────────────────────────────────────────────

proptest! {
    #[test]
    fn ledger_alternates_starting_with_buy(script in arb_script(80), cash in arb_cash()) {
        let bars = scripted_bars("PROP", date(2022, 1, 3), &script);
        let result = simulate(&bars, &pairs_for(&bars), cash).unwrap();

        prop_assert!(result.ledger.is_alternating());
        if let Some(first) = result.transactions().first() {
            prop_assert_eq!(first.action, Action::Buy);
        }
        for tx in result.transactions() {
            if tx.action == Action::Sell {
                prop_assert_eq!(tx.quantity, 0);
            }
        }
    }
}

// ── 2. Buy sizing ────────────────────────────────────────────────────

proptest! {
    #[test]
    fn buys_spend_whole_shares_only(script in arb_script(80), cash in arb_cash()) {
        let bars = scripted_bars("PROP", date(2022, 1, 3), &script);
        let result = simulate(&bars, &pairs_for(&bars), cash).unwrap();

        let mut cash_before = cash;
        for tx in result.transactions() {
            match tx.action {
                Action::Buy => {
                    let expected_qty = affordable_quantity(cash_before, tx.price);
                    prop_assert_eq!(tx.quantity, expected_qty);
                    prop_assert!((tx.cash - (cash_before - expected_qty as f64 * tx.price)).abs() < 1e-6);
                    prop_assert!(tx.cash >= 0.0);
                    prop_assert!(tx.cash < tx.price + 1e-6);
                }
                Action::Sell => cash_before = tx.cash,
            }
        }
    }
}

// ── 3. Trajectory accounting ─────────────────────────────────────────

proptest! {
    #[test]
    fn trajectory_matches_trades(script in arb_script(80), cash in arb_cash()) {
        let bars = scripted_bars("PROP", date(2022, 1, 3), &script);
        let result = simulate(&bars, &pairs_for(&bars), cash).unwrap();

        prop_assert_eq!(result.trajectory.len(), bars.len() - result.start_index);
        for (point, bar) in result.trajectory.iter().zip(&bars[result.start_index..]) {
            prop_assert_eq!(point.date, bar.date);
        }

        for tx in result.transactions() {
            prop_assert!((tx.portfolio_value - (tx.cash + tx.quantity as f64 * tx.price)).abs() < 1e-6);
        }

        // Replay the ledger and mark every bar to its close, held bars included.
        let mut held_cash = cash;
        let mut held_qty = 0u64;
        let mut trades = result.transactions().iter().peekable();
        for (point, bar) in result.trajectory.iter().zip(&bars[result.start_index..]) {
            if let Some(tx) = trades.next_if(|tx| tx.date == bar.date) {
                held_cash = tx.cash;
                held_qty = tx.quantity;
            }
            let expected = held_cash + held_qty as f64 * bar.close;
            prop_assert!(
                (point.equity - expected).abs() < 1e-6,
                "equity {} != {} on {}", point.equity, expected, bar.date
            );
        }
        prop_assert!(trades.next().is_none());
    }
}

// ── 4. Warmup skip ───────────────────────────────────────────────────

proptest! {
    #[test]
    fn nothing_happens_before_signals_are_defined(
        script in arb_script(60),
        trend_warmup in 0usize..20,
        threshold_warmup in 0usize..20,
        cash in arb_cash(),
    ) {
        let bars = scripted_bars("PROP", date(2022, 1, 3), &script);
        let warmup = trend_warmup.max(threshold_warmup);
        prop_assume!(warmup < bars.len());

        let signals: Vec<SignalPair> = bars
            .iter()
            .enumerate()
            .map(|(i, b)| SignalPair::new(
                (i >= trend_warmup).then_some(b.open),
                (i >= threshold_warmup).then_some(b.close),
            ))
            .collect();

        let result = simulate(&bars, &signals, cash).unwrap();
        prop_assert_eq!(result.start_index, warmup);
        prop_assert_eq!(result.trajectory.first().map(|p| p.date), Some(bars[warmup].date));
        for tx in result.transactions() {
            prop_assert!(tx.date >= bars[warmup].date);
        }
    }
}

// ── 5. Determinism ───────────────────────────────────────────────────

proptest! {
    #[test]
    fn simulation_is_deterministic(script in arb_script(80), cash in arb_cash()) {
        let bars = scripted_bars("PROP", date(2022, 1, 3), &script);
        let signals = pairs_for(&bars);
        let first = simulate(&bars, &signals, cash).unwrap();
        let second = simulate(&bars, &signals, cash).unwrap();
        prop_assert_eq!(first, second);
    }
}
