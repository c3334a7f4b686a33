//! Transaction ledger and simulation result assembly.

use chrono::NaiveDate;
use std::fmt;

use super::error::SimulationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Buy,
    Sell,
}

impl Action {
    pub fn opposite(self) -> Action {
        match self {
            Action::Buy => Action::Sell,
            Action::Sell => Action::Buy,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Buy => write!(f, "Buy"),
            Action::Sell => write!(f, "Sell"),
        }
    }
}

/// One executed trade, with the account state right after it.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub date: NaiveDate,
    pub action: Action,
    pub price: f64,
    pub quantity: u64,
    pub cash: f64,
    pub portfolio_value: f64,
}

impl Transaction {
    /// Market value of the shares held after the trade.
    pub fn notional(&self) -> f64 {
        self.quantity as f64 * self.price
    }
}

/// Ordered trade history. Actions strictly alternate, starting with Buy.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Ledger {
    entries: Vec<Transaction>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// The only action the ledger will accept next.
    pub fn expected_next(&self) -> Action {
        match self.entries.last() {
            Some(tx) => tx.action.opposite(),
            None => Action::Buy,
        }
    }

    /// Append a trade. Rejects anything but [`Ledger::expected_next`], so
    /// the first entry is always a Buy and actions strictly alternate.
    pub fn record(&mut self, tx: Transaction) -> Result<(), SimulationError> {
        let expected = self.expected_next();
        if tx.action != expected {
            return Err(SimulationError::OutOfOrderTrade {
                expected,
                actual: tx.action,
            });
        }
        self.entries.push(tx);
        Ok(())
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn first_buy(&self) -> Option<&Transaction> {
        self.entries.first().filter(|tx| tx.action == Action::Buy)
    }

    pub fn last(&self) -> Option<&Transaction> {
        self.entries.last()
    }

    /// Completed Buy/Sell pairs as `(entry, exit)`.
    pub fn round_trips(&self) -> impl Iterator<Item = (&Transaction, &Transaction)> {
        self.entries
            .chunks_exact(2)
            .map(|pair| (&pair[0], &pair[1]))
    }

    /// True when no two consecutive entries share an action and the first is a Buy.
    pub fn is_alternating(&self) -> bool {
        let starts_with_buy = self
            .entries
            .first()
            .is_none_or(|tx| tx.action == Action::Buy);
        starts_with_buy
            && self
                .entries
                .windows(2)
                .all(|w| w[0].action != w[1].action)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EquityPoint {
    pub date: NaiveDate,
    pub equity: f64,
}

/// Everything that survives a single-ticker simulation.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationResult {
    pub start_index: usize,
    pub initial_cash: f64,
    pub ledger: Ledger,
    pub trajectory: Vec<EquityPoint>,
}

impl SimulationResult {
    pub fn transactions(&self) -> &[Transaction] {
        self.ledger.transactions()
    }

    pub fn has_trades(&self) -> bool {
        !self.ledger.is_empty()
    }

    /// Portfolio value at the last simulated bar.
    pub fn final_value(&self) -> f64 {
        self.trajectory
            .last()
            .map(|p| p.equity)
            .unwrap_or(self.initial_cash)
    }

    /// Value of the position opened by the first Buy.
    pub fn first_buy_notional(&self) -> Option<f64> {
        self.ledger.first_buy().map(Transaction::notional)
    }

    /// `(final - first_buy_notional) / first_buy_notional * 100`.
    ///
    /// `None` when nothing was bought, or the first Buy could not afford a
    /// single share.
    pub fn ticker_return_pct(&self) -> Option<f64> {
        let base = self.first_buy_notional().filter(|v| *v > 0.0)?;
        Some((self.final_value() - base) / base * 100.0)
    }
}
