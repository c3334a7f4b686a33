//! Single-ticker account state.

use super::ledger::Action;

/// Two-state view of the account, derived from the last executed action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionState {
    Flat,
    Holding,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    pub(crate) cash: f64,
    pub(crate) quantity: u64,
    pub(crate) last_action: Option<Action>,
}

impl Account {
    pub fn new(initial_cash: f64) -> Self {
        Account {
            cash: initial_cash,
            quantity: 0,
            last_action: None,
        }
    }

    pub fn cash(&self) -> f64 {
        self.cash
    }

    pub fn quantity(&self) -> u64 {
        self.quantity
    }

    pub fn last_action(&self) -> Option<Action> {
        self.last_action
    }

    pub fn state(&self) -> PositionState {
        match self.last_action {
            Some(Action::Buy) => PositionState::Holding,
            Some(Action::Sell) | None => PositionState::Flat,
        }
    }

    /// cash + quantity * price
    pub fn value_at(&self, price: f64) -> f64 {
        self.cash + self.quantity as f64 * price
    }

    pub fn can_buy(&self) -> bool {
        self.cash > 0.0 && self.last_action != Some(Action::Buy)
    }

    pub fn can_sell(&self) -> bool {
        self.quantity > 0 && self.last_action != Some(Action::Sell)
    }
}
