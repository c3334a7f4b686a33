//! Trade execution at the bar close.
//!
//! Sizing is all-in with whole shares only: the entry buys
//! `floor(cash / price)` shares and leaves the remainder as cash. The exit
//! sells the whole position. No commission, no slippage.

use chrono::NaiveDate;

use super::account::Account;
use super::ledger::{Action, Transaction};

/// Whole shares affordable with `cash` at `price`.
///
/// Float division can round up to the next integer, so the result is
/// stepped back until its cost fits in `cash`.
pub fn affordable_quantity(cash: f64, price: f64) -> u64 {
    if cash <= 0.0 || price <= 0.0 {
        return 0;
    }
    let mut quantity = (cash / price).floor() as u64;
    while quantity > 0 && quantity as f64 * price > cash {
        quantity -= 1;
    }
    quantity
}

/// Enter a long position with all available cash.
///
/// Steps:
/// 1. quantity = floor(cash / price)
/// 2. cash -= quantity * price
/// 3. last action becomes Buy
pub fn enter_long(account: &mut Account, date: NaiveDate, price: f64) -> Transaction {
    let quantity = affordable_quantity(account.cash, price);
    let cost = quantity as f64 * price;

    account.cash = (account.cash - cost).max(0.0);
    account.quantity = quantity;
    account.last_action = Some(Action::Buy);

    Transaction {
        date,
        action: Action::Buy,
        price,
        quantity,
        cash: account.cash,
        portfolio_value: account.value_at(price),
    }
}

/// Exit the whole position at `price`.
pub fn exit_long(account: &mut Account, date: NaiveDate, price: f64) -> Transaction {
    account.cash += account.quantity as f64 * price;
    account.quantity = 0;
    account.last_action = Some(Action::Sell);

    Transaction {
        date,
        action: Action::Sell,
        price,
        quantity: 0,
        cash: account.cash,
        portfolio_value: account.cash,
    }
}
