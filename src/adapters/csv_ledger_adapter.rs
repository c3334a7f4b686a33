//! CSV ledger writer.
//!
//! One file per ticker, `{output_dir}/{TICKER}_transactions.csv`, with the
//! columns `Date,Action,Price,Quantity,Cash,Portfolio_Value`. The header is
//! written even for an empty ledger.

use crate::domain::error::SignalTesterError;
use crate::domain::ledger::{SimulationResult, Transaction};
use crate::ports::ledger_port::LedgerPort;
use serde::Serialize;
use std::fs;
use std::path::PathBuf;

pub const LEDGER_HEADER: [&str; 6] = [
    "Date",
    "Action",
    "Price",
    "Quantity",
    "Cash",
    "Portfolio_Value",
];

#[derive(Serialize)]
struct LedgerRow {
    date: String,
    action: String,
    price: f64,
    quantity: u64,
    cash: f64,
    portfolio_value: f64,
}

impl From<&Transaction> for LedgerRow {
    fn from(tx: &Transaction) -> Self {
        LedgerRow {
            date: tx.date.format("%Y-%m-%d").to_string(),
            action: tx.action.to_string(),
            price: tx.price,
            quantity: tx.quantity,
            cash: tx.cash,
            portfolio_value: tx.portfolio_value,
        }
    }
}

pub struct CsvLedgerAdapter {
    output_dir: PathBuf,
}

impl CsvLedgerAdapter {
    pub fn new(output_dir: PathBuf) -> Self {
        Self { output_dir }
    }

    pub fn ledger_path(&self, ticker: &str) -> PathBuf {
        self.output_dir.join(format!("{}_transactions.csv", ticker))
    }
}

impl LedgerPort for CsvLedgerAdapter {
    fn write_ledger(
        &self,
        ticker: &str,
        result: &SimulationResult,
    ) -> Result<PathBuf, SignalTesterError> {
        fs::create_dir_all(&self.output_dir)?;
        let path = self.ledger_path(ticker);

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_path(&path)?;
        writer.write_record(LEDGER_HEADER)?;
        for tx in result.transactions() {
            writer.serialize(LedgerRow::from(tx))?;
        }
        writer.flush()?;

        tracing::debug!(ticker, path = %path.display(), rows = result.ledger.len(), "ledger written");
        Ok(path)
    }
}
