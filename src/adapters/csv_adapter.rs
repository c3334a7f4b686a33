//! CSV file data adapter.
//!
//! Bars live in `{base_path}/{TICKER}.csv` with a header row naming at least
//! `date, open, high, low, close, volume` (any case, any order; extra
//! columns such as `Adj Close` are ignored).

use crate::domain::error::SignalTesterError;
use crate::domain::ohlcv::OhlcvBar;
use crate::domain::universe::{UniverseError, normalize_codes};
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::fs;
use std::path::{Path, PathBuf};

const REQUIRED_COLUMNS: [&str; 6] = ["date", "open", "high", "low", "close", "volume"];

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, ticker: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", ticker))
    }
}

fn data_error(reason: impl Into<String>) -> SignalTesterError {
    SignalTesterError::Data {
        reason: reason.into(),
    }
}

fn column_indices(headers: &csv::StringRecord) -> Result<[usize; 6], SignalTesterError> {
    let mut indices = [0usize; 6];
    for (slot, name) in indices.iter_mut().zip(REQUIRED_COLUMNS) {
        *slot = headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(name))
            .ok_or_else(|| data_error(format!("missing {} column", name)))?;
    }
    Ok(indices)
}

fn parse_field<T: std::str::FromStr>(
    record: &csv::StringRecord,
    index: usize,
    name: &str,
) -> Result<T, SignalTesterError>
where
    T::Err: std::fmt::Display,
{
    let raw = record
        .get(index)
        .ok_or_else(|| data_error(format!("missing {} value", name)))?;
    raw.trim()
        .parse()
        .map_err(|e| data_error(format!("invalid {} value '{}': {}", name, raw, e)))
}

impl DataPort for CsvAdapter {
    fn fetch_ohlcv(
        &self,
        ticker: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<OhlcvBar>, SignalTesterError> {
        let path = self.csv_path(ticker);
        let content = fs::read_to_string(&path)
            .map_err(|e| data_error(format!("failed to read {}: {}", path.display(), e)))?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let headers = rdr
            .headers()
            .map_err(|e| data_error(format!("CSV parse error: {}", e)))?
            .clone();
        let [date_i, open_i, high_i, low_i, close_i, volume_i] = column_indices(&headers)?;

        let mut bars = Vec::new();
        for result in rdr.records() {
            let record = result.map_err(|e| data_error(format!("CSV parse error: {}", e)))?;

            let date_str = record
                .get(date_i)
                .ok_or_else(|| data_error("missing date value"))?;
            // Accept plain dates and `YYYY-MM-DD HH:MM:SS` timestamps.
            let date = NaiveDate::parse_from_str(date_str.get(..10).unwrap_or(date_str), "%Y-%m-%d")
                .map_err(|e| data_error(format!("invalid date format: {}", e)))?;

            if date < start_date || date > end_date {
                continue;
            }

            // Volume may be exported as a float (e.g. "1234.0").
            let volume: f64 = parse_field(&record, volume_i, "volume")?;

            bars.push(OhlcvBar {
                code: ticker.to_string(),
                date,
                open: parse_field(&record, open_i, "open")?,
                high: parse_field(&record, high_i, "high")?,
                low: parse_field(&record, low_i, "low")?,
                close: parse_field(&record, close_i, "close")?,
                volume: volume as i64,
            });
        }

        bars.sort_by_key(|b| b.date);
        Ok(bars)
    }

    fn list_symbols(&self) -> Result<Vec<String>, SignalTesterError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| {
            data_error(format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ))
        })?;

        let mut symbols = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| data_error(format!("directory entry error: {}", e)))?;
            let name = entry.file_name();
            let name_str = name.to_string_lossy();

            if let Some(ticker) = name_str.strip_suffix(".csv") {
                if !ticker.ends_with("_transactions") {
                    symbols.push(ticker.to_string());
                }
            }
        }

        symbols.sort();
        Ok(symbols)
    }
}

/// Read a ticker list from a CSV file with a `Ticker` column.
pub fn load_tickers<P: AsRef<Path>>(path: P) -> Result<Vec<String>, SignalTesterError> {
    let path = path.as_ref();
    let mut rdr = csv::Reader::from_path(path)?;
    let column = rdr
        .headers()?
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case("ticker"))
        .ok_or_else(|| UniverseError::MissingColumn("Ticker".to_string()))?;

    let mut raw = Vec::new();
    for record in rdr.records() {
        let record = record?;
        raw.push(record.get(column).unwrap_or_default().to_string());
    }

    Ok(normalize_codes(raw.iter().map(String::as_str))?)
}
