#![allow(dead_code)]

use chrono::NaiveDate;
use signaltester::domain::backtest::BacktestConfig;
use signaltester::domain::error::SignalTesterError;
pub use signaltester::domain::ohlcv::OhlcvBar;
pub use signaltester::domain::signal::SignalPair;
use signaltester::ports::data_port::DataPort;
use signaltester::ports::signal_port::SignalProvider;
use std::collections::HashMap;

pub struct MockDataPort {
    pub data: HashMap<String, Vec<OhlcvBar>>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_bars(mut self, ticker: &str, bars: Vec<OhlcvBar>) -> Self {
        self.data.insert(ticker.to_string(), bars);
        self
    }

    pub fn with_error(mut self, ticker: &str, reason: &str) -> Self {
        self.errors.insert(ticker.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_ohlcv(
        &self,
        ticker: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<OhlcvBar>, SignalTesterError> {
        if let Some(reason) = self.errors.get(ticker) {
            return Err(SignalTesterError::Data {
                reason: reason.clone(),
            });
        }
        Ok(self
            .data
            .get(ticker)
            .map(|bars| {
                bars.iter()
                    .filter(|b| b.date >= start_date && b.date <= end_date)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    fn list_symbols(&self) -> Result<Vec<String>, SignalTesterError> {
        let mut symbols: Vec<String> = self.data.keys().cloned().collect();
        symbols.sort();
        Ok(symbols)
    }
}

/// Signal provider that reads the trend from the bar's open and the
/// threshold from its close, so tests can script signals through bars.
pub struct OpenVsClose;

impl SignalProvider for OpenVsClose {
    fn describe(&self) -> String {
        "OPEN vs CLOSE".to_string()
    }

    fn signals(&self, bars: &[OhlcvBar]) -> Vec<SignalPair> {
        bars.iter()
            .map(|b| SignalPair::defined(b.open, b.close))
            .collect()
    }
}

/// Bar whose open is the scripted trend value: `signal > 0` buys,
/// `signal < 0` sells, `0` does nothing (threshold is the close, so the
/// open is `close + signal`).
pub fn signal_bar(ticker: &str, d: NaiveDate, close: f64, signal: f64) -> OhlcvBar {
    OhlcvBar {
        code: ticker.to_string(),
        date: d,
        open: close + signal,
        high: close.max(close + signal) + 1.0,
        low: (close.min(close + signal) - 1.0).max(0.01),
        close,
        volume: 1000,
    }
}

/// Consecutive daily bars from `(close, signal)` pairs.
pub fn scripted_bars(ticker: &str, start: NaiveDate, script: &[(f64, f64)]) -> Vec<OhlcvBar> {
    script
        .iter()
        .enumerate()
        .map(|(i, &(close, signal))| {
            signal_bar(ticker, start + chrono::Duration::days(i as i64), close, signal)
        })
        .collect()
}

pub fn make_bar(ticker: &str, date: &str, close: f64) -> OhlcvBar {
    OhlcvBar {
        code: ticker.to_string(),
        date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        open: close - 1.0,
        high: close + 1.0,
        low: close - 2.0,
        close,
        volume: 1000,
    }
}

pub fn sample_config() -> BacktestConfig {
    BacktestConfig {
        start_date: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
        end_date: NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
        initial_cash: 100_000.0,
        parallel: false,
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn generate_bars(ticker: &str, start_date: &str, count: usize, start_price: f64) -> Vec<OhlcvBar> {
    let start = NaiveDate::parse_from_str(start_date, "%Y-%m-%d").unwrap();
    (0..count)
        .map(|i| OhlcvBar {
            code: ticker.to_string(),
            date: start + chrono::Duration::days(i as i64),
            open: start_price + i as f64,
            high: start_price + i as f64 + 1.0,
            low: start_price + i as f64 - 1.0,
            close: start_price + i as f64,
            volume: 1000,
        })
        .collect()
}
