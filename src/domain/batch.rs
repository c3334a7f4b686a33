//! Multi-ticker batch run.
//!
//! Every ticker is an independent job: fetch bars, derive signals, simulate.
//! Jobs fan out over a rayon pool and their outcomes are collected back in
//! ticker-list order. A failing ticker becomes a `Skipped` outcome and never
//! stops the rest of the batch. A ticker that never bought has no return and
//! is skipped as well, so totals only cover tickers that traded.

use rayon::prelude::*;
use tracing::{info, warn};

use super::backtest::{BacktestConfig, simulate};
use super::error::SignalTesterError;
use super::ledger::SimulationResult;
use super::metrics::Metrics;
use crate::ports::data_port::DataPort;
use crate::ports::signal_port::SignalProvider;

#[derive(Debug, Clone)]
pub struct TickerResult {
    pub ticker: String,
    pub bar_count: usize,
    pub result: SimulationResult,
    pub metrics: Metrics,
}

#[derive(Debug)]
pub enum TickerOutcome {
    Completed(TickerResult),
    Skipped {
        ticker: String,
        error: SignalTesterError,
    },
}

impl TickerOutcome {
    pub fn ticker(&self) -> &str {
        match self {
            TickerOutcome::Completed(r) => &r.ticker,
            TickerOutcome::Skipped { ticker, .. } => ticker,
        }
    }
}

#[derive(Debug)]
pub struct BatchReport {
    pub outcomes: Vec<TickerOutcome>,
    pub initial_cash_per_ticker: f64,
}

impl BatchReport {
    pub fn ticker_count(&self) -> usize {
        self.outcomes.len()
    }

    pub fn completed(&self) -> impl Iterator<Item = &TickerResult> {
        self.outcomes.iter().filter_map(|o| match o {
            TickerOutcome::Completed(r) => Some(r),
            TickerOutcome::Skipped { .. } => None,
        })
    }

    pub fn skipped(&self) -> impl Iterator<Item = (&str, &SignalTesterError)> {
        self.outcomes.iter().filter_map(|o| match o {
            TickerOutcome::Skipped { ticker, error } => Some((ticker.as_str(), error)),
            TickerOutcome::Completed(_) => None,
        })
    }

    /// Sum of final portfolio values over the tickers that completed.
    pub fn total_portfolio_value(&self) -> f64 {
        self.completed().map(|r| r.result.final_value()).sum()
    }

    /// Cash committed across every requested ticker, completed or not.
    pub fn initial_total_investment(&self) -> f64 {
        self.initial_cash_per_ticker * self.ticker_count() as f64
    }

    pub fn total_return_pct(&self) -> f64 {
        let initial = self.initial_total_investment();
        if initial > 0.0 {
            (self.total_portfolio_value() - initial) / initial * 100.0
        } else {
            0.0
        }
    }

    /// Per-ticker returns in input order.
    pub fn ticker_returns(&self) -> Vec<(&str, f64)> {
        self.completed()
            .filter_map(|r| r.metrics.ticker_return_pct.map(|pct| (r.ticker.as_str(), pct)))
            .collect()
    }
}

/// Fetch, derive signals and simulate a single ticker.
pub fn run_ticker(
    data_port: &dyn DataPort,
    provider: &dyn SignalProvider,
    ticker: &str,
    config: &BacktestConfig,
) -> Result<TickerResult, SignalTesterError> {
    let bars = data_port.fetch_ohlcv(ticker, config.start_date, config.end_date)?;
    if bars.is_empty() {
        return Err(SignalTesterError::NoData {
            ticker: ticker.to_string(),
        });
    }

    let signals = provider.signals(&bars);
    let result = simulate(&bars, &signals, config.initial_cash)?;
    if result.ticker_return_pct().is_none() {
        return Err(SignalTesterError::NoTrades {
            ticker: ticker.to_string(),
        });
    }
    let metrics = Metrics::compute(&result);

    info!(
        ticker,
        bars = bars.len(),
        start_index = result.start_index,
        trades = result.ledger.len(),
        final_value = result.final_value(),
        "ticker simulated"
    );

    Ok(TickerResult {
        ticker: ticker.to_string(),
        bar_count: bars.len(),
        result,
        metrics,
    })
}

fn run_isolated(
    data_port: &dyn DataPort,
    provider: &dyn SignalProvider,
    ticker: &str,
    config: &BacktestConfig,
) -> TickerOutcome {
    match run_ticker(data_port, provider, ticker, config) {
        Ok(result) => TickerOutcome::Completed(result),
        Err(error) => {
            warn!(ticker, %error, "skipping ticker");
            TickerOutcome::Skipped {
                ticker: ticker.to_string(),
                error,
            }
        }
    }
}

/// Run every ticker and collect the outcomes in input order.
pub fn run_batch(
    data_port: &dyn DataPort,
    provider: &dyn SignalProvider,
    tickers: &[String],
    config: &BacktestConfig,
) -> BatchReport {
    info!(
        tickers = tickers.len(),
        signals = %provider.describe(),
        parallel = config.parallel,
        "starting batch"
    );

    let outcomes: Vec<TickerOutcome> = if config.parallel {
        tickers
            .par_iter()
            .map(|ticker| run_isolated(data_port, provider, ticker, config))
            .collect()
    } else {
        tickers
            .iter()
            .map(|ticker| run_isolated(data_port, provider, ticker, config))
            .collect()
    };

    BatchReport {
        outcomes,
        initial_cash_per_ticker: config.initial_cash,
    }
}
