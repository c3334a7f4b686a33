//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{Level, info, warn};

use crate::adapters::csv_adapter::{CsvAdapter, load_tickers};
use crate::adapters::csv_ledger_adapter::CsvLedgerAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::logging::{LogFormat, init_logging, parse_level};
use crate::domain::backtest::BacktestConfig;
use crate::domain::batch::{BatchReport, run_batch};
use crate::domain::config_validation::{
    parse_date, validate_backtest_config, validate_backtest_settings, validate_signal_config,
};
use crate::domain::error::SignalTesterError;
use crate::domain::signal_provider::{SignalConfig, TtmSqueezeSignals};
use crate::domain::universe::parse_codes;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::ledger_port::LedgerPort;
use crate::ports::signal_port::SignalProvider;

#[derive(Parser, Debug)]
#[command(name = "signaltester", about = "Single-asset signal backtester")]
pub struct Cli {
    /// trace, debug, info, warn or error. Overrides [logging] level.
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the backtest over every configured ticker
    Backtest {
        #[arg(short, long)]
        config: PathBuf,
        /// CSV file with a Ticker column, replaces the configured tickers
        #[arg(long)]
        tickers_file: Option<PathBuf>,
        /// Single ticker (or comma-separated list), replaces the configured tickers
        #[arg(long)]
        ticker: Option<String>,
        /// Directory for the per-ticker ledger files
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Run tickers one after another instead of in parallel
        #[arg(long)]
        sequential: bool,
        #[arg(long)]
        dry_run: bool,
    },
    /// List tickers with data files in the data directory
    ListSymbols {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

impl Command {
    fn config_path(&self) -> &Path {
        match self {
            Command::Backtest { config, .. }
            | Command::ListSymbols { config }
            | Command::Validate { config } => config,
        }
    }
}

/// Ticker and output overrides taken from the command line.
#[derive(Debug, Clone, Default)]
pub struct RunOverrides {
    pub ticker: Option<String>,
    pub tickers_file: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub sequential: bool,
}

impl RunOverrides {
    fn has_tickers(&self) -> bool {
        self.ticker.is_some() || self.tickers_file.is_some()
    }
}

pub fn run(cli: Cli) -> ExitCode {
    let adapter = match load_config(cli.command.config_path()) {
        Ok(a) => a,
        Err(code) => return code,
    };

    if let Err(code) = setup_logging(&adapter, cli.log_level.as_deref()) {
        return code;
    }

    match cli.command {
        Command::Backtest {
            tickers_file,
            ticker,
            output,
            sequential,
            dry_run,
            ..
        } => {
            let overrides = RunOverrides {
                ticker,
                tickers_file,
                output,
                sequential,
            };
            if dry_run {
                run_dry_run(&adapter, &overrides)
            } else {
                run_backtest(&adapter, &overrides)
            }
        }
        Command::ListSymbols { .. } => run_list_symbols(&adapter),
        Command::Validate { .. } => run_validate(&adapter),
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|err| {
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

fn setup_logging(adapter: &dyn ConfigPort, cli_level: Option<&str>) -> Result<(), ExitCode> {
    let level_str = cli_level
        .map(str::to_string)
        .or_else(|| adapter.get_string("logging", "level"));
    let level = match level_str {
        Some(s) => parse_level(&s).map_err(|reason| config_error("level", reason))?,
        None => Level::INFO,
    };

    let format = match adapter.get_string("logging", "format") {
        Some(s) => s
            .parse::<LogFormat>()
            .map_err(|reason| config_error("format", reason))?,
        None => LogFormat::default(),
    };

    init_logging(format, level);
    Ok(())
}

fn config_error(key: &str, reason: String) -> ExitCode {
    let err = SignalTesterError::ConfigInvalid {
        section: "logging".into(),
        key: key.into(),
        reason,
    };
    eprintln!("error: {err}");
    ExitCode::from(&err)
}

fn validate_for_run(adapter: &dyn ConfigPort, overrides: &RunOverrides) -> Result<(), SignalTesterError> {
    if overrides.has_tickers() {
        validate_backtest_settings(adapter)?;
    } else {
        validate_backtest_config(adapter)?;
    }
    validate_signal_config(adapter)
}

fn run_backtest(adapter: &dyn ConfigPort, overrides: &RunOverrides) -> ExitCode {
    // Stage 1: Validate config
    if let Err(e) = validate_for_run(adapter, overrides) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    // Stage 2: Build run parameters
    let mut bt_config = match build_backtest_config(adapter) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    if overrides.sequential {
        bt_config.parallel = false;
    }
    let provider = TtmSqueezeSignals::new(build_signal_config(adapter));

    // Stage 3: Resolve tickers
    let tickers = match resolve_tickers(
        overrides.ticker.as_deref(),
        overrides.tickers_file.as_deref(),
        adapter,
    ) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let data_port = CsvAdapter::new(data_dir(adapter));
    let ledger_port = CsvLedgerAdapter::new(output_dir(adapter, overrides.output.as_deref()));

    run_backtest_pipeline(&data_port, &provider, &ledger_port, &tickers, &bt_config)
}

/// Run the batch, persist ledgers and print the summary to stdout.
pub fn run_backtest_pipeline(
    data_port: &dyn DataPort,
    provider: &dyn SignalProvider,
    ledger_port: &dyn LedgerPort,
    tickers: &[String],
    bt_config: &BacktestConfig,
) -> ExitCode {
    eprintln!(
        "Running backtest: {} tickers, {} to {}",
        tickers.len(),
        bt_config.start_date,
        bt_config.end_date,
    );

    let report = run_batch(data_port, provider, tickers, bt_config);

    let mut write_failed = false;
    for result in report.completed() {
        match ledger_port.write_ledger(&result.ticker, &result.result) {
            Ok(path) => info!(ticker = %result.ticker, path = %path.display(), "ledger saved"),
            Err(e) => {
                warn!(ticker = %result.ticker, error = %e, "failed to write ledger");
                eprintln!("error: failed to write ledger for {}: {e}", result.ticker);
                write_failed = true;
            }
        }
    }

    print!("{}", format_summary(&report));

    if report.completed().next().is_none() {
        eprintln!("error: no tickers could be backtested");
        return ExitCode::from(5);
    }
    if write_failed {
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

/// Console summary: totals first, then one line per ticker in input order.
pub fn format_summary(report: &BatchReport) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Total Portfolio Value: {:.2}",
        report.total_portfolio_value()
    );
    let _ = writeln!(out, "Total Return: {:.2}%", report.total_return_pct());

    for (ticker, pct) in report.ticker_returns() {
        let _ = writeln!(out, "{} Return: {:.2}%", ticker, pct);
    }
    for (ticker, error) in report.skipped() {
        let _ = writeln!(out, "{}: skipped ({})", ticker, error);
    }
    out
}

pub fn build_backtest_config(adapter: &dyn ConfigPort) -> Result<BacktestConfig, SignalTesterError> {
    let start_str = adapter.get_string("backtest", "start_date");
    let end_str = adapter.get_string("backtest", "end_date");

    Ok(BacktestConfig {
        start_date: parse_date(start_str.as_deref(), "start_date")?,
        end_date: parse_date(end_str.as_deref(), "end_date")?,
        initial_cash: adapter.get_double("backtest", "initial_cash", 100_000.0),
        parallel: adapter.get_bool("backtest", "parallel", true),
    })
}

/// Signal parameters, falling back to the defaults for missing keys.
pub fn build_signal_config(adapter: &dyn ConfigPort) -> SignalConfig {
    let defaults = SignalConfig::default();
    let period = |key: &str, default: usize| {
        adapter.get_int("signals", key, default as i64).max(1) as usize
    };

    SignalConfig {
        trend_length: period("trend_length", defaults.trend_length),
        squeeze_period: period("squeeze_period", defaults.squeeze_period),
        bb_mult: adapter.get_double("signals", "bb_mult", defaults.bb_mult),
        kc_mult: adapter.get_double("signals", "kc_mult", defaults.kc_mult),
        atr_period: period("atr_period", defaults.atr_period),
    }
}

/// Ticker list by precedence: `--ticker`, `--tickers-file`, `tickers`,
/// then `tickers_file` from the config.
pub fn resolve_tickers(
    ticker_override: Option<&str>,
    tickers_file_override: Option<&Path>,
    config: &dyn ConfigPort,
) -> Result<Vec<String>, SignalTesterError> {
    if let Some(t) = ticker_override {
        return Ok(parse_codes(t)?);
    }
    if let Some(path) = tickers_file_override {
        return load_tickers(path);
    }

    if let Some(list) = config
        .get_string("backtest", "tickers")
        .filter(|s| !s.trim().is_empty())
    {
        return Ok(parse_codes(&list)?);
    }
    if let Some(path) = config
        .get_string("backtest", "tickers_file")
        .filter(|s| !s.trim().is_empty())
    {
        return load_tickers(path.trim());
    }

    Err(SignalTesterError::ConfigMissing {
        section: "backtest".into(),
        key: "tickers".into(),
    })
}

pub fn data_dir(config: &dyn ConfigPort) -> PathBuf {
    config
        .get_string("backtest", "data_dir")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("data"))
}

pub fn output_dir(config: &dyn ConfigPort, output_override: Option<&Path>) -> PathBuf {
    match output_override {
        Some(p) => p.to_path_buf(),
        None => config
            .get_string("backtest", "output_dir")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(".")),
    }
}

pub fn run_dry_run(adapter: &dyn ConfigPort, overrides: &RunOverrides) -> ExitCode {
    if let Err(e) = validate_for_run(adapter, overrides) {
        eprintln!("error: {e}");
        return (&e).into();
    }
    eprintln!("Config validated successfully");

    let bt_config = match build_backtest_config(adapter) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    let provider = TtmSqueezeSignals::new(build_signal_config(adapter));
    let tickers = match resolve_tickers(
        overrides.ticker.as_deref(),
        overrides.tickers_file.as_deref(),
        adapter,
    ) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    eprintln!("\nSignals:");
    eprintln!("  {}", provider.describe());
    eprintln!("  buy when trend > threshold, sell when trend < threshold");

    eprintln!("\nRun:");
    eprintln!("  period: {} to {}", bt_config.start_date, bt_config.end_date);
    eprintln!("  initial cash per ticker: {:.2}", bt_config.initial_cash);
    eprintln!(
        "  mode: {}",
        if bt_config.parallel && !overrides.sequential {
            "parallel"
        } else {
            "sequential"
        }
    );
    eprintln!("  data dir: {}", data_dir(adapter).display());
    eprintln!(
        "  output dir: {}",
        output_dir(adapter, overrides.output.as_deref()).display()
    );

    eprintln!("\nTickers ({}):", tickers.len());
    eprintln!("  {}", tickers.join(", "));

    eprintln!("\nDry run complete: configuration is valid");
    ExitCode::SUCCESS
}

fn run_list_symbols(adapter: &dyn ConfigPort) -> ExitCode {
    let dir = data_dir(adapter);
    let data_port = CsvAdapter::new(dir.clone());

    let symbols = match data_port.list_symbols() {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    if symbols.is_empty() {
        eprintln!("No symbols found in {}", dir.display());
    } else {
        for symbol in &symbols {
            println!("{}", symbol);
        }
        eprintln!("{} symbols found", symbols.len());
    }
    ExitCode::SUCCESS
}

fn run_validate(adapter: &dyn ConfigPort) -> ExitCode {
    if let Err(e) = validate_backtest_config(adapter).and_then(|()| validate_signal_config(adapter)) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    match resolve_tickers(None, None, adapter) {
        Ok(tickers) => eprintln!("Tickers: {}", tickers.join(", ")),
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    }

    let provider = TtmSqueezeSignals::new(build_signal_config(adapter));
    eprintln!("Signals: {}", provider.describe());
    eprintln!("\nConfiguration is valid.");
    ExitCode::SUCCESS
}
