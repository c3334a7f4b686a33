//! Configuration validation.
//!
//! Validates all config fields before a batch runs.

use crate::domain::error::SignalTesterError;
use crate::domain::universe::parse_codes;
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;

pub fn validate_backtest_config(config: &dyn ConfigPort) -> Result<(), SignalTesterError> {
    validate_backtest_settings(config)?;
    validate_tickers(config)?;
    Ok(())
}

/// Cash and date range only, for runs whose tickers come from the command line.
pub fn validate_backtest_settings(config: &dyn ConfigPort) -> Result<(), SignalTesterError> {
    validate_initial_cash(config)?;
    validate_dates(config)?;
    Ok(())
}

pub fn validate_signal_config(config: &dyn ConfigPort) -> Result<(), SignalTesterError> {
    validate_period(config, "trend_length", 40)?;
    validate_period(config, "squeeze_period", 24)?;
    validate_period(config, "atr_period", 10)?;
    validate_multiplier(config, "bb_mult", 2.0)?;
    validate_multiplier(config, "kc_mult", 1.5)?;
    Ok(())
}

fn invalid(section: &str, key: &str, reason: impl Into<String>) -> SignalTesterError {
    SignalTesterError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.into(),
    }
}

fn validate_initial_cash(config: &dyn ConfigPort) -> Result<(), SignalTesterError> {
    let value = config.get_double("backtest", "initial_cash", 100_000.0);
    if !(value.is_finite() && value > 0.0) {
        return Err(invalid(
            "backtest",
            "initial_cash",
            "initial_cash must be positive",
        ));
    }
    Ok(())
}

fn validate_dates(config: &dyn ConfigPort) -> Result<(), SignalTesterError> {
    let start_str = config.get_string("backtest", "start_date");
    let end_str = config.get_string("backtest", "end_date");

    let start_date = parse_date(start_str.as_deref(), "start_date")?;
    let end_date = parse_date(end_str.as_deref(), "end_date")?;

    if start_date >= end_date {
        return Err(invalid(
            "backtest",
            "start_date",
            "start_date must be before end_date",
        ));
    }
    Ok(())
}

pub fn parse_date(value: Option<&str>, field: &str) -> Result<NaiveDate, SignalTesterError> {
    match value {
        None => Err(SignalTesterError::ConfigMissing {
            section: "backtest".to_string(),
            key: field.to_string(),
        }),
        Some(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| {
            invalid(
                "backtest",
                field,
                format!("invalid {} format, expected YYYY-MM-DD", field),
            )
        }),
    }
}

fn validate_tickers(config: &dyn ConfigPort) -> Result<(), SignalTesterError> {
    let tickers = config
        .get_string("backtest", "tickers")
        .filter(|s| !s.trim().is_empty());
    let tickers_file = config
        .get_string("backtest", "tickers_file")
        .filter(|s| !s.trim().is_empty());

    match (tickers, tickers_file) {
        (Some(list), _) => parse_codes(&list)
            .map(|_| ())
            .map_err(|e| invalid("backtest", "tickers", e.to_string())),
        (None, Some(_)) => Ok(()),
        (None, None) => Err(SignalTesterError::ConfigMissing {
            section: "backtest".to_string(),
            key: "tickers".to_string(),
        }),
    }
}

fn validate_period(config: &dyn ConfigPort, key: &str, default: i64) -> Result<(), SignalTesterError> {
    let value = config.get_int("signals", key, default);
    if value < 1 {
        return Err(invalid(
            "signals",
            key,
            format!("{} must be at least 1", key),
        ));
    }
    Ok(())
}

fn validate_multiplier(
    config: &dyn ConfigPort,
    key: &str,
    default: f64,
) -> Result<(), SignalTesterError> {
    let value = config.get_double("signals", key, default);
    if !(value.is_finite() && value > 0.0) {
        return Err(invalid(
            "signals",
            key,
            format!("{} must be positive", key),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct MapConfig(HashMap<(String, String), String>);

    impl MapConfig {
        fn new(entries: &[(&str, &str, &str)]) -> Self {
            MapConfig(
                entries
                    .iter()
                    .map(|(s, k, v)| ((s.to_string(), k.to_string()), v.to_string()))
                    .collect(),
            )
        }
    }

    impl ConfigPort for MapConfig {
        fn get_string(&self, section: &str, key: &str) -> Option<String> {
            self.0.get(&(section.to_string(), key.to_string())).cloned()
        }

        fn get_int(&self, section: &str, key: &str, default: i64) -> i64 {
            self.get_string(section, key)
                .and_then(|v| v.parse().ok())
                .unwrap_or(default)
        }

        fn get_double(&self, section: &str, key: &str, default: f64) -> f64 {
            self.get_string(section, key)
                .and_then(|v| v.parse().ok())
                .unwrap_or(default)
        }

        fn get_bool(&self, section: &str, key: &str, default: bool) -> bool {
            self.get_string(section, key)
                .and_then(|v| v.parse().ok())
                .unwrap_or(default)
        }
    }

    fn valid_entries() -> Vec<(&'static str, &'static str, &'static str)> {
        vec![
            ("backtest", "initial_cash", "100000"),
            ("backtest", "start_date", "2018-10-30"),
            ("backtest", "end_date", "2023-10-30"),
            ("backtest", "tickers", "AAPL,MSFT"),
        ]
    }

    fn with(entry: (&'static str, &'static str, &'static str)) -> MapConfig {
        let mut entries: Vec<_> = valid_entries()
            .into_iter()
            .filter(|(s, k, _)| !(*s == entry.0 && *k == entry.1))
            .collect();
        entries.push(entry);
        MapConfig::new(&entries)
    }

    fn without(key: &str) -> MapConfig {
        let entries: Vec<_> = valid_entries()
            .into_iter()
            .filter(|(_, k, _)| *k != key)
            .collect();
        MapConfig::new(&entries)
    }

    #[test]
    fn valid_config_passes() {
        let config = MapConfig::new(&valid_entries());
        assert!(validate_backtest_config(&config).is_ok());
        assert!(validate_signal_config(&config).is_ok());
    }

    #[test]
    fn initial_cash_must_be_positive() {
        let err = validate_backtest_config(&with(("backtest", "initial_cash", "0"))).unwrap_err();
        assert!(matches!(err, SignalTesterError::ConfigInvalid { key, .. } if key == "initial_cash"));
    }

    #[test]
    fn missing_start_date() {
        let err = validate_backtest_config(&without("start_date")).unwrap_err();
        assert!(matches!(err, SignalTesterError::ConfigMissing { key, .. } if key == "start_date"));
    }

    #[test]
    fn malformed_end_date() {
        let err =
            validate_backtest_config(&with(("backtest", "end_date", "30/10/2023"))).unwrap_err();
        assert!(matches!(err, SignalTesterError::ConfigInvalid { key, .. } if key == "end_date"));
    }

    #[test]
    fn start_must_precede_end() {
        let err =
            validate_backtest_config(&with(("backtest", "end_date", "2018-10-30"))).unwrap_err();
        assert!(matches!(err, SignalTesterError::ConfigInvalid { key, .. } if key == "start_date"));
    }

    #[test]
    fn tickers_file_satisfies_ticker_requirement() {
        let mut entries = valid_entries();
        entries.retain(|(_, k, _)| *k != "tickers");
        entries.push(("backtest", "tickers_file", "tickers.csv"));
        assert!(validate_backtest_config(&MapConfig::new(&entries)).is_ok());
    }

    #[test]
    fn settings_ignore_missing_tickers() {
        assert!(validate_backtest_settings(&without("tickers")).is_ok());
    }

    #[test]
    fn missing_tickers() {
        let err = validate_backtest_config(&without("tickers")).unwrap_err();
        assert!(matches!(err, SignalTesterError::ConfigMissing { key, .. } if key == "tickers"));
    }

    #[test]
    fn duplicate_tickers_rejected() {
        let err =
            validate_backtest_config(&with(("backtest", "tickers", "AAPL,aapl"))).unwrap_err();
        assert!(matches!(err, SignalTesterError::ConfigInvalid { key, .. } if key == "tickers"));
    }

    #[test]
    fn signal_periods_must_be_positive() {
        let err = validate_signal_config(&with(("signals", "trend_length", "0"))).unwrap_err();
        assert!(matches!(err, SignalTesterError::ConfigInvalid { key, .. } if key == "trend_length"));
    }

    #[test]
    fn signal_multipliers_must_be_positive() {
        let err = validate_signal_config(&with(("signals", "kc_mult", "-1.5"))).unwrap_err();
        assert!(matches!(err, SignalTesterError::ConfigInvalid { key, .. } if key == "kc_mult"));
    }
}
