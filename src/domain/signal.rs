//! Per-bar signal pairs and start-index resolution.
//!
//! A signal is `None` until its indicator has enough history. Undefined
//! values form a contiguous prefix, so the first defined index of each
//! series fully describes where it becomes usable.

use crate::domain::error::{SignalSeries, SimulationError};

/// The two signal values observed at one bar.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SignalPair {
    pub trend: Option<f64>,
    pub threshold: Option<f64>,
}

impl SignalPair {
    pub fn new(trend: Option<f64>, threshold: Option<f64>) -> Self {
        Self { trend, threshold }
    }

    pub fn defined(trend: f64, threshold: f64) -> Self {
        Self {
            trend: Some(trend),
            threshold: Some(threshold),
        }
    }

    pub fn is_defined(&self) -> bool {
        self.trend.is_some() && self.threshold.is_some()
    }
}

/// Zip two aligned series into signal pairs.
///
/// Panics in debug builds if the lengths differ; callers build both series
/// from the same bar slice.
pub fn zip_signals(trend: &[Option<f64>], threshold: &[Option<f64>]) -> Vec<SignalPair> {
    debug_assert_eq!(trend.len(), threshold.len());
    trend
        .iter()
        .zip(threshold)
        .map(|(&t, &th)| SignalPair::new(t, th))
        .collect()
}

fn first_defined<F>(signals: &[SignalPair], pick: F) -> Option<usize>
where
    F: Fn(&SignalPair) -> Option<f64>,
{
    signals.iter().position(|s| pick(s).is_some())
}

/// First bar index at which both series are defined.
pub fn start_index(signals: &[SignalPair]) -> Result<usize, SimulationError> {
    let trend = first_defined(signals, |s| s.trend).ok_or(SimulationError::UndefinedSignal {
        series: SignalSeries::Trend,
    })?;
    let threshold =
        first_defined(signals, |s| s.threshold).ok_or(SimulationError::UndefinedSignal {
            series: SignalSeries::Threshold,
        })?;
    Ok(trend.max(threshold))
}
