//! Shared helper functions for indicator calculations.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::ohlcv::OhlcvBar;

/// Simple moving average over `values`; the first `period - 1` entries are `None`.
pub fn rolling_mean(values: &[f64], period: usize) -> Vec<Option<f64>> {
    if period == 0 {
        return vec![None; values.len()];
    }

    let mut out = Vec::with_capacity(values.len());
    let mut sum = 0.0;
    for i in 0..values.len() {
        sum += values[i];
        if i >= period {
            sum -= values[i - period];
        }
        if i + 1 >= period {
            out.push(Some(sum / period as f64));
        } else {
            out.push(None);
        }
    }
    out
}

/// Population standard deviation of `window` around `mean`.
pub fn population_stddev(window: &[f64], mean: f64) -> f64 {
    let variance: f64 = window
        .iter()
        .map(|v| {
            let diff = v - mean;
            diff * diff
        })
        .sum::<f64>()
        / window.len() as f64;
    variance.sqrt()
}

/// Average True Range with Wilder smoothing, seeded by the mean of the
/// first `period` true ranges. Warmup: first (period-1) bars are undefined.
pub fn calc_atr(bars: &[OhlcvBar], period: usize) -> IndicatorSeries {
    if bars.len() < period || period == 0 {
        return IndicatorSeries::undefined(IndicatorType::Atr(period), bars.iter().map(|b| b.date));
    }

    let tr_values: Vec<f64> = bars
        .iter()
        .enumerate()
        .map(|(i, bar)| {
            if i == 0 {
                bar.high - bar.low
            } else {
                bar.true_range(bars[i - 1].close)
            }
        })
        .collect();

    let mut results: Vec<IndicatorPoint> = Vec::with_capacity(bars.len());
    let mut atr = 0.0;

    for i in 0..bars.len() {
        let value = if i + 1 < period {
            None
        } else if i + 1 == period {
            atr = tr_values[0..=i].iter().sum::<f64>() / period as f64;
            Some(IndicatorValue::Simple(atr))
        } else {
            atr = (atr * (period - 1) as f64 + tr_values[i]) / period as f64;
            Some(IndicatorValue::Simple(atr))
        };
        results.push(IndicatorPoint {
            date: bars[i].date,
            value,
        });
    }

    IndicatorSeries {
        indicator_type: IndicatorType::Atr(period),
        values: results,
    }
}
