//! Technical indicators used to derive trading signals.
//!
//! Every indicator returns one point per input bar, in bar order. A point's
//! value is `None` while the indicator is still warming up:
//! - `IndicatorPoint`: A single point in an indicator time series
//! - `IndicatorValue`: Single line or a three-line band
//! - `IndicatorType`: Indicator identity + parameters
//! - `IndicatorSeries`: A time series of indicator values

pub mod bollinger;
pub mod ema;
pub mod keltner;
pub mod squeeze;
pub mod ttm_trend;

use chrono::NaiveDate;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorPoint {
    pub date: NaiveDate,
    pub value: Option<IndicatorValue>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IndicatorValue {
    Simple(f64),
    Band { upper: f64, middle: f64, lower: f64 },
}

impl IndicatorValue {
    pub fn simple(&self) -> Option<f64> {
        match self {
            IndicatorValue::Simple(v) => Some(*v),
            IndicatorValue::Band { .. } => None,
        }
    }

    pub fn band(&self) -> Option<(f64, f64, f64)> {
        match self {
            IndicatorValue::Band {
                upper,
                middle,
                lower,
            } => Some((*upper, *middle, *lower)),
            IndicatorValue::Simple(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IndicatorType {
    Ema(usize),
    Atr(usize),
    Bollinger {
        period: usize,
        stddev_mult_x100: u32,
    },
    Keltner {
        period: usize,
        atr_period: usize,
        atr_mult_x100: u32,
    },
    TtmTrend(usize),
    Squeeze {
        period: usize,
        bb_mult_x100: u32,
        kc_mult_x100: u32,
        atr_period: usize,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSeries {
    pub indicator_type: IndicatorType,
    pub values: Vec<IndicatorPoint>,
}

impl IndicatorSeries {
    /// Series of the given type with every point undefined.
    pub fn undefined(indicator_type: IndicatorType, dates: impl Iterator<Item = NaiveDate>) -> Self {
        IndicatorSeries {
            indicator_type,
            values: dates
                .map(|date| IndicatorPoint { date, value: None })
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Single-line values, `None` where undefined or not a single line.
    pub fn simple_values(&self) -> Vec<Option<f64>> {
        self.values
            .iter()
            .map(|p| p.value.and_then(|v| v.simple()))
            .collect()
    }

    pub fn first_valid_index(&self) -> Option<usize> {
        self.values.iter().position(|p| p.value.is_some())
    }
}

/// Converts a multiplier such as `1.5` into the hundredths used as a key.
pub fn mult_to_x100(mult: f64) -> u32 {
    (mult * 100.0).round().max(0.0) as u32
}

impl fmt::Display for IndicatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorType::Ema(period) => write!(f, "EMA({})", period),
            IndicatorType::Atr(period) => write!(f, "ATR({})", period),
            IndicatorType::Bollinger {
                period,
                stddev_mult_x100,
            } => {
                let mult = *stddev_mult_x100 as f64 / 100.0;
                write!(f, "BOLLINGER({},{})", period, mult)
            }
            IndicatorType::Keltner {
                period,
                atr_period,
                atr_mult_x100,
            } => {
                let mult = *atr_mult_x100 as f64 / 100.0;
                write!(f, "KELTNER({},{},{})", period, atr_period, mult)
            }
            IndicatorType::TtmTrend(length) => write!(f, "TTM_TREND({})", length),
            IndicatorType::Squeeze {
                period,
                bb_mult_x100,
                kc_mult_x100,
                atr_period,
            } => write!(
                f,
                "SQUEEZE({},{},{},{})",
                period,
                *bb_mult_x100 as f64 / 100.0,
                *kc_mult_x100 as f64 / 100.0,
                atr_period
            ),
        }
    }
}
