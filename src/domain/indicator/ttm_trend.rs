//! TTM Trend indicator.
//!
//! Compares the close with the average median price (hl2) of the last
//! `length` bars: `+1.0` when the close is above it, `-1.0` otherwise.
//! Warmup: first (length-1) bars are undefined.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::indicator_helpers::rolling_mean;
use crate::domain::ohlcv::OhlcvBar;

pub fn calculate_ttm_trend(bars: &[OhlcvBar], length: usize) -> IndicatorSeries {
    let medians: Vec<f64> = bars.iter().map(OhlcvBar::median_price).collect();
    let averages = rolling_mean(&medians, length);

    let values = bars
        .iter()
        .zip(averages)
        .map(|(bar, avg)| IndicatorPoint {
            date: bar.date,
            value: avg.map(|avg| IndicatorValue::Simple(if bar.close > avg { 1.0 } else { -1.0 })),
        })
        .collect();

    IndicatorSeries {
        indicator_type: IndicatorType::TtmTrend(length),
        values,
    }
}
