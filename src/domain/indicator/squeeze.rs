//! Squeeze indicator.
//!
//! `1.0` while the Bollinger Bands sit strictly inside the Keltner Channel
//! (low volatility, "squeeze on"), `0.0` otherwise. Undefined until both
//! channels are defined.

use crate::domain::indicator::bollinger::calculate_bollinger;
use crate::domain::indicator::keltner::calculate_keltner;
use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::ohlcv::OhlcvBar;

pub fn calculate_squeeze(
    bars: &[OhlcvBar],
    period: usize,
    bb_mult_x100: u32,
    kc_mult_x100: u32,
    atr_period: usize,
) -> IndicatorSeries {
    let bollinger = calculate_bollinger(bars, period, bb_mult_x100);
    let keltner = calculate_keltner(bars, period, atr_period, kc_mult_x100);

    let values = bars
        .iter()
        .zip(bollinger.values.iter().zip(&keltner.values))
        .map(|(bar, (bb, kc))| {
            let bb = bb.value.and_then(|v| v.band());
            let kc = kc.value.and_then(|v| v.band());
            let value = bb.zip(kc).map(|((bb_upper, _, bb_lower), (kc_upper, _, kc_lower))| {
                let on = bb_lower > kc_lower && bb_upper < kc_upper;
                IndicatorValue::Simple(if on { 1.0 } else { 0.0 })
            });
            IndicatorPoint {
                date: bar.date,
                value,
            }
        })
        .collect();

    IndicatorSeries {
        indicator_type: IndicatorType::Squeeze {
            period,
            bb_mult_x100,
            kc_mult_x100,
            atr_period,
        },
        values,
    }
}
