//! Keltner Channel indicator.
//!
//! Middle: EMA(period) of close. Upper/Lower: Middle ± mult × ATR(atr_period).
//! Defined once both the EMA and the ATR are defined.

use crate::domain::indicator::ema::calculate_ema;
use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::indicator_helpers::calc_atr;
use crate::domain::ohlcv::OhlcvBar;

pub fn calculate_keltner(
    bars: &[OhlcvBar],
    period: usize,
    atr_period: usize,
    atr_mult_x100: u32,
) -> IndicatorSeries {
    let mult = atr_mult_x100 as f64 / 100.0;
    let middle = calculate_ema(bars, period).simple_values();
    let atr = calc_atr(bars, atr_period).simple_values();

    let values = bars
        .iter()
        .zip(middle.iter().zip(&atr))
        .map(|(bar, (m, a))| IndicatorPoint {
            date: bar.date,
            value: m.zip(*a).map(|(middle, atr)| IndicatorValue::Band {
                upper: middle + mult * atr,
                middle,
                lower: middle - mult * atr,
            }),
        })
        .collect();

    IndicatorSeries {
        indicator_type: IndicatorType::Keltner {
            period,
            atr_period,
            atr_mult_x100,
        },
        values,
    }
}
