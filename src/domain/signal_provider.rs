//! Default signal provider: TTM trend against the squeeze flag.

use crate::domain::indicator::squeeze::calculate_squeeze;
use crate::domain::indicator::ttm_trend::calculate_ttm_trend;
use crate::domain::indicator::{IndicatorType, mult_to_x100};
use crate::domain::ohlcv::OhlcvBar;
use crate::domain::signal::{SignalPair, zip_signals};
use crate::ports::signal_port::SignalProvider;

#[derive(Debug, Clone, PartialEq)]
pub struct SignalConfig {
    pub trend_length: usize,
    pub squeeze_period: usize,
    pub bb_mult: f64,
    pub kc_mult: f64,
    pub atr_period: usize,
}

impl Default for SignalConfig {
    fn default() -> Self {
        SignalConfig {
            trend_length: 40,
            squeeze_period: 24,
            bb_mult: 2.0,
            kc_mult: 1.5,
            atr_period: 10,
        }
    }
}

/// Trend = TTM trend (`±1`), threshold = squeeze flag (`0`/`1`).
///
/// Buys when the trend is up and no squeeze is on; sells whenever the
/// trend turns down.
#[derive(Debug, Clone)]
pub struct TtmSqueezeSignals {
    config: SignalConfig,
}

impl TtmSqueezeSignals {
    pub fn new(config: SignalConfig) -> Self {
        Self { config }
    }

    pub fn trend_type(&self) -> IndicatorType {
        IndicatorType::TtmTrend(self.config.trend_length)
    }

    pub fn threshold_type(&self) -> IndicatorType {
        IndicatorType::Squeeze {
            period: self.config.squeeze_period,
            bb_mult_x100: mult_to_x100(self.config.bb_mult),
            kc_mult_x100: mult_to_x100(self.config.kc_mult),
            atr_period: self.config.atr_period,
        }
    }
}

impl SignalProvider for TtmSqueezeSignals {
    fn describe(&self) -> String {
        format!("{} vs {}", self.trend_type(), self.threshold_type())
    }

    fn signals(&self, bars: &[OhlcvBar]) -> Vec<SignalPair> {
        let c = &self.config;
        let trend = calculate_ttm_trend(bars, c.trend_length).simple_values();
        let threshold = calculate_squeeze(
            bars,
            c.squeeze_period,
            mult_to_x100(c.bb_mult),
            mult_to_x100(c.kc_mult),
            c.atr_period,
        )
        .simple_values();
        zip_signals(&trend, &threshold)
    }
}
