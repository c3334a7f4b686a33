//! Buy/sell condition evaluation.
//!
//! `buy = trend > threshold`, `sell = trend < threshold`. Equal values or an
//! undefined input on either side yield no condition at all.

use crate::domain::signal::SignalPair;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Condition {
    pub buy: bool,
    pub sell: bool,
}

impl Condition {
    pub const NONE: Condition = Condition {
        buy: false,
        sell: false,
    };

    pub fn from_signal(signal: &SignalPair) -> Self {
        match (signal.trend, signal.threshold) {
            (Some(trend), Some(threshold)) => Condition {
                buy: trend > threshold,
                sell: trend < threshold,
            },
            _ => Condition::NONE,
        }
    }
}

pub fn evaluate_conditions(signals: &[SignalPair]) -> Vec<Condition> {
    signals.iter().map(Condition::from_signal).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trend_above_threshold_is_buy() {
        let c = Condition::from_signal(&SignalPair::defined(1.0, 0.0));
        assert!(c.buy);
        assert!(!c.sell);
    }

    #[test]
    fn trend_below_threshold_is_sell() {
        let c = Condition::from_signal(&SignalPair::defined(-1.0, 0.0));
        assert!(!c.buy);
        assert!(c.sell);
    }

    #[test]
    fn equality_is_neither() {
        assert_eq!(
            Condition::from_signal(&SignalPair::defined(1.0, 1.0)),
            Condition::NONE
        );
    }

    #[test]
    fn undefined_input_is_neither() {
        assert_eq!(
            Condition::from_signal(&SignalPair::new(None, Some(0.0))),
            Condition::NONE
        );
        assert_eq!(
            Condition::from_signal(&SignalPair::new(Some(5.0), None)),
            Condition::NONE
        );
        assert_eq!(
            Condition::from_signal(&SignalPair::new(None, None)),
            Condition::NONE
        );
    }

    #[test]
    fn nan_compares_false_both_ways() {
        let c = Condition::from_signal(&SignalPair::defined(f64::NAN, 0.0));
        assert_eq!(c, Condition::NONE);
    }

    #[test]
    fn evaluate_preserves_length_and_order() {
        let signals = vec![
            SignalPair::new(None, None),
            SignalPair::defined(2.0, 1.0),
            SignalPair::defined(0.0, 1.0),
        ];
        let conditions = evaluate_conditions(&signals);
        assert_eq!(conditions.len(), 3);
        assert_eq!(conditions[0], Condition::NONE);
        assert!(conditions[1].buy);
        assert!(conditions[2].sell);
    }
}
