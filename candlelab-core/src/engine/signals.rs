//! Signal stage: indicator columns in, boolean buy/sell columns out.
//!
//! Every rule also requires `volume > 0`, so candles the exchange reported
//! without trades never signal. Comparisons against a NaN ("no value") operand
//! are false, which keeps warm-up rows silent without extra branching.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{IndicatorSet, StrategyConfig};
use crate::frame::AugmentedSeries;
use crate::indicators::{crossed_above, crossed_below};

use super::EngineError;

/// Buy and sell flags aligned to the candles.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SignalSeries {
    pub buy: Vec<bool>,
    pub sell: Vec<bool>,
}

impl SignalSeries {
    pub fn len(&self) -> usize {
        self.buy.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buy.is_empty()
    }

    pub fn buy_count(&self) -> usize {
        self.buy.iter().filter(|&&b| b).count()
    }

    pub fn sell_count(&self) -> usize {
        self.sell.iter().filter(|&&s| s).count()
    }

    pub fn buy_indices(&self) -> Vec<usize> {
        indices(&self.buy)
    }

    pub fn sell_indices(&self) -> Vec<usize> {
        indices(&self.sell)
    }
}

fn indices(flags: &[bool]) -> Vec<usize> {
    flags
        .iter()
        .enumerate()
        .filter_map(|(i, &f)| f.then_some(i))
        .collect()
}

/// Apply the configured rule set to an indicator-annotated series.
///
/// Fails with `MissingColumn` when `augmented` lacks a column the rules read,
/// e.g. crossover rules applied to a series annotated for the threshold set.
pub fn compute_signals(
    augmented: &AugmentedSeries,
    config: &StrategyConfig,
) -> Result<SignalSeries, EngineError> {
    let candles = augmented.candles();

    let signals = match &config.indicators {
        IndicatorSet::Threshold {
            oversold,
            overbought,
            ..
        } => {
            let rsi = augmented.require_numeric("rsi")?;
            let lower = augmented.require_numeric("bb_lowerband")?;

            let buy = candles
                .iter()
                .zip(rsi.iter().zip(lower))
                .map(|(c, (&r, &lo))| r < *oversold && c.close < lo && c.has_volume())
                .collect();
            let sell = candles
                .iter()
                .zip(rsi)
                .map(|(c, &r)| r > *overbought && c.has_volume())
                .collect();
            SignalSeries { buy, sell }
        }
        IndicatorSet::Crossover {
            short_period,
            long_period,
        } => {
            let short = augmented.require_numeric(&format!("sma{short_period}"))?;
            let long = augmented.require_numeric(&format!("sma{long_period}"))?;

            let with_volume = |flags: Vec<bool>| -> Vec<bool> {
                flags
                    .into_iter()
                    .zip(candles)
                    .map(|(f, c)| f && c.has_volume())
                    .collect()
            };
            SignalSeries {
                buy: with_volume(crossed_above(short, long)),
                sell: with_volume(crossed_below(short, long)),
            }
        }
    };

    debug!(
        buys = signals.buy_count(),
        sells = signals.sell_count(),
        "computed signals"
    );
    Ok(signals)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Preset;
    use crate::engine::compute_indicators;
    use crate::frame::AugmentedSeries;
    use crate::indicators::make_series;

    /// A threshold-annotated frame with hand-set indicator values.
    fn threshold_frame(closes: &[f64], rsi: Vec<f64>, lower: Vec<f64>) -> AugmentedSeries {
        let mut aug = AugmentedSeries::new(make_series(closes));
        aug.insert_numeric("rsi", rsi);
        aug.insert_numeric("bb_lowerband", lower);
        aug
    }

    #[test]
    fn threshold_buy_needs_both_conditions() {
        let cfg = Preset::RsiBbands.config();
        let aug = threshold_frame(
            &[100.0, 100.0, 100.0, 100.0],
            vec![25.0, 25.0, 35.0, f64::NAN],
            vec![101.0, 99.0, 101.0, 101.0],
        );
        let sig = compute_signals(&aug, &cfg).unwrap();
        // 0: rsi<30 and close<lower; 1: close above lower; 2: rsi too high; 3: no value
        assert_eq!(sig.buy, vec![true, false, false, false]);
        assert_eq!(sig.sell_count(), 0);
    }

    #[test]
    fn threshold_sell_on_overbought() {
        let cfg = Preset::RsiBbands.config();
        let aug = threshold_frame(
            &[1.0, 1.0, 1.0],
            vec![70.0, 70.5, f64::NAN],
            vec![f64::NAN; 3],
        );
        let sig = compute_signals(&aug, &cfg).unwrap();
        assert_eq!(sig.sell, vec![false, true, false]);
    }

    #[test]
    fn zero_volume_suppresses_signals() {
        let cfg = Preset::RsiBbands.config();
        let mut candles = make_series(&[100.0, 100.0]).into_inner();
        candles[0].volume = 0.0;
        candles[1].volume = 0.0;
        let series = crate::domain::CandleSeries::new(candles).unwrap();
        let mut aug = AugmentedSeries::new(series);
        aug.insert_numeric("rsi", vec![10.0, 90.0]);
        aug.insert_numeric("bb_lowerband", vec![200.0, 200.0]);

        let sig = compute_signals(&aug, &cfg).unwrap();
        assert_eq!(sig.buy_count() + sig.sell_count(), 0);
    }

    #[test]
    fn crossover_rules_need_sma_columns() {
        let threshold_out = compute_indicators(
            &make_series(&[100.0; 40]),
            &Preset::RsiBbands.config(),
        )
        .unwrap();
        let err = compute_signals(&threshold_out, &Preset::SmaCross.config()).unwrap_err();
        assert!(matches!(err, EngineError::MissingColumn(name) if name == "sma50"));
    }

    #[test]
    fn threshold_rules_need_rsi() {
        let aug = AugmentedSeries::new(make_series(&[1.0]));
        let err = compute_signals(&aug, &Preset::RsiBbands.config()).unwrap_err();
        assert!(matches!(err, EngineError::MissingColumn(name) if name == "rsi"));
    }

    #[test]
    fn crossover_uses_sma_columns() {
        let mut cfg = Preset::SmaCross.config();
        cfg.indicators = IndicatorSet::Crossover {
            short_period: 2,
            long_period: 3,
        };
        let mut aug = AugmentedSeries::new(make_series(&[1.0, 1.0, 1.0, 1.0]));
        aug.insert_numeric("sma2", vec![f64::NAN, 1.0, 3.0, 1.0]);
        aug.insert_numeric("sma3", vec![f64::NAN, f64::NAN, 2.0, 2.0]);
        // index 2: prev long is NaN → no cross; index 3: 1 < 2 after 3 >= 2 → death cross
        let sig = compute_signals(&aug, &cfg).unwrap();
        assert_eq!(sig.buy_indices(), Vec::<usize>::new());
        assert_eq!(sig.sell_indices(), vec![3]);
    }
}
