//! Indicator stage: candles in, candles plus indicator columns out.

use tracing::debug;

use crate::config::{IndicatorSet, StrategyConfig};
use crate::domain::CandleSeries;
use crate::frame::AugmentedSeries;
use crate::indicators::{
    bandwidth, bollinger_bands, crossed_above, crossed_below, percent_b, Indicator, Rsi, Sma,
};

use super::EngineError;

/// Fail with `InsufficientHistory` unless the series covers the startup period.
pub(crate) fn check_history(series: &CandleSeries, config: &StrategyConfig) -> Result<(), EngineError> {
    if series.len() < config.startup_candle_count {
        return Err(EngineError::InsufficientHistory {
            required: config.startup_candle_count,
            actual: series.len(),
        });
    }
    Ok(())
}

/// Compute the configured indicator set over `series`.
///
/// Every index below an indicator's own lookback is "no value" (NaN), even when
/// the series is longer than `startup_candle_count`.
pub fn compute_indicators(
    series: &CandleSeries,
    config: &StrategyConfig,
) -> Result<AugmentedSeries, EngineError> {
    config.validate()?;
    check_history(series, config)?;

    if config.indicators.lookback() >= config.startup_candle_count {
        debug!(
            lookback = config.indicators.lookback(),
            startup = config.startup_candle_count,
            "indicator warm-up extends past startup_candle_count"
        );
    }

    let n = series.len();
    let closes = series.closes();
    let mut out = AugmentedSeries::new(series.clone());

    match config.indicators {
        IndicatorSet::Threshold {
            rsi_period,
            bb_window,
            bb_stds,
            oversold,
            overbought,
        } => {
            out.insert_numeric("rsi", Rsi::new(rsi_period).compute(&closes));
            out.insert_numeric("overbought", vec![overbought; n]);
            out.insert_numeric("oversold", vec![oversold; n]);

            let bands = bollinger_bands(&series.typical_prices(), bb_window, bb_stds);
            let pct = percent_b(&closes, &bands.lower, &bands.upper);
            let width = bandwidth(&bands.lower, &bands.middle, &bands.upper);
            out.insert_numeric("bb_lowerband", bands.lower);
            out.insert_numeric("bb_middleband", bands.middle);
            out.insert_numeric("bb_upperband", bands.upper);
            out.insert_numeric("bb_percent", pct);
            out.insert_numeric("bb_width", width);
        }
        IndicatorSet::Crossover {
            short_period,
            long_period,
        } => {
            let short = Sma::new(short_period);
            let long = Sma::new(long_period);
            let short_vals = short.compute(&closes);
            let long_vals = long.compute(&closes);

            let golden = crossed_above(&short_vals, &long_vals);
            let death = crossed_below(&short_vals, &long_vals);
            out.insert_numeric(short.name(), short_vals);
            out.insert_numeric(long.name(), long_vals);
            out.insert_flags("golden_cross", golden);
            out.insert_flags("death_cross", death);
        }
    }

    debug!(candles = n, columns = out.columns().len(), "computed indicators");
    Ok(out)
}
