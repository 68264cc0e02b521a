//! Full pass for one pair: indicators, then signals, appended as `buy`/`sell`.

use tracing::{debug, debug_span, warn};

use crate::config::StrategyConfig;
use crate::domain::{CandleSeries, PairMetadata};
use crate::fingerprint::AnalysisFingerprint;
use crate::frame::AugmentedSeries;

use super::{compute_indicators, compute_signals, EngineError, SignalSeries};

/// Result of `analyze`: the annotated series plus where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub metadata: PairMetadata,
    pub fingerprint: AnalysisFingerprint,
    pub augmented: AugmentedSeries,
    pub signals: SignalSeries,
}

impl Analysis {
    /// Index of the first candle the caller should trust (the startup period).
    pub fn first_trusted_index(&self, config: &StrategyConfig) -> usize {
        config.startup_candle_count.min(self.augmented.len())
    }
}

/// Run the indicator and signal stages for one pair.
///
/// Mismatches between the metadata timeframe, the config timeframe, and the
/// actual candle spacing are logged, not rejected: the host owns the data.
pub fn analyze(
    series: &CandleSeries,
    metadata: &PairMetadata,
    config: &StrategyConfig,
) -> Result<Analysis, EngineError> {
    let span = debug_span!("analyze", pair = %metadata.pair, strategy = %config.name);
    let _enter = span.enter();

    if metadata.timeframe != config.timeframe {
        warn!(
            candles = %metadata.timeframe,
            strategy = %config.timeframe,
            "candle timeframe differs from the strategy timeframe"
        );
    }
    if let Some(spacing) = series.median_spacing() {
        if spacing != metadata.timeframe.duration() {
            warn!(
                expected_minutes = metadata.timeframe.minutes(),
                median_minutes = spacing.num_minutes(),
                "candle spacing does not match timeframe"
            );
        }
    }

    let mut augmented = compute_indicators(series, config)?;
    let signals = compute_signals(&augmented, config)?;
    augmented.insert_flags("buy", signals.buy.clone());
    augmented.insert_flags("sell", signals.sell.clone());

    debug!(candles = series.len(), "analysis complete");

    Ok(Analysis {
        metadata: metadata.clone(),
        fingerprint: AnalysisFingerprint::new(config, metadata, series),
        augmented,
        signals,
    })
}
