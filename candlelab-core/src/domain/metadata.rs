//! Per-call metadata the host passes alongside the candles.

use serde::{Deserialize, Serialize};

use super::Timeframe;

/// Trading pair and candle timeframe for one analysis call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairMetadata {
    /// Exchange pair identifier, e.g. `BTC/USDT`.
    pub pair: String,
    pub timeframe: Timeframe,
}

impl PairMetadata {
    pub fn new(pair: impl Into<String>, timeframe: Timeframe) -> Self {
        Self {
            pair: pair.into(),
            timeframe,
        }
    }
}
