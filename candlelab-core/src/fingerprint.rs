//! Analysis fingerprinting: deterministic identification of what was computed.
//!
//! - `ConfigHash`: BLAKE3 of the strategy config's canonical JSON.
//! - `DatasetHash`: BLAKE3 over every candle's timestamp and OHLCV bits.
//! - `AnalysisFingerprint`: both hashes plus the pair, timeframe and candle span,
//!   written alongside annotated output so results can be traced to their inputs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::StrategyConfig;
use crate::domain::{CandleSeries, ConfigHash, DatasetHash, PairMetadata, Timeframe};

/// Content hash of a candle series.
///
/// Hashes the raw `f64` bit patterns, so two series hash equal only when every
/// value is bit-identical.
pub fn dataset_hash(series: &CandleSeries) -> DatasetHash {
    let mut hasher = blake3::Hasher::new();
    for c in series {
        hasher.update(&c.timestamp.timestamp_millis().to_le_bytes());
        for v in [c.open, c.high, c.low, c.close, c.volume] {
            hasher.update(&v.to_bits().to_le_bytes());
        }
    }
    DatasetHash(hasher.finalize().to_hex().to_string())
}

/// Complete record of one analysis call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisFingerprint {
    pub strategy: String,
    pub pair: String,
    pub timeframe: Timeframe,
    pub candles: usize,
    pub first_timestamp: DateTime<Utc>,
    pub last_timestamp: DateTime<Utc>,
    pub config_hash: ConfigHash,
    pub dataset_hash: DatasetHash,
}

impl AnalysisFingerprint {
    pub fn new(config: &StrategyConfig, metadata: &PairMetadata, series: &CandleSeries) -> Self {
        let candles = series.candles();
        // CandleSeries is never empty, but fall back to the epoch rather than panic.
        let first = candles.first().map(|c| c.timestamp).unwrap_or_default();
        let last = candles.last().map(|c| c.timestamp).unwrap_or_default();
        Self {
            strategy: config.name.clone(),
            pair: metadata.pair.clone(),
            timeframe: metadata.timeframe,
            candles: series.len(),
            first_timestamp: first,
            last_timestamp: last,
            config_hash: config.fingerprint(),
            dataset_hash: dataset_hash(series),
        }
    }
}
