//! CandleLab Core: indicator and signal engine for candle-based strategies.
//!
//! Given one pair's OHLCV candles and a strategy configuration, the engine
//! derives indicator columns (RSI, Bollinger Bands, SMAs, crossovers) and
//! boolean buy/sell columns. Order execution, stoploss and ROI exits belong to
//! the host; the config only carries those values through.
//!
//! - Domain types (candles, validated series, timeframes, pair metadata)
//! - Indicators with an explicit lookback and `NaN` for "no value"
//! - Strategy configuration: presets, TOML loading, validation, fingerprinting
//! - Engine stages: `compute_indicators`, `compute_signals`, `analyze`
//! - CSV/JSON I/O and synthetic candles

pub mod config;
pub mod data;
pub mod domain;
pub mod engine;
pub mod fingerprint;
pub mod frame;
pub mod indicators;

pub use config::{IndicatorSet, Preset, StrategyConfig};
pub use domain::{Candle, CandleSeries, PairMetadata, Timeframe};
pub use engine::{analyze, compute_indicators, compute_signals, Analysis, EngineError};
pub use frame::{AugmentedSeries, Column};
