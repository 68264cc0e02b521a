//! Indicator & signal engine.
//!
//! Stateless: every call recomputes all columns from the candles it is given,
//! holds no locks and keeps nothing between calls. Callers that need
//! throughput parallelize across pairs.
//!
//! 1. `compute_indicators`: candles → candles + indicator columns
//! 2. `compute_signals`: indicator columns → buy/sell flags
//! 3. `analyze`: both stages, with `buy`/`sell` appended to the series

pub mod analyze;
pub mod error;
pub mod indicators;
pub mod signals;

pub use analyze::{analyze, Analysis};
pub use error::EngineError;
pub use indicators::compute_indicators;
pub use signals::{compute_signals, SignalSeries};
