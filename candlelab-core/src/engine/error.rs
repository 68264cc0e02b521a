use thiserror::Error;

use crate::config::ConfigError;

/// Errors surfaced by `compute_indicators`, `compute_signals` and `analyze`.
///
/// All are caller contract violations; the computation is deterministic, so
/// none of them is worth retrying.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("insufficient history: {actual} candles supplied, strategy needs at least {required}")]
    InsufficientHistory { required: usize, actual: usize },

    #[error("missing required column '{0}'")]
    MissingColumn(String),

    #[error("invalid strategy config: {0}")]
    Config(#[from] ConfigError),
}
