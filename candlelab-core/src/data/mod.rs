//! Candle input and annotated output.
//!
//! - `csv`: read OHLCV candle files, write annotated series
//! - `json`: serialize a full `Analysis` (metadata, fingerprint, columns)
//! - `synthetic`: deterministic random-walk candles for demos and tests

pub mod csv;
pub mod json;
pub mod synthetic;

use thiserror::Error;

use crate::domain::SeriesError;

/// Errors from the data layer.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] ::csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("missing required column '{0}'")]
    MissingColumn(String),

    #[error("row {row}: cannot parse {column} value '{value}'")]
    Parse {
        row: usize,
        column: String,
        value: String,
    },

    #[error("invalid candle series: {0}")]
    Series(#[from] SeriesError),
}
