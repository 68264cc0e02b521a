//! CandleSeries: a validated, chronologically ordered run of candles.

use chrono::Duration;
use thiserror::Error;

use super::Candle;

/// Reasons a candle sequence is rejected as a series.
#[derive(Debug, Error, PartialEq)]
pub enum SeriesError {
    #[error("candle series is empty")]
    Empty,

    #[error("timestamp at index {index} is not after the previous candle")]
    NonIncreasingTimestamp { index: usize },

    #[error("negative volume at index {index}")]
    NegativeVolume { index: usize },

    #[error("non-finite {field} at index {index}")]
    NonFinitePrice { index: usize, field: &'static str },

    #[error("non-finite volume at index {index}")]
    NonFiniteVolume { index: usize },
}

/// Ordered candles with strictly increasing timestamps and non-negative volume.
///
/// The series is immutable once built. The engine only borrows it.
#[derive(Debug, Clone, PartialEq)]
pub struct CandleSeries {
    candles: Vec<Candle>,
}

impl CandleSeries {
    pub fn new(candles: Vec<Candle>) -> Result<Self, SeriesError> {
        if candles.is_empty() {
            return Err(SeriesError::Empty);
        }

        for (index, candle) in candles.iter().enumerate() {
            if let Some(field) = candle.non_finite_field() {
                return Err(SeriesError::NonFinitePrice { index, field });
            }
            if !candle.volume.is_finite() {
                return Err(SeriesError::NonFiniteVolume { index });
            }
            if candle.volume < 0.0 {
                return Err(SeriesError::NegativeVolume { index });
            }
            if index > 0 && candle.timestamp <= candles[index - 1].timestamp {
                return Err(SeriesError::NonIncreasingTimestamp { index });
            }
        }

        Ok(Self { candles })
    }

    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    pub fn candles(&self) -> &[Candle] {
        &self.candles
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Candle> {
        self.candles.iter()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.candles.iter().map(|c| c.close).collect()
    }

    pub fn typical_prices(&self) -> Vec<f64> {
        self.candles.iter().map(Candle::typical_price).collect()
    }

    pub fn volumes(&self) -> Vec<f64> {
        self.candles.iter().map(|c| c.volume).collect()
    }

    /// Median gap between consecutive candles, `None` for a single candle.
    pub fn median_spacing(&self) -> Option<Duration> {
        let mut gaps: Vec<Duration> = self
            .candles
            .windows(2)
            .map(|w| w[1].timestamp - w[0].timestamp)
            .collect();
        if gaps.is_empty() {
            return None;
        }
        gaps.sort();
        Some(gaps[gaps.len() / 2])
    }

    pub fn into_inner(self) -> Vec<Candle> {
        self.candles
    }
}

impl TryFrom<Vec<Candle>> for CandleSeries {
    type Error = SeriesError;

    fn try_from(candles: Vec<Candle>) -> Result<Self, Self::Error> {
        Self::new(candles)
    }
}

impl<'a> IntoIterator for &'a CandleSeries {
    type Item = &'a Candle;
    type IntoIter = std::slice::Iter<'a, Candle>;

    fn into_iter(self) -> Self::IntoIter {
        self.candles.iter()
    }
}
