//! Indicator implementations and the `Indicator` trait.
//!
//! Indicators are pure functions: a numeric input series in, a numeric output
//! series of the same length out. Warm-up positions hold `f64::NAN`, the
//! "no value" marker, and NaN inputs propagate as NaN outputs rather than being
//! skipped or zero-filled.
//!
//! Multi-series indicators (Bollinger) are exposed both as a one-pass function
//! returning every band and as separate named instances per band, keeping the
//! single-series `Indicator` trait unchanged.

pub mod bollinger;
pub mod crossover;
pub mod rolling;
pub mod rsi;
pub mod sma;

pub use bollinger::{bandwidth, bollinger_bands, percent_b, Bollinger, BollingerBand, BollingerBands};
pub use crossover::{crossed_above, crossed_below};
pub use rsi::Rsi;
pub use sma::Sma;

use crate::domain::CandleSeries;

/// Which candle field an indicator reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceSource {
    Close,
    /// `(high + low + close) / 3`
    Typical,
}

impl PriceSource {
    pub fn extract(&self, series: &CandleSeries) -> Vec<f64> {
        match self {
            PriceSource::Close => series.closes(),
            PriceSource::Typical => series.typical_prices(),
        }
    }
}

/// Trait for indicators.
///
/// # Look-ahead contamination guard
/// No output value at index t may depend on input from index t+1 or later.
/// Every indicator must pass the truncated-vs-full series test.
pub trait Indicator: Send + Sync {
    /// Output column name (e.g. "sma50", "rsi").
    fn name(&self) -> &str;

    /// Index of the first value that can be defined. Everything before it is NaN.
    fn lookback(&self) -> usize;

    /// Candle field fed into `compute` by `compute_candles`.
    fn source(&self) -> PriceSource {
        PriceSource::Close
    }

    /// Compute over a raw series. Returns a `Vec<f64>` of the same length.
    fn compute(&self, input: &[f64]) -> Vec<f64>;

    /// Compute over a candle series, reading the indicator's price source.
    fn compute_candles(&self, series: &CandleSeries) -> Vec<f64> {
        self.compute(&self.source().extract(series))
    }
}

/// Build a candle series from close prices for testing.
///
/// Generates plausible OHLCV on a 30-minute grid: open = prev_close (or close
/// for the first candle), high = max(open,close) + 1.0,
/// low = min(open,close) - 1.0, volume = 1000.
#[cfg(test)]
pub fn make_series(closes: &[f64]) -> CandleSeries {
    use crate::domain::Candle;
    use chrono::TimeZone;
    let base = chrono::Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
    let candles = closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            Candle {
                timestamp: base + chrono::Duration::minutes(30 * i as i64),
                open,
                high: open.max(close) + 1.0,
                low: open.min(close) - 1.0,
                close,
                volume: 1000.0,
            }
        })
        .collect();
    CandleSeries::new(candles).unwrap()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_source_extracts_field() {
        let series = make_series(&[10.0, 12.0]);
        assert_eq!(PriceSource::Close.extract(&series), vec![10.0, 12.0]);
        // candle 1: open 10, close 12, high 13, low 9 → (13 + 9 + 12) / 3
        let typical = PriceSource::Typical.extract(&series);
        assert_approx(typical[1], 34.0 / 3.0, DEFAULT_EPSILON);
    }

    #[test]
    fn compute_candles_uses_source() {
        let series = make_series(&[10.0, 11.0, 12.0]);
        let sma = Sma::new(2);
        assert_eq!(sma.compute_candles(&series), sma.compute(&series.closes()));
    }
}
