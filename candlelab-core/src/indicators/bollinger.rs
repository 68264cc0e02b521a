//! Bollinger Bands: moving average +/- standard deviation multiplier.
//!
//! - Middle: SMA(input, period)
//! - Upper: middle + mult * stddev(input, period)
//! - Lower: middle - mult * stddev(input, period)
//!
//! The engine feeds typical price. Uses sample stddev (divide by N - 1), the
//! same convention as a pandas rolling `std()`.
//! Lookback: period - 1.

use super::rolling::RollingWindow;
use super::{Indicator, PriceSource};

/// Which band of the Bollinger Bands to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BollingerBand {
    Upper,
    Middle,
    Lower,
}

/// All three bands from a single pass.
#[derive(Debug, Clone, PartialEq)]
pub struct BollingerBands {
    pub lower: Vec<f64>,
    pub middle: Vec<f64>,
    pub upper: Vec<f64>,
}

/// Compute lower/middle/upper bands in one O(N) pass.
pub fn bollinger_bands(input: &[f64], period: usize, multiplier: f64) -> BollingerBands {
    let n = input.len();
    let mut bands = BollingerBands {
        lower: Vec::with_capacity(n),
        middle: Vec::with_capacity(n),
        upper: Vec::with_capacity(n),
    };

    let mut window = RollingWindow::new(period);
    for &v in input {
        window.push(v);
        let mean = window.mean();
        let offset = multiplier * window.sample_std_dev();
        bands.middle.push(mean);
        bands.upper.push(mean + offset);
        bands.lower.push(mean - offset);
    }

    bands
}

/// %B: where `price` sits inside the band, 0 at lower and 1 at upper.
///
/// NaN when the bands have collapsed (`upper == lower`).
pub fn percent_b(price: &[f64], lower: &[f64], upper: &[f64]) -> Vec<f64> {
    price
        .iter()
        .zip(lower.iter().zip(upper))
        .map(|(&p, (&lo, &up))| {
            let width = up - lo;
            if width == 0.0 {
                f64::NAN
            } else {
                (p - lo) / width
            }
        })
        .collect()
}

/// Band width relative to the middle band. NaN when the middle band is zero.
pub fn bandwidth(lower: &[f64], middle: &[f64], upper: &[f64]) -> Vec<f64> {
    lower
        .iter()
        .zip(middle.iter().zip(upper))
        .map(|(&lo, (&mid, &up))| {
            if mid == 0.0 {
                f64::NAN
            } else {
                (up - lo) / mid
            }
        })
        .collect()
}

/// A single Bollinger band as an `Indicator`.
#[derive(Debug, Clone)]
pub struct Bollinger {
    period: usize,
    multiplier: f64,
    band: BollingerBand,
    name: String,
}

impl Bollinger {
    fn build(period: usize, multiplier: f64, band: BollingerBand) -> Self {
        assert!(period >= 1, "Bollinger period must be >= 1");
        assert!(multiplier >= 0.0, "Bollinger multiplier must be >= 0");
        let name = match band {
            BollingerBand::Upper => "bb_upperband",
            BollingerBand::Middle => "bb_middleband",
            BollingerBand::Lower => "bb_lowerband",
        };
        Self {
            period,
            multiplier,
            band,
            name: name.to_string(),
        }
    }

    pub fn upper(period: usize, multiplier: f64) -> Self {
        Self::build(period, multiplier, BollingerBand::Upper)
    }

    pub fn middle(period: usize, multiplier: f64) -> Self {
        Self::build(period, multiplier, BollingerBand::Middle)
    }

    pub fn lower(period: usize, multiplier: f64) -> Self {
        Self::build(period, multiplier, BollingerBand::Lower)
    }
}

impl Indicator for Bollinger {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period.saturating_sub(1)
    }

    fn source(&self) -> PriceSource {
        PriceSource::Typical
    }

    fn compute(&self, input: &[f64]) -> Vec<f64> {
        let bands = bollinger_bands(input, self.period, self.multiplier);
        match self.band {
            BollingerBand::Upper => bands.upper,
            BollingerBand::Middle => bands.middle,
            BollingerBand::Lower => bands.lower,
        }
    }
}
