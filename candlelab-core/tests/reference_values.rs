//! Reference values for the `rsi_bbands` columns.
//!
//! The closes are the classic 33-bar Wilder RSI worksheet. RSI(14) is seeded
//! with the simple mean of the first 14 changes and then Wilder-smoothed, the
//! TA-Lib convention. Bands use window 20, 2 stds, sample stddev (ddof = 1) over
//! typical price, matching a pandas rolling `std()`.

use candlelab_core::config::Preset;
use candlelab_core::domain::{Candle, CandleSeries, Timeframe};
use candlelab_core::engine::compute_indicators;
use chrono::{TimeZone, Utc};

const CLOSES: [f64; 33] = [
    44.34, 44.09, 44.15, 43.61, 44.33, 44.83, 45.10, 45.42, 45.84, 46.08, 45.89, 46.03, 45.61,
    46.28, 46.28, 46.00, 46.03, 46.41, 46.22, 45.64, 46.21, 46.25, 45.71, 46.45, 45.78, 45.35,
    44.03, 44.18, 44.22, 44.57, 43.42, 42.66, 43.13,
];

/// `high = close + 0.6`, `low = close - 0.3`: the typical price sits 0.1 above
/// the close, so the bands are not computed over closes by accident.
fn worksheet() -> CandleSeries {
    let base = Utc.with_ymd_and_hms(2024, 5, 6, 0, 0, 0).unwrap();
    let candles = CLOSES
        .iter()
        .enumerate()
        .map(|(i, &close)| Candle {
            timestamp: base + Timeframe::M30.duration() * i as i32,
            open: close,
            high: close + 0.6,
            low: close - 0.3,
            close,
            volume: 250.0,
        })
        .collect();
    CandleSeries::new(candles).unwrap()
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "actual={actual}, expected={expected}"
    );
}

#[test]
fn rsi14_matches_wilder_reference() {
    let aug = compute_indicators(&worksheet(), &Preset::RsiBbands.config()).unwrap();
    let rsi = aug.numeric("rsi").unwrap();

    assert!(rsi[13].is_nan());
    assert_close(rsi[14], 70.464_135_021_097_05);
    assert_close(rsi[15], 66.249_618_553_555_05);
    assert_close(rsi[19], 57.915_020_670_085_56);
    assert_close(rsi[32], 37.788_771_982_057_824);
}

#[test]
fn bands_match_sample_stddev_reference() {
    let aug = compute_indicators(&worksheet(), &Preset::RsiBbands.config()).unwrap();
    let lower = aug.numeric("bb_lowerband").unwrap();
    let middle = aug.numeric("bb_middleband").unwrap();
    let upper = aug.numeric("bb_upperband").unwrap();

    assert!(upper[18].is_nan());
    assert_close(middle[19], 45.509);
    assert_close(upper[19], 47.259_655_816_965_09);
    assert_close(lower[19], 43.758_344_183_034_92);

    assert_close(middle[32], 45.341);
    assert_close(upper[32], 47.781_956_671_816_246);
    assert_close(lower[32], 42.900_043_328_183_756);
}
