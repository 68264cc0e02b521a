//! Deterministic synthetic candles.
//!
//! A seeded random walk starting at 100.0 on a grid beginning 2024-01-01 UTC.
//! The same `(n, seed, timeframe)` always produces the same series. These are
//! clearly fake and only meant for demos, benches and tests.

use chrono::{TimeZone, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::domain::{Candle, CandleSeries, SeriesError, Timeframe};

const START_PRICE: f64 = 100.0;

/// Generate `n` candles. Fails only for `n == 0`.
pub fn generate(n: usize, seed: u64, timeframe: Timeframe) -> Result<CandleSeries, SeriesError> {
    let mut rng = StdRng::seed_from_u64(seed);
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).single().unwrap_or_default();
    let step = timeframe.duration();

    let mut candles = Vec::with_capacity(n);
    let mut price = START_PRICE;
    for i in 0..n {
        let ret: f64 = rng.gen_range(-0.02..0.02);
        let open = price;
        let close = (price * (1.0 + ret)).max(0.01);
        let high = open.max(close) * (1.0 + rng.gen_range(0.0..0.005));
        let low = open.min(close) * (1.0 - rng.gen_range(0.0..0.005));
        let volume = rng.gen_range(10.0..1_000.0);

        candles.push(Candle {
            timestamp: start + step * i as i32,
            open,
            high,
            low,
            close,
            volume,
        });
        price = close;
    }

    CandleSeries::new(candles)
}
