//! Crossover detection between two aligned series.
//!
//! `crossed_above(a, b)[i]` holds when `a[i] > b[i]` and `a[i-1] <= b[i-1]`.
//! `crossed_below` is the mirror. Index 0 and any index where one of the four
//! operands is NaN are `false`. A strict inequality on the current candle and a
//! non-strict one on the previous candle means the two can never both fire.

/// Golden-cross style detection: `a` moves from at-or-below `b` to above it.
pub fn crossed_above(a: &[f64], b: &[f64]) -> Vec<bool> {
    detect(a, b, |cur_a, cur_b, prev_a, prev_b| {
        cur_a > cur_b && prev_a <= prev_b
    })
}

/// Death-cross style detection: `a` moves from at-or-above `b` to below it.
pub fn crossed_below(a: &[f64], b: &[f64]) -> Vec<bool> {
    detect(a, b, |cur_a, cur_b, prev_a, prev_b| {
        cur_a < cur_b && prev_a >= prev_b
    })
}

fn detect(a: &[f64], b: &[f64], rule: impl Fn(f64, f64, f64, f64) -> bool) -> Vec<bool> {
    assert_eq!(a.len(), b.len(), "crossover operands must be aligned");
    let mut out = vec![false; a.len()];
    for i in 1..a.len() {
        let (cur_a, cur_b, prev_a, prev_b) = (a[i], b[i], a[i - 1], b[i - 1]);
        if cur_a.is_nan() || cur_b.is_nan() || prev_a.is_nan() || prev_b.is_nan() {
            continue;
        }
        out[i] = rule(cur_a, cur_b, prev_a, prev_b);
    }
    out
}
