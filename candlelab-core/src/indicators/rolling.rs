//! Fixed-size sliding window with O(1) mean and variance (population or sample).
//!
//! Sums are kept relative to a shift value (the first finite input), which keeps
//! the variance of flat or slowly drifting windows exact instead of relying on
//! the cancellation of two large sums. Running sums are rebuilt from the buffer
//! every `RESYNC_EVERY` pushes so rounding error cannot accumulate across long
//! series.

use std::collections::VecDeque;

const RESYNC_EVERY: usize = 1024;

/// Trailing window statistics over the last `period` values pushed.
#[derive(Debug, Clone)]
pub struct RollingWindow {
    period: usize,
    buf: VecDeque<f64>,
    shift: Option<f64>,
    sum: f64,
    sum_sq: f64,
    nan_count: usize,
    since_resync: usize,
}

impl RollingWindow {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "rolling window period must be >= 1");
        Self {
            period,
            buf: VecDeque::with_capacity(period + 1),
            shift: None,
            sum: 0.0,
            sum_sq: 0.0,
            nan_count: 0,
            since_resync: 0,
        }
    }

    /// Push the next value, evicting the oldest once the window is full.
    pub fn push(&mut self, value: f64) {
        if self.shift.is_none() && value.is_finite() {
            self.shift = Some(value);
        }
        let k = self.shift.unwrap_or(0.0);

        self.buf.push_back(value);
        if value.is_nan() {
            self.nan_count += 1;
        } else {
            let d = value - k;
            self.sum += d;
            self.sum_sq += d * d;
        }

        if self.buf.len() > self.period {
            if let Some(old) = self.buf.pop_front() {
                if old.is_nan() {
                    self.nan_count -= 1;
                } else {
                    let d = old - k;
                    self.sum -= d;
                    self.sum_sq -= d * d;
                }
            }
        }

        self.since_resync += 1;
        if self.since_resync >= RESYNC_EVERY {
            self.resync();
        }
    }

    fn resync(&mut self) {
        let k = self.shift.unwrap_or(0.0);
        self.sum = 0.0;
        self.sum_sq = 0.0;
        for &v in self.buf.iter().filter(|v| !v.is_nan()) {
            let d = v - k;
            self.sum += d;
            self.sum_sq += d * d;
        }
        self.since_resync = 0;
    }

    /// True once `period` values have been pushed and none of them is NaN.
    pub fn is_ready(&self) -> bool {
        self.buf.len() == self.period && self.nan_count == 0
    }

    /// Arithmetic mean of the window, NaN until ready.
    pub fn mean(&self) -> f64 {
        if !self.is_ready() {
            return f64::NAN;
        }
        self.shift.unwrap_or(0.0) + self.sum / self.period as f64
    }

    /// Population variance (divide by N) of the window, NaN until ready.
    pub fn variance(&self) -> f64 {
        if !self.is_ready() {
            return f64::NAN;
        }
        let n = self.period as f64;
        let m = self.sum / n;
        (self.sum_sq / n - m * m).max(0.0)
    }

    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    /// Sample variance (divide by N - 1), NaN until ready.
    ///
    /// A one-value window has no spread and reports 0.
    pub fn sample_variance(&self) -> f64 {
        if self.period == 1 {
            return if self.is_ready() { 0.0 } else { f64::NAN };
        }
        let n = self.period as f64;
        self.variance() * n / (n - 1.0)
    }

    pub fn sample_std_dev(&self) -> f64 {
        self.sample_variance().sqrt()
    }
}
