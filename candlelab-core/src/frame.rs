//! Augmented series: candles plus named indicator and signal columns.
//!
//! Built by the engine, then read by the signal rules, writers and callers.
//! Columns keep insertion order so output files are stable across runs.

use crate::domain::{Candle, CandleSeries};
use crate::engine::EngineError;

/// One derived column, aligned by index to the candles.
///
/// Numeric columns use `f64::NAN` as the "no value" marker; `value()` maps it to
/// `None` so callers never see a NaN masquerading as a number.
#[derive(Debug, Clone)]
pub enum Column {
    Numeric(Vec<f64>),
    Flag(Vec<bool>),
}

impl Column {
    pub fn len(&self) -> usize {
        match self {
            Column::Numeric(v) => v.len(),
            Column::Flag(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Numeric value at `index`; `None` for "no value", flags, or out of range.
    pub fn value(&self, index: usize) -> Option<f64> {
        match self {
            Column::Numeric(v) => v.get(index).copied().filter(|x| !x.is_nan()),
            Column::Flag(_) => None,
        }
    }

    /// Flag value at `index`; `None` for numeric columns or out of range.
    pub fn flag(&self, index: usize) -> Option<bool> {
        match self {
            Column::Flag(v) => v.get(index).copied(),
            Column::Numeric(_) => None,
        }
    }

    pub fn as_numeric(&self) -> Option<&[f64]> {
        match self {
            Column::Numeric(v) => Some(v),
            Column::Flag(_) => None,
        }
    }

    pub fn as_flags(&self) -> Option<&[bool]> {
        match self {
            Column::Flag(v) => Some(v),
            Column::Numeric(_) => None,
        }
    }
}

/// NaN compares equal to NaN here: two columns are equal when they hold the same
/// values and the same "no value" positions.
impl PartialEq for Column {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Column::Numeric(a), Column::Numeric(b)) => {
                a.len() == b.len()
                    && a
                        .iter()
                        .zip(b)
                        .all(|(x, y)| (x.is_nan() && y.is_nan()) || x == y)
            }
            (Column::Flag(a), Column::Flag(b)) => a == b,
            _ => false,
        }
    }
}

/// Candles plus derived columns. Every column has exactly `len()` entries.
#[derive(Debug, Clone, PartialEq)]
pub struct AugmentedSeries {
    series: CandleSeries,
    columns: Vec<(String, Column)>,
}

impl AugmentedSeries {
    pub fn new(series: CandleSeries) -> Self {
        Self {
            series,
            columns: Vec::new(),
        }
    }

    /// Insert a named column, replacing an existing one in place.
    ///
    /// # Panics
    /// If the column length differs from the candle count.
    pub fn insert(&mut self, name: impl Into<String>, column: Column) {
        let name = name.into();
        assert_eq!(
            column.len(),
            self.series.len(),
            "column '{name}' has {} values for {} candles",
            column.len(),
            self.series.len()
        );
        match self.columns.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = column,
            None => self.columns.push((name, column)),
        }
    }

    pub fn insert_numeric(&mut self, name: impl Into<String>, values: Vec<f64>) {
        self.insert(name, Column::Numeric(values));
    }

    pub fn insert_flags(&mut self, name: impl Into<String>, values: Vec<bool>) {
        self.insert(name, Column::Flag(values));
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|(n, _)| n == name).map(|(_, c)| c)
    }

    pub fn numeric(&self, name: &str) -> Option<&[f64]> {
        self.column(name).and_then(Column::as_numeric)
    }

    pub fn flags(&self, name: &str) -> Option<&[bool]> {
        self.column(name).and_then(Column::as_flags)
    }

    /// Numeric column lookup that fails with `MissingColumn`.
    pub fn require_numeric(&self, name: &str) -> Result<&[f64], EngineError> {
        self.numeric(name)
            .ok_or_else(|| EngineError::MissingColumn(name.to_string()))
    }

    /// Flag column lookup that fails with `MissingColumn`.
    pub fn require_flags(&self, name: &str) -> Result<&[bool], EngineError> {
        self.flags(name)
            .ok_or_else(|| EngineError::MissingColumn(name.to_string()))
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(n, _)| n.as_str())
    }

    pub fn columns(&self) -> &[(String, Column)] {
        &self.columns
    }

    pub fn series(&self) -> &CandleSeries {
        &self.series
    }

    pub fn candles(&self) -> &[Candle] {
        self.series.candles()
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::make_series;

    #[test]
    fn insert_and_get() {
        let mut aug = AugmentedSeries::new(make_series(&[1.0, 2.0, 3.0]));
        aug.insert_numeric("sma2", vec![f64::NAN, 1.5, 2.5]);
        aug.insert_flags("buy", vec![false, true, false]);

        let sma = aug.column("sma2").unwrap();
        assert_eq!(sma.value(0), None);
        assert_eq!(sma.value(1), Some(1.5));
        assert_eq!(sma.value(3), None);
        assert_eq!(aug.flags("buy").unwrap(), &[false, true, false]);
        assert_eq!(aug.column("buy").unwrap().flag(1), Some(true));
    }

    #[test]
    fn insert_replaces_in_place() {
        let mut aug = AugmentedSeries::new(make_series(&[1.0, 2.0]));
        aug.insert_numeric("a", vec![1.0, 1.0]);
        aug.insert_numeric("b", vec![2.0, 2.0]);
        aug.insert_numeric("a", vec![3.0, 3.0]);

        let names: Vec<&str> = aug.column_names().collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(aug.numeric("a").unwrap(), &[3.0, 3.0]);
    }

    #[test]
    fn missing_and_mistyped_columns() {
        let mut aug = AugmentedSeries::new(make_series(&[1.0]));
        aug.insert_flags("buy", vec![true]);

        assert!(matches!(
            aug.require_numeric("rsi"),
            Err(EngineError::MissingColumn(name)) if name == "rsi"
        ));
        // A flag column does not satisfy a numeric lookup.
        assert!(aug.require_numeric("buy").is_err());
        assert!(aug.require_flags("buy").is_ok());
    }

    #[test]
    #[should_panic(expected = "has 1 values for 2 candles")]
    fn rejects_misaligned_column() {
        let mut aug = AugmentedSeries::new(make_series(&[1.0, 2.0]));
        aug.insert_numeric("bad", vec![1.0]);
    }

    #[test]
    fn nan_positions_compare_equal() {
        let a = Column::Numeric(vec![f64::NAN, 1.0]);
        let b = Column::Numeric(vec![f64::NAN, 1.0]);
        let c = Column::Numeric(vec![0.0, 1.0]);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, Column::Flag(vec![false, true]));
    }
}
