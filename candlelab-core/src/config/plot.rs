//! Plot hints: which columns a charting front end should draw, and in what colour.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlotStyle {
    pub color: String,
}

impl PlotStyle {
    pub fn color(color: impl Into<String>) -> Self {
        Self {
            color: color.into(),
        }
    }
}

/// Columns overlaid on the price chart, plus named sub-charts.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PlotConfig {
    #[serde(default)]
    pub main_plot: BTreeMap<String, PlotStyle>,
    #[serde(default)]
    pub subplots: BTreeMap<String, BTreeMap<String, PlotStyle>>,
}

impl PlotConfig {
    pub fn with_main(mut self, column: &str, color: &str) -> Self {
        self.main_plot
            .insert(column.to_string(), PlotStyle::color(color));
        self
    }

    pub fn with_sub(mut self, panel: &str, column: &str, color: &str) -> Self {
        self.subplots
            .entry(panel.to_string())
            .or_default()
            .insert(column.to_string(), PlotStyle::color(color));
        self
    }

    /// Every column name the hints refer to.
    pub fn referenced_columns(&self) -> impl Iterator<Item = &str> {
        self.main_plot
            .keys()
            .chain(self.subplots.values().flat_map(|panel| panel.keys()))
            .map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collects_columns_from_all_panels() {
        let plot = PlotConfig::default()
            .with_main("bb_lowerband", "grey")
            .with_sub("RSI", "rsi", "blue")
            .with_sub("RSI", "oversold", "green");
        let mut cols: Vec<&str> = plot.referenced_columns().collect();
        cols.sort();
        assert_eq!(cols, vec!["bb_lowerband", "oversold", "rsi"]);
    }
}
