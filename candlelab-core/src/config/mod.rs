//! Strategy configuration: immutable settings for one analysis run.
//!
//! A `StrategyConfig` selects the indicator/signal rule set (`IndicatorSet`) and
//! carries the static values the host framework consumes (stoploss, ROI table,
//! warm-up length, order types, plot hints). The engine only reads
//! `indicators` and `startup_candle_count`; everything else is passed through.
//!
//! Configs load from TOML. A document may start from a built-in preset with
//! `preset = "rsi_bbands"` and override individual keys.

pub mod orders;
pub mod plot;
pub mod presets;
pub mod roi;

pub use orders::{OrderKind, OrderTypes};
pub use plot::{PlotConfig, PlotStyle};
pub use presets::Preset;
pub use roi::RoiTable;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::domain::{ConfigHash, Timeframe};

/// Candle fields that are always present and may be referenced by plot hints.
const CANDLE_COLUMNS: [&str; 6] = ["timestamp", "open", "high", "low", "close", "volume"];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unknown preset '{0}' (expected rsi_bbands or sma_cross)")]
    UnknownPreset(String),

    #[error("{0}")]
    Invalid(String),
}

/// Indicator set and signal rules, one variant per strategy family.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum IndicatorSet {
    /// RSI + Bollinger Bands on typical price; threshold buy/sell rules.
    Threshold {
        rsi_period: usize,
        bb_window: usize,
        bb_stds: f64,
        oversold: f64,
        overbought: f64,
    },
    /// Short/long SMA of close; golden/death cross buy/sell rules.
    Crossover {
        short_period: usize,
        long_period: usize,
    },
}

impl IndicatorSet {
    /// Column names `compute_indicators` appends, in order.
    pub fn output_columns(&self) -> Vec<String> {
        match self {
            IndicatorSet::Threshold { .. } => [
                "rsi",
                "overbought",
                "oversold",
                "bb_lowerband",
                "bb_middleband",
                "bb_upperband",
                "bb_percent",
                "bb_width",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            IndicatorSet::Crossover {
                short_period,
                long_period,
            } => vec![
                format!("sma{short_period}"),
                format!("sma{long_period}"),
                "golden_cross".to_string(),
                "death_cross".to_string(),
            ],
        }
    }

    /// Index of the first candle where every indicator in the set is defined.
    pub fn lookback(&self) -> usize {
        match self {
            IndicatorSet::Threshold {
                rsi_period,
                bb_window,
                ..
            } => (*rsi_period).max(bb_window.saturating_sub(1)),
            IndicatorSet::Crossover { long_period, .. } => long_period.saturating_sub(1),
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        match *self {
            IndicatorSet::Threshold {
                rsi_period,
                bb_window,
                bb_stds,
                oversold,
                overbought,
            } => {
                if rsi_period == 0 || bb_window == 0 {
                    return invalid("rsi_period and bb_window must be >= 1");
                }
                if !(bb_stds.is_finite() && bb_stds > 0.0) {
                    return invalid(format!("bb_stds must be a positive number, got {bb_stds}"));
                }
                let in_range = |v: f64| (0.0..=100.0).contains(&v);
                if !in_range(oversold) || !in_range(overbought) {
                    return invalid("RSI thresholds must lie within [0, 100]");
                }
                // Keeps buy (rsi < oversold) and sell (rsi > overbought) exclusive.
                if oversold >= overbought {
                    return invalid(format!(
                        "oversold ({oversold}) must be below overbought ({overbought})"
                    ));
                }
            }
            IndicatorSet::Crossover {
                short_period,
                long_period,
            } => {
                if short_period == 0 {
                    return invalid("short_period must be >= 1");
                }
                if short_period >= long_period {
                    return invalid(format!(
                        "short_period ({short_period}) must be below long_period ({long_period})"
                    ));
                }
            }
        }
        Ok(())
    }
}

/// Passive host switches carried for completeness.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostFlags {
    pub process_only_new_candles: bool,
    pub use_sell_signal: bool,
    pub sell_profit_only: bool,
    pub ignore_roi_if_buy_signal: bool,
}

impl Default for HostFlags {
    fn default() -> Self {
        Self {
            process_only_new_candles: false,
            use_sell_signal: true,
            sell_profit_only: false,
            ignore_roi_if_buy_signal: false,
        }
    }
}

/// Complete configuration of one strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyConfig {
    pub name: String,
    pub timeframe: Timeframe,
    /// Negative fraction of the entry price, e.g. -0.10 for a 10% stop.
    pub stoploss: f64,
    pub startup_candle_count: usize,
    pub indicators: IndicatorSet,
    pub minimal_roi: RoiTable,
    #[serde(default)]
    pub order_types: OrderTypes,
    #[serde(default)]
    pub plot: PlotConfig,
    #[serde(default)]
    pub flags: HostFlags,
}

impl StrategyConfig {
    /// Parse a TOML document, resolve an optional `preset` base, and validate.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Self::resolve(s, None)
    }

    /// Like `from_toml_str`, but a document without its own `preset` key is
    /// read as overrides on top of `fallback`.
    pub fn from_toml_str_over(s: &str, fallback: Preset) -> Result<Self, ConfigError> {
        Self::resolve(s, Some(fallback))
    }

    fn resolve(s: &str, fallback: Option<Preset>) -> Result<Self, ConfigError> {
        let mut table: toml::Table = s.parse()?;

        let preset = match table.remove("preset") {
            Some(name) => Some(
                name.as_str()
                    .ok_or_else(|| ConfigError::Invalid("preset must be a string".into()))?
                    .parse::<Preset>()?,
            ),
            None => fallback,
        };

        let value = match preset {
            Some(preset) => {
                let mut base = toml::Value::try_from(preset.config())?;
                if !table.is_empty() {
                    merge(&mut base, toml::Value::Table(table));
                }
                base
            }
            None => toml::Value::Table(table),
        };

        let config: StrategyConfig = value.try_into()?;
        config.validate()?;
        for column in config.unknown_plot_columns() {
            tracing::warn!(
                strategy = %config.name,
                column,
                "plot hint names a column this config does not produce"
            );
        }
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        Self::resolve(&read_config(path)?, None)
    }

    /// Load a file as overrides on top of `fallback` (see `from_toml_str_over`).
    pub fn load_over(path: &Path, fallback: Preset) -> Result<Self, ConfigError> {
        Self::resolve(&read_config(path)?, Some(fallback))
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.startup_candle_count == 0 {
            return invalid("startup_candle_count must be >= 1");
        }
        if !(self.stoploss > -1.0 && self.stoploss < 0.0) {
            return invalid(format!(
                "stoploss must lie in (-1, 0), got {}",
                self.stoploss
            ));
        }
        if self.minimal_roi.is_empty() {
            return invalid("minimal_roi needs at least one entry");
        }
        if let Some((minutes, roi)) = self.minimal_roi.iter().find(|(_, r)| !r.is_finite()) {
            return invalid(format!("minimal_roi[{minutes}] is not finite: {roi}"));
        }
        self.indicators.validate()?;
        Ok(())
    }

    /// Plot hint columns that no analysis with this config produces.
    ///
    /// `validate` ignores these; loading logs each one as a warning.
    pub fn unknown_plot_columns(&self) -> Vec<&str> {
        let known = self.known_columns();
        self.plot
            .referenced_columns()
            .filter(|c| !known.iter().any(|k| k == c))
            .collect()
    }

    /// Every column an analysis with this config produces, candles included.
    pub fn known_columns(&self) -> Vec<String> {
        CANDLE_COLUMNS
            .iter()
            .map(|c| c.to_string())
            .chain(self.indicators.output_columns())
            .chain(["buy".to_string(), "sell".to_string()])
            .collect()
    }

    /// BLAKE3 over the canonical JSON form. Equal configs hash equal.
    pub fn fingerprint(&self) -> ConfigHash {
        // Struct fields serialize in declaration order and maps are BTreeMaps,
        // so the JSON is deterministic.
        let json = serde_json::to_string(self).expect("StrategyConfig must serialize");
        ConfigHash::from_bytes(json.as_bytes())
    }
}

fn read_config(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn invalid<T>(msg: impl Into<String>) -> Result<T, ConfigError> {
    Err(ConfigError::Invalid(msg.into()))
}

/// Overlay `over` onto `base`. Tables merge key by key; an empty table, or one
/// whose `type` tag differs from the base, replaces it wholesale.
fn merge(base: &mut toml::Value, over: toml::Value) {
    match (base, over) {
        (toml::Value::Table(base_t), toml::Value::Table(over_t)) if !over_t.is_empty() => {
            for (key, value) in over_t {
                match base_t.get_mut(&key) {
                    Some(existing) if !tag_changed(existing, &value) => merge(existing, value),
                    _ => {
                        base_t.insert(key, value);
                    }
                }
            }
        }
        (base, over) => *base = over,
    }
}

fn tag_changed(base: &toml::Value, over: &toml::Value) -> bool {
    match (base.get("type"), over.get("type")) {
        (Some(a), Some(b)) => a != b,
        _ => false,
    }
}
