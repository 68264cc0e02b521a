//! Built-in strategy presets.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{
    ConfigError, HostFlags, IndicatorSet, OrderTypes, PlotConfig, RoiTable, StrategyConfig,
};
use crate::domain::Timeframe;

/// Named starting points for a `StrategyConfig`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Preset {
    /// RSI oversold + close under the lower Bollinger band buys; RSI overbought sells.
    RsiBbands,
    /// SMA50/SMA200 golden cross buys; death cross sells.
    SmaCross,
}

impl Preset {
    pub const ALL: [Preset; 2] = [Preset::RsiBbands, Preset::SmaCross];

    pub fn name(&self) -> &'static str {
        match self {
            Preset::RsiBbands => "rsi_bbands",
            Preset::SmaCross => "sma_cross",
        }
    }

    pub fn config(&self) -> StrategyConfig {
        match self {
            Preset::RsiBbands => rsi_bbands(),
            Preset::SmaCross => sma_cross(),
        }
    }
}

impl FromStr for Preset {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        Preset::ALL
            .into_iter()
            .find(|p| p.name() == normalized)
            .ok_or_else(|| ConfigError::UnknownPreset(s.to_string()))
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn rsi_bbands() -> StrategyConfig {
    StrategyConfig {
        name: Preset::RsiBbands.name().to_string(),
        timeframe: Timeframe::M30,
        indicators: IndicatorSet::Threshold {
            rsi_period: 14,
            bb_window: 20,
            bb_stds: 2.0,
            oversold: 30.0,
            overbought: 70.0,
        },
        stoploss: -0.15,
        minimal_roi: RoiTable::new([(30, 0.1), (0, 0.2)]),
        startup_candle_count: 30,
        order_types: OrderTypes::default(),
        plot: PlotConfig::default()
            .with_main("bb_lowerband", "grey")
            .with_main("bb_upperband", "grey")
            .with_main("bb_middleband", "red")
            .with_sub("RSI", "rsi", "blue")
            .with_sub("RSI", "overbought", "red")
            .with_sub("RSI", "oversold", "green"),
        flags: HostFlags::default(),
    }
}

fn sma_cross() -> StrategyConfig {
    StrategyConfig {
        name: Preset::SmaCross.name().to_string(),
        timeframe: Timeframe::H1,
        indicators: IndicatorSet::Crossover {
            short_period: 50,
            long_period: 200,
        },
        stoploss: -0.10,
        minimal_roi: RoiTable::new([(60, 0.01), (30, 0.02), (0, 0.04)]),
        startup_candle_count: 30,
        order_types: OrderTypes::default(),
        plot: PlotConfig::default()
            .with_main("sma50", "green")
            .with_main("sma200", "blue"),
        flags: HostFlags::default(),
    }
}
