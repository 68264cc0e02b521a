//! Candle timeframe strings ("30m", "1h", "1d").

use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TimeframeError {
    #[error("invalid timeframe '{0}': expected <count><unit> with unit one of m, h, d, w")]
    Malformed(String),

    #[error("timeframe '{0}' has zero length")]
    Zero(String),
}

/// Candle interval length, stored in minutes.
///
/// Serialized as the exchange-style string (`"30m"`, `"1h"`), normalized to the
/// largest whole unit on output (`"60m"` prints as `"1h"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Timeframe {
    minutes: u32,
}

impl Timeframe {
    pub const M30: Timeframe = Timeframe { minutes: 30 };
    pub const H1: Timeframe = Timeframe { minutes: 60 };

    pub fn from_minutes(minutes: u32) -> Option<Self> {
        (minutes > 0).then_some(Self { minutes })
    }

    pub fn minutes(&self) -> u32 {
        self.minutes
    }

    pub fn duration(&self) -> Duration {
        Duration::minutes(i64::from(self.minutes))
    }
}

impl FromStr for Timeframe {
    type Err = TimeframeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let malformed = || TimeframeError::Malformed(s.to_string());

        let unit = trimmed.chars().last().ok_or_else(malformed)?;
        let count: u32 = trimmed[..trimmed.len() - unit.len_utf8()]
            .parse()
            .map_err(|_| malformed())?;
        let scale = match unit {
            'm' => 1,
            'h' => 60,
            'd' => 60 * 24,
            'w' => 60 * 24 * 7,
            _ => return Err(malformed()),
        };
        let minutes = count.checked_mul(scale).ok_or_else(malformed)?;
        Self::from_minutes(minutes).ok_or_else(|| TimeframeError::Zero(s.to_string()))
    }
}

impl TryFrom<String> for Timeframe {
    type Error = TimeframeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Timeframe> for String {
    fn from(tf: Timeframe) -> Self {
        tf.to_string()
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const WEEK: u32 = 60 * 24 * 7;
        const DAY: u32 = 60 * 24;
        match self.minutes {
            m if m % WEEK == 0 => write!(f, "{}w", m / WEEK),
            m if m % DAY == 0 => write!(f, "{}d", m / DAY),
            m if m % 60 == 0 => write!(f, "{}h", m / 60),
            m => write!(f, "{m}m"),
        }
    }
}
