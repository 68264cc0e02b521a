//! Minimal-ROI table: minutes since entry → minimum profit before the host exits.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Time-keyed profit targets.
///
/// Serialized with string keys (`{"30": 0.1, "0": 0.2}`) so the table round-trips
/// through both JSON and TOML.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<String, f64>", into = "BTreeMap<String, f64>")]
pub struct RoiTable {
    targets: BTreeMap<u32, f64>,
}

impl RoiTable {
    pub fn new(targets: impl IntoIterator<Item = (u32, f64)>) -> Self {
        Self {
            targets: targets.into_iter().collect(),
        }
    }

    /// Target in force after `elapsed_minutes`: the entry with the largest key
    /// not exceeding it. `None` before the first key.
    pub fn target_at(&self, elapsed_minutes: u32) -> Option<f64> {
        self.targets
            .range(..=elapsed_minutes)
            .next_back()
            .map(|(_, &roi)| roi)
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, f64)> + '_ {
        self.targets.iter().map(|(&m, &r)| (m, r))
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

impl TryFrom<BTreeMap<String, f64>> for RoiTable {
    type Error = String;

    fn try_from(raw: BTreeMap<String, f64>) -> Result<Self, Self::Error> {
        let mut targets = BTreeMap::new();
        for (key, roi) in raw {
            let minutes: u32 = key
                .trim()
                .parse()
                .map_err(|_| format!("minimal_roi key '{key}' is not a whole number of minutes"))?;
            targets.insert(minutes, roi);
        }
        Ok(Self { targets })
    }
}

impl From<RoiTable> for BTreeMap<String, f64> {
    fn from(table: RoiTable) -> Self {
        table
            .targets
            .into_iter()
            .map(|(m, r)| (m.to_string(), r))
            .collect()
    }
}
