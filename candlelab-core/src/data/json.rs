//! JSON output for a full `Analysis`.
//!
//! ```json
//! {
//!   "metadata": { "pair": "BTC/USDT", "timeframe": "30m" },
//!   "fingerprint": { ... },
//!   "candles": [ { "timestamp": ..., "open": ..., ... } ],
//!   "columns": [ { "name": "rsi", "values": [null, ..., 41.2] } ],
//!   "signals": { "buy": [..], "sell": [..] }
//! }
//! ```
//!
//! Columns keep insertion order; "no value" is `null`.

use std::io::Write;

use serde_json::{json, Value};

use super::DataError;
use crate::engine::Analysis;
use crate::frame::Column;

pub fn to_json(analysis: &Analysis) -> Result<Value, DataError> {
    let columns: Vec<Value> = analysis
        .augmented
        .columns()
        .iter()
        .map(|(name, column)| json!({ "name": name, "values": column_values(column) }))
        .collect();

    Ok(json!({
        "metadata": serde_json::to_value(&analysis.metadata)?,
        "fingerprint": serde_json::to_value(&analysis.fingerprint)?,
        "candles": serde_json::to_value(analysis.augmented.candles())?,
        "columns": columns,
        "signals": {
            "buy": analysis.signals.buy_indices(),
            "sell": analysis.signals.sell_indices(),
        },
    }))
}

/// Pretty-print `to_json` output to `writer`.
pub fn write_json<W: Write>(mut writer: W, analysis: &Analysis) -> Result<(), DataError> {
    serde_json::to_writer_pretty(&mut writer, &to_json(analysis)?)?;
    writeln!(writer)?;
    Ok(())
}

fn column_values(column: &Column) -> Vec<Value> {
    match column {
        Column::Numeric(values) => values
            .iter()
            .map(|v| if v.is_finite() { json!(v) } else { Value::Null })
            .collect(),
        Column::Flag(flags) => flags.iter().map(|&f| Value::Bool(f)).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Preset;
    use crate::domain::{PairMetadata, Timeframe};
    use crate::engine::analyze;
    use crate::indicators::make_series;

    fn sample() -> Analysis {
        let closes: Vec<f64> = (0..40).map(|i| 100.0 + (i as f64 * 0.5).sin() * 5.0).collect();
        analyze(
            &make_series(&closes),
            &PairMetadata::new("ETH/USDT", Timeframe::M30),
            &Preset::RsiBbands.config(),
        )
        .unwrap()
    }

    #[test]
    fn warm_up_rows_are_null() {
        let doc = to_json(&sample()).unwrap();
        let rsi = doc["columns"]
            .as_array()
            .unwrap()
            .iter()
            .find(|c| c["name"] == "rsi")
            .unwrap();
        let values = rsi["values"].as_array().unwrap();
        assert_eq!(values.len(), 40);
        assert!(values[0].is_null());
        assert!(values[13].is_null());
        assert!(values[14].is_number());
    }

    #[test]
    fn columns_keep_insertion_order() {
        let analysis = sample();
        let doc = to_json(&analysis).unwrap();
        let names: Vec<&str> = doc["columns"]
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["name"].as_str().unwrap())
            .collect();
        let expected: Vec<&str> = analysis.augmented.column_names().collect();
        assert_eq!(names, expected);
        assert_eq!(doc["metadata"]["pair"], "ETH/USDT");
        assert_eq!(doc["metadata"]["timeframe"], "30m");
        assert_eq!(doc["candles"].as_array().unwrap().len(), 40);
    }

    #[test]
    fn write_json_is_parseable() {
        let mut out = Vec::new();
        write_json(&mut out, &sample()).unwrap();
        let parsed: Value = serde_json::from_slice(&out).unwrap();
        assert!(parsed["fingerprint"]["config_hash"].is_string());
    }
}
