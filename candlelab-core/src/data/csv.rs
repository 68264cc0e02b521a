//! CSV candle files.
//!
//! Input needs `timestamp, open, high, low, close, volume` headers (any order,
//! case-insensitive, extra columns ignored). Timestamps may be RFC 3339,
//! `YYYY-MM-DD HH:MM:SS` (read as UTC), `YYYY-MM-DD`, or integer epoch
//! milliseconds.
//!
//! Output writes the candles followed by every derived column in insertion
//! order. "No value" is an empty cell and flags are `1`/`0`.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use ::csv::{ReaderBuilder, StringRecord, Trim, WriterBuilder};
use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use tracing::debug;

use super::DataError;
use crate::domain::{Candle, CandleSeries};
use crate::frame::{AugmentedSeries, Column};

const REQUIRED: [&str; 6] = ["timestamp", "open", "high", "low", "close", "volume"];

/// Read and validate a candle series from CSV.
pub fn read_candles<R: Read>(reader: R) -> Result<CandleSeries, DataError> {
    let mut rdr = ReaderBuilder::new().trim(Trim::All).from_reader(reader);

    let headers = rdr.headers()?.clone();
    let mut idx = [0usize; 6];
    for (slot, name) in idx.iter_mut().zip(REQUIRED) {
        *slot = headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case(name))
            .ok_or_else(|| DataError::MissingColumn(name.to_string()))?;
    }
    let [ts_i, open_i, high_i, low_i, close_i, vol_i] = idx;

    let mut candles = Vec::new();
    for (i, record) in rdr.records().enumerate() {
        let record = record?;
        // Header is line 1, so the first data row is line 2.
        let row = record.position().map_or(i + 2, |p| p.line() as usize);

        candles.push(Candle {
            timestamp: parse_timestamp(field(&record, ts_i)).ok_or_else(|| DataError::Parse {
                row,
                column: "timestamp".to_string(),
                value: field(&record, ts_i).to_string(),
            })?,
            open: parse_number(&record, open_i, row, "open")?,
            high: parse_number(&record, high_i, row, "high")?,
            low: parse_number(&record, low_i, row, "low")?,
            close: parse_number(&record, close_i, row, "close")?,
            volume: parse_number(&record, vol_i, row, "volume")?,
        });
    }

    debug!(candles = candles.len(), "read candle csv");
    Ok(CandleSeries::new(candles)?)
}

pub fn read_candles_path(path: &Path) -> Result<CandleSeries, DataError> {
    read_candles(File::open(path)?)
}

fn field<'r>(record: &'r StringRecord, index: usize) -> &'r str {
    record.get(index).unwrap_or("")
}

fn parse_number(
    record: &StringRecord,
    index: usize,
    row: usize,
    column: &str,
) -> Result<f64, DataError> {
    let raw = field(record, index);
    raw.parse::<f64>().map_err(|_| DataError::Parse {
        row,
        column: column.to_string(),
        value: raw.to_string(),
    })
}

/// Parse any supported timestamp form as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(millis) = raw.parse::<i64>() {
        return DateTime::from_timestamp_millis(millis);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Write candles only, in the same layout `read_candles` accepts.
pub fn write_candles<W: Write>(writer: W, series: &CandleSeries) -> Result<(), DataError> {
    write_augmented(writer, &AugmentedSeries::new(series.clone()))
}

/// Write candles plus every derived column.
pub fn write_augmented<W: Write>(writer: W, augmented: &AugmentedSeries) -> Result<(), DataError> {
    let mut wtr = WriterBuilder::new().from_writer(writer);

    let header: Vec<&str> = REQUIRED
        .iter()
        .copied()
        .chain(augmented.column_names())
        .collect();
    wtr.write_record(&header)?;

    for (i, c) in augmented.candles().iter().enumerate() {
        let mut row = vec![
            c.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true),
            c.open.to_string(),
            c.high.to_string(),
            c.low.to_string(),
            c.close.to_string(),
            c.volume.to_string(),
        ];
        row.extend(augmented.columns().iter().map(|(_, col)| cell(col, i)));
        wtr.write_record(&row)?;
    }

    wtr.flush()?;
    Ok(())
}

fn cell(column: &Column, index: usize) -> String {
    match column {
        Column::Numeric(_) => column
            .value(index)
            .map(|v| v.to_string())
            .unwrap_or_default(),
        Column::Flag(_) => match column.flag(index) {
            Some(true) => "1".to_string(),
            Some(false) => "0".to_string(),
            None => String::new(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SeriesError;
    use crate::indicators::make_series;
    use chrono::TimeZone;

    const SAMPLE: &str = "\
date,Timestamp,Open,High,Low,Close,Volume
x,2024-01-01T00:00:00Z,100,101,99,100.5,12.5
x,2024-01-01 00:30:00,100.5,102,100,101.5,0
x,1704069000000,101.5,103,101,102,3
";

    #[test]
    fn reads_mixed_timestamp_formats() {
        let series = read_candles(SAMPLE.as_bytes()).unwrap();
        assert_eq!(series.len(), 3);
        let ts: Vec<_> = series.iter().map(|c| c.timestamp).collect();
        assert_eq!(ts[0], Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        assert_eq!(ts[1], Utc.with_ymd_and_hms(2024, 1, 1, 0, 30, 0).unwrap());
        assert_eq!(ts[2], Utc.with_ymd_and_hms(2024, 1, 1, 0, 30, 0).unwrap() + chrono::Duration::minutes(30));
        assert_eq!(series.candles()[0].volume, 12.5);
        assert_eq!(series.candles()[1].volume, 0.0);
    }

    #[test]
    fn missing_volume_column() {
        let text = "timestamp,open,high,low,close\n2024-01-01,1,1,1,1\n";
        let err = read_candles(text.as_bytes()).unwrap_err();
        assert!(matches!(err, DataError::MissingColumn(c) if c == "volume"));
    }

    #[test]
    fn bad_number_reports_row_and_column() {
        let text = "timestamp,open,high,low,close,volume\n\
                    2024-01-01,1,1,1,1,1\n\
                    2024-01-02,1,1,oops,1,1\n";
        let err = read_candles(text.as_bytes()).unwrap_err();
        match err {
            DataError::Parse { row, column, value } => {
                assert_eq!(row, 3);
                assert_eq!(column, "low");
                assert_eq!(value, "oops");
            }
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn unordered_rows_fail_series_validation() {
        let text = "timestamp,open,high,low,close,volume\n\
                    2024-01-02,1,1,1,1,1\n\
                    2024-01-01,1,1,1,1,1\n";
        let err = read_candles(text.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            DataError::Series(SeriesError::NonIncreasingTimestamp { index: 1 })
        ));
    }

    #[test]
    fn header_only_is_empty_series() {
        let text = "timestamp,open,high,low,close,volume\n";
        let err = read_candles(text.as_bytes()).unwrap_err();
        assert!(matches!(err, DataError::Series(SeriesError::Empty)));
    }

    #[test]
    fn writes_blank_for_no_value_and_digits_for_flags() {
        let mut aug = AugmentedSeries::new(make_series(&[10.0, 11.0]));
        aug.insert_numeric("sma2", vec![f64::NAN, 10.5]);
        aug.insert_flags("buy", vec![false, true]);

        let mut out = Vec::new();
        write_augmented(&mut out, &aug).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "timestamp,open,high,low,close,volume,sma2,buy");
        assert_eq!(lines[1], "2024-01-02T00:00:00Z,10,11,9,10,1000,,0");
        assert_eq!(lines[2], "2024-01-02T00:30:00Z,10,12,9,11,1000,10.5,1");
    }

    #[test]
    fn candles_round_trip_through_csv() {
        let series = make_series(&[10.0, 10.25, 9.75]);
        let mut out = Vec::new();
        write_candles(&mut out, &series).unwrap();
        let back = read_candles(out.as_slice()).unwrap();
        assert_eq!(back, series);
    }
}
