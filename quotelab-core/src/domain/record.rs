//! Normalized price record: the dashboard's view of a CSV row.
//!
//! CSV files in the data directory come in several shapes: the combined file
//! carries `symbol` and `source`, per-symbol files carry neither, and files
//! written by other tools may use different casing or extra columns. Every
//! row is converted into a `PriceRecord` where each canonical field is
//! optional, so nothing downstream has to check for column presence.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use csv::StringRecord;
use serde::Serialize;

/// Columns every normalized table exposes, possibly as all-missing.
pub const CANONICAL_COLUMNS: [&str; 8] = [
    "date", "open", "high", "low", "close", "volume", "symbol", "source",
];

/// Markers treated as a missing value.
const NULL_MARKERS: [&str; 9] = ["", "NA", "N/A", "NaN", "nan", "null", "NULL", "None", "<NA>"];

/// One row after normalization. Absent or unparseable fields are `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PriceRecord {
    pub date: Option<NaiveDate>,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
    pub adj_close: Option<f64>,
    pub volume: Option<f64>,
    pub dividend: Option<f64>,
    pub split: Option<f64>,
    pub symbol: Option<String>,
    pub source: Option<String>,
}

/// Position of each canonical column in a raw CSV header, if present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnMap {
    pub date: Option<usize>,
    pub open: Option<usize>,
    pub high: Option<usize>,
    pub low: Option<usize>,
    pub close: Option<usize>,
    pub adj_close: Option<usize>,
    pub volume: Option<usize>,
    pub dividend: Option<usize>,
    pub split: Option<usize>,
    pub symbol: Option<usize>,
    pub source: Option<usize>,
}

impl ColumnMap {
    /// Names of the canonical columns the raw header lacked.
    pub fn missing_columns(&self) -> Vec<&'static str> {
        let present = [
            self.date,
            self.open,
            self.high,
            self.low,
            self.close,
            self.volume,
            self.symbol,
            self.source,
        ];
        CANONICAL_COLUMNS
            .iter()
            .zip(present)
            .filter(|(_, idx)| idx.is_none())
            .map(|(name, _)| *name)
            .collect()
    }
}

/// Map a raw header onto canonical columns.
///
/// Names are trimmed and lower-cased before matching. When a name repeats,
/// the first occurrence wins.
pub fn normalize_columns<'a, I>(headers: I) -> ColumnMap
where
    I: IntoIterator<Item = &'a str>,
{
    let mut map = ColumnMap::default();
    for (idx, raw) in headers.into_iter().enumerate() {
        let name = raw.trim_start_matches('\u{feff}').trim().to_lowercase();
        let slot = match name.as_str() {
            "date" => &mut map.date,
            "open" => &mut map.open,
            "high" => &mut map.high,
            "low" => &mut map.low,
            "close" => &mut map.close,
            "adj_close" => &mut map.adj_close,
            "volume" => &mut map.volume,
            "dividend" => &mut map.dividend,
            "split" => &mut map.split,
            "symbol" => &mut map.symbol,
            "source" => &mut map.source,
            _ => continue,
        };
        if slot.is_none() {
            *slot = Some(idx);
        }
    }
    map
}

impl PriceRecord {
    /// Convert one raw CSV row using a header mapping from [`normalize_columns`].
    pub fn from_raw(columns: &ColumnMap, raw: &StringRecord) -> Self {
        let text = |idx: Option<usize>| idx.and_then(|i| raw.get(i)).and_then(non_null);
        let number = |idx: Option<usize>| text(idx).and_then(parse_number_lenient);

        Self {
            date: text(columns.date).and_then(parse_date_lenient),
            open: number(columns.open),
            high: number(columns.high),
            low: number(columns.low),
            close: number(columns.close),
            adj_close: number(columns.adj_close),
            volume: number(columns.volume),
            dividend: number(columns.dividend),
            split: number(columns.split),
            symbol: text(columns.symbol).map(str::to_string),
            source: text(columns.source).map(str::to_string),
        }
    }
}

fn non_null(value: &str) -> Option<&str> {
    if NULL_MARKERS.contains(&value.trim()) {
        None
    } else {
        Some(value)
    }
}

/// Parse a date leniently. Anything unrecognised is `None`.
pub fn parse_date_lenient(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    for fmt in ["%Y-%m-%d", "%Y/%m/%d"] {
        if let Ok(date) = NaiveDate::parse_from_str(value, fmt) {
            return Some(date);
        }
    }
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, fmt) {
            return Some(dt.date());
        }
    }
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.date_naive())
}

/// Parse a number leniently. NaN and unparseable text are `None`.
pub fn parse_number_lenient(value: &str) -> Option<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| !v.is_nan())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(fields: &[&str]) -> StringRecord {
        StringRecord::from(fields.to_vec())
    }

    #[test]
    fn header_names_are_trimmed_and_lower_cased() {
        let map = normalize_columns([" Date", "OPEN ", "Close", "Volume", "extra"]);
        assert_eq!(map.date, Some(0));
        assert_eq!(map.open, Some(1));
        assert_eq!(map.close, Some(2));
        assert_eq!(map.volume, Some(3));
        assert_eq!(map.symbol, None);
    }

    #[test]
    fn missing_symbol_and_source_become_none() {
        let map = normalize_columns(["date", "open", "high", "low", "close", "volume"]);
        assert_eq!(map.missing_columns(), vec!["symbol", "source"]);

        let rec = PriceRecord::from_raw(
            &map,
            &record(&["2024-01-02", "1", "2", "0.5", "1.5", "1000"]),
        );
        assert_eq!(rec.date, NaiveDate::from_ymd_opt(2024, 1, 2));
        assert_eq!(rec.close, Some(1.5));
        assert_eq!(rec.symbol, None);
        assert_eq!(rec.source, None);
    }

    #[test]
    fn existing_lower_case_values_are_kept_verbatim() {
        let map = normalize_columns(["date", "close", "symbol", "source"]);
        let rec = PriceRecord::from_raw(&map, &record(&["2024-01-02", "10", "abc", "daily"]));
        assert_eq!(rec.symbol.as_deref(), Some("abc"));
        assert_eq!(rec.source.as_deref(), Some("daily"));
    }

    #[test]
    fn unparseable_values_are_none_not_errors() {
        let map = normalize_columns(["date", "close", "volume"]);
        let rec = PriceRecord::from_raw(&map, &record(&["not a date", "n/a", "NaN"]));
        assert_eq!(rec.date, None);
        assert_eq!(rec.close, None);
        assert_eq!(rec.volume, None);
    }

    #[test]
    fn short_rows_do_not_panic() {
        let map = normalize_columns(["date", "close", "volume"]);
        let rec = PriceRecord::from_raw(&map, &record(&["2024-01-02"]));
        assert!(rec.date.is_some());
        assert_eq!(rec.close, None);
    }

    #[test]
    fn lenient_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 5);
        assert_eq!(parse_date_lenient("2024-03-05"), expected);
        assert_eq!(parse_date_lenient("2024/03/05"), expected);
        assert_eq!(parse_date_lenient("2024-03-05 00:00:00"), expected);
        assert_eq!(parse_date_lenient("2024-03-05T16:00:00+00:00"), expected);
        assert_eq!(parse_date_lenient("05.03.2024"), None);
    }

    #[test]
    fn first_duplicate_header_wins() {
        let map = normalize_columns(["close", "Close"]);
        assert_eq!(map.close, Some(0));
    }
}
