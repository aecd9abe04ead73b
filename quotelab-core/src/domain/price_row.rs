//! One trading day of a fetched series, as written to the per-symbol and combined CSVs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which endpoint produced a series.
///
/// Serialized as `ADJUSTED` / `DAILY` in the combined CSV's `source` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SeriesSource {
    Adjusted,
    Daily,
}

impl SeriesSource {
    /// Tag written to the `source` column.
    pub fn as_str(self) -> &'static str {
        match self {
            SeriesSource::Adjusted => "ADJUSTED",
            SeriesSource::Daily => "DAILY",
        }
    }

    /// Lower-case kind used in per-symbol file names.
    pub fn file_kind(self) -> &'static str {
        match self {
            SeriesSource::Adjusted => "adjusted",
            SeriesSource::Daily => "daily",
        }
    }

    /// API `function` parameter for this endpoint.
    pub fn api_function(self) -> &'static str {
        match self {
            SeriesSource::Adjusted => "TIME_SERIES_DAILY_ADJUSTED",
            SeriesSource::Daily => "TIME_SERIES_DAILY",
        }
    }

    pub fn from_adjusted(adjusted: bool) -> Self {
        if adjusted {
            SeriesSource::Adjusted
        } else {
            SeriesSource::Daily
        }
    }

    /// Case-insensitive parse of a source tag or file kind.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ADJUSTED" => Some(SeriesSource::Adjusted),
            "DAILY" => Some(SeriesSource::Daily),
            _ => None,
        }
    }
}

impl fmt::Display for SeriesSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One trading day for a single symbol.
///
/// `adj_close`, `dividend` and `split` are only populated by the adjusted
/// endpoint. Prices that could not be parsed from the response are NaN.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRow {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub adj_close: Option<f64>,
    pub volume: f64,
    pub dividend: Option<f64>,
    pub split: Option<f64>,
}

impl PriceRow {
    /// Returns true if any OHLC field is NaN.
    pub fn is_void(&self) -> bool {
        self.open.is_nan() || self.high.is_nan() || self.low.is_nan() || self.close.is_nan()
    }
}

/// A parsed daily series for one symbol, sorted ascending by date.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    pub symbol: String,
    pub source: SeriesSource,
    pub rows: Vec<PriceRow>,
}

impl PriceSeries {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.close).collect()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.rows.iter().map(|r| r.date).collect()
    }

    /// Rows tagged with symbol and source, ready for the combined file.
    pub fn labeled_rows(&self) -> impl Iterator<Item = LabeledRow> + '_ {
        self.rows.iter().map(move |row| LabeledRow {
            symbol: self.symbol.clone(),
            source: self.source,
            row: row.clone(),
        })
    }
}

/// A row carrying its partition key, as accumulated across a fetch run.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledRow {
    pub symbol: String,
    pub source: SeriesSource,
    pub row: PriceRow,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_row() -> PriceRow {
        PriceRow {
            date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            open: 100.0,
            high: 105.0,
            low: 98.0,
            close: 103.0,
            adj_close: Some(102.5),
            volume: 50_000.0,
            dividend: Some(0.0),
            split: Some(1.0),
        }
    }

    #[test]
    fn source_tags() {
        assert_eq!(SeriesSource::Adjusted.as_str(), "ADJUSTED");
        assert_eq!(SeriesSource::Daily.file_kind(), "daily");
        assert_eq!(SeriesSource::Daily.api_function(), "TIME_SERIES_DAILY");
        assert_eq!(SeriesSource::parse(" adjusted "), Some(SeriesSource::Adjusted));
        assert_eq!(SeriesSource::parse("DAILY"), Some(SeriesSource::Daily));
        assert_eq!(SeriesSource::parse("weekly"), None);
    }

    #[test]
    fn source_serializes_upper_case() {
        let json = serde_json::to_string(&SeriesSource::Adjusted).unwrap();
        assert_eq!(json, "\"ADJUSTED\"");
    }

    #[test]
    fn row_detects_void() {
        let mut row = sample_row();
        assert!(!row.is_void());
        row.close = f64::NAN;
        assert!(row.is_void());
    }

    #[test]
    fn labeled_rows_carry_symbol_and_source() {
        let series = PriceSeries {
            symbol: "TSLA".into(),
            source: SeriesSource::Daily,
            rows: vec![sample_row(), sample_row()],
        };
        let labeled: Vec<LabeledRow> = series.labeled_rows().collect();
        assert_eq!(labeled.len(), 2);
        assert!(labeled.iter().all(|r| r.symbol == "TSLA"));
        assert!(labeled.iter().all(|r| r.source == SeriesSource::Daily));
    }
}
