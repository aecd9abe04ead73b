//! Flat-file store for fetched series.
//!
//! Layout under `data_dir`:
//! - `{SYMBOL}_daily_{adjusted|daily}.csv` per symbol
//! - `all_stocks_daily_combined.csv` for the whole run
//! - `plots/{SYMBOL}_ma.svg` per symbol
//!
//! Every file is written to a `.tmp` sibling first and renamed into place, so
//! a reader never observes a half-written CSV.

use crate::domain::{LabeledRow, PriceSeries, SeriesSource};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const COMBINED_FILE_NAME: &str = "all_stocks_daily_combined.csv";
pub const PLOTS_DIR_NAME: &str = "plots";

const ADJUSTED_HEADER: [&str; 9] = [
    "date", "open", "high", "low", "close", "adj_close", "volume", "dividend", "split",
];
const DAILY_HEADER: [&str; 6] = ["date", "open", "high", "low", "close", "volume"];
const COMBINED_HEADER: [&str; 11] = [
    "date", "open", "high", "low", "close", "adj_close", "volume", "dividend", "split", "symbol",
    "source",
];

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("atomic rename to {path} failed: {source}")]
    Rename {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("nothing to write for {0}")]
    Empty(String),
}

/// Writes per-symbol and combined CSVs under one data directory.
#[derive(Debug, Clone)]
pub struct DataStore {
    data_dir: PathBuf,
}

impl DataStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn plots_dir(&self) -> PathBuf {
        self.data_dir.join(PLOTS_DIR_NAME)
    }

    pub fn symbol_csv_path(&self, symbol: &str, source: SeriesSource) -> PathBuf {
        self.data_dir
            .join(format!("{symbol}_daily_{}.csv", source.file_kind()))
    }

    pub fn combined_path(&self) -> PathBuf {
        self.data_dir.join(COMBINED_FILE_NAME)
    }

    pub fn chart_path(&self, symbol: &str) -> PathBuf {
        chart_path(&self.plots_dir(), symbol)
    }

    /// Create the data and plots directories if missing.
    pub fn ensure_dirs(&self) -> Result<(), StoreError> {
        for dir in [self.data_dir.clone(), self.plots_dir()] {
            fs::create_dir_all(&dir).map_err(|source| StoreError::CreateDir { path: dir, source })?;
        }
        Ok(())
    }

    /// Write one symbol's series. Returns the path written.
    pub fn write_symbol_csv(&self, series: &PriceSeries) -> Result<PathBuf, StoreError> {
        if series.is_empty() {
            return Err(StoreError::Empty(series.symbol.clone()));
        }
        let path = self.symbol_csv_path(&series.symbol, series.source);
        let adjusted = series.source == SeriesSource::Adjusted;

        write_atomic(&path, |w| {
            if adjusted {
                w.write_record(ADJUSTED_HEADER)?;
            } else {
                w.write_record(DAILY_HEADER)?;
            }
            for row in &series.rows {
                let mut record = vec![
                    row.date.format("%Y-%m-%d").to_string(),
                    num_field(row.open),
                    num_field(row.high),
                    num_field(row.low),
                    num_field(row.close),
                ];
                if adjusted {
                    record.push(opt_field(row.adj_close));
                    record.push(num_field(row.volume));
                    record.push(opt_field(row.dividend));
                    record.push(opt_field(row.split));
                } else {
                    record.push(num_field(row.volume));
                }
                w.write_record(&record)?;
            }
            Ok(())
        })?;

        tracing::debug!(symbol = %series.symbol, path = %path.display(), rows = series.len(), "wrote symbol csv");
        Ok(path)
    }

    /// Write the combined file, sorted by (date, symbol). Returns the path written.
    pub fn write_combined(&self, rows: &mut [LabeledRow]) -> Result<PathBuf, StoreError> {
        if rows.is_empty() {
            return Err(StoreError::Empty(COMBINED_FILE_NAME.to_string()));
        }
        rows.sort_by(|a, b| {
            a.row
                .date
                .cmp(&b.row.date)
                .then_with(|| a.symbol.cmp(&b.symbol))
        });

        let path = self.combined_path();
        write_atomic(&path, |w| {
            w.write_record(COMBINED_HEADER)?;
            for labeled in rows.iter() {
                let row = &labeled.row;
                w.write_record([
                    row.date.format("%Y-%m-%d").to_string(),
                    num_field(row.open),
                    num_field(row.high),
                    num_field(row.low),
                    num_field(row.close),
                    opt_field(row.adj_close),
                    num_field(row.volume),
                    opt_field(row.dividend),
                    opt_field(row.split),
                    labeled.symbol.clone(),
                    labeled.source.as_str().to_string(),
                ])?;
            }
            Ok(())
        })?;

        tracing::debug!(path = %path.display(), rows = rows.len(), "wrote combined csv");
        Ok(path)
    }
}

/// `{plots_dir}/{SYMBOL}_ma.svg`
pub fn chart_path(plots_dir: &Path, symbol: &str) -> PathBuf {
    plots_dir.join(format!("{symbol}_ma.svg"))
}

/// NaN marks an unparseable value and is written as an empty field.
fn num_field(value: f64) -> String {
    if value.is_nan() {
        String::new()
    } else {
        value.to_string()
    }
}

fn opt_field(value: Option<f64>) -> String {
    value.map(num_field).unwrap_or_default()
}

/// Write through a csv writer into `{path}.tmp`, then rename over `path`.
fn write_atomic<F>(path: &Path, fill: F) -> Result<(), StoreError>
where
    F: FnOnce(&mut csv::Writer<fs::File>) -> Result<(), csv::Error>,
{
    let tmp_path = path.with_extension("csv.tmp");
    let write_err = |source: csv::Error| StoreError::Write {
        path: path.to_path_buf(),
        source,
    };

    let mut writer = csv::Writer::from_path(&tmp_path).map_err(write_err)?;
    let result = fill(&mut writer).and_then(|_| writer.flush().map_err(csv::Error::from));
    drop(writer);
    if let Err(e) = result {
        let _ = fs::remove_file(&tmp_path);
        return Err(write_err(e));
    }

    fs::rename(&tmp_path, path).map_err(|source| {
        let _ = fs::remove_file(&tmp_path);
        StoreError::Rename {
            path: path.to_path_buf(),
            source,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PriceRow;
    use chrono::NaiveDate;

    fn row(y: i32, m: u32, d: u32, close: f64) -> PriceRow {
        PriceRow {
            date: NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            open: close - 1.0,
            high: close + 1.0,
            low: close - 2.0,
            close,
            adj_close: None,
            volume: 1000.0,
            dividend: None,
            split: None,
        }
    }

    fn series(symbol: &str, source: SeriesSource, rows: Vec<PriceRow>) -> PriceSeries {
        PriceSeries {
            symbol: symbol.into(),
            source,
            rows,
        }
    }

    #[test]
    fn paths_follow_naming_scheme() {
        let store = DataStore::new("/data");
        assert_eq!(
            store.symbol_csv_path("TSLA", SeriesSource::Adjusted),
            PathBuf::from("/data/TSLA_daily_adjusted.csv")
        );
        assert_eq!(
            store.symbol_csv_path("NVDA", SeriesSource::Daily),
            PathBuf::from("/data/NVDA_daily_daily.csv")
        );
        assert_eq!(
            store.chart_path("TSLA"),
            PathBuf::from("/data/plots/TSLA_ma.svg")
        );
        assert_eq!(
            store.combined_path(),
            PathBuf::from("/data/all_stocks_daily_combined.csv")
        );
    }

    #[test]
    fn daily_csv_has_daily_header() {
        let dir = tempfile::tempdir().unwrap();
        let store = DataStore::new(dir.path());
        store.ensure_dirs().unwrap();

        let path = store
            .write_symbol_csv(&series(
                "NVDA",
                SeriesSource::Daily,
                vec![row(2024, 1, 2, 10.0), row(2024, 1, 3, 11.5)],
            ))
            .unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        assert_eq!(lines.next(), Some("date,open,high,low,close,volume"));
        assert_eq!(lines.next(), Some("2024-01-02,9,11,8,10,1000"));
        assert_eq!(lines.count(), 1);
        assert!(!path.with_extension("csv.tmp").exists());
    }

    #[test]
    fn adjusted_csv_leaves_missing_fields_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = DataStore::new(dir.path());
        store.ensure_dirs().unwrap();

        let mut r = row(2024, 1, 2, 10.0);
        r.adj_close = Some(9.5);
        let path = store
            .write_symbol_csv(&series("TSLA", SeriesSource::Adjusted, vec![r]))
            .unwrap();

        let content = fs::read_to_string(path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(
            lines[0],
            "date,open,high,low,close,adj_close,volume,dividend,split"
        );
        assert_eq!(lines[1], "2024-01-02,9,11,8,10,9.5,1000,,");
    }

    #[test]
    fn combined_is_sorted_by_date_then_symbol() {
        let dir = tempfile::tempdir().unwrap();
        let store = DataStore::new(dir.path());
        store.ensure_dirs().unwrap();

        let tsla = series(
            "TSLA",
            SeriesSource::Adjusted,
            vec![row(2024, 1, 2, 1.0), row(2024, 1, 3, 2.0)],
        );
        let aapl = series(
            "AAPL",
            SeriesSource::Daily,
            vec![row(2024, 1, 2, 3.0), row(2024, 1, 3, 4.0)],
        );
        let mut rows: Vec<LabeledRow> = tsla.labeled_rows().chain(aapl.labeled_rows()).collect();
        let path = store.write_combined(&mut rows).unwrap();

        let mut reader = csv::Reader::from_path(path).unwrap();
        let keys: Vec<(String, String, String)> = reader
            .records()
            .map(|r| {
                let r = r.unwrap();
                (r[0].to_string(), r[9].to_string(), r[10].to_string())
            })
            .collect();
        assert_eq!(
            keys,
            vec![
                ("2024-01-02".into(), "AAPL".into(), "DAILY".into()),
                ("2024-01-02".into(), "TSLA".into(), "ADJUSTED".into()),
                ("2024-01-03".into(), "AAPL".into(), "DAILY".into()),
                ("2024-01-03".into(), "TSLA".into(), "ADJUSTED".into()),
            ]
        );
    }

    #[test]
    fn empty_inputs_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = DataStore::new(dir.path());
        assert!(matches!(
            store.write_combined(&mut []),
            Err(StoreError::Empty(_))
        ));
        assert!(matches!(
            store.write_symbol_csv(&series("X", SeriesSource::Daily, vec![])),
            Err(StoreError::Empty(_))
        ));
    }

    #[test]
    fn unparseable_values_are_written_as_empty_fields() {
        let dir = tempfile::tempdir().unwrap();
        let store = DataStore::new(dir.path());
        store.ensure_dirs().unwrap();

        let mut r = row(2024, 1, 2, 1.0);
        r.open = f64::NAN;
        r.volume = f64::NAN;
        let nan_series = series("X", SeriesSource::Daily, vec![r]);

        let path = store.write_symbol_csv(&nan_series).unwrap();
        let content = fs::read_to_string(path).unwrap();
        assert_eq!(content.lines().nth(1), Some("2024-01-02,,2,-1,1,"));

        let mut rows: Vec<LabeledRow> = nan_series.labeled_rows().collect();
        let path = store.write_combined(&mut rows).unwrap();
        let content = fs::read_to_string(path).unwrap();
        assert_eq!(content.lines().nth(1), Some("2024-01-02,,2,-1,1,,,,,X,DAILY"));
        assert!(!content.contains("NaN"));
    }
}
