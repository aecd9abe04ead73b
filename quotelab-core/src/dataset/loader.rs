//! Load cached CSVs from the data directory into one normalized table.

use crate::data::store::COMBINED_FILE_NAME;
use crate::domain::record::{normalize_columns, PriceRecord};
use chrono::NaiveDate;
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("no price data found in {0}")]
    NoData(PathBuf),

    #[error("failed to list {path}: {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Where the loaded rows came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatasetOrigin {
    Combined(PathBuf),
    PerSymbol(Vec<PathBuf>),
}

/// Every normalized row, sorted by (symbol, date) with missing values last.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub records: Vec<PriceRecord>,
    pub origin: DatasetOrigin,
}

impl Dataset {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct symbols present.
    pub fn symbols(&self) -> BTreeSet<String> {
        self.records
            .iter()
            .filter_map(|r| r.symbol.clone())
            .collect()
    }

    /// Earliest and latest date present, if any row has a date.
    pub fn date_span(&self) -> Option<(NaiveDate, NaiveDate)> {
        let mut dates = self.records.iter().filter_map(|r| r.date);
        let first = dates.next()?;
        Some(dates.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d))))
    }
}

/// A table read from one file.
#[derive(Debug)]
pub struct Table {
    pub records: Vec<PriceRecord>,
    pub missing_columns: Vec<&'static str>,
}

/// Read and normalize one CSV file.
pub fn read_table(path: &Path) -> Result<Table, csv::Error> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(path)?;
    let columns = normalize_columns(reader.headers()?.iter());
    let records = reader
        .records()
        .map(|raw| raw.map(|raw| PriceRecord::from_raw(&columns, &raw)))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Table {
        records,
        missing_columns: columns.missing_columns(),
    })
}

/// Load the dataset from `data_dir`.
///
/// Prefers the combined file. Without it, every other `*.csv` in the directory
/// is read in file-name order; files whose `symbol` column is entirely missing
/// take the symbol from the file name prefix. Unreadable files are skipped.
pub fn load_dataset(data_dir: &Path) -> Result<Dataset, LoadError> {
    let combined = data_dir.join(COMBINED_FILE_NAME);
    if combined.is_file() {
        match read_table(&combined) {
            Ok(table) if !table.records.is_empty() => {
                tracing::info!(path = %combined.display(), rows = table.records.len(), "loaded combined file");
                return finish(table.records, DatasetOrigin::Combined(combined), data_dir);
            }
            Ok(_) => {
                tracing::warn!(path = %combined.display(), "combined file has no rows, scanning per-symbol files");
            }
            Err(e) => {
                tracing::warn!(path = %combined.display(), error = %e, "combined file unreadable, scanning per-symbol files");
            }
        }
    }

    let files = per_symbol_files(data_dir)?;
    let mut records = Vec::new();
    let mut used = Vec::new();
    for path in files {
        let mut table = match read_table(&path) {
            Ok(table) => table,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "skipping unreadable file");
                continue;
            }
        };
        if table.records.is_empty() {
            continue;
        }
        if table.records.iter().all(|r| r.symbol.is_none()) {
            if let Some(symbol) = symbol_from_file_name(&path) {
                tracing::warn!(
                    path = %path.display(),
                    %symbol,
                    "no symbol column, inferring symbol from file name"
                );
                for record in &mut table.records {
                    record.symbol = Some(symbol.clone());
                }
            }
        }
        if !table.missing_columns.is_empty() {
            tracing::debug!(path = %path.display(), missing = ?table.missing_columns, "columns filled as missing");
        }
        records.append(&mut table.records);
        used.push(path);
    }

    finish(records, DatasetOrigin::PerSymbol(used), data_dir)
}

fn finish(
    mut records: Vec<PriceRecord>,
    origin: DatasetOrigin,
    data_dir: &Path,
) -> Result<Dataset, LoadError> {
    if records.is_empty() {
        return Err(LoadError::NoData(data_dir.to_path_buf()));
    }
    records.sort_by(|a, b| {
        none_last(&a.symbol, &b.symbol).then_with(|| none_last(&a.date, &b.date))
    });
    Ok(Dataset { records, origin })
}

/// `*.csv` files in `data_dir` other than the combined file, sorted by name.
fn per_symbol_files(data_dir: &Path) -> Result<Vec<PathBuf>, LoadError> {
    let entries = match fs::read_dir(data_dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(LoadError::NoData(data_dir.to_path_buf()));
        }
        Err(source) => {
            return Err(LoadError::ReadDir {
                path: data_dir.to_path_buf(),
                source,
            })
        }
    };

    let mut files: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && path.extension().is_some_and(|ext| ext == "csv")
                && path.file_name().is_some_and(|name| name != COMBINED_FILE_NAME)
        })
        .collect();
    files.sort();
    if files.is_empty() {
        return Err(LoadError::NoData(data_dir.to_path_buf()));
    }
    Ok(files)
}

/// `TSLA_daily_adjusted.csv` → `TSLA`.
pub fn symbol_from_file_name(path: &Path) -> Option<String> {
    let stem = path.file_stem()?.to_str()?;
    let token = stem.split('_').next()?.trim();
    (!token.is_empty()).then(|| token.to_string())
}

fn none_last<T: Ord>(a: &Option<T>, b: &Option<T>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbol_prefix_before_first_underscore() {
        assert_eq!(
            symbol_from_file_name(Path::new("/d/TSLA_daily_adjusted.csv")),
            Some("TSLA".into())
        );
        assert_eq!(
            symbol_from_file_name(Path::new("BRK.B.csv")),
            Some("BRK.B".into())
        );
        assert_eq!(symbol_from_file_name(Path::new("_x.csv")), None);
    }

    #[test]
    fn missing_values_sort_last() {
        assert_eq!(none_last(&Some(1), &None), Ordering::Less);
        assert_eq!(none_last::<i32>(&None, &None), Ordering::Equal);
        assert_eq!(none_last(&Some(2), &Some(1)), Ordering::Greater);
    }

    #[test]
    fn missing_dir_is_no_data() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_dataset(&dir.path().join("absent")).unwrap_err();
        assert!(matches!(err, LoadError::NoData(_)));
    }

    #[test]
    fn combined_file_is_preferred() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(COMBINED_FILE_NAME),
            "date,close,symbol,source\n2024-01-03,2,B,DAILY\n2024-01-02,1,A,ADJUSTED\n",
        )
        .unwrap();
        fs::write(dir.path().join("ZZZ_daily_daily.csv"), "date,close\n2024-01-02,9\n").unwrap();

        let ds = load_dataset(dir.path()).unwrap();
        assert!(matches!(ds.origin, DatasetOrigin::Combined(_)));
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records[0].symbol.as_deref(), Some("A"));
        assert!(!ds.symbols().contains("ZZZ"));
    }

    #[test]
    fn date_span_covers_all_dates() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("A_daily_daily.csv"),
            "date,close\n2024-02-01,1\nbad,2\n2024-01-05,3\n",
        )
        .unwrap();
        let ds = load_dataset(dir.path()).unwrap();
        assert_eq!(ds.len(), 3);
        assert_eq!(
            ds.date_span(),
            Some((
                NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
                NaiveDate::from_ymd_opt(2024, 2, 1).unwrap()
            ))
        );
        // The undated row sorts last.
        assert_eq!(ds.records[2].date, None);
    }
}
