//! Fetch orchestrator: sequential multi-symbol run with progress reporting.

use super::alpha_vantage::AlphaVantageClient;
use super::provider::{FetchError, FetchProgress, SymbolOutcome, Transport};
use super::store::{DataStore, StoreError};
use crate::chart::{plot_ma, ChartError};
use crate::config::FetchConfig;
use crate::domain::LabeledRow;
use std::path::PathBuf;
use thiserror::Error;

/// Why one symbol was skipped.
#[derive(Debug, Error)]
pub enum SymbolError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Chart(#[from] ChartError),
}

/// Files written for one successful symbol.
#[derive(Debug, Clone)]
pub struct WrittenSymbol {
    pub symbol: String,
    pub csv_path: PathBuf,
    pub chart_path: PathBuf,
    pub rows: usize,
}

/// Summary of a fetch run.
#[derive(Debug)]
pub struct FetchSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub errors: Vec<(String, SymbolError)>,
    pub written: Vec<WrittenSymbol>,
    pub combined_path: Option<PathBuf>,
}

impl FetchSummary {
    pub fn all_succeeded(&self) -> bool {
        self.failed == 0
    }

    /// True when no symbol produced data, so no combined file was written.
    pub fn nothing_fetched(&self) -> bool {
        self.succeeded == 0
    }
}

/// Fetch every configured symbol in order, then write the combined file.
///
/// Per-symbol failures are reported and skipped. The configured delay is slept
/// after every symbol, successful or not. Only directory creation and the
/// combined write are fatal.
pub fn run_fetch<T: Transport>(
    client: &AlphaVantageClient<T>,
    store: &DataStore,
    config: &FetchConfig,
    progress: &dyn FetchProgress,
) -> Result<FetchSummary, StoreError> {
    store.ensure_dirs()?;

    let total = config.symbols.len();
    let mut accumulated: Vec<LabeledRow> = Vec::new();
    let mut errors = Vec::new();
    let mut written = Vec::new();

    for (i, symbol) in config.symbols.iter().enumerate() {
        progress.on_start(symbol, i, total);

        match fetch_single(client, store, symbol, &mut accumulated) {
            Ok(files) => {
                progress.on_complete(
                    symbol,
                    &SymbolOutcome::Written {
                        csv_path: files.csv_path.clone(),
                        chart_path: files.chart_path.clone(),
                        rows: files.rows,
                        source: files.source,
                    },
                );
                written.push(WrittenSymbol {
                    symbol: symbol.clone(),
                    csv_path: files.csv_path,
                    chart_path: files.chart_path,
                    rows: files.rows,
                });
            }
            Err(e) => {
                progress.on_complete(symbol, &SymbolOutcome::Failed(e.to_string()));
                errors.push((symbol.clone(), e));
            }
        }

        if !config.sleep_between.is_zero() {
            tracing::debug!(?config.sleep_between, "sleeping between requests");
            std::thread::sleep(config.sleep_between);
        }
    }

    let succeeded = written.len();
    let failed = errors.len();
    progress.on_batch_complete(succeeded, failed, total);

    let combined_path = if succeeded > 0 {
        Some(store.write_combined(&mut accumulated)?)
    } else {
        None
    };

    Ok(FetchSummary {
        total,
        succeeded,
        failed,
        errors,
        written,
        combined_path,
    })
}

struct SymbolFiles {
    csv_path: PathBuf,
    chart_path: PathBuf,
    rows: usize,
    source: crate::domain::SeriesSource,
}

/// Fetch, save, chart, then accumulate one symbol. Rows are only accumulated
/// once every step has succeeded.
fn fetch_single<T: Transport>(
    client: &AlphaVantageClient<T>,
    store: &DataStore,
    symbol: &str,
    accumulated: &mut Vec<LabeledRow>,
) -> Result<SymbolFiles, SymbolError> {
    let series = client.fetch_daily(symbol, true)?;
    let void_rows = series.rows.iter().filter(|row| row.is_void()).count();
    if void_rows > 0 {
        tracing::warn!(symbol, void_rows, "rows with unparseable prices are written with empty fields");
    }
    let csv_path = store.write_symbol_csv(&series)?;
    let chart_path = plot_ma(&series, &store.plots_dir())?;
    accumulated.extend(series.labeled_rows());
    Ok(SymbolFiles {
        csv_path,
        chart_path,
        rows: series.len(),
        source: series.source,
    })
}
