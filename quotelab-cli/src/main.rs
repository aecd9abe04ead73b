//! QuoteLab CLI: fetch daily prices and inspect the data directory.
//!
//! Commands:
//! - `fetch`: download daily series from Alpha Vantage, write CSVs and charts
//! - `status`: report per-symbol CSVs, the combined file, and rendered charts

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use quotelab_core::config::{
    parse_symbol_list, resolve_data_dir, FetchConfig, FileConfig, OutputSize, Overrides,
};
use quotelab_core::data::{
    run_fetch, AlphaVantageClient, DataStore, FetchSummary, HttpTransport, LogProgress,
    COMBINED_FILE_NAME, PLOTS_DIR_NAME,
};
use quotelab_core::domain::SeriesSource;
use quotelab_core::dataset::loader::symbol_from_file_name;
use quotelab_core::dataset::{read_table, Table};
use quotelab_core::logging::{init_console, LoggingConfig};
use std::collections::BTreeSet;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Exit status when a run finishes without fetching any symbol.
const EXIT_NOTHING_FETCHED: u8 = 2;

#[derive(Parser)]
#[command(
    name = "quotelab",
    about = "QuoteLab CLI: daily stock prices from Alpha Vantage"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch daily series, write per-symbol and combined CSVs plus MA charts.
    Fetch {
        /// Comma-separated symbols (overrides SYMBOLS).
        #[arg(long)]
        symbols: Option<String>,

        /// Data directory (overrides QUOTELAB_DATA_DIR).
        #[arg(long)]
        data_dir: Option<PathBuf>,

        /// compact (~100 latest points) or full history.
        #[arg(long)]
        output_size: Option<OutputSize>,

        /// Seconds to sleep after each symbol.
        #[arg(long)]
        sleep_secs: Option<u64>,

        /// Optional TOML config file with a [fetch] table.
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Report what is cached in the data directory.
    Status {
        /// Data directory (overrides QUOTELAB_DATA_DIR).
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },
}

fn main() -> Result<ExitCode> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_console(&LoggingConfig::from_env());

    match cli.command {
        Commands::Fetch {
            symbols,
            data_dir,
            output_size,
            sleep_secs,
            config,
        } => {
            let overrides = Overrides {
                symbols: symbols.as_deref().map(parse_symbol_list),
                data_dir,
                output_size,
                sleep_secs,
            };
            run_fetch_cmd(config, overrides)
        }
        Commands::Status { data_dir } => {
            let mut out = io::stdout().lock();
            write_status(&mut out, &resolve_data_dir(data_dir))?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn run_fetch_cmd(config_path: Option<PathBuf>, overrides: Overrides) -> Result<ExitCode> {
    let file = config_path
        .as_deref()
        .map(FileConfig::from_file)
        .transpose()?;
    let config = FetchConfig::from_env(file.as_ref(), &overrides)?;
    tracing::info!(
        symbols = ?config.symbols,
        data_dir = %config.data_dir.display(),
        output_size = %config.output_size,
        "starting fetch"
    );

    let transport = HttpTransport::from_config(&config).context("failed to set up HTTP client")?;
    let client = AlphaVantageClient::from_config(transport, &config);
    let store = DataStore::new(&config.data_dir);

    let summary = run_fetch(&client, &store, &config, &LogProgress)?;

    if let Some(path) = &summary.combined_path {
        tracing::info!(path = %path.display(), "combined file written");
    }
    if summary.nothing_fetched() {
        tracing::warn!("no symbol was fetched; combined file not written");
        for (symbol, err) in &summary.errors {
            eprintln!("Error for {symbol}: {err}");
        }
    } else if !summary.all_succeeded() {
        let failed: Vec<&str> = summary.errors.iter().map(|(s, _)| s.as_str()).collect();
        tracing::warn!(failed = ?failed, "some symbols were skipped");
    }

    Ok(ExitCode::from(exit_code(&summary)))
}

/// Process status for a finished run: partial success still counts as success.
fn exit_code(summary: &FetchSummary) -> u8 {
    if summary.nothing_fetched() {
        EXIT_NOTHING_FETCHED
    } else {
        0
    }
}

fn write_status(out: &mut impl Write, data_dir: &Path) -> Result<()> {
    if !data_dir.exists() {
        writeln!(out, "Data directory does not exist: {}", data_dir.display())?;
        return Ok(());
    }

    let mut rows: Vec<(String, String, String, String, u64)> = Vec::new();
    let mut combined: Option<(Table, u64)> = None;

    let mut entries: Vec<PathBuf> = std::fs::read_dir(data_dir)?
        .filter_map(|e| e.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "csv"))
        .collect();
    entries.sort();

    for path in entries {
        let size = std::fs::metadata(&path).map(|m| m.len()).unwrap_or(0);
        let is_combined = path.file_name().is_some_and(|n| n == COMBINED_FILE_NAME);
        let table = match read_table(&path) {
            Ok(table) => table,
            Err(e) => {
                writeln!(out, "Unreadable: {} ({e})", path.display())?;
                continue;
            }
        };
        if is_combined {
            combined = Some((table, size));
            continue;
        }

        let symbol = symbol_from_file_name(&path).unwrap_or_else(|| "?".into());
        let kind = path
            .file_stem()
            .and_then(|s| s.to_str())
            .and_then(|s| s.rsplit('_').next())
            .and_then(SeriesSource::parse)
            .map_or("?", SeriesSource::as_str)
            .to_string();
        rows.push((
            symbol,
            kind,
            date_range(&table),
            format!("{} rows", table.records.len()),
            size,
        ));
    }

    writeln!(out, "Data: {}", data_dir.display())?;
    writeln!(out)?;

    if rows.is_empty() {
        writeln!(out, "No per-symbol CSV files.")?;
    } else {
        writeln!(
            out,
            "{:<8} {:<10} {:<25} {:<12} {:>10}",
            "Symbol", "Kind", "Date Range", "Rows", "Size"
        )?;
        writeln!(out, "{}", "-".repeat(69))?;
        for (sym, kind, range, count, size) in &rows {
            writeln!(
                out,
                "{:<8} {:<10} {:<25} {:<12} {:>10}",
                sym,
                kind,
                range,
                count,
                format_size(*size)
            )?;
        }
    }
    writeln!(out)?;

    match &combined {
        Some((table, size)) => {
            let symbols: BTreeSet<&str> = table
                .records
                .iter()
                .filter_map(|r| r.symbol.as_deref())
                .collect();
            writeln!(
                out,
                "Combined: {} rows, {} symbols, {} ({})",
                table.records.len(),
                symbols.len(),
                date_range(table),
                format_size(*size)
            )?;
        }
        None => writeln!(out, "Combined: not present")?,
    }

    let plots_dir = data_dir.join(PLOTS_DIR_NAME);
    let mut charts: Vec<String> = std::fs::read_dir(&plots_dir)
        .map(|entries| {
            entries
                .filter_map(|e| e.ok())
                .map(|e| e.file_name().to_string_lossy().to_string())
                .filter(|name| name.ends_with("_ma.svg"))
                .collect()
        })
        .unwrap_or_default();
    charts.sort();
    if charts.is_empty() {
        writeln!(out, "Charts: none")?;
    } else {
        writeln!(out, "Charts: {}", charts.join(", "))?;
    }

    Ok(())
}

fn date_range(table: &Table) -> String {
    let mut dates = table.records.iter().filter_map(|r| r.date);
    match dates.next() {
        Some(first) => {
            let (lo, hi) = dates.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d)));
            format!("{lo} to {hi}")
        }
        None => "(no dates)".into(),
    }
}

fn format_size(bytes: u64) -> String {
    if bytes >= 1_073_741_824 {
        format!("{:.1} GB", bytes as f64 / 1_073_741_824.0)
    } else if bytes >= 1_048_576 {
        format!("{:.1} MB", bytes as f64 / 1_048_576.0)
    } else if bytes >= 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{bytes} B")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quotelab_core::data::{FetchError, SymbolError, WrittenSymbol};
    use std::fs;

    fn summary(succeeded: usize, failed: usize) -> FetchSummary {
        let errors = (0..failed)
            .map(|i| {
                let symbol = format!("BAD{i}");
                let err = SymbolError::Fetch(FetchError::RateLimited {
                    symbol: symbol.clone(),
                    note: "slow down".into(),
                });
                (symbol, err)
            })
            .collect();
        let written = (0..succeeded)
            .map(|i| WrittenSymbol {
                symbol: format!("OK{i}"),
                csv_path: PathBuf::from(format!("OK{i}_daily_adjusted.csv")),
                chart_path: PathBuf::from(format!("plots/OK{i}_ma.svg")),
                rows: 10,
            })
            .collect();
        FetchSummary {
            total: succeeded + failed,
            succeeded,
            failed,
            errors,
            written,
            combined_path: (succeeded > 0).then(|| PathBuf::from(COMBINED_FILE_NAME)),
        }
    }

    #[test]
    fn nothing_fetched_exits_with_two() {
        assert_eq!(exit_code(&summary(0, 2)), EXIT_NOTHING_FETCHED);
    }

    #[test]
    fn partial_and_full_success_exit_zero() {
        assert_eq!(exit_code(&summary(1, 1)), 0);
        assert_eq!(exit_code(&summary(2, 0)), 0);
    }

    fn status_of(dir: &Path) -> String {
        let mut out = Vec::new();
        write_status(&mut out, dir).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn status_lists_files_combined_and_charts() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("AAA_daily_adjusted.csv"),
            "date,open,high,low,close,adj_close,volume,dividend,split\n\
             2024-01-02,1,2,0.5,1.5,1.5,100,0,1\n\
             2024-01-03,1,2,0.5,1.6,1.6,100,0,1\n",
        )
        .unwrap();
        fs::write(
            dir.path().join(COMBINED_FILE_NAME),
            "date,open,high,low,close,adj_close,volume,dividend,split,symbol,source\n\
             2024-01-02,1,2,0.5,1.5,1.5,100,0,1,AAA,ADJUSTED\n\
             2024-01-03,1,2,0.5,1.6,1.6,100,0,1,AAA,ADJUSTED\n",
        )
        .unwrap();
        fs::create_dir(dir.path().join(PLOTS_DIR_NAME)).unwrap();
        fs::write(dir.path().join(PLOTS_DIR_NAME).join("AAA_ma.svg"), "<svg/>").unwrap();

        let report = status_of(dir.path());
        let symbol_line = report
            .lines()
            .find(|l| l.starts_with("AAA"))
            .unwrap();
        assert!(symbol_line.contains("ADJUSTED"));
        assert!(symbol_line.contains("2024-01-02 to 2024-01-03"));
        assert!(symbol_line.contains("2 rows"));
        assert!(report.contains("Combined: 2 rows, 1 symbols, 2024-01-02 to 2024-01-03"));
        assert!(report.contains("Charts: AAA_ma.svg"));
    }

    #[test]
    fn status_of_empty_and_missing_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let report = status_of(dir.path());
        assert!(report.contains("No per-symbol CSV files."));
        assert!(report.contains("Combined: not present"));
        assert!(report.contains("Charts: none"));

        let report = status_of(&dir.path().join("missing"));
        assert!(report.contains("does not exist"));
    }

    #[test]
    fn sizes_are_human_readable() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2.0 KB");
        assert_eq!(format_size(3 * 1_048_576), "3.0 MB");
    }
}
