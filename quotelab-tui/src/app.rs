//! Application state: single-owner, main-thread only.
//!
//! Every filter change goes through [`AppState::change_filter`], which re-reads
//! the data directory, carries the selection over, and recomputes the views.

use std::path::PathBuf;

use chrono::{Duration, NaiveDate};

use quotelab_core::dataset::{
    latest_prices, load_dataset, raw_detail, trend_series, Dataset, DateRange, Filter,
    LatestPrice, TrendSeries,
};
use quotelab_core::domain::PriceRecord;

/// Which area receives focus-specific keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Symbols,
    DateRange,
    Detail,
}

impl Focus {
    pub fn next(self) -> Focus {
        match self {
            Focus::Symbols => Focus::DateRange,
            Focus::DateRange => Focus::Detail,
            Focus::Detail => Focus::Symbols,
        }
    }

    pub fn prev(self) -> Focus {
        match self {
            Focus::Symbols => Focus::Detail,
            Focus::DateRange => Focus::Symbols,
            Focus::Detail => Focus::DateRange,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Focus::Symbols => "Symbols",
            Focus::DateRange => "Date Range",
            Focus::Detail => "Detail",
        }
    }
}

/// Which end of the date range `h`/`l` move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    Start,
    End,
}

impl Bound {
    pub fn other(self) -> Bound {
        match self {
            Bound::Start => Bound::End,
            Bound::End => Bound::Start,
        }
    }
}

/// Status message severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Overlay {
    None,
    Help,
}

/// Derived tables for the current filter.
#[derive(Debug, Clone, Default)]
pub struct Views {
    pub latest: Vec<LatestPrice>,
    pub trend: Vec<TrendSeries>,
    pub detail: Vec<PriceRecord>,
}

impl Views {
    pub fn compute(dataset: &Dataset, filter: &Filter) -> Self {
        let rows = filter.apply(&dataset.records);
        Self {
            latest: latest_prices(&rows),
            trend: trend_series(&rows),
            detail: raw_detail(&rows).into_iter().cloned().collect(),
        }
    }
}

/// Loaded data plus everything derived from it.
#[derive(Debug, Clone)]
pub struct Loaded {
    pub dataset: Dataset,
    /// Every symbol present, sorted.
    pub symbols: Vec<String>,
    pub span: Option<DateRange>,
    pub filter: Filter,
    pub views: Views,
}

#[derive(Debug, Clone)]
pub enum DataState {
    Loaded(Box<Loaded>),
    /// Terminal: nothing to show, only quit is accepted.
    NoData(String),
}

/// Top-level application state.
pub struct AppState {
    pub running: bool,
    pub focus: Focus,
    pub overlay: Overlay,
    pub data: DataState,

    pub symbol_cursor: usize,
    pub bound: Bound,
    pub detail_scroll: usize,

    pub status_message: Option<(String, StatusLevel)>,
    pub data_dir: PathBuf,
}

impl AppState {
    /// Build the state and perform the initial load.
    pub fn new(data_dir: PathBuf) -> Self {
        let mut app = Self {
            running: true,
            focus: Focus::Symbols,
            overlay: Overlay::None,
            data: DataState::NoData(String::new()),
            symbol_cursor: 0,
            bound: Bound::Start,
            detail_scroll: 0,
            status_message: None,
            data_dir,
        };
        app.reload_with(None);
        app
    }

    pub fn loaded(&self) -> Option<&Loaded> {
        match &self.data {
            DataState::Loaded(loaded) => Some(loaded.as_ref()),
            DataState::NoData(_) => None,
        }
    }

    pub fn is_halted(&self) -> bool {
        matches!(self.data, DataState::NoData(_))
    }

    /// Re-read the data directory, keeping the current selection.
    pub fn reload(&mut self) {
        let filter = self.loaded().map(|l| l.filter.clone());
        self.reload_with(filter);
        if let Some(loaded) = self.loaded() {
            let msg = format!(
                "Reloaded {} rows, {} symbols",
                loaded.dataset.len(),
                loaded.symbols.len()
            );
            self.set_status(msg);
        }
    }

    /// Apply `edit` to the filter, then reload from disk and recompute views.
    pub fn change_filter(&mut self, edit: impl FnOnce(&mut Filter)) {
        let Some(mut filter) = self.loaded().map(|l| l.filter.clone()) else {
            return;
        };
        edit(&mut filter);
        self.reload_with(Some(filter));
    }

    fn reload_with(&mut self, previous: Option<Filter>) {
        match load_dataset(&self.data_dir) {
            Ok(dataset) => {
                let filter = match previous {
                    Some(prev) => prev.rebase(&dataset),
                    None => Filter::for_dataset(&dataset),
                };
                let symbols: Vec<String> = dataset.symbols().into_iter().collect();
                let span = dataset.date_span().map(|(lo, hi)| DateRange::new(lo, hi));
                let views = Views::compute(&dataset, &filter);
                tracing::debug!(
                    rows = dataset.len(),
                    matched = views.detail.len(),
                    "dataset reloaded"
                );

                self.symbol_cursor = self.symbol_cursor.min(symbols.len().saturating_sub(1));
                self.detail_scroll = self.detail_scroll.min(views.detail.len().saturating_sub(1));
                self.data = DataState::Loaded(Box::new(Loaded {
                    dataset,
                    symbols,
                    span,
                    filter,
                    views,
                }));
            }
            Err(e) => {
                tracing::warn!(error = %e, "no data to display");
                self.overlay = Overlay::None;
                self.data = DataState::NoData(e.to_string());
            }
        }
    }

    // ── Symbol selection ─────────────────────────────────────────────

    pub fn cursor_symbol(&self) -> Option<&str> {
        self.loaded()
            .and_then(|l| l.symbols.get(self.symbol_cursor))
            .map(String::as_str)
    }

    pub fn move_cursor(&mut self, delta: isize) {
        let count = self.loaded().map_or(0, |l| l.symbols.len());
        if count == 0 {
            return;
        }
        let max = count as isize - 1;
        self.symbol_cursor = (self.symbol_cursor as isize + delta).clamp(0, max) as usize;
    }

    pub fn toggle_cursor_symbol(&mut self) {
        let Some(symbol) = self.cursor_symbol().map(String::from) else {
            return;
        };
        self.change_filter(|f| {
            if !f.symbols.remove(&symbol) {
                f.symbols.insert(symbol);
            }
        });
    }

    pub fn select_all(&mut self) {
        let Some(all) = self.loaded().map(|l| l.symbols.clone()) else {
            return;
        };
        self.change_filter(|f| f.symbols = all.into_iter().collect());
    }

    pub fn select_none(&mut self) {
        self.change_filter(|f| f.symbols.clear());
    }

    // ── Date range ───────────────────────────────────────────────────

    /// Move the focused bound by `days`, staying inside the data span and
    /// never crossing the other bound.
    pub fn shift_bound(&mut self, days: i64) {
        let Some(span) = self.loaded().and_then(|l| l.span) else {
            return;
        };
        let bound = self.bound;
        self.change_filter(|f| {
            let range = f.range.unwrap_or(span);
            let moved = |d: NaiveDate| {
                d.checked_add_signed(Duration::days(days))
                    .unwrap_or(d)
                    .clamp(span.start, span.end)
            };
            f.range = Some(match bound {
                Bound::Start => DateRange {
                    start: moved(range.start).min(range.end),
                    end: range.end,
                },
                Bound::End => DateRange {
                    start: range.start,
                    end: moved(range.end).max(range.start),
                },
            });
        });
    }

    pub fn swap_bound(&mut self) {
        self.bound = self.bound.other();
    }

    pub fn reset_range(&mut self) {
        let Some(span) = self.loaded().and_then(|l| l.span) else {
            return;
        };
        self.change_filter(|f| f.range = Some(span));
    }

    // ── Detail table ─────────────────────────────────────────────────

    pub fn scroll_detail(&mut self, delta: isize) {
        let count = self.loaded().map_or(0, |l| l.views.detail.len());
        if count == 0 {
            self.detail_scroll = 0;
            return;
        }
        let max = count as isize - 1;
        self.detail_scroll = (self.detail_scroll as isize + delta).clamp(0, max) as usize;
    }

    pub fn scroll_detail_to(&mut self, top: bool) {
        let count = self.loaded().map_or(0, |l| l.views.detail.len());
        self.detail_scroll = if top { 0 } else { count.saturating_sub(1) };
    }

    // ── Status ───────────────────────────────────────────────────────

    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Info));
    }

    pub fn set_warning(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Warning));
    }

    pub fn set_error(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Error));
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;

    pub(crate) fn write_fixture(dir: &Path) {
        fs::write(
            dir.join("all_stocks_daily_combined.csv"),
            "date,open,high,low,close,adj_close,volume,dividend,split,symbol,source\n\
             2024-01-02,1,1,1,100,,1000,,,AAA,DAILY\n\
             2024-01-02,1,1,1,200,,2000,,,BBB,ADJUSTED\n\
             2024-01-03,1,1,1,101,,1100,,,AAA,DAILY\n\
             2024-01-03,1,1,1,201,,2100,,,BBB,ADJUSTED\n\
             2024-01-04,1,1,1,102,,1200,,,AAA,DAILY\n",
        )
        .unwrap();
    }

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    fn loaded_app() -> (tempfile::TempDir, AppState) {
        let dir = tempfile::tempdir().unwrap();
        write_fixture(dir.path());
        let app = AppState::new(dir.path().to_path_buf());
        (dir, app)
    }

    #[test]
    fn focus_cycle() {
        assert_eq!(Focus::Symbols.next(), Focus::DateRange);
        assert_eq!(Focus::Detail.next(), Focus::Symbols);
        assert_eq!(Focus::Symbols.prev(), Focus::Detail);
    }

    #[test]
    fn initial_load_selects_everything() {
        let (_dir, app) = loaded_app();
        let loaded = app.loaded().unwrap();
        assert_eq!(loaded.symbols, vec!["AAA", "BBB"]);
        assert_eq!(loaded.filter.range, Some(DateRange::new(d(2), d(4))));
        assert_eq!(loaded.views.detail.len(), 5);
        assert_eq!(loaded.views.latest.len(), 2);
    }

    #[test]
    fn empty_dir_halts() {
        let dir = tempfile::tempdir().unwrap();
        let app = AppState::new(dir.path().to_path_buf());
        assert!(app.is_halted());
    }

    #[test]
    fn toggling_a_symbol_recomputes_views() {
        let (_dir, mut app) = loaded_app();
        app.move_cursor(1);
        app.toggle_cursor_symbol();
        let loaded = app.loaded().unwrap();
        assert!(!loaded.filter.symbols.contains("BBB"));
        assert_eq!(loaded.views.detail.len(), 3);
        assert_eq!(loaded.views.latest.len(), 1);

        app.select_none();
        assert!(app.loaded().unwrap().views.detail.is_empty());
        app.select_all();
        assert_eq!(app.loaded().unwrap().views.detail.len(), 5);
    }

    #[test]
    fn bounds_stay_inside_span_and_ordered() {
        let (_dir, mut app) = loaded_app();
        app.shift_bound(-30);
        assert_eq!(app.loaded().unwrap().filter.range.unwrap().start, d(2));

        app.shift_bound(30);
        let range = app.loaded().unwrap().filter.range.unwrap();
        assert_eq!(range, DateRange::new(d(4), d(4)));
        assert_eq!(app.loaded().unwrap().views.detail.len(), 1);

        app.swap_bound();
        app.shift_bound(-1);
        assert_eq!(app.loaded().unwrap().filter.range.unwrap().end, d(4));

        app.reset_range();
        assert_eq!(
            app.loaded().unwrap().filter.range,
            Some(DateRange::new(d(2), d(4)))
        );
    }

    #[test]
    fn filter_change_reads_from_disk() {
        let (dir, mut app) = loaded_app();
        fs::write(
            dir.path().join("all_stocks_daily_combined.csv"),
            "date,close,symbol\n2024-01-03,5,AAA\n",
        )
        .unwrap();
        app.select_all();
        let loaded = app.loaded().unwrap();
        assert_eq!(loaded.symbols, vec!["AAA"]);
        assert_eq!(loaded.filter.range, Some(DateRange::new(d(3), d(3))));
        assert_eq!(loaded.views.detail.len(), 1);
    }

    #[test]
    fn data_disappearing_halts() {
        let (dir, mut app) = loaded_app();
        fs::remove_file(dir.path().join("all_stocks_daily_combined.csv")).unwrap();
        app.reload();
        assert!(app.is_halted());
    }
}
