//! Dashboard data layer: load cached CSVs, filter them, derive views.

pub mod filter;
pub mod loader;
pub mod views;

pub use filter::{DateRange, Filter};
pub use loader::{load_dataset, read_table, Dataset, DatasetOrigin, LoadError, Table};
pub use views::{latest_prices, raw_detail, trend_series, LatestPrice, TrendSeries};
