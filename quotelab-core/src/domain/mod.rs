//! Domain types shared by the fetcher and the dashboard.

pub mod price_row;
pub mod record;

pub use price_row::{LabeledRow, PriceRow, PriceSeries, SeriesSource};
pub use record::PriceRecord;
