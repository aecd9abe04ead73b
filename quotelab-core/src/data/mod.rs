//! Remote fetching and flat-file persistence.

pub mod alpha_vantage;
pub mod download;
pub mod provider;
pub mod store;

pub use alpha_vantage::{AlphaVantageClient, HttpTransport};
pub use download::{run_fetch, FetchSummary, SymbolError, WrittenSymbol};
pub use provider::{FetchError, FetchProgress, LogProgress, SymbolOutcome, Transport, TransportError};
pub use store::{DataStore, StoreError, COMBINED_FILE_NAME, PLOTS_DIR_NAME};
