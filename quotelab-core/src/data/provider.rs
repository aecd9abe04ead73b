//! HTTP transport trait, progress reporting, and structured fetch errors.
//!
//! The `Transport` trait abstracts over the HTTP layer so the Alpha Vantage
//! client can be driven by a mock in tests.

use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// Failure below the API layer: connection, status, or body decoding.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("network unreachable: {0}")]
    Network(String),

    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("HTTP status {0}")]
    Status(u16),

    #[error("response is not valid JSON: {0}")]
    Decode(String),
}

/// Per-symbol fetch errors.
///
/// Every variant names the symbol so a log line is self-explanatory.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("[{symbol}] request failed: {source}")]
    Transport {
        symbol: String,
        #[source]
        source: TransportError,
    },

    #[error("[{symbol}] rate limit / quota notice: {note}")]
    RateLimited { symbol: String, note: String },

    #[error("[{symbol}] premium endpoint: {message}")]
    PremiumEndpoint { symbol: String, message: String },

    #[error("[{symbol}] no time series in response: {raw}")]
    MissingTimeSeries { symbol: String, raw: String },

    #[error("[{symbol}] malformed response: {detail}")]
    Malformed { symbol: String, detail: String },
}

/// A blocking GET returning a decoded JSON body.
pub trait Transport: Send + Sync {
    /// Issue a GET with the given query parameters.
    fn get_json(&self, query: &[(&str, &str)]) -> Result<Value, TransportError>;
}

/// Progress callback for a multi-symbol fetch run.
pub trait FetchProgress {
    /// Called when starting to fetch a symbol.
    fn on_start(&self, symbol: &str, index: usize, total: usize);

    /// Called when a symbol completes, successfully or not.
    fn on_complete(&self, symbol: &str, outcome: &SymbolOutcome);

    /// Called once after the last symbol.
    fn on_batch_complete(&self, succeeded: usize, failed: usize, total: usize);
}

/// What happened to one symbol during a run.
#[derive(Debug)]
pub enum SymbolOutcome {
    Written {
        csv_path: std::path::PathBuf,
        chart_path: std::path::PathBuf,
        rows: usize,
        source: crate::domain::SeriesSource,
    },
    Failed(String),
}

/// Progress reporter that logs through `tracing`.
pub struct LogProgress;

impl FetchProgress for LogProgress {
    fn on_start(&self, symbol: &str, index: usize, total: usize) {
        tracing::info!("({}/{total}) fetching {symbol}", index + 1);
    }

    fn on_complete(&self, symbol: &str, outcome: &SymbolOutcome) {
        match outcome {
            SymbolOutcome::Written {
                csv_path,
                chart_path,
                rows,
                source,
            } => {
                tracing::info!(
                    symbol,
                    %source,
                    rows,
                    csv = %csv_path.display(),
                    chart = %chart_path.display(),
                    "saved"
                );
            }
            SymbolOutcome::Failed(reason) => {
                tracing::error!(symbol, "failed: {reason}");
            }
        }
    }

    fn on_batch_complete(&self, succeeded: usize, failed: usize, total: usize) {
        if succeeded == 0 {
            tracing::warn!("fetch finished: nothing fetched ({failed}/{total} failed)");
        } else if failed > 0 {
            tracing::warn!("fetch finished: {succeeded}/{total} succeeded, {failed} failed");
        } else {
            tracing::info!("fetch finished: {succeeded}/{total} succeeded");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_name_the_symbol() {
        let err = FetchError::RateLimited {
            symbol: "TSLA".into(),
            note: "5 calls per minute".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("TSLA"));
        assert!(msg.contains("5 calls per minute"));
    }

    #[test]
    fn transport_error_is_the_source() {
        use std::error::Error;
        let err = FetchError::Transport {
            symbol: "NVDA".into(),
            source: TransportError::Status(503),
        };
        assert!(err.to_string().contains("NVDA"));
        assert_eq!(err.source().map(|e| e.to_string()), Some("HTTP status 503".into()));
    }
}
