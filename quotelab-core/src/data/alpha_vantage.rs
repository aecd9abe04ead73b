//! Alpha Vantage daily time-series client.
//!
//! Fetches `TIME_SERIES_DAILY_ADJUSTED` first. Keys without premium access get
//! an `Information` notice for that endpoint, in which case the client falls
//! back once to `TIME_SERIES_DAILY`. A `Note` field is the free-tier quota
//! notice and is never retried.

use super::provider::{FetchError, Transport, TransportError};
use crate::config::{FetchConfig, OutputSize};
use crate::domain::{PriceRow, PriceSeries, SeriesSource};
use chrono::NaiveDate;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::time::Duration;

const TIME_SERIES_KEY: &str = "Time Series (Daily)";
const NOTE_KEY: &str = "Note";
const INFORMATION_KEY: &str = "Information";

/// Blocking reqwest transport against a fixed endpoint.
pub struct HttpTransport {
    client: reqwest::blocking::Client,
    base_url: String,
    timeout: Duration,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            timeout,
        })
    }

    pub fn from_config(config: &FetchConfig) -> Result<Self, TransportError> {
        Self::new(config.base_url.clone(), config.request_timeout)
    }
}

impl Transport for HttpTransport {
    fn get_json(&self, query: &[(&str, &str)]) -> Result<Value, TransportError> {
        let resp = self
            .client
            .get(&self.base_url)
            .query(query)
            .send()
            .map_err(|e| {
                if e.is_timeout() {
                    TransportError::Timeout(self.timeout)
                } else {
                    TransportError::Network(e.to_string())
                }
            })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(TransportError::Status(status.as_u16()));
        }

        resp.json::<Value>()
            .map_err(|e| TransportError::Decode(e.to_string()))
    }
}

/// Daily series client, generic over the transport.
pub struct AlphaVantageClient<T: Transport> {
    transport: T,
    api_key: String,
    output_size: OutputSize,
}

impl<T: Transport> AlphaVantageClient<T> {
    pub fn new(transport: T, api_key: impl Into<String>, output_size: OutputSize) -> Self {
        Self {
            transport,
            api_key: api_key.into(),
            output_size,
        }
    }

    pub fn from_config(transport: T, config: &FetchConfig) -> Self {
        Self::new(transport, config.api_key.clone(), config.output_size)
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Fetch the daily series for `symbol`.
    ///
    /// With `adjusted = true`, a premium-endpoint notice triggers exactly one
    /// retry against the unadjusted endpoint. The returned series' `source`
    /// records which endpoint supplied the rows.
    pub fn fetch_daily(&self, symbol: &str, adjusted: bool) -> Result<PriceSeries, FetchError> {
        let source = SeriesSource::from_adjusted(adjusted);
        let body = self.request(symbol, source)?;
        let obj = body.as_object().ok_or_else(|| FetchError::Malformed {
            symbol: symbol.to_string(),
            detail: format!("expected a JSON object, got {body}"),
        })?;

        if let Some(note) = obj.get(NOTE_KEY) {
            return Err(FetchError::RateLimited {
                symbol: symbol.to_string(),
                note: notice_text(note),
            });
        }

        if let Some(info) = obj.get(INFORMATION_KEY) {
            if source == SeriesSource::Adjusted {
                tracing::warn!(
                    symbol,
                    "adjusted endpoint rejected ({}); falling back to unadjusted",
                    notice_text(info)
                );
                return self.fetch_daily(symbol, false);
            }
            return Err(FetchError::PremiumEndpoint {
                symbol: symbol.to_string(),
                message: notice_text(info),
            });
        }

        let series = match obj.get(TIME_SERIES_KEY).and_then(Value::as_object) {
            Some(ts) if !ts.is_empty() => ts,
            _ => {
                return Err(FetchError::MissingTimeSeries {
                    symbol: symbol.to_string(),
                    raw: body.to_string(),
                })
            }
        };

        let rows = parse_time_series(symbol, source, series)?;
        Ok(PriceSeries {
            symbol: symbol.to_string(),
            source,
            rows,
        })
    }

    fn request(&self, symbol: &str, source: SeriesSource) -> Result<Value, FetchError> {
        let query = [
            ("function", source.api_function()),
            ("symbol", symbol),
            ("outputsize", self.output_size.as_str()),
            ("datatype", "json"),
            ("apikey", self.api_key.as_str()),
        ];
        tracing::debug!(symbol, function = source.api_function(), "requesting");
        self.transport
            .get_json(&query)
            .map_err(|source| FetchError::Transport {
                symbol: symbol.to_string(),
                source,
            })
    }
}

fn notice_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Field labels used by each endpoint, mapped to canonical names.
fn field_labels(source: SeriesSource) -> FieldLabels {
    match source {
        SeriesSource::Adjusted => FieldLabels {
            adj_close: Some("5. adjusted close"),
            volume: "6. volume",
            dividend: Some("7. dividend amount"),
            split: Some("8. split coefficient"),
        },
        SeriesSource::Daily => FieldLabels {
            adj_close: None,
            volume: "5. volume",
            dividend: None,
            split: None,
        },
    }
}

struct FieldLabels {
    adj_close: Option<&'static str>,
    volume: &'static str,
    dividend: Option<&'static str>,
    split: Option<&'static str>,
}

/// Parse the per-date object into rows sorted ascending by date.
pub fn parse_time_series(
    symbol: &str,
    source: SeriesSource,
    series: &Map<String, Value>,
) -> Result<Vec<PriceRow>, FetchError> {
    let labels = field_labels(source);
    let mut by_date: BTreeMap<NaiveDate, PriceRow> = BTreeMap::new();

    for (key, fields) in series {
        let date = NaiveDate::parse_from_str(key, "%Y-%m-%d").map_err(|e| FetchError::Malformed {
            symbol: symbol.to_string(),
            detail: format!("invalid date key '{key}': {e}"),
        })?;

        let num = |label: &str| -> f64 {
            fields
                .get(label)
                .and_then(value_as_f64)
                .unwrap_or(f64::NAN)
        };
        let opt = |label: Option<&str>| label.map(|l| num(l));

        by_date.insert(
            date,
            PriceRow {
                date,
                open: num("1. open"),
                high: num("2. high"),
                low: num("3. low"),
                close: num("4. close"),
                adj_close: opt(labels.adj_close),
                volume: num(labels.volume),
                dividend: opt(labels.dividend),
                split: opt(labels.split),
            },
        );
    }

    Ok(by_date.into_values().collect())
}

fn value_as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::String(s) => s.trim().parse().ok(),
        Value::Number(n) => n.as_f64(),
        _ => None,
    }
}
