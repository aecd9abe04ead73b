//! Fetcher configuration.
//!
//! Built once at startup and passed explicitly into the client, store and run
//! loop. Sources, lowest precedence first: built-in defaults, an optional TOML
//! file, environment variables, command-line overrides. The API key is only
//! ever read from the environment.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

pub const API_KEY_VAR: &str = "ALPHAVANTAGE_KEY";
pub const SYMBOLS_VAR: &str = "SYMBOLS";
pub const DATA_DIR_VAR: &str = "QUOTELAB_DATA_DIR";

pub const DEFAULT_SYMBOLS: [&str; 2] = ["TSLA", "NVDA"];
pub const DEFAULT_BASE_URL: &str = "https://www.alphavantage.co/query";
pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_SLEEP_SECS: u64 = 15;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing {API_KEY_VAR}: set it in the environment or in a .env file")]
    MissingApiKey,

    #[error("symbol list is empty")]
    EmptySymbolList,

    #[error("invalid output size '{0}' (expected 'compact' or 'full')")]
    InvalidOutputSize(String),

    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    ParseFile {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Alpha Vantage `outputsize`: recent window or full history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputSize {
    /// Latest ~100 data points.
    #[default]
    Compact,
    /// Full history.
    Full,
}

impl OutputSize {
    pub fn as_str(self) -> &'static str {
        match self {
            OutputSize::Compact => "compact",
            OutputSize::Full => "full",
        }
    }
}

impl FromStr for OutputSize {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(OutputSize::Compact),
            "full" => Ok(OutputSize::Full),
            other => Err(ConfigError::InvalidOutputSize(other.to_string())),
        }
    }
}

impl fmt::Display for OutputSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Contents of an optional `quotelab.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub fetch: FetchSection,
}

/// The `[fetch]` table.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FetchSection {
    pub symbols: Option<Vec<String>>,
    pub data_dir: Option<PathBuf>,
    pub output_size: Option<OutputSize>,
    pub sleep_secs: Option<u64>,
    pub timeout_secs: Option<u64>,
    pub base_url: Option<String>,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::ParseFile {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}

/// Command-line overrides; `None` leaves the lower layers in charge.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub symbols: Option<Vec<String>>,
    pub data_dir: Option<PathBuf>,
    pub output_size: Option<OutputSize>,
    pub sleep_secs: Option<u64>,
}

/// Resolved fetcher configuration.
#[derive(Clone)]
pub struct FetchConfig {
    pub api_key: String,
    pub symbols: Vec<String>,
    pub data_dir: PathBuf,
    pub output_size: OutputSize,
    pub request_timeout: Duration,
    pub sleep_between: Duration,
    pub base_url: String,
}

impl fmt::Debug for FetchConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FetchConfig")
            .field("api_key", &"<redacted>")
            .field("symbols", &self.symbols)
            .field("data_dir", &self.data_dir)
            .field("output_size", &self.output_size)
            .field("request_timeout", &self.request_timeout)
            .field("sleep_between", &self.sleep_between)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl FetchConfig {
    /// Resolve against the process environment.
    pub fn from_env(file: Option<&FileConfig>, overrides: &Overrides) -> Result<Self, ConfigError> {
        Self::resolve(|name| std::env::var(name).ok(), file, overrides)
    }

    /// Resolve with an explicit variable lookup.
    pub fn resolve<F>(
        lookup: F,
        file: Option<&FileConfig>,
        overrides: &Overrides,
    ) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(API_KEY_VAR)
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        let section = file.map(|f| f.fetch.clone()).unwrap_or_default();

        let symbols = overrides
            .symbols
            .clone()
            .or_else(|| lookup(SYMBOLS_VAR).map(|raw| parse_symbol_list(&raw)))
            .or(section.symbols.map(|list| {
                list.iter()
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            }))
            .unwrap_or_else(|| DEFAULT_SYMBOLS.iter().map(|s| s.to_string()).collect());
        if symbols.is_empty() {
            return Err(ConfigError::EmptySymbolList);
        }

        let data_dir = overrides
            .data_dir
            .clone()
            .or_else(|| lookup(DATA_DIR_VAR).map(PathBuf::from))
            .or(section.data_dir)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));

        let output_size = overrides
            .output_size
            .or(section.output_size)
            .unwrap_or_default();

        let sleep_secs = overrides
            .sleep_secs
            .or(section.sleep_secs)
            .unwrap_or(DEFAULT_SLEEP_SECS);

        Ok(Self {
            api_key,
            symbols,
            data_dir,
            output_size,
            request_timeout: Duration::from_secs(
                section.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
            ),
            sleep_between: Duration::from_secs(sleep_secs),
            base_url: section
                .base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        })
    }
}

/// Split a comma-separated symbol list, trimming and dropping empty entries.
pub fn parse_symbol_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Data directory for read-only consumers: flag, then environment, then default.
pub fn resolve_data_dir(flag: Option<PathBuf>) -> PathBuf {
    flag.or_else(|| std::env::var(DATA_DIR_VAR).ok().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR))
}
