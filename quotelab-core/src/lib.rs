//! QuoteLab Core: daily price fetching, CSV persistence, MA charts, and the
//! dashboard's dataset layer.
//!
//! This crate contains everything both binaries share:
//! - Domain types (API rows, labeled rows, normalized CSV records)
//! - Configuration from defaults, TOML, environment and flags
//! - Alpha Vantage client behind an injectable HTTP transport
//! - Flat-file store with atomic writes
//! - SMA indicator and SVG chart rendering
//! - Dataset loading, filtering and views for the dashboard

pub mod chart;
pub mod config;
pub mod data;
pub mod dataset;
pub mod domain;
pub mod indicators;
pub mod logging;
