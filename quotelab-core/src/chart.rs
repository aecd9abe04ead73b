//! Moving-average chart rendering.
//!
//! One SVG per symbol: raw close plus the 20- and 50-period SMAs, x axis by
//! trading day with date labels.

use crate::data::store::chart_path;
use crate::domain::PriceSeries;
use crate::indicators::{Sma, LONG_MA_PERIOD, SHORT_MA_PERIOD};
use plotters::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

const CHART_SIZE: (u32, u32) = (1200, 600);

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("[{symbol}] no finite closes to plot")]
    Empty { symbol: String },

    #[error("[{symbol}] failed to create {path}: {source}")]
    CreateDir {
        symbol: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("[{symbol}] chart rendering failed: {message}")]
    Render { symbol: String, message: String },

    #[error("[{symbol}] atomic rename to {path} failed: {source}")]
    Rename {
        symbol: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Render `plots_dir/{SYMBOL}_ma.svg` for a series. Returns the path written.
pub fn plot_ma(series: &PriceSeries, plots_dir: &Path) -> Result<PathBuf, ChartError> {
    let symbol = series.symbol.clone();
    let closes = series.closes();
    if !closes.iter().any(|c| c.is_finite()) {
        return Err(ChartError::Empty { symbol });
    }

    fs::create_dir_all(plots_dir).map_err(|source| ChartError::CreateDir {
        symbol: symbol.clone(),
        path: plots_dir.to_path_buf(),
        source,
    })?;

    let short = Sma::new(SHORT_MA_PERIOD);
    let long = Sma::new(LONG_MA_PERIOD);
    let lines = [
        Line::new("Close", closes.clone(), BLACK),
        Line::new(short.name(), short.compute(&closes), BLUE),
        Line::new(long.name(), long.compute(&closes), RED),
    ];

    let path = chart_path(plots_dir, &symbol);
    let tmp_path = path.with_extension("svg.tmp");
    if let Err(message) = render(&tmp_path, series, &lines) {
        let _ = fs::remove_file(&tmp_path);
        return Err(ChartError::Render { symbol, message });
    }
    fs::rename(&tmp_path, &path).map_err(|source| {
        let _ = fs::remove_file(&tmp_path);
        ChartError::Rename {
            symbol: symbol.clone(),
            path: path.clone(),
            source,
        }
    })?;

    tracing::debug!(symbol = %symbol, path = %path.display(), "chart rendered");
    Ok(path)
}

struct Line {
    label: String,
    values: Vec<f64>,
    color: RGBColor,
}

impl Line {
    fn new(label: &str, values: Vec<f64>, color: RGBColor) -> Self {
        Self {
            label: label.to_string(),
            values,
            color,
        }
    }

    fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.values
            .iter()
            .enumerate()
            .filter(|(_, v)| v.is_finite())
            .map(|(i, v)| (i as f64, *v))
    }
}

/// Min/max over every finite value, padded so a flat series still has height.
fn y_bounds(lines: &[Line]) -> (f64, f64) {
    let (lo, hi) = lines
        .iter()
        .flat_map(|l| l.values.iter().copied())
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    let pad = ((hi - lo) * 0.05).max(1e-6 + lo.abs() * 0.01);
    (lo - pad, hi + pad)
}

fn render(path: &Path, series: &PriceSeries, lines: &[Line]) -> Result<(), String> {
    let dates = series.dates();
    let x_max = dates.len().saturating_sub(1).max(1) as f64;
    let (y_min, y_max) = y_bounds(lines);

    let root = SVGBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(|e| e.to_string())?;

    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!("{} close with MA{SHORT_MA_PERIOD}/MA{LONG_MA_PERIOD}", series.symbol),
            ("sans-serif", 24),
        )
        .margin(12)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(0f64..x_max, y_min..y_max)
        .map_err(|e| e.to_string())?;

    let date_label = |x: &f64| {
        let idx = x.round();
        if idx < 0.0 {
            return String::new();
        }
        dates
            .get(idx as usize)
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default()
    };
    chart
        .configure_mesh()
        .x_labels(8)
        .x_label_formatter(&date_label)
        .x_desc("Date")
        .y_desc("Price")
        .draw()
        .map_err(|e| e.to_string())?;

    for line in lines {
        let color = line.color;
        chart
            .draw_series(LineSeries::new(line.points(), color.stroke_width(2)))
            .map_err(|e| e.to_string())?
            .label(line.label.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(|e| e.to_string())?;

    root.present().map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{PriceRow, SeriesSource};
    use chrono::NaiveDate;

    fn series(closes: &[f64]) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        PriceSeries {
            symbol: "TSLA".into(),
            source: SeriesSource::Adjusted,
            rows: closes
                .iter()
                .enumerate()
                .map(|(i, &close)| PriceRow {
                    date: start + chrono::Duration::days(i as i64),
                    open: close,
                    high: close,
                    low: close,
                    close,
                    adj_close: Some(close),
                    volume: 1.0,
                    dividend: None,
                    split: None,
                })
                .collect(),
        }
    }

    #[test]
    fn writes_svg_under_plots() {
        let dir = tempfile::tempdir().unwrap();
        let plots = dir.path().join("plots");
        let closes: Vec<f64> = (0..60).map(|i| 100.0 + i as f64).collect();

        let path = plot_ma(&series(&closes), &plots).unwrap();

        assert_eq!(path, plots.join("TSLA_ma.svg"));
        let svg = fs::read_to_string(&path).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("MA20"));
        assert!(svg.contains("MA50"));
        assert!(!plots.join("TSLA_ma.svg.tmp").exists());
    }

    #[test]
    fn short_series_still_renders() {
        let dir = tempfile::tempdir().unwrap();
        let path = plot_ma(&series(&[10.0, 10.0, 10.0]), dir.path()).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn all_nan_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = plot_ma(&series(&[f64::NAN, f64::NAN]), dir.path()).unwrap_err();
        assert!(matches!(err, ChartError::Empty { .. }));
        assert!(err.to_string().contains("TSLA"));
    }
}
