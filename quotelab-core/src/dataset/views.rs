//! Stateless views over filtered rows.

use crate::domain::PriceRecord;
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Most recent row for one symbol.
#[derive(Debug, Clone, PartialEq)]
pub struct LatestPrice {
    pub symbol: String,
    pub date: NaiveDate,
    pub close: Option<f64>,
    pub volume: Option<f64>,
}

/// Close prices for one symbol, ascending by date, one point per date.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendSeries {
    pub symbol: String,
    pub points: Vec<(NaiveDate, f64)>,
}

impl TrendSeries {
    pub fn close_bounds(&self) -> Option<(f64, f64)> {
        let mut closes = self.points.iter().map(|(_, c)| *c);
        let first = closes.next()?;
        Some(closes.fold((first, first), |(lo, hi), c| (lo.min(c), hi.max(c))))
    }
}

/// Max-date row per symbol, sorted by symbol. Ties go to the later row.
pub fn latest_prices(rows: &[&PriceRecord]) -> Vec<LatestPrice> {
    let mut latest: BTreeMap<&str, (&PriceRecord, NaiveDate)> = BTreeMap::new();
    for &row in rows {
        let (Some(symbol), Some(date)) = (row.symbol.as_deref(), row.date) else {
            continue;
        };
        match latest.get(symbol) {
            Some((_, best)) if *best > date => {}
            _ => {
                latest.insert(symbol, (row, date));
            }
        }
    }
    latest
        .into_iter()
        .map(|(symbol, (row, date))| LatestPrice {
            symbol: symbol.to_string(),
            date,
            close: row.close,
            volume: row.volume,
        })
        .collect()
}

/// One close series per symbol. Missing closes are skipped; for a repeated
/// date the later row wins.
pub fn trend_series(rows: &[&PriceRecord]) -> Vec<TrendSeries> {
    let mut by_symbol: BTreeMap<&str, BTreeMap<NaiveDate, f64>> = BTreeMap::new();
    for &row in rows {
        let (Some(symbol), Some(date), Some(close)) = (row.symbol.as_deref(), row.date, row.close)
        else {
            continue;
        };
        by_symbol.entry(symbol).or_default().insert(date, close);
    }
    by_symbol
        .into_iter()
        .map(|(symbol, points)| TrendSeries {
            symbol: symbol.to_string(),
            points: points.into_iter().collect(),
        })
        .collect()
}

/// Rows sorted by symbol ascending, then date descending.
pub fn raw_detail<'a>(rows: &[&'a PriceRecord]) -> Vec<&'a PriceRecord> {
    let mut detail = rows.to_vec();
    detail.sort_by(|a, b| {
        a.symbol
            .as_deref()
            .cmp(&b.symbol.as_deref())
            .then(b.date.cmp(&a.date))
    });
    detail
}
