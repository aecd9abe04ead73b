//! Symbol and date-range selection over a loaded dataset.

use super::loader::Dataset;
use crate::domain::PriceRecord;
use chrono::NaiveDate;
use std::collections::BTreeSet;

/// Inclusive date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Build a range, swapping the bounds if given in reverse.
    pub fn new(a: NaiveDate, b: NaiveDate) -> Self {
        Self {
            start: a.min(b),
            end: a.max(b),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Clamp both bounds into `span`.
    pub fn clamp_to(&self, span: DateRange) -> Self {
        let clamp = |d: NaiveDate| d.clamp(span.start, span.end);
        Self::new(clamp(self.start), clamp(self.end))
    }
}

/// Current selection. `range == None` means the dataset has no dates, so
/// nothing can match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    pub symbols: BTreeSet<String>,
    pub range: Option<DateRange>,
}

impl Filter {
    /// All symbols, full date span.
    pub fn for_dataset(dataset: &Dataset) -> Self {
        Self {
            symbols: dataset.symbols(),
            range: dataset.date_span().map(|(lo, hi)| DateRange::new(lo, hi)),
        }
    }

    /// Rows with a missing symbol or date never match.
    pub fn matches(&self, record: &PriceRecord) -> bool {
        let (Some(symbol), Some(date), Some(range)) = (&record.symbol, record.date, self.range)
        else {
            return false;
        };
        self.symbols.contains(symbol) && range.contains(date)
    }

    /// Matching rows, in dataset order.
    pub fn apply<'a>(&self, records: &'a [PriceRecord]) -> Vec<&'a PriceRecord> {
        records.iter().filter(|r| self.matches(r)).collect()
    }

    /// Carry the selection over to a reloaded dataset: symbols are intersected
    /// with those present and the range is clamped to the new span.
    pub fn rebase(&self, dataset: &Dataset) -> Self {
        let present = dataset.symbols();
        let span = dataset.date_span().map(|(lo, hi)| DateRange::new(lo, hi));
        Self {
            symbols: self.symbols.intersection(&present).cloned().collect(),
            range: match (self.range, span) {
                (Some(range), Some(span)) => Some(range.clamp_to(span)),
                (None, span) => span,
                (Some(_), None) => None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::DatasetOrigin;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    fn rec(symbol: Option<&str>, date: Option<NaiveDate>) -> PriceRecord {
        PriceRecord {
            symbol: symbol.map(String::from),
            date,
            close: Some(1.0),
            ..Default::default()
        }
    }

    fn dataset(records: Vec<PriceRecord>) -> Dataset {
        Dataset {
            records,
            origin: DatasetOrigin::PerSymbol(vec![]),
        }
    }

    #[test]
    fn default_filter_selects_everything_dated() {
        let ds = dataset(vec![
            rec(Some("A"), Some(d(2))),
            rec(Some("B"), Some(d(9))),
            rec(Some("B"), None),
            rec(None, Some(d(5))),
        ]);
        let filter = Filter::for_dataset(&ds);
        assert_eq!(filter.range, Some(DateRange::new(d(2), d(9))));
        assert_eq!(filter.apply(&ds.records).len(), 2);
    }

    #[test]
    fn reversed_bounds_are_swapped() {
        assert_eq!(DateRange::new(d(9), d(2)), DateRange::new(d(2), d(9)));
    }

    #[test]
    fn rebase_intersects_and_clamps() {
        let filter = Filter {
            symbols: ["A", "GONE"].iter().map(|s| s.to_string()).collect(),
            range: Some(DateRange::new(d(1), d(20))),
        };
        let ds = dataset(vec![rec(Some("A"), Some(d(5))), rec(Some("B"), Some(d(10)))]);
        let rebased = filter.rebase(&ds);
        assert_eq!(rebased.symbols, BTreeSet::from(["A".to_string()]));
        assert_eq!(rebased.range, Some(DateRange::new(d(5), d(10))));
    }

    #[test]
    fn no_dates_matches_nothing() {
        let ds = dataset(vec![rec(Some("A"), None)]);
        let filter = Filter::for_dataset(&ds);
        assert_eq!(filter.range, None);
        assert!(filter.apply(&ds.records).is_empty());
    }
}
