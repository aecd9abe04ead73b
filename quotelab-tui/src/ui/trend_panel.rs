//! Close-price trend line chart, one series per symbol.

use chrono::{Datelike, NaiveDate};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::symbols;
use ratatui::text::Span;
use ratatui::widgets::{Axis, Chart, Dataset, GraphType, LegendPosition, Paragraph};

use quotelab_core::dataset::TrendSeries;

use crate::theme;
use crate::ui::panel_block;

pub fn render(f: &mut Frame, area: Rect, trend: &[TrendSeries]) {
    let block = panel_block("Trend", false);

    let points: Vec<Vec<(f64, f64)>> = trend
        .iter()
        .map(|s| s.points.iter().map(|(d, c)| (day_number(*d), *c)).collect())
        .collect();

    let Some(((x_min, x_max), (y_min, y_max))) = bounds(trend) else {
        let para = Paragraph::new(Span::styled("No closes to plot.", theme::muted())).block(block);
        f.render_widget(para, area);
        return;
    };

    let datasets: Vec<Dataset> = trend
        .iter()
        .zip(&points)
        .enumerate()
        .map(|(i, (series, data))| {
            Dataset::default()
                .name(series.symbol.clone())
                .marker(symbols::Marker::Braille)
                .style(Style::default().fg(theme::series_color(i)))
                .graph_type(GraphType::Line)
                .data(data)
        })
        .collect();

    let padding = ((y_max - y_min).abs() * 0.05).max(0.01);
    let (y_lo, y_hi) = (y_min - padding, y_max + padding);
    let x_hi = if x_max > x_min { x_max } else { x_min + 1.0 };

    let chart = Chart::new(datasets)
        .block(block)
        .legend_position(Some(LegendPosition::TopLeft))
        .x_axis(
            Axis::default()
                .title(Span::styled("Date", theme::muted()))
                .style(theme::muted())
                .bounds([x_min, x_hi])
                .labels(vec![
                    Span::styled(date_label(x_min), theme::muted()),
                    Span::styled(date_label(x_max), theme::muted()),
                ]),
        )
        .y_axis(
            Axis::default()
                .title(Span::styled("Close", theme::muted()))
                .style(theme::muted())
                .bounds([y_lo, y_hi])
                .labels(vec![
                    Span::styled(format!("{y_lo:.2}"), theme::muted()),
                    Span::styled(format!("{y_hi:.2}"), theme::muted()),
                ]),
        );

    f.render_widget(chart, area);
}

fn day_number(date: NaiveDate) -> f64 {
    f64::from(date.num_days_from_ce())
}

fn date_label(x: f64) -> String {
    NaiveDate::from_num_days_from_ce_opt(x.round() as i32)
        .map(|d| d.to_string())
        .unwrap_or_default()
}

/// ((x_min, x_max), (y_min, y_max)) over every series, if any has points.
/// Each series is ascending by date, so its x extent is first..last.
fn bounds(trend: &[TrendSeries]) -> Option<((f64, f64), (f64, f64))> {
    trend
        .iter()
        .filter_map(|s| {
            let (first, _) = s.points.first()?;
            let (last, _) = s.points.last()?;
            Some(((day_number(*first), day_number(*last)), s.close_bounds()?))
        })
        .reduce(|((x_lo, x_hi), (y_lo, y_hi)), ((a, b), (c, d))| {
            ((x_lo.min(a), x_hi.max(b)), (y_lo.min(c), y_hi.max(d)))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn day_numbers_round_trip_to_labels() {
        let d = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        assert_eq!(date_label(day_number(d)), "2024-03-15");
    }

    #[test]
    fn bounds_span_all_series() {
        let d = |day| NaiveDate::from_ymd_opt(2024, 1, day).unwrap();
        let trend = vec![
            TrendSeries {
                symbol: "A".into(),
                points: vec![(d(2), 10.0), (d(5), 12.0)],
            },
            TrendSeries {
                symbol: "B".into(),
                points: vec![(d(1), 50.0)],
            },
            TrendSeries {
                symbol: "C".into(),
                points: vec![],
            },
        ];
        let ((x_lo, x_hi), (y_lo, y_hi)) = bounds(&trend).unwrap();
        assert_eq!(x_lo, day_number(d(1)));
        assert_eq!(x_hi, day_number(d(5)));
        assert_eq!((y_lo, y_hi), (10.0, 50.0));
        assert!(bounds(&[]).is_none());
    }
}
