//! Latest price per symbol within the current filter.

use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::text::Span;
use ratatui::widgets::{Cell, Paragraph, Row, Table};

use quotelab_core::dataset::LatestPrice;

use crate::theme;
use crate::ui::panel_block;

pub fn render(f: &mut Frame, area: Rect, latest: &[LatestPrice]) {
    let block = panel_block("Latest Price", false);

    if latest.is_empty() {
        let para = Paragraph::new(Span::styled("No rows match the filter.", theme::muted()))
            .block(block);
        f.render_widget(para, area);
        return;
    }

    let header = Row::new(["Symbol", "Date", "Close", "Volume"]).style(theme::table_header());
    let rows = latest.iter().map(|p| {
        Row::new(vec![
            Cell::from(p.symbol.clone()).style(theme::accent()),
            Cell::from(p.date.to_string()),
            Cell::from(format_price(p.close)),
            Cell::from(format_volume(p.volume)),
        ])
        .style(theme::text())
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(8),
            Constraint::Length(11),
            Constraint::Length(10),
            Constraint::Min(8),
        ],
    )
    .header(header)
    .block(block);

    f.render_widget(table, area);
}

pub fn format_price(value: Option<f64>) -> String {
    value.map_or_else(|| "-".into(), |v| format!("{v:.2}"))
}

pub fn format_volume(value: Option<f64>) -> String {
    value.map_or_else(|| "-".into(), |v| format!("{v:.0}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_values_render_as_dash() {
        assert_eq!(format_price(None), "-");
        assert_eq!(format_price(Some(12.345)), "12.35");
        assert_eq!(format_volume(Some(1500.0)), "1500");
    }
}
