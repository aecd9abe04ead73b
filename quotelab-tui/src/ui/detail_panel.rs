//! Raw detail table: every filtered row, scrollable.

use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::text::Span;
use ratatui::widgets::{Cell, Paragraph, Row, Table};

use quotelab_core::domain::PriceRecord;

use crate::app::{AppState, Focus};
use crate::theme;
use crate::ui::latest_panel::{format_price, format_volume};
use crate::ui::panel_block;

pub fn render(f: &mut Frame, area: Rect, app: &AppState, detail: &[PriceRecord]) {
    let focused = app.focus == Focus::Detail;
    let title = if detail.is_empty() {
        "Detail".to_string()
    } else {
        format!("Detail {}/{}", app.detail_scroll + 1, detail.len())
    };
    let block = panel_block(&title, focused);

    if detail.is_empty() {
        let para = Paragraph::new(Span::styled("No rows match the filter.", theme::muted()))
            .block(block);
        f.render_widget(para, area);
        return;
    }

    // Borders and header take three lines.
    let visible = area.height.saturating_sub(3) as usize;

    let header = Row::new([
        "Symbol", "Date", "Open", "High", "Low", "Close", "Volume", "Source",
    ])
    .style(theme::table_header());

    let rows = detail
        .iter()
        .skip(app.detail_scroll)
        .take(visible)
        .map(|r| {
            Row::new(vec![
                Cell::from(r.symbol.clone().unwrap_or_default()).style(theme::accent()),
                Cell::from(r.date.map(|d| d.to_string()).unwrap_or_else(|| "-".into())),
                Cell::from(format_price(r.open)),
                Cell::from(format_price(r.high)),
                Cell::from(format_price(r.low)),
                Cell::from(format_price(r.close)),
                Cell::from(format_volume(r.volume)),
                Cell::from(r.source.clone().unwrap_or_else(|| "-".into())).style(theme::muted()),
            ])
            .style(theme::text())
        });

    let table = Table::new(
        rows,
        [
            Constraint::Length(8),
            Constraint::Length(11),
            Constraint::Length(10),
            Constraint::Length(10),
            Constraint::Length(10),
            Constraint::Length(10),
            Constraint::Length(12),
            Constraint::Min(8),
        ],
    )
    .header(header)
    .block(block);

    f.render_widget(table, area);
}
