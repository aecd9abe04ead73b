//! Sidebar: symbol multi-select and date-range bounds.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::app::{AppState, Bound, Focus, Loaded};
use crate::theme;
use crate::ui::panel_block;

const RANGE_HEIGHT: u16 = 8;

pub fn render(f: &mut Frame, area: Rect, app: &AppState, loaded: &Loaded) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(RANGE_HEIGHT)])
        .split(area);

    render_symbols(f, chunks[0], app, loaded);
    render_range(f, chunks[1], app, loaded);
}

fn render_symbols(f: &mut Frame, area: Rect, app: &AppState, loaded: &Loaded) {
    let focused = app.focus == Focus::Symbols;
    let block = panel_block(
        &format!(
            "Symbols {}/{}",
            loaded.filter.symbols.len(),
            loaded.symbols.len()
        ),
        focused,
    );
    let inner = block.inner(area);
    f.render_widget(block, area);

    let visible = inner.height as usize;
    let skip = app.symbol_cursor.saturating_sub(visible.saturating_sub(1));

    let lines: Vec<Line> = loaded
        .symbols
        .iter()
        .enumerate()
        .skip(skip)
        .take(visible)
        .map(|(i, symbol)| {
            let selected = loaded.filter.symbols.contains(symbol);
            let mark = if selected { "[x]" } else { "[ ]" };
            let mut style = if selected {
                theme::positive()
            } else {
                theme::text_secondary()
            };
            if focused && i == app.symbol_cursor {
                style = style.add_modifier(Modifier::REVERSED);
            }
            Line::from(Span::styled(format!("{mark} {symbol}"), style))
        })
        .collect();

    f.render_widget(Paragraph::new(lines), inner);
}

fn render_range(f: &mut Frame, area: Rect, app: &AppState, loaded: &Loaded) {
    let focused = app.focus == Focus::DateRange;
    let block = panel_block("Date Range", focused);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let Some(range) = loaded.filter.range else {
        let para = Paragraph::new(Span::styled("No dated rows.", theme::muted()));
        f.render_widget(para, inner);
        return;
    };

    let bound_style = |bound: Bound| {
        if focused && app.bound == bound {
            theme::accent().add_modifier(Modifier::REVERSED)
        } else {
            theme::accent()
        }
    };

    let mut lines = vec![
        Line::from(vec![
            Span::styled("Start ", theme::muted()),
            Span::styled(range.start.to_string(), bound_style(Bound::Start)),
        ]),
        Line::from(vec![
            Span::styled("End   ", theme::muted()),
            Span::styled(range.end.to_string(), bound_style(Bound::End)),
        ]),
    ];
    if let Some(span) = loaded.span {
        lines.push(Line::from(Span::styled(
            format!("Data  {} .. {}", span.start, span.end),
            theme::text_secondary(),
        )));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "h/l ±1d  H/L ±30d  Enter swap",
        theme::muted(),
    )));

    f.render_widget(Paragraph::new(lines), inner);
}
