//! Overlay widgets: keyboard help and the no-data screen.

use std::path::Path;

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use quotelab_core::data::COMBINED_FILE_NAME;

use crate::theme;
use crate::ui::centered_rect;

/// Keyboard shortcut overlay, toggled with `?`.
pub fn render_help(f: &mut Frame, area: Rect) {
    let popup = centered_rect(60, 80, area);
    f.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::accent())
        .title(" Keyboard ")
        .title_style(theme::accent_bold());

    let mut lines: Vec<Line> = Vec::new();

    section(&mut lines, "Global");
    key(&mut lines, "Tab / Shift+Tab", "Cycle focus");
    key(&mut lines, "a / n", "Select all / no symbols");
    key(&mut lines, "0", "Reset date range to full span");
    key(&mut lines, "r", "Reload data directory");
    key(&mut lines, "?", "Toggle this help");
    key(&mut lines, "q", "Quit");
    lines.push(Line::from(""));

    section(&mut lines, "Symbols");
    key(&mut lines, "j / k", "Move cursor down / up");
    key(&mut lines, "Space", "Toggle symbol");
    lines.push(Line::from(""));

    section(&mut lines, "Date Range");
    key(&mut lines, "h / l", "Move bound one day");
    key(&mut lines, "H / L", "Move bound 30 days");
    key(&mut lines, "Enter", "Switch start / end bound");
    lines.push(Line::from(""));

    section(&mut lines, "Detail");
    key(&mut lines, "j / k", "Scroll one row");
    key(&mut lines, "PgUp / PgDn", "Scroll one page");
    key(&mut lines, "g / G", "Jump to top / bottom");
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Esc or ? to close",
        theme::neutral(),
    )));

    let para = Paragraph::new(lines).block(block);
    f.render_widget(para, popup);
}

/// Shown instead of the dashboard when nothing could be loaded.
pub fn render_no_data(f: &mut Frame, area: Rect, reason: &str, data_dir: &Path) {
    let popup = centered_rect(70, 50, area);
    f.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::warning())
        .title(" No data ")
        .title_style(theme::warning());

    let text = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("No data in {}", data_dir.display()),
            theme::warning(),
        )),
        Line::from(""),
        Line::from(Span::styled(reason.to_string(), theme::text_secondary())),
        Line::from(""),
        Line::from(Span::styled(
            format!("Run `quotelab fetch` to download prices and write {COMBINED_FILE_NAME}."),
            theme::muted(),
        )),
        Line::from(""),
        Line::from(Span::styled("Press q to quit.", theme::neutral())),
    ];

    let para = Paragraph::new(text).block(block).wrap(Wrap { trim: false });
    f.render_widget(para, popup);
}

fn section(lines: &mut Vec<Line<'_>>, title: &str) {
    lines.push(Line::from(Span::styled(title.to_string(), theme::accent_bold())));
}

fn key(lines: &mut Vec<Line<'_>>, keys: &str, desc: &str) {
    lines.push(Line::from(vec![
        Span::styled(format!("  {keys:>16}  "), theme::accent()),
        Span::styled(desc.to_string(), theme::muted()),
    ]));
}
