//! Top-level UI layout: sidebar, two-column main area, detail table, status bar.

pub mod detail_panel;
pub mod latest_panel;
pub mod overlays;
pub mod sidebar;
pub mod status_bar;
pub mod trend_panel;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::widgets::{Block, Borders};

use crate::app::{AppState, DataState, Loaded, Overlay};
use crate::theme;

const SIDEBAR_WIDTH: u16 = 30;

/// Draw the entire UI.
pub fn draw(f: &mut Frame, app: &AppState) {
    // Split: main area + 1-line status bar.
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(f.area());

    let main_area = chunks[0];
    let status_area = chunks[1];

    match &app.data {
        DataState::NoData(reason) => overlays::render_no_data(f, main_area, reason, &app.data_dir),
        DataState::Loaded(loaded) => draw_dashboard(f, main_area, app, loaded),
    }

    status_bar::render(f, status_area, app);

    if app.overlay == Overlay::Help {
        overlays::render_help(f, main_area);
    }
}

fn draw_dashboard(f: &mut Frame, area: Rect, app: &AppState, loaded: &Loaded) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(20)])
        .split(area);

    sidebar::render(f, columns[0], app, loaded);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(columns[1]);

    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(2, 5), Constraint::Ratio(3, 5)])
        .split(rows[0]);

    latest_panel::render(f, top[0], &loaded.views.latest);
    trend_panel::render(f, top[1], &loaded.views.trend);
    detail_panel::render(f, rows[1], app, &loaded.views.detail);
}

/// Bordered block with the standard title styling.
pub fn panel_block(title: &str, focused: bool) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(theme::panel_border(focused))
        .title(format!(" {title} "))
        .title_style(theme::panel_title(focused))
}

/// Compute a centered rect for overlays.
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
