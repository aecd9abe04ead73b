//! Bottom status bar: focus, key hints, last status message.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::app::{AppState, StatusLevel};
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let mut spans: Vec<Span> = Vec::new();

    if app.is_halted() {
        spans.push(Span::styled(" q:Quit", theme::muted()));
    } else {
        spans.push(Span::styled(
            format!(" [{}]", app.focus.label()),
            theme::accent_bold(),
        ));
        spans.push(Span::styled(
            " Tab:Focus a:All n:None 0:Reset r:Reload ?:Help q:Quit",
            theme::muted(),
        ));
    }

    if let Some((msg, level)) = &app.status_message {
        spans.push(Span::raw(" | "));
        let style = match level {
            StatusLevel::Info => theme::accent(),
            StatusLevel::Warning => theme::warning(),
            StatusLevel::Error => theme::negative(),
        };
        spans.push(Span::styled(msg.as_str(), style));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}
