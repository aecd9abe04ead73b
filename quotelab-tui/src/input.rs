//! Keyboard input dispatch: halted state, overlays, global keys, focus-specific keys.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::{AppState, Focus, Overlay};

/// Days moved by `H` / `L`.
const BIG_STEP_DAYS: i64 = 30;

/// Rows moved by PageUp / PageDown in the detail table.
const PAGE_ROWS: isize = 10;

pub fn handle_key(app: &mut AppState, key: KeyEvent) {
    // Only handle key press events (Windows sends both Press and Release).
    if key.kind != KeyEventKind::Press {
        return;
    }

    // 1. Nothing loaded: only quit.
    if app.is_halted() {
        if key.code == KeyCode::Char('q') {
            app.running = false;
        }
        return;
    }

    // 2. Overlays consume input first.
    if app.overlay == Overlay::Help {
        if matches!(
            key.code,
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('?') | KeyCode::Char('q')
        ) {
            app.overlay = Overlay::None;
        }
        return;
    }

    // 3. Global keys.
    match key.code {
        KeyCode::Char('q') => {
            app.running = false;
            return;
        }
        KeyCode::Char('?') => {
            app.overlay = Overlay::Help;
            return;
        }
        KeyCode::Tab => {
            if key.modifiers.contains(KeyModifiers::SHIFT) {
                app.focus = app.focus.prev();
            } else {
                app.focus = app.focus.next();
            }
            return;
        }
        KeyCode::BackTab => {
            app.focus = app.focus.prev();
            return;
        }
        KeyCode::Char('r') => {
            app.reload();
            return;
        }
        KeyCode::Char('a') => {
            app.select_all();
            return;
        }
        KeyCode::Char('n') => {
            app.select_none();
            app.set_warning("No symbols selected");
            return;
        }
        KeyCode::Char('0') => {
            app.reset_range();
            return;
        }
        _ => {}
    }

    // 4. Focus-specific keys.
    match app.focus {
        Focus::Symbols => handle_symbols_key(app, key),
        Focus::DateRange => handle_range_key(app, key),
        Focus::Detail => handle_detail_key(app, key),
    }
}

fn handle_symbols_key(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => app.move_cursor(1),
        KeyCode::Char('k') | KeyCode::Up => app.move_cursor(-1),
        KeyCode::Char(' ') => app.toggle_cursor_symbol(),
        _ => {}
    }
}

fn handle_range_key(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Char('h') | KeyCode::Left => app.shift_bound(-1),
        KeyCode::Char('l') | KeyCode::Right => app.shift_bound(1),
        KeyCode::Char('H') => app.shift_bound(-BIG_STEP_DAYS),
        KeyCode::Char('L') => app.shift_bound(BIG_STEP_DAYS),
        KeyCode::Enter => app.swap_bound(),
        _ => {}
    }
}

fn handle_detail_key(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => app.scroll_detail(1),
        KeyCode::Char('k') | KeyCode::Up => app.scroll_detail(-1),
        KeyCode::PageDown => app.scroll_detail(PAGE_ROWS),
        KeyCode::PageUp => app.scroll_detail(-PAGE_ROWS),
        KeyCode::Char('g') | KeyCode::Home => app.scroll_detail_to(true),
        KeyCode::Char('G') | KeyCode::End => app.scroll_detail_to(false),
        _ => {}
    }
}
