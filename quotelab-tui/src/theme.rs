//! Parrot/neon theme tokens for the QuoteLab dashboard.
//!
//! # Color Palette
//! - **Accent**: Electric cyan (focus, highlights)
//! - **Positive**: Neon green (selected symbols)
//! - **Negative**: Hot pink (errors)
//! - **Warning**: Neon orange (alerts)
//! - **Neutral**: Cool purple (headings)
//! - **Muted**: Steel blue (hints, axis text)

use ratatui::style::{Color, Modifier, Style};

pub const ACCENT: Color = Color::Rgb(0, 255, 255);
pub const POSITIVE: Color = Color::Rgb(0, 255, 128);
pub const NEGATIVE: Color = Color::Rgb(255, 20, 147);
pub const WARNING: Color = Color::Rgb(255, 140, 0);
pub const NEUTRAL: Color = Color::Rgb(147, 112, 219);
pub const MUTED: Color = Color::Rgb(100, 149, 237);
pub const TEXT_PRIMARY: Color = Color::White;
pub const TEXT_SECONDARY: Color = Color::Rgb(170, 170, 170);

/// Line colors for trend series, cycled by symbol index.
const SERIES: [Color; 6] = [ACCENT, POSITIVE, WARNING, NEGATIVE, NEUTRAL, Color::Yellow];

pub fn accent() -> Style {
    Style::default().fg(ACCENT)
}

pub fn accent_bold() -> Style {
    accent().add_modifier(Modifier::BOLD)
}

pub fn positive() -> Style {
    Style::default().fg(POSITIVE)
}

pub fn negative() -> Style {
    Style::default().fg(NEGATIVE)
}

pub fn warning() -> Style {
    Style::default().fg(WARNING)
}

pub fn neutral() -> Style {
    Style::default().fg(NEUTRAL)
}

pub fn muted() -> Style {
    Style::default().fg(MUTED)
}

pub fn text() -> Style {
    Style::default().fg(TEXT_PRIMARY)
}

pub fn text_secondary() -> Style {
    Style::default().fg(TEXT_SECONDARY)
}

pub fn panel_border(focused: bool) -> Style {
    if focused {
        accent()
    } else {
        Style::default().fg(TEXT_SECONDARY)
    }
}

pub fn panel_title(focused: bool) -> Style {
    if focused {
        accent_bold()
    } else {
        neutral()
    }
}

pub fn table_header() -> Style {
    neutral().add_modifier(Modifier::BOLD)
}

pub fn series_color(index: usize) -> Color {
    SERIES[index % SERIES.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn focus_changes_border() {
        assert_eq!(panel_border(true), accent());
        assert_ne!(panel_border(true), panel_border(false));
    }

    #[test]
    fn series_colors_cycle() {
        assert_eq!(series_color(0), ACCENT);
        assert_eq!(series_color(SERIES.len()), series_color(0));
        assert_ne!(series_color(0), series_color(1));
    }
}
