//! Gold/amber theme tokens — one place for every style the panels use.

use ratatui::style::{Color, Modifier, Style};

const GOLD: Color = Color::Rgb(234, 179, 8);
const GREEN: Color = Color::Rgb(0, 255, 128);
const PINK: Color = Color::Rgb(255, 20, 147);
const ORANGE: Color = Color::Rgb(255, 140, 0);
const PURPLE: Color = Color::Rgb(147, 112, 219);
const STEEL: Color = Color::Rgb(100, 149, 237);
const GRAY: Color = Color::Rgb(170, 170, 170);

/// Gold accent (focus, highlights).
pub fn accent() -> Style {
    Style::default().fg(GOLD)
}

pub fn accent_bold() -> Style {
    accent().add_modifier(Modifier::BOLD)
}

/// Muted text (hints, disabled).
pub fn muted() -> Style {
    Style::default().fg(STEEL)
}

/// Secondary info.
pub fn neutral() -> Style {
    Style::default().fg(PURPLE)
}

/// Success states.
pub fn positive() -> Style {
    Style::default().fg(GREEN)
}

/// Failure states.
pub fn negative() -> Style {
    Style::default().fg(PINK)
}

/// Warnings.
pub fn warning() -> Style {
    Style::default().fg(ORANGE)
}

/// Body text.
pub fn text() -> Style {
    Style::default().fg(GRAY)
}

pub fn panel_border(active: bool) -> Style {
    if active {
        accent()
    } else {
        muted()
    }
}

pub fn panel_title(active: bool) -> Style {
    if active {
        accent_bold()
    } else {
        muted()
    }
}
