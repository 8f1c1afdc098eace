//! Overlay widgets — welcome, help, API-key entry, error history.

use ratatui::layout::Rect;
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use crate::app::AppState;
use crate::theme;
use crate::ui::centered_rect;

/// First-run welcome overlay.
pub fn render_welcome(f: &mut Frame, area: Rect) {
    let popup = centered_rect(60, 45, area);
    f.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::accent())
        .title(" PineLab — XAUUSD Scalper ")
        .title_style(theme::accent_bold());

    let text = vec![
        Line::from(""),
        Line::from(Span::styled("Getting started:", theme::accent_bold())),
        Line::from(""),
        Line::from(Span::styled(
            "  1. Press K and paste your Gemini API key",
            theme::muted(),
        )),
        Line::from(Span::styled(
            "     (or export GEMINI_API_KEY before launching)",
            theme::muted(),
        )),
        Line::from(Span::styled(
            "  2. Tune the strategy with j/k, h/l and Space",
            theme::muted(),
        )),
        Line::from(Span::styled(
            "  3. Press Enter to generate the indicator",
            theme::muted(),
        )),
        Line::from(Span::styled(
            "  4. Press c to copy the script for TradingView",
            theme::muted(),
        )),
        Line::from(""),
        Line::from(Span::styled("Press any key to dismiss...", theme::neutral())),
    ];

    let para = Paragraph::new(text).block(block).wrap(Wrap { trim: true });
    f.render_widget(para, popup);
}

/// Keyboard reference overlay.
pub fn render_help(f: &mut Frame, area: Rect) {
    let popup = centered_rect(55, 60, area);
    f.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::accent())
        .title(" Help [Esc]close ")
        .title_style(theme::accent_bold());

    let rows: &[(&str, &str)] = &[
        ("j/k, ↓/↑", "move between form rows"),
        ("h/l, ←/→", "adjust timeframe / risk ratio"),
        ("Space", "toggle a strategy module"),
        ("Enter, g", "generate the indicator"),
        ("c", "copy the script to the clipboard"),
        ("d/u, PgDn/PgUp", "scroll the generated code"),
        ("K", "enter a Gemini API key"),
        ("e", "error history"),
        ("q", "quit"),
    ];

    let mut lines = vec![Line::from("")];
    for (keys, what) in rows {
        lines.push(Line::from(vec![
            Span::styled(format!("  {keys:>16}  "), theme::accent()),
            Span::styled(*what, theme::muted()),
        ]));
    }

    let para = Paragraph::new(lines).block(block);
    f.render_widget(para, popup);
}

/// API-key entry overlay. The key is masked on screen.
pub fn render_api_key(f: &mut Frame, area: Rect, input: &str) {
    let popup = centered_rect(50, 20, area);
    f.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::warning())
        .title(" Gemini API key [Enter]save [Esc]cancel ")
        .title_style(theme::warning());

    let masked = "*".repeat(input.chars().count());
    let lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled("  key: ", theme::muted()),
            Span::styled(masked, theme::accent().add_modifier(Modifier::BOLD)),
            Span::styled("_", theme::accent()),
        ]),
    ];

    let para = Paragraph::new(lines).block(block);
    f.render_widget(para, popup);
}

/// Error history overlay.
pub fn render_error_history(f: &mut Frame, area: Rect, app: &AppState) {
    let popup = centered_rect(80, 70, area);
    f.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::negative())
        .title(format!(
            " Error History ({}) [Esc]close [j/k]scroll ",
            app.error_history.len()
        ))
        .title_style(theme::negative());

    let inner = block.inner(popup);
    f.render_widget(block, popup);

    if app.error_history.is_empty() {
        let text = Paragraph::new(Span::styled("No errors recorded.", theme::muted()));
        f.render_widget(text, inner);
        return;
    }

    let visible_height = inner.height as usize;
    let start = app.error_scroll;
    let end = (start + visible_height).min(app.error_history.len());

    let mut lines: Vec<Line> = Vec::new();
    for i in start..end {
        let err = &app.error_history[i];
        let is_active = i == app.error_scroll;
        let style = if is_active {
            theme::negative().add_modifier(Modifier::BOLD)
        } else {
            theme::muted()
        };

        lines.push(Line::from(vec![
            Span::styled(
                format!("[{}] ", err.timestamp.format("%H:%M:%S")),
                theme::muted(),
            ),
            Span::styled(format!("[{}] ", err.category.label()), theme::warning()),
            Span::styled(&err.message, style),
        ]));
    }

    let para = Paragraph::new(lines);
    f.render_widget(para, inner);
}
