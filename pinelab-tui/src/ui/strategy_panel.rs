//! Strategy form — timeframe selector, risk-ratio slider, module toggles.

use ratatui::layout::Rect;
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::{
    AppState, ROW_RISK_RATIO, ROW_RSI, ROW_SMC, ROW_TIMEFRAME, ROW_VOLATILITY, RISK_RATIO_MAX,
    RISK_RATIO_MIN,
};
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let config = &app.form.config;
    let cursor = app.form.cursor;
    let mut lines: Vec<Line> = Vec::new();

    lines.push(Line::from(Span::styled(
        "[j/k]navigate [h/l]adjust [Space]toggle [Enter]generate",
        theme::muted(),
    )));
    lines.push(Line::from(""));

    // Timeframe selector.
    lines.push(row(
        cursor == ROW_TIMEFRAME,
        "Timeframe",
        format!("< {} >  ({})", config.timeframe.code(), config.timeframe.label()),
    ));
    lines.push(Line::from(""));

    // Risk/reward slider.
    let bar = render_slider_inline(config.risk_ratio, RISK_RATIO_MIN, RISK_RATIO_MAX, 20);
    lines.push(row(
        cursor == ROW_RISK_RATIO,
        "Risk/Reward",
        format!("{bar} 1:{}", config.risk_ratio),
    ));
    lines.push(Line::from(""));

    // Module toggles.
    lines.push(Line::from(Span::styled(
        "Strategy Modules",
        theme::neutral().add_modifier(Modifier::BOLD),
    )));
    lines.push(toggle_row(
        cursor == ROW_SMC,
        config.use_smc,
        "Smart Money Concepts (FVG, BOS, OB)",
    ));
    lines.push(toggle_row(
        cursor == ROW_RSI,
        config.use_rsi,
        "Momentum RSI",
    ));
    lines.push(toggle_row(
        cursor == ROW_VOLATILITY,
        config.volatility_filter,
        "ATR Volatility Filter",
    ));
    lines.push(Line::from(""));

    // Mandatory elements, always requested.
    lines.push(Line::from(Span::styled(
        "Always included",
        theme::neutral().add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(Span::styled(
        "  Multi-EMA trend filter (21/50/200)",
        theme::muted(),
    )));
    lines.push(Line::from(Span::styled(
        "  ATR-based dynamic SL/TP levels",
        theme::muted(),
    )));
    lines.push(Line::from(""));

    if app.loading {
        lines.push(Line::from(Span::styled(
            "Generating...",
            theme::warning().add_modifier(Modifier::BOLD),
        )));
    } else {
        lines.push(Line::from(Span::styled(
            "[Enter] Generate indicator",
            theme::accent_bold(),
        )));
    }

    if let Some(err) = &app.error_message {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(err.as_str(), theme::negative())));
    }

    let para = Paragraph::new(lines);
    f.render_widget(para, area);
}

fn row(active: bool, label: &str, value: String) -> Line<'static> {
    let label_style = if active {
        theme::accent().add_modifier(Modifier::REVERSED)
    } else {
        theme::text()
    };
    let value_style = if active { theme::accent() } else { theme::muted() };
    Line::from(vec![
        Span::styled(format!("{label:>14}: "), label_style),
        Span::styled(value, value_style),
    ])
}

fn toggle_row(active: bool, enabled: bool, label: &str) -> Line<'static> {
    let mark = if enabled { "[x]" } else { "[ ]" };
    let style = if active {
        theme::accent().add_modifier(Modifier::REVERSED)
    } else if enabled {
        theme::text()
    } else {
        theme::muted()
    };
    Line::from(vec![
        Span::raw("  "),
        Span::styled(format!("{mark} {label}"), style),
    ])
}

fn render_slider_inline(value: f64, min: f64, max: f64, width: usize) -> String {
    let range = max - min;
    if range <= 0.0 {
        return format!("[{}]", "=".repeat(width));
    }
    let frac = ((value - min) / range).clamp(0.0, 1.0);
    let filled = (frac * width as f64).round() as usize;
    let empty = width.saturating_sub(filled);
    format!("[{}{}]", "=".repeat(filled), " ".repeat(empty))
}
