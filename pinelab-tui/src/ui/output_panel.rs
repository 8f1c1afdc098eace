//! Output view — generated script with scroll, explanation, key features.

use std::time::Instant;

use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Wrap};
use ratatui::Frame;

use crate::app::AppState;
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let Some(output) = &app.output.output else {
        render_placeholder(f, area, app);
        return;
    };

    // Code view on top, analysis below.
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(8),
            Constraint::Length(1),
            Constraint::Percentage(35),
        ])
        .split(area);

    // Header with copy affordance.
    let copy_span = if app.output.copied_visible(Instant::now()) {
        Span::styled("Copied ✓", theme::positive().add_modifier(Modifier::BOLD))
    } else {
        Span::styled("[c]opy to clipboard", theme::muted())
    };
    f.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled("[d/u]scroll  ", theme::muted()),
            copy_span,
        ])),
        chunks[0],
    );

    // Code, scrolled.
    let code_lines: Vec<Line> = output
        .code
        .lines()
        .skip(app.output.scroll)
        .map(|l| Line::from(Span::styled(l.to_string(), theme::accent())))
        .collect();
    f.render_widget(Paragraph::new(code_lines), chunks[1]);

    f.render_widget(
        Paragraph::new(Line::from(Span::styled(
            "Expert Analysis",
            theme::neutral().add_modifier(Modifier::BOLD),
        ))),
        chunks[2],
    );

    let mut analysis: Vec<Line> = Vec::new();
    analysis.push(Line::from(Span::styled(
        output.explanation.clone(),
        theme::text(),
    )));
    analysis.push(Line::from(""));
    for feature in &output.key_features {
        analysis.push(Line::from(vec![
            Span::styled("• ", theme::accent()),
            Span::styled(feature.clone(), theme::muted()),
        ]));
    }
    f.render_widget(Paragraph::new(analysis).wrap(Wrap { trim: true }), chunks[3]);
}

fn render_placeholder(f: &mut Frame, area: Rect, app: &AppState) {
    let message = if app.loading {
        "Waiting for the model..."
    } else {
        "Configure and generate to see the script"
    };
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(message, theme::muted())),
    ];
    f.render_widget(Paragraph::new(lines).alignment(Alignment::Center), area);
}
