//! Bottom status bar — key hints, credential indicator, last message.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::{AppState, StatusLevel};
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let mut spans: Vec<Span> = Vec::new();

    spans.push(Span::styled(
        " [Enter]generate [c]opy [K]api-key [e]rrors [?]help [q]uit",
        theme::muted(),
    ));
    spans.push(Span::raw(" | "));

    if app.credential_configured {
        spans.push(Span::styled("key ok", theme::positive()));
    } else {
        spans.push(Span::styled("no key", theme::warning()));
    }

    if app.loading {
        spans.push(Span::raw(" | "));
        spans.push(Span::styled("working...", theme::warning()));
    }

    if let Some((msg, level)) = &app.status_message {
        let style = match level {
            StatusLevel::Info => theme::accent(),
            StatusLevel::Warning => theme::warning(),
            StatusLevel::Error => theme::negative(),
        };
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(msg.as_str(), style));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}
