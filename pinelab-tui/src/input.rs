//! Keyboard input dispatch — overlays first, then global keys, then the form.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};

use crate::app::{AppState, Overlay};

/// Handle a key event.
pub fn handle_key(app: &mut AppState, key: KeyEvent) {
    // Only handle key press events (Windows sends both Press and Release).
    if key.kind != KeyEventKind::Press {
        return;
    }

    // 1. Overlays consume input first.
    match app.overlay {
        Overlay::Welcome => {
            app.overlay = Overlay::None;
            return;
        }
        Overlay::Help => {
            handle_help_overlay(app, key);
            return;
        }
        Overlay::ApiKey => {
            handle_api_key_overlay(app, key);
            return;
        }
        Overlay::ErrorHistory => {
            handle_error_overlay(app, key);
            return;
        }
        Overlay::None => {}
    }

    // 2. Global keys.
    match key.code {
        KeyCode::Char('q') => {
            app.running = false;
            return;
        }
        KeyCode::Char('?') => {
            app.overlay = Overlay::Help;
            return;
        }
        KeyCode::Char('e') => {
            app.error_scroll = 0;
            app.overlay = Overlay::ErrorHistory;
            return;
        }
        KeyCode::Char('K') => {
            app.key_input.clear();
            app.overlay = Overlay::ApiKey;
            return;
        }
        _ => {}
    }

    // 3. Form and actions.
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => app.form.cursor_down(),
        KeyCode::Char('k') | KeyCode::Up => app.form.cursor_up(),
        KeyCode::Char('h') | KeyCode::Left => app.form.adjust(-1),
        KeyCode::Char('l') | KeyCode::Right => app.form.adjust(1),
        KeyCode::Char(' ') => app.form.toggle(),
        KeyCode::Enter | KeyCode::Char('g') => app.request_generate(),
        KeyCode::Char('c') => app.copy_code(),
        KeyCode::PageDown | KeyCode::Char('d') => scroll_output(app, 5),
        KeyCode::PageUp | KeyCode::Char('u') => scroll_output(app, -5),
        _ => {}
    }
}

fn scroll_output(app: &mut AppState, delta: i64) {
    let max = app
        .output
        .output
        .as_ref()
        .map(|o| o.code.lines().count().saturating_sub(1))
        .unwrap_or(0);
    let next = app.output.scroll as i64 + delta;
    app.output.scroll = next.clamp(0, max as i64) as usize;
}

fn handle_help_overlay(app: &mut AppState, key: KeyEvent) {
    if matches!(
        key.code,
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?')
    ) {
        app.overlay = Overlay::None;
    }
}

fn handle_error_overlay(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('e') => {
            app.overlay = Overlay::None;
        }
        KeyCode::Char('j') | KeyCode::Down => {
            if app.error_scroll + 1 < app.error_history.len() {
                app.error_scroll += 1;
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.error_scroll = app.error_scroll.saturating_sub(1);
        }
        _ => {}
    }
}

fn handle_api_key_overlay(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.key_input.clear();
            app.overlay = Overlay::None;
        }
        KeyCode::Enter => {
            let entered = app.key_input.trim().to_string();
            if !entered.is_empty() {
                app.credential.set(entered);
                // Optimistic: the key counts as configured until the next
                // call proves otherwise.
                app.credential_configured = true;
                app.set_status("API key configured");
            }
            app.key_input.clear();
            app.overlay = Overlay::None;
        }
        KeyCode::Backspace => {
            app.key_input.pop();
        }
        KeyCode::Char(c) => {
            app.key_input.push(c);
        }
        _ => {}
    }
}
