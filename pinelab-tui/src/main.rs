//! PineLab TUI — single-screen terminal form for AI-generated XAUUSD
//! scalping indicators.
//!
//! Left panel: strategy configuration (timeframe, risk ratio, module
//! toggles). Right panel: the generated Pine Script with explanation and key
//! features, plus copy-to-clipboard. The blocking Gemini call runs on a
//! worker thread so the UI keeps drawing while a request is in flight.

mod app;
mod clipboard;
mod input;
mod theme;
mod ui;
mod worker;

#[cfg(test)]
mod test_helpers;

use std::io::{self, stdout};
use std::path::PathBuf;
use std::sync::mpsc;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use pinelab_core::{CredentialProvider, EnvCredential, SharedCredential};

use crate::app::{AppState, ErrorCategory};
use crate::clipboard::SystemClipboard;
use crate::worker::{FailureKind, WorkerCommand, WorkerResponse};

const NO_KEY_MESSAGE: &str = "No API key configured. Press K to enter your Gemini API key.";
const BAD_KEY_MESSAGE: &str = "The API key was rejected. Press K to enter a valid Gemini API key.";

fn main() -> Result<()> {
    // Raw-mode terminal: all diagnostics go to a file, never to stdout.
    let _log_guard = init_logging()?;

    // Install a panic hook that restores the terminal before printing the panic.
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stderr(), LeaveAlternateScreen);
        default_hook(info);
    }));

    // Credential slot, seeded from the environment when present.
    let credential = SharedCredential::new();
    if let Some(key) = EnvCredential.credential() {
        credential.set(key);
    }

    // Worker channels
    let (cmd_tx, cmd_rx) = mpsc::channel();
    let (resp_tx, resp_rx) = mpsc::channel();
    let worker_handle = worker::spawn_worker(cmd_rx, resp_tx, credential.clone());

    let mut app = AppState::new(
        cmd_tx.clone(),
        resp_rx,
        credential,
        Box::new(SystemClipboard::new()),
    );

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Run the main event loop
    let result = run_app(&mut terminal, &mut app);

    // Shutdown worker
    let _ = cmd_tx.send(WorkerCommand::Shutdown);
    let _ = worker_handle.join();

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut AppState,
) -> Result<()> {
    loop {
        // 1. Render
        terminal.draw(|f| ui::draw(f, app))?;

        // 2. Drain worker responses (non-blocking)
        while let Ok(resp) = app.worker_rx.try_recv() {
            handle_worker_response(app, resp);
        }

        // 3. Poll for input events (50ms timeout for ~20 FPS tick)
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                input::handle_key(app, key);
            }
        }

        // 4. Expire transient state (copied indicator, selector requests)
        app.tick();

        // 5. Check quit
        if !app.running {
            break;
        }
    }
    Ok(())
}

fn handle_worker_response(app: &mut AppState, resp: WorkerResponse) {
    match resp {
        WorkerResponse::GenerateDone { output } => {
            app.loading = false;
            app.error_message = None;
            app.output.scroll = 0;
            app.output.copied_at = None;
            let lines = output.code.lines().count();
            let features = output.key_features.len();
            app.output.output = Some(*output);
            app.set_status(format!(
                "Generated a {lines}-line script with {features} key features"
            ));
        }
        WorkerResponse::GenerateFailed { kind, message } => {
            app.loading = false;
            app.push_error(ErrorCategory::from(kind), message.clone());
            if kind.is_credential() {
                // Canned message plus the key-selection recovery affordance.
                app.credential_configured = false;
                app.error_message = Some(match kind {
                    FailureKind::CredentialMissing => NO_KEY_MESSAGE.to_string(),
                    _ => BAD_KEY_MESSAGE.to_string(),
                });
                app.selector.open_selector();
            } else {
                // Everything else surfaces the underlying message as-is.
                app.error_message = Some(message);
            }
        }
    }
}

/// Log to a file under the platform data directory; the terminal is in raw
/// mode, so nothing may write to stdout/stderr.
fn init_logging() -> Result<tracing_appender::non_blocking::WorkerGuard> {
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("pinelab")
        .join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = tracing_appender::rolling::never(&log_dir, "pinelab-tui.log");
    let (writer, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("info,hyper=warn,hyper_util=warn,reqwest=warn,rustls=warn")
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_target(true)
                .with_ansi(false),
        )
        .init();

    tracing::info!(dir = %log_dir.display(), "logging initialized");
    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::Overlay;
    use crate::test_helpers::test_app;
    use pinelab_core::GeneratedOutput;

    fn done(code: &str) -> WorkerResponse {
        WorkerResponse::GenerateDone {
            output: Box::new(GeneratedOutput {
                code: code.into(),
                explanation: "because".into(),
                key_features: vec!["a".into()],
            }),
        }
    }

    #[test]
    fn success_clears_loading_and_replaces_output() {
        let (mut app, _cmd_rx, _resp_tx) = test_app();
        app.overlay = Overlay::None;
        app.request_generate();
        assert!(app.loading);

        handle_worker_response(&mut app, done("//@version=5\nplot(close)"));
        assert!(!app.loading);
        assert!(app.error_message.is_none());
        let out = app.output.output.as_ref().unwrap();
        assert!(out.code.starts_with("//@version=5"));

        // A second completed call replaces the result wholesale.
        handle_worker_response(&mut app, done("//other"));
        assert_eq!(app.output.output.as_ref().unwrap().code, "//other");
    }

    #[test]
    fn credential_failure_opens_the_key_affordance() {
        let (mut app, _cmd_rx, _resp_tx) = test_app();
        app.overlay = Overlay::None;
        app.credential_configured = true;
        app.loading = true;

        handle_worker_response(
            &mut app,
            WorkerResponse::GenerateFailed {
                kind: FailureKind::CredentialInvalid,
                message: "Requested entity was not found.".into(),
            },
        );

        assert!(!app.loading);
        assert!(!app.credential_configured);
        assert_eq!(app.error_message.as_deref(), Some(BAD_KEY_MESSAGE));

        // The selector request surfaces as the overlay on the next tick.
        app.tick();
        assert_eq!(app.overlay, Overlay::ApiKey);
    }

    #[test]
    fn other_failures_surface_the_raw_message() {
        let (mut app, _cmd_rx, _resp_tx) = test_app();
        app.overlay = Overlay::None;
        app.loading = true;

        handle_worker_response(
            &mut app,
            WorkerResponse::GenerateFailed {
                kind: FailureKind::Endpoint,
                message: "model is overloaded".into(),
            },
        );

        assert!(!app.loading);
        assert_eq!(app.error_message.as_deref(), Some("model is overloaded"));
        app.tick();
        assert_eq!(app.overlay, Overlay::None);
        assert_eq!(app.error_history.len(), 1);
    }
}
