//! Application state — single-owner, main-thread only.
//!
//! All UI state lives here. The worker thread (which owns the generation
//! client and the blocking HTTP call) communicates via `mpsc` channels, so
//! at most one `GeneratedOutput` assignment happens per completed call.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, Sender};
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::NaiveDateTime;

use pinelab_core::{
    CredentialProvider, CredentialSelector, GeneratedOutput, SharedCredential, StrategyConfig,
};

use crate::clipboard::Clipboard;
use crate::worker::{FailureKind, WorkerCommand, WorkerResponse};

/// How long the "copied" indicator stays on after a copy action.
pub const COPIED_RESET: Duration = Duration::from_millis(2000);

/// Rows of the strategy form, top to bottom.
pub const FORM_ROWS: usize = 5;
pub const ROW_TIMEFRAME: usize = 0;
pub const ROW_RISK_RATIO: usize = 1;
pub const ROW_SMC: usize = 2;
pub const ROW_RSI: usize = 3;
pub const ROW_VOLATILITY: usize = 4;

pub const RISK_RATIO_MIN: f64 = 0.5;
pub const RISK_RATIO_MAX: f64 = 10.0;
pub const RISK_RATIO_STEP: f64 = 0.5;

/// Status message severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warning,
    Error,
}

/// An error record for the error history overlay.
#[derive(Debug, Clone)]
pub struct ErrorRecord {
    pub timestamp: NaiveDateTime,
    pub category: ErrorCategory,
    pub message: String,
}

/// Error category for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Credential,
    Network,
    Endpoint,
    Schema,
    Other,
}

impl ErrorCategory {
    pub fn label(self) -> &'static str {
        match self {
            ErrorCategory::Credential => "KEY",
            ErrorCategory::Network => "NET",
            ErrorCategory::Endpoint => "API",
            ErrorCategory::Schema => "JSON",
            ErrorCategory::Other => "ERR",
        }
    }
}

impl From<FailureKind> for ErrorCategory {
    fn from(kind: FailureKind) -> Self {
        match kind {
            FailureKind::CredentialMissing | FailureKind::CredentialInvalid => {
                ErrorCategory::Credential
            }
            FailureKind::Network => ErrorCategory::Network,
            FailureKind::EmptyResponse | FailureKind::Endpoint => ErrorCategory::Endpoint,
            FailureKind::Schema => ErrorCategory::Schema,
        }
    }
}

/// Strategy form state — cursor plus the live configuration.
#[derive(Debug)]
pub struct FormState {
    pub config: StrategyConfig,
    pub cursor: usize,
}

impl FormState {
    pub fn new() -> Self {
        Self {
            config: StrategyConfig::default(),
            cursor: 0,
        }
    }

    pub fn cursor_down(&mut self) {
        self.cursor = (self.cursor + 1) % FORM_ROWS;
    }

    pub fn cursor_up(&mut self) {
        self.cursor = (self.cursor + FORM_ROWS - 1) % FORM_ROWS;
    }

    /// Adjust the row under the cursor. `dir` is -1 (left) or +1 (right);
    /// toggles flip regardless of direction.
    pub fn adjust(&mut self, dir: i64) {
        match self.cursor {
            ROW_TIMEFRAME => {
                self.config.timeframe = if dir >= 0 {
                    self.config.timeframe.next()
                } else {
                    self.config.timeframe.prev()
                };
            }
            ROW_RISK_RATIO => {
                let next = self.config.risk_ratio + dir as f64 * RISK_RATIO_STEP;
                self.config.risk_ratio = next.clamp(RISK_RATIO_MIN, RISK_RATIO_MAX);
            }
            ROW_SMC => self.config.use_smc = !self.config.use_smc,
            ROW_RSI => self.config.use_rsi = !self.config.use_rsi,
            ROW_VOLATILITY => self.config.volatility_filter = !self.config.volatility_filter,
            _ => {}
        }
    }

    /// Toggle the row under the cursor (Space). Only meaningful for the
    /// module rows.
    pub fn toggle(&mut self) {
        match self.cursor {
            ROW_SMC => self.config.use_smc = !self.config.use_smc,
            ROW_RSI => self.config.use_rsi = !self.config.use_rsi,
            ROW_VOLATILITY => self.config.volatility_filter = !self.config.volatility_filter,
            _ => {}
        }
    }
}

/// Output view state — the current result document plus scroll/copy state.
pub struct OutputState {
    pub output: Option<GeneratedOutput>,
    pub scroll: usize,
    pub copied_at: Option<Instant>,
}

impl OutputState {
    pub fn new() -> Self {
        Self {
            output: None,
            scroll: 0,
            copied_at: None,
        }
    }

    /// Whether the transient "copied" indicator is still showing.
    pub fn copied_visible(&self, now: Instant) -> bool {
        matches!(self.copied_at, Some(at) if now.duration_since(at) < COPIED_RESET)
    }
}

/// Which overlay (if any) is shown on top.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    None,
    Welcome,
    Help,
    ApiKey,
    ErrorHistory,
}

/// Key-selection affordance backed by the API-key overlay: `open_selector`
/// requests the overlay via a flag the event loop drains each tick.
pub struct OverlaySelector {
    credential: SharedCredential,
    open_requested: Arc<AtomicBool>,
}

impl OverlaySelector {
    pub fn new(credential: SharedCredential, open_requested: Arc<AtomicBool>) -> Self {
        Self {
            credential,
            open_requested,
        }
    }
}

impl CredentialSelector for OverlaySelector {
    fn has_credential(&self) -> bool {
        self.credential.is_usable()
    }

    fn open_selector(&self) {
        self.open_requested.store(true, Ordering::Relaxed);
    }
}

/// Top-level application state.
pub struct AppState {
    pub running: bool,

    pub form: FormState,
    pub output: OutputState,
    pub loading: bool,
    pub error_message: Option<String>,

    // Credential plumbing
    pub credential: SharedCredential,
    pub credential_configured: bool,
    pub selector: Box<dyn CredentialSelector>,
    pub selector_open_requested: Arc<AtomicBool>,
    pub key_input: String,

    // Worker communication
    pub worker_tx: Sender<WorkerCommand>,
    pub worker_rx: Receiver<WorkerResponse>,

    // Cross-cutting
    pub clipboard: Box<dyn Clipboard>,
    pub status_message: Option<(String, StatusLevel)>,
    pub error_history: VecDeque<ErrorRecord>,
    pub error_scroll: usize,
    pub overlay: Overlay,
}

impl AppState {
    pub fn new(
        worker_tx: Sender<WorkerCommand>,
        worker_rx: Receiver<WorkerResponse>,
        credential: SharedCredential,
        clipboard: Box<dyn Clipboard>,
    ) -> Self {
        let selector_open_requested = Arc::new(AtomicBool::new(false));
        let selector = Box::new(OverlaySelector::new(
            credential.clone(),
            selector_open_requested.clone(),
        ));
        let credential_configured = selector.has_credential();

        Self {
            running: true,
            form: FormState::new(),
            output: OutputState::new(),
            loading: false,
            error_message: None,
            credential,
            credential_configured,
            selector,
            selector_open_requested,
            key_input: String::new(),
            worker_tx,
            worker_rx,
            clipboard,
            status_message: None,
            error_history: VecDeque::with_capacity(50),
            error_scroll: 0,
            overlay: Overlay::Welcome,
        }
    }

    /// Kick off a generate action. Rejected while one is already in flight.
    pub fn request_generate(&mut self) {
        if self.loading {
            self.set_warning("Generation already in progress");
            return;
        }
        self.error_message = None;
        let command = WorkerCommand::Generate {
            config: self.form.config.clone(),
        };
        if self.worker_tx.send(command).is_err() {
            // The worker is gone; no response will ever arrive, so don't
            // enter the loading state.
            self.push_error(
                ErrorCategory::Other,
                "Background worker stopped; restart to generate".to_string(),
            );
            return;
        }
        self.loading = true;
        self.set_status("Generating indicator...");
    }

    /// Copy the current script to the clipboard and start the indicator
    /// interval.
    pub fn copy_code(&mut self) {
        let Some(output) = &self.output.output else {
            self.set_warning("Nothing to copy yet");
            return;
        };
        match self.clipboard.set_text(&output.code) {
            Ok(()) => {
                self.output.copied_at = Some(Instant::now());
                self.set_status("Script copied to clipboard");
            }
            Err(e) => {
                self.push_error(ErrorCategory::Other, format!("Clipboard failed: {e}"));
            }
        }
    }

    /// Clear expired transient state. Called once per event-loop tick.
    pub fn tick(&mut self) {
        let now = Instant::now();
        if self.output.copied_at.is_some() && !self.output.copied_visible(now) {
            self.output.copied_at = None;
        }
        if self.selector_open_requested.swap(false, Ordering::Relaxed) {
            self.overlay = Overlay::ApiKey;
        }
    }

    /// Push an error to the history, capping at 50.
    pub fn push_error(&mut self, category: ErrorCategory, message: String) {
        let record = ErrorRecord {
            timestamp: chrono::Local::now().naive_local(),
            category,
            message: message.clone(),
        };
        self.error_history.push_front(record);
        if self.error_history.len() > 50 {
            self.error_history.pop_back();
        }
        self.status_message = Some((message, StatusLevel::Error));
    }

    /// Set an info status message.
    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Info));
    }

    /// Set a warning status message.
    pub fn set_warning(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Warning));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::FakeClipboard;
    use crate::test_helpers::test_app;
    use pinelab_core::Timeframe;

    #[test]
    fn form_cursor_wraps() {
        let mut form = FormState::new();
        for _ in 0..FORM_ROWS {
            form.cursor_down();
        }
        assert_eq!(form.cursor, 0);
        form.cursor_up();
        assert_eq!(form.cursor, FORM_ROWS - 1);
    }

    #[test]
    fn adjust_cycles_timeframe_both_ways() {
        let mut form = FormState::new();
        form.cursor = ROW_TIMEFRAME;
        form.adjust(1);
        assert_eq!(form.config.timeframe, Timeframe::M15);
        form.adjust(-1);
        form.adjust(-1);
        assert_eq!(form.config.timeframe, Timeframe::M1);
    }

    #[test]
    fn risk_ratio_clamps_to_range() {
        let mut form = FormState::new();
        form.cursor = ROW_RISK_RATIO;
        for _ in 0..100 {
            form.adjust(1);
        }
        assert_eq!(form.config.risk_ratio, RISK_RATIO_MAX);
        for _ in 0..100 {
            form.adjust(-1);
        }
        assert_eq!(form.config.risk_ratio, RISK_RATIO_MIN);
    }

    #[test]
    fn toggle_flips_module_rows_only() {
        let mut form = FormState::new();
        form.cursor = ROW_SMC;
        form.toggle();
        assert!(!form.config.use_smc);
        form.cursor = ROW_TIMEFRAME;
        let before = form.config.clone();
        form.toggle();
        assert_eq!(form.config, before);
    }

    #[test]
    fn generate_rejected_while_loading() {
        let (mut app, cmd_rx, _resp_tx) = test_app();
        app.request_generate();
        assert!(app.loading);
        assert!(cmd_rx.try_recv().is_ok());

        // Second action while in flight: no command sent, warning shown.
        app.request_generate();
        assert!(cmd_rx.try_recv().is_err());
        assert!(matches!(
            app.status_message,
            Some((_, StatusLevel::Warning))
        ));
    }

    #[test]
    fn generate_with_dead_worker_does_not_get_stuck_loading() {
        let (mut app, cmd_rx, _resp_tx) = test_app();
        drop(cmd_rx);

        app.request_generate();
        assert!(!app.loading);
        assert_eq!(app.error_history.len(), 1);
        assert!(matches!(app.status_message, Some((_, StatusLevel::Error))));
    }

    #[test]
    fn copy_places_exact_code_on_clipboard() {
        let (mut app, _cmd_rx, _resp_tx) = test_app();
        let clipboard = FakeClipboard::new();
        let contents = clipboard.contents();
        app.clipboard = Box::new(clipboard);
        app.output.output = Some(GeneratedOutput {
            code: "//test".into(),
            explanation: String::new(),
            key_features: vec![],
        });

        app.copy_code();
        assert_eq!(contents.lock().unwrap().as_deref(), Some("//test"));
        assert!(app.output.copied_visible(Instant::now()));
    }

    #[test]
    fn copied_indicator_reverts_after_interval() {
        let mut output = OutputState::new();
        output.copied_at = Some(Instant::now() - Duration::from_millis(2500));
        assert!(!output.copied_visible(Instant::now()));

        output.copied_at = Some(Instant::now());
        assert!(output.copied_visible(Instant::now()));
    }

    #[test]
    fn tick_clears_expired_copied_indicator() {
        let (mut app, _cmd_rx, _resp_tx) = test_app();
        app.output.copied_at = Some(Instant::now() - Duration::from_millis(2500));
        app.tick();
        assert!(app.output.copied_at.is_none());
    }

    #[test]
    fn selector_open_request_surfaces_as_overlay_on_tick() {
        let (mut app, _cmd_rx, _resp_tx) = test_app();
        app.overlay = Overlay::None;
        app.selector.open_selector();
        app.tick();
        assert_eq!(app.overlay, Overlay::ApiKey);
    }

    #[test]
    fn error_history_caps_at_50() {
        let (mut app, _cmd_rx, _resp_tx) = test_app();
        for i in 0..60 {
            app.push_error(ErrorCategory::Other, format!("error {i}"));
        }
        assert_eq!(app.error_history.len(), 50);
        assert!(app.error_history[0].message.contains("59"));
    }
}
