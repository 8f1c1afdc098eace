//! Shared test fixtures.

use std::sync::mpsc::{self, Receiver, Sender};

use pinelab_core::SharedCredential;

use crate::app::AppState;
use crate::clipboard::FakeClipboard;
use crate::worker::{WorkerCommand, WorkerResponse};

/// An app wired to loose channel ends, a fake clipboard, and an empty
/// credential slot. The returned receiver/sender stand in for the worker.
pub fn test_app() -> (AppState, Receiver<WorkerCommand>, Sender<WorkerResponse>) {
    let (cmd_tx, cmd_rx) = mpsc::channel();
    let (resp_tx, resp_rx) = mpsc::channel();
    let app = AppState::new(
        cmd_tx,
        resp_rx,
        SharedCredential::new(),
        Box::new(FakeClipboard::new()),
    );
    (app, cmd_rx, resp_tx)
}
