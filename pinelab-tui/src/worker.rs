//! Background worker thread — owns the generation client and the blocking
//! HTTP call so the UI stays responsive while a request is in flight.
//!
//! Communication with the main thread is via `mpsc` channels. Each
//! `Generate` command produces exactly one response, so the main thread
//! performs at most one output assignment per completed call.

use std::sync::mpsc::{Receiver, Sender};
use std::thread::{self, JoinHandle};

use pinelab_core::{
    GenerateError, GeneratedOutput, GenerationClient, SharedCredential, StrategyConfig,
};

/// Commands sent from the UI to the worker.
#[derive(Debug)]
pub enum WorkerCommand {
    Generate { config: StrategyConfig },
    Shutdown,
}

/// Responses sent from the worker back to the UI.
#[derive(Debug, Clone)]
pub enum WorkerResponse {
    GenerateDone {
        output: Box<GeneratedOutput>,
    },
    GenerateFailed {
        kind: FailureKind,
        message: String,
    },
}

/// Channel-friendly mirror of the core failure taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    CredentialMissing,
    CredentialInvalid,
    EmptyResponse,
    Schema,
    Network,
    Endpoint,
}

impl FailureKind {
    /// Conditions that map to the key-entry recovery affordance.
    pub fn is_credential(self) -> bool {
        matches!(
            self,
            FailureKind::CredentialMissing | FailureKind::CredentialInvalid
        )
    }
}

impl From<&GenerateError> for FailureKind {
    fn from(err: &GenerateError) -> Self {
        match err {
            GenerateError::CredentialMissing => FailureKind::CredentialMissing,
            GenerateError::CredentialInvalid(_) => FailureKind::CredentialInvalid,
            GenerateError::EmptyResponse => FailureKind::EmptyResponse,
            GenerateError::Parse(_) => FailureKind::Schema,
            GenerateError::Network(_) => FailureKind::Network,
            GenerateError::Api(_) => FailureKind::Endpoint,
        }
    }
}

/// Spawn the background worker thread. The worker reads the credential fresh
/// from the shared slot on every call.
pub fn spawn_worker(
    rx: Receiver<WorkerCommand>,
    tx: Sender<WorkerResponse>,
    credential: SharedCredential,
) -> JoinHandle<()> {
    thread::Builder::new()
        .name("pinelab-worker".into())
        .spawn(move || {
            let client = GenerationClient::gemini(Box::new(credential));
            worker_loop(rx, tx, &client);
        })
        .expect("failed to spawn worker thread")
}

fn worker_loop(rx: Receiver<WorkerCommand>, tx: Sender<WorkerResponse>, client: &GenerationClient) {
    loop {
        match rx.recv() {
            Ok(WorkerCommand::Shutdown) | Err(_) => break,
            Ok(WorkerCommand::Generate { config }) => {
                let resp = match client.generate(&config) {
                    Ok(output) => WorkerResponse::GenerateDone {
                        output: Box::new(output),
                    },
                    Err(err) => WorkerResponse::GenerateFailed {
                        kind: FailureKind::from(&err),
                        message: err.to_string(),
                    },
                };
                let _ = tx.send(resp);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn worker_shutdown() {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (resp_tx, _resp_rx) = mpsc::channel();

        let handle = spawn_worker(cmd_rx, resp_tx, SharedCredential::new());
        cmd_tx.send(WorkerCommand::Shutdown).unwrap();
        handle.join().expect("worker should join cleanly");
    }

    #[test]
    fn generate_without_key_fails_before_the_network() {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (resp_tx, resp_rx) = mpsc::channel();

        // Empty credential slot: the client short-circuits with the
        // credential-missing condition, so no HTTP request is attempted.
        let handle = spawn_worker(cmd_rx, resp_tx, SharedCredential::new());
        cmd_tx
            .send(WorkerCommand::Generate {
                config: StrategyConfig::default(),
            })
            .unwrap();

        match resp_rx.recv().unwrap() {
            WorkerResponse::GenerateFailed { kind, .. } => {
                assert_eq!(kind, FailureKind::CredentialMissing);
                assert!(kind.is_credential());
            }
            other => panic!("expected GenerateFailed, got {other:?}"),
        }

        cmd_tx.send(WorkerCommand::Shutdown).unwrap();
        handle.join().unwrap();
    }

    #[test]
    fn failure_kind_mirrors_the_taxonomy() {
        assert_eq!(
            FailureKind::from(&GenerateError::CredentialMissing),
            FailureKind::CredentialMissing
        );
        assert_eq!(
            FailureKind::from(&GenerateError::CredentialInvalid("x".into())),
            FailureKind::CredentialInvalid
        );
        assert_eq!(
            FailureKind::from(&GenerateError::EmptyResponse),
            FailureKind::EmptyResponse
        );
        assert_eq!(
            FailureKind::from(&GenerateError::Network("x".into())),
            FailureKind::Network
        );
        assert_eq!(
            FailureKind::from(&GenerateError::Api("x".into())),
            FailureKind::Endpoint
        );
        assert!(!FailureKind::Endpoint.is_credential());
    }
}
