//! Generation client — one schema-constrained completion per generate action,
//! with the failure-classification taxonomy.
//!
//! The client never recovers a failure locally: every outcome is surfaced to
//! the caller. Only the two credential conditions are normalized to stable
//! identifiers; everything else carries the original message through
//! unmodified. A diagnostic log entry is emitted on every failure path
//! before propagating.

use thiserror::Error;
use tracing::error;

use crate::config::StrategyConfig;
use crate::credentials::{CredentialProvider, MIN_CREDENTIAL_LEN};
use crate::output::GeneratedOutput;
use crate::prompt::build_prompt;
use crate::transport::{CompletionTransport, GeminiTransport, TransportError};

/// Failure taxonomy for a generate action.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// No usable API key at call time; detected before any network call.
    #[error("no API key configured")]
    CredentialMissing,

    /// The endpoint rejected the API key.
    #[error("API key rejected: {0}")]
    CredentialInvalid(String),

    /// The endpoint answered without any response text.
    #[error("model returned an empty response")]
    EmptyResponse,

    /// Response text present but not parseable as the declared schema.
    #[error("response did not match the expected schema: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("network error: {0}")]
    Network(String),

    /// Any other endpoint-reported error, message carried verbatim.
    #[error("{0}")]
    Api(String),
}

impl GenerateError {
    /// True for the conditions that map to the key-selection recovery
    /// affordance.
    pub fn is_credential(&self) -> bool {
        matches!(
            self,
            GenerateError::CredentialMissing | GenerateError::CredentialInvalid(_)
        )
    }
}

/// Vendor phrasings that all mean "this API key does not exist or is not
/// valid". A new phrasing is a one-line addition here.
const CREDENTIAL_ERROR_MARKERS: &[&str] = &[
    "Requested entity was not found",
    "API key not valid",
    "API_KEY_INVALID",
    "PERMISSION_DENIED",
];

/// Collapse the known credential phrasings into one condition; everything
/// else passes through unclassified.
fn classify_vendor_error(message: String) -> GenerateError {
    if CREDENTIAL_ERROR_MARKERS
        .iter()
        .any(|marker| message.contains(marker))
    {
        GenerateError::CredentialInvalid(message)
    } else {
        GenerateError::Api(message)
    }
}

/// Submits built instructions to a completion transport and converts the raw
/// response into a [`GeneratedOutput`]. The credential is re-read from the
/// provider on every call.
pub struct GenerationClient {
    transport: Box<dyn CompletionTransport>,
    credentials: Box<dyn CredentialProvider>,
}

impl GenerationClient {
    pub fn new(
        transport: Box<dyn CompletionTransport>,
        credentials: Box<dyn CredentialProvider>,
    ) -> Self {
        Self {
            transport,
            credentials,
        }
    }

    /// Client against the real Gemini endpoint with the default model.
    pub fn gemini(credentials: Box<dyn CredentialProvider>) -> Self {
        Self::new(Box::new(GeminiTransport::new()), credentials)
    }

    /// Run one generate action: build the instruction, submit it, parse the
    /// response. Exactly zero or one transport call per invocation.
    pub fn generate(&self, config: &StrategyConfig) -> Result<GeneratedOutput, GenerateError> {
        let credential = match self.credentials.credential() {
            Some(key) if key.len() >= MIN_CREDENTIAL_LEN => key,
            _ => {
                error!("generate aborted: no usable API key configured");
                return Err(GenerateError::CredentialMissing);
            }
        };

        let instruction = build_prompt(config);

        let text = match self.transport.complete(&credential, &instruction) {
            Ok(text) => text,
            Err(TransportError::Network(message)) => {
                error!(%message, "generate failed: network");
                return Err(GenerateError::Network(message));
            }
            Err(TransportError::Api(message)) => {
                let err = classify_vendor_error(message);
                error!(error = %err, "generate failed: endpoint error");
                return Err(err);
            }
        };

        let text = match text {
            Some(text) if !text.trim().is_empty() => text,
            _ => {
                error!("generate failed: empty response text");
                return Err(GenerateError::EmptyResponse);
            }
        };

        match serde_json::from_str::<GeneratedOutput>(&text) {
            Ok(output) => Ok(output),
            Err(e) => {
                error!(error = %e, "generate failed: response did not match schema");
                Err(GenerateError::Parse(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::StaticCredential;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Transport fake: returns a canned result and counts invocations.
    struct FakeTransport {
        calls: Arc<AtomicUsize>,
        response: Result<Option<String>, TransportError>,
    }

    impl FakeTransport {
        fn new(response: Result<Option<String>, TransportError>) -> (Self, Arc<AtomicUsize>) {
            let calls = Arc::new(AtomicUsize::new(0));
            (
                Self {
                    calls: calls.clone(),
                    response,
                },
                calls,
            )
        }
    }

    impl CompletionTransport for FakeTransport {
        fn complete(
            &self,
            _credential: &str,
            _instruction: &str,
        ) -> Result<Option<String>, TransportError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.response.clone()
        }
    }

    fn client_with(
        key: &str,
        response: Result<Option<String>, TransportError>,
    ) -> (GenerationClient, Arc<AtomicUsize>) {
        let (transport, calls) = FakeTransport::new(response);
        let client = GenerationClient::new(
            Box::new(transport),
            Box::new(StaticCredential(key.to_string())),
        );
        (client, calls)
    }

    const GOOD_KEY: &str = "k-0123456789abcdef";
    const GOOD_JSON: &str = r#"{"code":"x","explanation":"y","keyFeatures":["a","b"]}"#;

    #[test]
    fn short_credential_fails_without_transport_call() {
        let (client, calls) = client_with("too-short", Ok(Some(GOOD_JSON.into())));
        let err = client.generate(&StrategyConfig::default()).unwrap_err();
        assert!(matches!(err, GenerateError::CredentialMissing));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn nine_char_credential_is_still_missing() {
        let (client, calls) = client_with("123456789", Ok(Some(GOOD_JSON.into())));
        assert!(matches!(
            client.generate(&StrategyConfig::default()),
            Err(GenerateError::CredentialMissing)
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn ten_char_credential_reaches_the_transport() {
        let (client, calls) = client_with("1234567890", Ok(Some(GOOD_JSON.into())));
        assert!(client.generate(&StrategyConfig::default()).is_ok());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn absent_response_text_is_empty_response() {
        let (client, _) = client_with(GOOD_KEY, Ok(None));
        assert!(matches!(
            client.generate(&StrategyConfig::default()),
            Err(GenerateError::EmptyResponse)
        ));
    }

    #[test]
    fn whitespace_only_response_text_is_empty_response() {
        let (client, _) = client_with(GOOD_KEY, Ok(Some("   \n".into())));
        assert!(matches!(
            client.generate(&StrategyConfig::default()),
            Err(GenerateError::EmptyResponse)
        ));
    }

    #[test]
    fn valid_schema_json_round_trips_exactly() {
        let (client, _) = client_with(GOOD_KEY, Ok(Some(GOOD_JSON.into())));
        let out = client.generate(&StrategyConfig::default()).unwrap();
        assert_eq!(out.code, "x");
        assert_eq!(out.explanation, "y");
        assert_eq!(out.key_features, vec!["a", "b"]);
    }

    #[test]
    fn unparseable_response_propagates_as_parse_error() {
        let (client, _) = client_with(GOOD_KEY, Ok(Some("not json at all".into())));
        assert!(matches!(
            client.generate(&StrategyConfig::default()),
            Err(GenerateError::Parse(_))
        ));
    }

    #[test]
    fn not_found_phrasing_classifies_as_credential_invalid() {
        let message = "Error 404: Requested entity was not found. Please verify.";
        let (client, _) = client_with(GOOD_KEY, Err(TransportError::Api(message.into())));
        match client.generate(&StrategyConfig::default()) {
            Err(GenerateError::CredentialInvalid(m)) => assert_eq!(m, message),
            other => panic!("expected CredentialInvalid, got {other:?}"),
        }
    }

    #[test]
    fn each_known_marker_classifies_as_credential_invalid() {
        for marker in CREDENTIAL_ERROR_MARKERS {
            let err = classify_vendor_error(format!("prefix {marker} suffix"));
            assert!(
                matches!(err, GenerateError::CredentialInvalid(_)),
                "marker {marker:?} did not classify"
            );
        }
    }

    #[test]
    fn unknown_endpoint_error_passes_through_verbatim() {
        let message = "model is overloaded, try again later";
        let (client, _) = client_with(GOOD_KEY, Err(TransportError::Api(message.into())));
        match client.generate(&StrategyConfig::default()) {
            Err(GenerateError::Api(m)) => assert_eq!(m, message),
            other => panic!("expected Api, got {other:?}"),
        }
    }

    #[test]
    fn network_error_passes_through() {
        let (client, _) = client_with(GOOD_KEY, Err(TransportError::Network("refused".into())));
        match client.generate(&StrategyConfig::default()) {
            Err(GenerateError::Network(m)) => assert_eq!(m, "refused"),
            other => panic!("expected Network, got {other:?}"),
        }
    }

    #[test]
    fn credential_conditions_flag_the_recovery_affordance() {
        assert!(GenerateError::CredentialMissing.is_credential());
        assert!(GenerateError::CredentialInvalid("x".into()).is_credential());
        assert!(!GenerateError::EmptyResponse.is_credential());
        assert!(!GenerateError::Api("x".into()).is_credential());
        assert!(!GenerateError::Network("x".into()).is_credential());
    }
}
