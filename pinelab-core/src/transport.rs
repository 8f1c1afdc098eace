//! Completion transport — wire types and the blocking Gemini implementation.
//!
//! The [`CompletionTransport`] trait abstracts over the completion endpoint
//! so the generation client can be exercised with fakes in tests. The real
//! implementation posts to the Gemini `generateContent` endpoint with a
//! declared response schema, forcing the model to emit JSON matching
//! `{code, explanation, keyFeatures}`.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Default model the generate action targets.
pub const DEFAULT_MODEL: &str = "gemini-3-pro-preview";

const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Errors a transport can surface. Endpoint-reported messages are carried
/// verbatim so the client can classify them against known vendor phrasings.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    #[error("network error: {0}")]
    Network(String),

    #[error("{0}")]
    Api(String),
}

/// Submits an instruction to a completion endpoint and returns the raw
/// response text. `None` means the endpoint answered without any text part.
pub trait CompletionTransport: Send + Sync {
    fn complete(&self, credential: &str, instruction: &str)
        -> Result<Option<String>, TransportError>;
}

// ---------------------------------------------------------------------------
// Request wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    role: &'static str,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
    response_schema: SchemaNode,
}

/// Subset of the Gemini schema language we declare: objects, strings, and
/// string arrays.
#[derive(Debug, Serialize)]
pub struct SchemaNode {
    #[serde(rename = "type")]
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<std::collections::BTreeMap<&'static str, SchemaNode>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<SchemaNode>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<Vec<&'static str>>,
}

impl SchemaNode {
    fn string() -> Self {
        SchemaNode {
            kind: "STRING",
            properties: None,
            items: None,
            required: None,
        }
    }

    fn string_array() -> Self {
        SchemaNode {
            kind: "ARRAY",
            properties: None,
            items: Some(Box::new(SchemaNode::string())),
            required: None,
        }
    }
}

/// The declared response schema: `{code, explanation, keyFeatures}`, all
/// three fields required.
pub fn output_schema() -> SchemaNode {
    let mut properties = std::collections::BTreeMap::new();
    properties.insert("code", SchemaNode::string());
    properties.insert("explanation", SchemaNode::string());
    properties.insert("keyFeatures", SchemaNode::string_array());
    SchemaNode {
        kind: "OBJECT",
        properties: Some(properties),
        items: None,
        required: Some(vec!["code", "explanation", "keyFeatures"]),
    }
}

// ---------------------------------------------------------------------------
// Response wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    parts: Option<Vec<CandidatePart>>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GenerateContentResponse {
    /// First candidate's first text part. No other envelope fields are read.
    fn first_text(self) -> Option<String> {
        self.candidates?
            .into_iter()
            .next()?
            .content?
            .parts?
            .into_iter()
            .find_map(|part| part.text)
    }
}

/// Error envelope the endpoint returns on non-success statuses.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

// ---------------------------------------------------------------------------
// Blocking HTTP implementation
// ---------------------------------------------------------------------------

/// Blocking Gemini transport. One POST per generate action, no retries; every
/// failure is terminal for that action.
pub struct GeminiTransport {
    client: reqwest::blocking::Client,
    base_url: String,
    model: String,
}

impl GeminiTransport {
    pub fn new() -> Self {
        Self::with_model(DEFAULT_MODEL)
    }

    pub fn with_model(model: impl Into<String>) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("failed to build HTTP client");

        Self {
            client,
            base_url: BASE_URL.to_string(),
            model: model.into(),
        }
    }

    fn request_body(instruction: &str) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![Part {
                    text: instruction.to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                response_schema: output_schema(),
            },
        }
    }

    // The credential travels in the x-goog-api-key header, never in the
    // URL: transport errors stringify the URL, and those messages end up
    // in the UI error slot and the log file.
    fn endpoint_url(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

impl Default for GeminiTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl CompletionTransport for GeminiTransport {
    fn complete(
        &self,
        credential: &str,
        instruction: &str,
    ) -> Result<Option<String>, TransportError> {
        let url = self.endpoint_url();
        let body = Self::request_body(instruction);

        let resp = self
            .client
            .post(&url)
            .header("x-goog-api-key", credential)
            .json(&body)
            .send()
            .map_err(|e| TransportError::Network(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp
                .text()
                .map_err(|e| TransportError::Network(e.to_string()))?;
            // The endpoint wraps errors in {"error": {"message": ...}}; fall
            // back to the raw body when the envelope does not parse.
            let message = serde_json::from_str::<ErrorEnvelope>(&text)
                .map(|env| env.error.message)
                .unwrap_or_else(|_| format!("HTTP {status}: {text}"));
            return Err(TransportError::Api(message));
        }

        let envelope: GenerateContentResponse = resp
            .json()
            .map_err(|e| TransportError::Api(format!("unexpected response shape: {e}")))?;

        Ok(envelope.first_text())
    }
}
