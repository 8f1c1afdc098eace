//! PineLab Core — strategy configuration, prompt building, and the Gemini
//! generation client.
//!
//! This crate contains everything the front-ends share:
//! - Strategy configuration types (timeframe, risk ratio, module toggles)
//! - The prompt builder that renders a configuration into the model instruction
//! - Credential capabilities (provider + optional hosting-side selector)
//! - The completion transport seam and its blocking Gemini implementation
//! - The generation client with the failure-classification taxonomy

pub mod client;
pub mod config;
pub mod credentials;
pub mod output;
pub mod prompt;
pub mod transport;

pub use client::{GenerateError, GenerationClient};
pub use config::{StrategyConfig, Timeframe};
pub use credentials::{
    CredentialProvider, CredentialSelector, EnvCredential, NoopSelector, SharedCredential,
    StaticCredential, MIN_CREDENTIAL_LEN,
};
pub use output::GeneratedOutput;
pub use prompt::build_prompt;
pub use transport::{CompletionTransport, GeminiTransport, TransportError};
