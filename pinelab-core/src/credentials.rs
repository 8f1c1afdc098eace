//! Credential capabilities — who supplies the API key, and who can ask the
//! hosting environment to select one.
//!
//! The generation client takes a [`CredentialProvider`] at construction and
//! re-reads it on every call, so a key swapped mid-session takes effect on
//! the next generate action. The optional [`CredentialSelector`] capability
//! models a hosting environment's key-selection affordance; front-ends
//! without one use [`NoopSelector`].

use std::env;
use std::sync::{Arc, RwLock};

/// Environment variable the default provider reads.
pub const CREDENTIAL_ENV_VAR: &str = "GEMINI_API_KEY";

/// Anything shorter than this cannot be a real API key; the client treats it
/// as missing without touching the network.
pub const MIN_CREDENTIAL_LEN: usize = 10;

/// Supplies the current API key. Implementations must return the *current*
/// value on every call rather than a cached snapshot.
pub trait CredentialProvider: Send + Sync {
    fn credential(&self) -> Option<String>;

    /// Whether the current credential is long enough to be worth sending.
    fn is_usable(&self) -> bool {
        matches!(self.credential(), Some(key) if key.len() >= MIN_CREDENTIAL_LEN)
    }
}

/// Reads the key from the process environment at call time.
pub struct EnvCredential;

impl CredentialProvider for EnvCredential {
    fn credential(&self) -> Option<String> {
        env::var(CREDENTIAL_ENV_VAR).ok().filter(|v| !v.is_empty())
    }
}

/// A fixed key, for one-shot CLI invocations and tests.
pub struct StaticCredential(pub String);

impl CredentialProvider for StaticCredential {
    fn credential(&self) -> Option<String> {
        Some(self.0.clone())
    }
}

/// A shared, swappable key for interactive sessions: the key-entry overlay
/// writes it, the worker-side client reads it fresh on every call.
#[derive(Clone, Default)]
pub struct SharedCredential {
    inner: Arc<RwLock<Option<String>>>,
}

impl SharedCredential {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, key: impl Into<String>) {
        *self.inner.write().expect("credential lock poisoned") = Some(key.into());
    }

    pub fn clear(&self) {
        *self.inner.write().expect("credential lock poisoned") = None;
    }
}

impl CredentialProvider for SharedCredential {
    fn credential(&self) -> Option<String> {
        self.inner.read().expect("credential lock poisoned").clone()
    }
}

/// Optional hosting-environment capability: has a key been selected, and can
/// a selection affordance be opened. `open_selector` is fire-and-forget; the
/// caller optimistically treats the key as configured once it resolves.
pub trait CredentialSelector {
    fn has_credential(&self) -> bool;
    fn open_selector(&self);
}

/// Used when the hosting environment offers no key-selection affordance.
pub struct NoopSelector;

impl CredentialSelector for NoopSelector {
    fn has_credential(&self) -> bool {
        false
    }

    fn open_selector(&self) {}
}
