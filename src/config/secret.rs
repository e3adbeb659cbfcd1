//! API key handling.
//!
//! # Security
//! - The key is loaded once from the environment at startup and injected
//! - Keys are never logged or serialized

use std::fmt;

/// Default environment variable holding the Gemini API key.
pub const API_KEY_ENV_VAR: &str = "GEMINI_API_KEY";

/// Secret credential for the upstream API.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Wrap a key. Empty or whitespace-only values are treated as absent.
    pub fn new(key: impl Into<String>) -> Option<Self> {
        let key = key.into();
        if key.trim().is_empty() {
            None
        } else {
            Some(Self(key))
        }
    }

    /// Read the key from the named environment variable.
    pub fn from_env_var(name: &str) -> Option<Self> {
        std::env::var(name).ok().and_then(Self::new)
    }

    /// The raw key, for placing on the outbound request only.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(****)")
    }
}
