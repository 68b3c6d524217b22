//! Opaque bearer token for the marketplace backend.

use std::fmt;

/// Bearer token forwarded to the backend on every request.
///
/// The engine never inspects or validates it. `Debug` is redacted so the
/// token cannot leak into logs.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken(String);

impl AuthToken {
    /// Wraps a raw token. Returns `None` for an empty or blank string.
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    /// Stable, non-reversible key derived from the token (a name-based
    /// UUID). Used to name the session's notification store when the
    /// caller does not supply a key.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        let id = uuid::Uuid::new_v5(&uuid::Uuid::NAMESPACE_OID, self.0.as_bytes());
        format!("token-{}", id.simple())
    }

    /// Returns the raw token for use in an `Authorization` header.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthToken(***)")
    }
}
