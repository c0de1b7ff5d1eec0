//! Session store and authentication gate.
//!
//! Sessions are opaque random tokens mapped to an expiry time. The
//! [`SessionStore`] trait unifies the backends behind `issue` / `validate` /
//! `revoke`; two implementations are provided:
//!
//! - [`MemorySessionStore`] - in-process map, lost on restart
//! - [`FileSessionStore`] - JSON-file persisted map, survives restarts
//!
//! [`AuthGate`] sits on top of a store and holds the configured admin
//! secret. A token that is unknown or expired is simply "not authorized",
//! never an error.
//!
//! Session state machine: unauthenticated -> (login success) ->
//! authenticated -> (logout | expiry) -> gone. No intermediate states.

pub mod file;
pub mod memory;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use subtle::ConstantTimeEq;
use thiserror::Error;
use tracing::debug;

pub use file::FileSessionStore;
pub use memory::MemorySessionStore;

// =============================================================================
// Errors
// =============================================================================

/// Errors from login and session persistence.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    /// The submitted password does not match the configured secret
    #[error("Invalid password")]
    InvalidCredential,

    /// The session backing store could not be written
    #[error("Session storage error: {0}")]
    Storage(String),
}

// =============================================================================
// SessionStore Trait
// =============================================================================

/// Abstraction over the session backing store.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Record a new authenticated session for `token`, expiring after `ttl`.
    async fn issue(&self, token: &str, ttl: Duration) -> Result<(), AuthError>;

    /// Whether `token` maps to a live authenticated session.
    ///
    /// Never errors: unknown and expired tokens are `false`.
    async fn validate(&self, token: &str) -> bool;

    /// Destroy the session if present; no-op otherwise.
    async fn revoke(&self, token: &str);
}

/// Generate an opaque session token: 32 random bytes, hex-encoded.
pub fn new_session_token() -> String {
    hex::encode(rand::random::<[u8; 32]>())
}

/// Current time as Unix epoch seconds.
pub(crate) fn epoch_now() -> i64 {
    chrono::Utc::now().timestamp()
}

// =============================================================================
// AuthGate
// =============================================================================

/// Validates credentials and gates requests on session tokens.
#[derive(Clone)]
pub struct AuthGate {
    secret: Arc<str>,
    store: Arc<dyn SessionStore>,
    session_ttl: Duration,
}

impl AuthGate {
    /// Create a gate over the given session store.
    pub fn new(secret: impl AsRef<str>, store: Arc<dyn SessionStore>, session_ttl: Duration) -> Self {
        Self {
            secret: Arc::from(secret.as_ref()),
            store,
            session_ttl,
        }
    }

    /// Validate `password` against the configured secret and issue a session.
    ///
    /// The comparison is constant-time. Returns the new session token.
    pub async fn login(&self, password: &str) -> Result<String, AuthError> {
        let matches: bool = password
            .as_bytes()
            .ct_eq(self.secret.as_bytes())
            .into();
        if !matches {
            return Err(AuthError::InvalidCredential);
        }

        let token = new_session_token();
        self.store.issue(&token, self.session_ttl).await?;
        debug!("issued session");
        Ok(token)
    }

    /// Destroy the session for `token`; no-op for unknown tokens.
    pub async fn logout(&self, token: &str) {
        self.store.revoke(token).await;
    }

    /// Whether `token` maps to a live authenticated session.
    pub async fn authorize(&self, token: &str) -> bool {
        if token.is_empty() {
            return false;
        }
        self.store.validate(token).await
    }
}

// =============================================================================
// Tests
// =============================================================================
