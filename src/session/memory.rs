//! In-process session store.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{epoch_now, AuthError, SessionStore};

/// Session store backed by an in-process map of token to expiry time.
///
/// Expired entries are dropped lazily when a later mutation runs.
#[derive(Default)]
pub struct MemorySessionStore {
    sessions: RwLock<HashMap<String, i64>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn issue(&self, token: &str, ttl: Duration) -> Result<(), AuthError> {
        let now = epoch_now();
        let mut sessions = self.sessions.write().await;
        sessions.retain(|_, expires_at| *expires_at > now);
        sessions.insert(token.to_string(), now + ttl.as_secs() as i64);
        Ok(())
    }

    async fn validate(&self, token: &str) -> bool {
        match self.sessions.read().await.get(token) {
            Some(expires_at) => *expires_at > epoch_now(),
            None => false,
        }
    }

    async fn revoke(&self, token: &str) {
        self.sessions.write().await.remove(token);
    }
}
