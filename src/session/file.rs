//! JSON-file backed session store.
//!
//! Same snapshot discipline as the product store: temp file, fsync, rename,
//! all under the write lock. Sessions survive a server restart.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::sync::RwLock;
use tracing::warn;

use super::{epoch_now, AuthError, SessionStore};

/// Session store persisted as a JSON object of token to expiry time.
pub struct FileSessionStore {
    path: PathBuf,
    sessions: RwLock<HashMap<String, i64>>,
}

impl FileSessionStore {
    /// Open a store at `path`, loading any existing sessions.
    ///
    /// An unreadable or corrupt file starts empty with a warning: losing
    /// sessions only forces a re-login, unlike losing product records.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, AuthError> {
        let path = path.into();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| AuthError::Storage(e.to_string()))?;
            }
        }

        let sessions = match tokio::fs::read(&path).await {
            Ok(bytes) => match serde_json::from_slice(&bytes) {
                Ok(sessions) => sessions,
                Err(e) => {
                    warn!(path = %path.display(), "discarding corrupt session file: {}", e);
                    HashMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => return Err(AuthError::Storage(e.to_string())),
        };

        Ok(Self {
            path,
            sessions: RwLock::new(sessions),
        })
    }

    async fn persist(&self, sessions: &HashMap<String, i64>) -> Result<(), AuthError> {
        let bytes =
            serde_json::to_vec(sessions).map_err(|e| AuthError::Storage(e.to_string()))?;

        let tmp_path = self.path.with_extension("json.tmp");

        let mut file = tokio::fs::File::create(&tmp_path)
            .await
            .map_err(|e| AuthError::Storage(e.to_string()))?;
        file.write_all(&bytes)
            .await
            .map_err(|e| AuthError::Storage(e.to_string()))?;
        file.sync_all()
            .await
            .map_err(|e| AuthError::Storage(e.to_string()))?;

        tokio::fs::rename(&tmp_path, &self.path)
            .await
            .map_err(|e| AuthError::Storage(e.to_string()))
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn issue(&self, token: &str, ttl: Duration) -> Result<(), AuthError> {
        let now = epoch_now();
        let mut sessions = self.sessions.write().await;

        let mut next = sessions.clone();
        next.retain(|_, expires_at| *expires_at > now);
        next.insert(token.to_string(), now + ttl.as_secs() as i64);

        self.persist(&next).await?;
        *sessions = next;
        Ok(())
    }

    async fn validate(&self, token: &str) -> bool {
        match self.sessions.read().await.get(token) {
            Some(expires_at) => *expires_at > epoch_now(),
            None => false,
        }
    }

    async fn revoke(&self, token: &str) {
        let mut sessions = self.sessions.write().await;
        if !sessions.contains_key(token) {
            return;
        }

        let mut next = sessions.clone();
        next.remove(token);

        // Revocation failing to persist is logged, not surfaced: the session
        // is still gone from the running process.
        if let Err(e) = self.persist(&next).await {
            warn!("failed to persist session revocation: {}", e);
        }
        *sessions = next;
    }
}
