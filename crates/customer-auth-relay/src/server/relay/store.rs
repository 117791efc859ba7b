//! In-memory session store with expiry and a capacity cap.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::RwLock;

use super::token;
use super::types::{NewSession, Session, SessionStatus};
use crate::error::{RelayError, RelayResult};

/// In-memory login session store.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<String, Session>>>,
    ttl: Duration,
    max_sessions: usize,
}

impl SessionStore {
    #[must_use]
    pub fn new(ttl: Duration, max_sessions: usize) -> Self {
        Self { sessions: Arc::new(RwLock::new(HashMap::new())), ttl, max_sessions }
    }

    /// Create a session for a login attempt returning to `redirect_uri`.
    ///
    /// When the store is full, expired sessions are evicted first.
    pub async fn create(&self, redirect_uri: &str) -> RelayResult<NewSession> {
        let mut sessions = self.sessions.write().await;

        if sessions.len() >= self.max_sessions {
            let ttl = self.ttl;
            sessions.retain(|_, s| !s.is_expired(ttl));
            if sessions.len() >= self.max_sessions {
                tracing::warn!(count = sessions.len(), "Session store full");
                return Err(RelayError::CapacityExhausted);
            }
        }

        let mut session_id = token::session_id();
        while sessions.contains_key(&session_id) {
            session_id = token::session_id();
        }
        let state = token::state_token();

        sessions.insert(session_id.clone(), Session::new(state.clone(), redirect_uri.to_owned()));

        Ok(NewSession { session_id, state })
    }

    /// Match and consume the state token for a session (one-time use).
    ///
    /// Returns the client redirect URI if the session is live, the state
    /// matches and it has not been consumed before.
    pub async fn consume_state(&self, session_id: &str, state: &str) -> Option<String> {
        let mut sessions = self.sessions.write().await;
        let session = sessions.get_mut(session_id)?;

        if session.state_consumed || session.is_expired(self.ttl) || session.state != state {
            return None;
        }

        session.state_consumed = true;
        Some(session.redirect_uri.clone())
    }

    /// Attach the exchanged access token. A token is only ever set once.
    ///
    /// Returns false if the session is gone, expired or already completed.
    pub async fn attach_token(&self, session_id: &str, access_token: String) -> bool {
        let mut sessions = self.sessions.write().await;
        let Some(session) = sessions.get_mut(session_id) else {
            return false;
        };
        if session.is_completed() || session.is_expired(self.ttl) {
            return false;
        }

        let now = Utc::now();
        tracing::debug!(
            created_at = %session.created_at,
            token_at = %now,
            "Attached token to session"
        );
        session.token = Some(access_token);
        session.token_at = Some(now);
        true
    }

    /// Poll status for a session. Unknown and expired sessions are pending.
    pub async fn status(&self, session_id: &str) -> SessionStatus {
        let sessions = self.sessions.read().await;
        match sessions.get(session_id) {
            Some(s) if !s.is_expired(self.ttl) => match &s.token {
                Some(token) => SessionStatus::Ok { token: token.clone() },
                None => SessionStatus::Pending,
            },
            _ => SessionStatus::Pending,
        }
    }

    /// Number of sessions currently held, expired ones included until swept.
    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Start background cleanup task for expired sessions.
    pub fn start_cleanup_task(self: Arc<Self>, interval: Duration) {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(interval);
            loop {
                interval.tick().await;
                self.cleanup_expired().await;
            }
        });
    }

    /// Remove expired sessions. Returns how many were removed.
    pub async fn cleanup_expired(&self) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, s| !s.is_expired(self.ttl));
        let removed = before - sessions.len();
        if removed > 0 {
            tracing::debug!(count = removed, "Cleaned up expired sessions");
        }
        removed
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("ttl", &self.ttl)
            .field("max_sessions", &self.max_sessions)
            .finish_non_exhaustive()
    }
}
