//! Session types for the login relay.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A login attempt in flight.
pub struct Session {
    pub state: String,
    pub redirect_uri: String,
    pub created_at: DateTime<Utc>,
    pub token: Option<String>,
    pub token_at: Option<DateTime<Utc>>,
    /// Set once a callback has matched the state token.
    pub state_consumed: bool,
}

impl Session {
    pub fn new(state: String, redirect_uri: String) -> Self {
        Self {
            state,
            redirect_uri,
            created_at: Utc::now(),
            token: None,
            token_at: None,
            state_consumed: false,
        }
    }

    /// Check if the session has outlived `ttl`.
    ///
    /// Open sessions age from creation, completed ones from when the token
    /// was attached.
    pub fn is_expired(&self, ttl: Duration) -> bool {
        let since = self.token_at.unwrap_or(self.created_at);
        (Utc::now() - since).to_std().is_ok_and(|age| age > ttl)
    }

    /// A session is completed once a token is attached.
    pub const fn is_completed(&self) -> bool {
        self.token.is_some()
    }
}

/// Poll result for `GET /customer-auth/result`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum SessionStatus {
    Pending,
    Ok { token: String },
}

/// Identifiers handed out when a session is created.
#[derive(Debug, Clone)]
pub struct NewSession {
    pub session_id: String,
    pub state: String,
}
