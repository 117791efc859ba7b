//! HTTP transport for the relay.
//!
//! Builds the axum router, shared handler state and health endpoints.

use std::sync::Arc;

use axum::{Json, Router, extract::State, response::IntoResponse, routing::get};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::relay::{SessionStore, handlers};
use crate::client::TokenClient;
use crate::config::{Config, routes};

/// Shared state for HTTP handlers.
pub struct HttpState {
    pub config: Config,
    pub sessions: Arc<SessionStore>,
    pub client: TokenClient,
}

impl HttpState {
    /// Build handler state from configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the token client cannot be built.
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let client = TokenClient::new(&config)?;
        let sessions = Arc::new(SessionStore::new(config.session_ttl, config.max_sessions));
        Ok(Self { config, sessions, client })
    }
}

impl std::fmt::Debug for HttpState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpState")
            .field("config", &self.config)
            .field("sessions", &self.sessions)
            .finish_non_exhaustive()
    }
}

/// Create the HTTP router for the relay.
///
/// Does not start the expired-session sweep; see [`start_cleanup`].
pub fn create_router(state: Arc<HttpState>) -> Router {
    Router::new()
        .route("/", get(health_check))
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        .route(routes::START, get(handlers::handle_start))
        .route(routes::CALLBACK, get(handlers::handle_callback))
        .route(routes::RESULT, get(handlers::handle_result))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// Start the background sweep of expired sessions.
pub fn start_cleanup(state: &HttpState) {
    Arc::clone(&state.sessions).start_cleanup_task(state.config.cleanup_interval);
}

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "customer-auth-relay",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

async fn readiness_check(State(state): State<Arc<HttpState>>) -> impl IntoResponse {
    let session_count = state.sessions.session_count().await;
    Json(serde_json::json!({
        "status": "ok",
        "service": "customer-auth-relay",
        "version": env!("CARGO_PKG_VERSION"),
        "sessions": session_count
    }))
}
