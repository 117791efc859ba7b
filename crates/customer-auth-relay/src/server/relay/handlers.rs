//! Login relay endpoint handlers.
//!
//! - `GET /customer-auth/start`: create a session, redirect to the provider
//! - `GET /customer-auth/callback`: validate state, exchange the code, redirect to the app
//! - `GET /customer-auth/result`: poll for the exchanged token

use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use url::Url;

use crate::config::{Config, provider};
use crate::error::{RelayError, RelayResult};
use crate::server::transport::HttpState;

// ─── Start ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct StartQuery {
    pub store: Option<String>,
    pub redirect_uri: Option<String>,
}

/// `GET /customer-auth/start`
///
/// Create a session and send the browser to the provider login page.
pub async fn handle_start(
    State(state): State<Arc<HttpState>>,
    Query(query): Query<StartQuery>,
) -> RelayResult<Response> {
    let store = resolve_store(query.store.as_deref(), state.config.default_store.as_deref());
    let redirect_uri = query.redirect_uri.unwrap_or_default();

    if store.is_empty() || redirect_uri.is_empty() {
        return Err(RelayError::bad_request("Missing store or redirect_uri"));
    }

    let session = state.sessions.create(&redirect_uri).await?;
    let authorize_url =
        build_authorize_url(&state.config, &store, &session.session_id, &session.state)?;

    tracing::info!(
        session = short_id(&session.session_id),
        store = %store,
        "Started customer login"
    );

    Ok(found(authorize_url.as_str()))
}

/// Pick the requested store, falling back to the configured default.
fn resolve_store(requested: Option<&str>, default: Option<&str>) -> String {
    requested
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .or(default)
        .unwrap_or_default()
        .trim()
        .to_string()
}

/// Build the provider authorize URL for a session.
pub fn build_authorize_url(
    config: &Config,
    store: &str,
    session_id: &str,
    oauth_state: &str,
) -> RelayResult<Url> {
    let mut url = Url::parse(&config.authorize_url)
        .map_err(|e| RelayError::internal(format!("invalid authorize URL: {e}")))?;

    url.query_pairs_mut()
        .append_pair("client_id", &config.client_id)
        .append_pair("scope", provider::SCOPE)
        .append_pair("response_type", "code")
        .append_pair("state", oauth_state)
        .append_pair("store", store)
        .append_pair("redirect_uri", &config.callback_url(session_id));

    Ok(url)
}

// ─── Callback ────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub session: String,
}

/// `GET /customer-auth/callback`
///
/// Provider redirect target. Exchanges the code and hands control back to
/// the app via its deep link.
pub async fn handle_callback(
    State(state): State<Arc<HttpState>>,
    Query(query): Query<CallbackQuery>,
) -> RelayResult<Response> {
    let Some(app_redirect) = state.sessions.consume_state(&query.session, &query.state).await
    else {
        tracing::warn!(session = short_id(&query.session), "Rejected callback");
        return Err(RelayError::InvalidSession);
    };

    let callback_url = state.config.callback_url(&query.session);
    let access_token = match state.client.exchange_code(&query.code, &callback_url).await {
        Ok(token) => token,
        Err(e) => {
            tracing::warn!(
                session = short_id(&query.session),
                status = ?e.status(),
                "Token exchange failed"
            );
            return Err(e.into());
        }
    };

    if !state.sessions.attach_token(&query.session, access_token).await {
        tracing::warn!(session = short_id(&query.session), "Session expired during token exchange");
        return Err(RelayError::InvalidSession);
    }

    tracing::info!(session = short_id(&query.session), "Customer login completed");

    Ok(found(&app_redirect_url(&app_redirect, &query.session)))
}

/// Append the session id to the app deep link.
fn app_redirect_url(redirect_uri: &str, session_id: &str) -> String {
    let sep = if redirect_uri.contains('?') { '&' } else { '?' };
    format!("{redirect_uri}{sep}session={session_id}")
}

// ─── Result ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ResultQuery {
    #[serde(default)]
    pub session: String,
}

/// `GET /customer-auth/result`
///
/// Poll for the exchanged token. Unknown sessions report `pending`.
pub async fn handle_result(
    State(state): State<Arc<HttpState>>,
    Query(query): Query<ResultQuery>,
) -> Response {
    let status = state.sessions.status(&query.session).await;

    let mut response = Json(status).into_response();
    let headers = response.headers_mut();
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    headers.insert(header::PRAGMA, HeaderValue::from_static("no-cache"));
    response
}

fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_owned())]).into_response()
}

/// Session id prefix safe to log.
fn short_id(session_id: &str) -> &str {
    session_id.get(..8).unwrap_or(session_id)
}
