//! Configuration for the customer auth relay.

use std::time::Duration;

/// Identity provider constants.
pub mod provider {
    use std::time::Duration;

    /// Shopify customer accounts authorize endpoint.
    pub const AUTHORIZE_URL: &str = "https://accounts.shopify.com/oauth/authorize";

    /// Shopify customer accounts token endpoint.
    pub const TOKEN_URL: &str = "https://accounts.shopify.com/oauth/token";

    /// Scope requested on every login.
    pub const SCOPE: &str = "openid email";

    /// Token exchange timeout.
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

    /// Connection timeout.
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
}

/// Session store limits.
pub mod sessions {
    use std::time::Duration;

    /// Session lifetime (10 minutes).
    pub const TTL: Duration = Duration::from_secs(600);

    /// Maximum number of live sessions.
    pub const MAX_SESSIONS: usize = 10_000;

    /// Cleanup interval for expired sessions.
    pub const CLEANUP_INTERVAL: Duration = Duration::from_secs(60);
}

/// Route paths served by the relay.
pub mod routes {
    pub const START: &str = "/customer-auth/start";
    pub const CALLBACK: &str = "/customer-auth/callback";
    pub const RESULT: &str = "/customer-auth/result";
}

/// Default listen port.
pub const DEFAULT_PORT: u16 = 3000;

/// Relay configuration.
#[derive(Clone)]
pub struct Config {
    /// Fallback store (shop domain) when the start request names none.
    pub default_store: Option<String>,

    /// OAuth client identifier.
    pub client_id: String,

    /// OAuth client secret.
    pub client_secret: String,

    /// Externally reachable base URL, without trailing slash.
    pub backend_base: String,

    /// Listen port.
    pub port: u16,

    /// Provider authorize endpoint.
    pub authorize_url: String,

    /// Provider token endpoint.
    pub token_url: String,

    /// Token exchange timeout.
    pub request_timeout: Duration,

    /// Connection timeout.
    pub connect_timeout: Duration,

    /// Session lifetime.
    pub session_ttl: Duration,

    /// Maximum number of live sessions.
    pub max_sessions: usize,

    /// Interval between expired-session sweeps.
    pub cleanup_interval: Duration,
}

impl Config {
    /// Create a configuration pointing at the Shopify endpoints.
    ///
    /// When `backend_base` is `None` the relay assumes it is reached on
    /// `http://localhost:<port>`.
    #[must_use]
    pub fn new(
        default_store: Option<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        backend_base: Option<String>,
        port: u16,
    ) -> Self {
        let backend_base = backend_base
            .filter(|b| !b.trim().is_empty())
            .unwrap_or_else(|| format!("http://localhost:{port}"));

        Self {
            default_store: default_store.filter(|s| !s.trim().is_empty()),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            backend_base: normalize_base(&backend_base),
            port,
            authorize_url: provider::AUTHORIZE_URL.to_string(),
            token_url: provider::TOKEN_URL.to_string(),
            request_timeout: provider::REQUEST_TIMEOUT,
            connect_timeout: provider::CONNECT_TIMEOUT,
            session_ttl: sessions::TTL,
            max_sessions: sessions::MAX_SESSIONS,
            cleanup_interval: sessions::CLEANUP_INTERVAL,
        }
    }

    /// Create a test configuration with the provider served by a mock server.
    #[must_use]
    pub fn for_testing(provider_url: &str) -> Self {
        let provider_url = normalize_base(provider_url);
        Self {
            default_store: Some("default.myshopify.com".to_string()),
            client_id: "test-client".to_string(),
            client_secret: "test-secret".to_string(),
            backend_base: "https://relay.example.com".to_string(),
            port: DEFAULT_PORT,
            authorize_url: format!("{provider_url}/oauth/authorize"),
            token_url: format!("{provider_url}/oauth/token"),
            request_timeout: Duration::from_secs(5),
            connect_timeout: Duration::from_secs(2),
            session_ttl: sessions::TTL,
            max_sessions: 100,
            cleanup_interval: sessions::CLEANUP_INTERVAL,
        }
    }

    /// Callback URL handed to the provider for a given session.
    ///
    /// The token exchange must echo this exact string.
    #[must_use]
    pub fn callback_url(&self, session_id: &str) -> String {
        format!("{}{}?session={}", self.backend_base, routes::CALLBACK, session_id)
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("default_store", &self.default_store)
            .field("client_id", &self.client_id)
            .field("backend_base", &self.backend_base)
            .field("port", &self.port)
            .field("authorize_url", &self.authorize_url)
            .field("token_url", &self.token_url)
            .field("session_ttl", &self.session_ttl)
            .field("max_sessions", &self.max_sessions)
            .finish_non_exhaustive()
    }
}

fn normalize_base(base: &str) -> String {
    base.trim().trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_base_defaults_to_localhost() {
        let config = Config::new(None, "id", "secret", None, 4000);
        assert_eq!(config.backend_base, "http://localhost:4000");
    }

    #[test]
    fn test_backend_base_trailing_slash_stripped() {
        let config =
            Config::new(None, "id", "secret", Some("https://relay.example.com/".into()), 3000);
        assert_eq!(config.backend_base, "https://relay.example.com");
        assert_eq!(
            config.callback_url("abc"),
            "https://relay.example.com/customer-auth/callback?session=abc"
        );
    }

    #[test]
    fn test_blank_default_store_is_none() {
        let config = Config::new(Some("   ".into()), "id", "secret", None, 3000);
        assert!(config.default_store.is_none());
    }

    #[test]
    fn test_debug_hides_secret() {
        let config = Config::new(None, "id", "super-secret-value", None, 3000);
        let debug = format!("{config:?}");
        assert!(!debug.contains("super-secret-value"));
        assert!(debug.contains("client_id"));
    }

    #[test]
    fn test_for_testing_points_at_mock() {
        let config = Config::for_testing("http://127.0.0.1:9999/");
        assert_eq!(config.token_url, "http://127.0.0.1:9999/oauth/token");
        assert_eq!(config.authorize_url, "http://127.0.0.1:9999/oauth/authorize");
    }
}
