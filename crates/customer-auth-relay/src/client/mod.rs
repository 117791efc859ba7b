//! Shopify customer accounts token client.
//!
//! Exchanges an authorization code for an access token. Codes are single
//! use, so failed exchanges are never retried.

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::{ClientError, ClientResult};

/// Authorization-code grant request body.
#[derive(Serialize)]
struct TokenRequest<'a> {
    grant_type: &'static str,
    code: &'a str,
    client_id: &'a str,
    client_secret: &'a str,
    redirect_uri: &'a str,
}

/// Token endpoint response. Only the access token is relayed.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
}

/// Client for the provider token endpoint.
#[derive(Clone)]
pub struct TokenClient {
    client: Client,
    token_url: String,
    client_id: String,
    client_secret: String,
}

impl TokenClient {
    /// Create a new client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails.
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .build()?;

        Ok(Self {
            client,
            token_url: config.token_url.clone(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
        })
    }

    /// Exchange an authorization code for an access token.
    ///
    /// `redirect_uri` must be the exact callback URL sent to the authorize
    /// endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Rejected`] with the upstream body on a
    /// non-success status, and [`ClientError::MalformedResponse`] when the
    /// body carries no access token.
    pub async fn exchange_code(&self, code: &str, redirect_uri: &str) -> ClientResult<String> {
        let body = TokenRequest {
            grant_type: "authorization_code",
            code,
            client_id: &self.client_id,
            client_secret: &self.client_secret,
            redirect_uri,
        };

        let response = self.client.post(&self.token_url).json(&body).send().await?;
        let response = Self::handle_response(response).await?;

        let text = response.text().await?;
        let parsed: TokenResponse = serde_json::from_str(&text)
            .map_err(|e| ClientError::MalformedResponse(e.to_string()))?;

        parsed
            .access_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ClientError::MalformedResponse("missing access_token".to_string()))
    }

    /// Turn a non-success status into a [`ClientError::Rejected`].
    async fn handle_response(response: reqwest::Response) -> ClientResult<reqwest::Response> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await?;
        Err(ClientError::rejected(status.as_u16(), text))
    }
}

impl std::fmt::Debug for TokenClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenClient")
            .field("token_url", &self.token_url)
            .field("client_id", &self.client_id)
            .finish_non_exhaustive()
    }
}
