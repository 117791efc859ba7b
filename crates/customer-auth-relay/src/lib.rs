//! Customer Auth Relay
//!
//! A small OAuth 2.0 authorization code relay for Shopify customer accounts.
//! A native app starts the login in a browser, the relay exchanges the code
//! with the provider, and the app polls for the resulting access token by
//! session id.
//!
//! # Example
//!
//! ```no_run
//! use customer_auth_relay::{config::Config, server::RelayServer};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::new(
//!         Some("example.myshopify.com".into()),
//!         "client-id",
//!         "client-secret",
//!         Some("https://auth.example.com".into()),
//!         3000,
//!     );
//!     RelayServer::new(config)?.run().await
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod server;

pub use client::TokenClient;
pub use config::Config;
pub use error::{ClientError, RelayError};
