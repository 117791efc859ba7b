//! Customer account login relay.
//!
//! Runs the OAuth 2.0 authorization code flow against Shopify customer
//! accounts on behalf of a native app:
//! 1. the app opens `/customer-auth/start` in a browser,
//! 2. the provider redirects to `/customer-auth/callback`, where the code is exchanged,
//! 3. the browser is sent back to the app deep link with the session id,
//! 4. the app polls `/customer-auth/result` for the token.

pub mod handlers;
pub mod store;
pub mod token;
pub mod types;

pub use store::SessionStore;
pub use types::SessionStatus;
