//! Customer Auth Relay - Entry Point

use std::time::Duration;

use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use customer_auth_relay::{config::Config, server::RelayServer};

#[derive(Parser, Debug)]
#[command(name = "customer-auth-relay")]
#[command(about = "OAuth code relay for Shopify customer account login")]
#[command(version)]
struct Cli {
    /// Default shop domain when the start request has none (e.g. example.myshopify.com)
    #[arg(long, env = "SHOPIFY_STORE")]
    store: Option<String>,

    /// OAuth client identifier
    #[arg(long, env = "SHOPIFY_CLIENT_ID")]
    client_id: String,

    /// OAuth client secret
    #[arg(long, env = "SHOPIFY_CLIENT_SECRET", hide_env_values = true)]
    client_secret: String,

    /// Externally reachable base URL (e.g. https://auth.example.com)
    #[arg(long, env = "BACKEND_BASE")]
    backend_base: Option<String>,

    /// HTTP server port
    #[arg(long, default_value = "3000", env = "PORT")]
    port: u16,

    /// Override the provider authorize endpoint
    #[arg(long, env = "SHOPIFY_AUTHORIZE_URL")]
    authorize_url: Option<String>,

    /// Override the provider token endpoint
    #[arg(long, env = "SHOPIFY_TOKEN_URL")]
    token_url: Option<String>,

    /// Session lifetime in seconds
    #[arg(long, default_value = "600", env = "SESSION_TTL_SECS")]
    session_ttl_secs: u64,

    /// Maximum number of live sessions
    #[arg(long, default_value = "10000", env = "MAX_SESSIONS")]
    max_sessions: usize,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    log_level: String,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,
}

impl Cli {
    fn into_config(self) -> Config {
        let mut config =
            Config::new(self.store, self.client_id, self.client_secret, self.backend_base, self.port);
        if let Some(url) = self.authorize_url {
            config.authorize_url = url;
        }
        if let Some(url) = self.token_url {
            config.token_url = url;
        }
        config.session_ttl = Duration::from_secs(self.session_ttl_secs);
        config.max_sessions = self.max_sessions;
        config
    }
}

fn init_tracing(log_level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let subscriber = tracing_subscriber::registry().with(filter);

    if json {
        subscriber.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        subscriber.with(tracing_subscriber::fmt::layer().compact()).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    init_tracing(&cli.log_level, cli.json_logs);

    let config = cli.into_config();

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        backend_base = %config.backend_base,
        default_store = ?config.default_store,
        "Starting customer auth relay"
    );

    RelayServer::new(config)?.run().await
}
