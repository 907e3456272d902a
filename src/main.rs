//! Session and page tracking API server.
//!
//! Event-sourced session lifecycle (start/pause/resume/end) with replay-based
//! active-time accrual, page visit tracking, and aggregated analytics over
//! both, served over HTTP.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::info;

use api::{router, AppState};
use telemetry::init_tracing_from_env;
use tracker_identity::{IdentityConfig, JwtIdentity};
use tracker_store::MemoryStore;

/// Application configuration.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
struct Config {
    #[serde(default = "default_host")]
    host: String,
    #[serde(default = "default_port")]
    port: u16,

    #[serde(default)]
    identity: IdentityConfig,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            identity: IdentityConfig::default(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    init_tracing_from_env();

    info!("Starting session tracker v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config()?;

    if config.identity.allow_unverified {
        tracing::warn!("token signature verification is DISABLED by configuration");
    }

    // One store backs both the session and page-visit sides.
    let store = Arc::new(MemoryStore::new());
    let identity = Arc::new(JwtIdentity::new(&config.identity));

    let state = AppState::new(store.clone(), store, identity);
    let app = router(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .context("Invalid server address")?;

    info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Shutdown complete");
    Ok(())
}

/// Load configuration from files and environment.
fn load_config() -> Result<Config> {
    let config = config::Config::builder()
        .add_source(config::Config::try_from(&Config::default())?)
        .add_source(
            config::File::with_name("config/default")
                .required(false)
                .format(config::FileFormat::Toml),
        )
        .add_source(
            config::Environment::default()
                .separator("__")
                .prefix("TRACKER")
                .try_parsing(true),
        )
        .build()
        .context("Failed to build configuration")?;

    let mut config: Config = config
        .try_deserialize()
        .context("Failed to deserialize configuration")?;

    // Nested identity overrides; the config crate's nested env parsing is
    // unreliable with underscored field names.
    if let Ok(secret) = std::env::var("TRACKER_IDENTITY_SECRET") {
        config.identity.secret = secret;
    }
    if let Ok(flag) = std::env::var("TRACKER_IDENTITY_ALLOW_UNVERIFIED") {
        config.identity.allow_unverified = flag == "1" || flag.eq_ignore_ascii_case("true");
    }

    Ok(config)
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        }
        _ = terminate => {
            info!("Received terminate signal");
        }
    }
}
