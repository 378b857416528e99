//! OVERSCAN — football over-goals odds radar
//!
//! Entry point. Loads configuration, initialises structured logging,
//! resolves upstream credentials, and serves the API until Ctrl+C.

use anyhow::{Context, Result};
use secrecy::SecretString;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use overscan::config::AppConfig;
use overscan::pipeline::ScanConfig;
use overscan::server::{self, AppState};
use overscan::upstream::SoccersApiClient;

const BANNER: &str = r#"
  _____   _____ ____  ____   ____    _    _   _
 |  _  | | ____|  _ \/ ___| / ___|  / \  | \ | |
 | | | | |  _| | |_) \___ \| |     / _ \ |  \| |
 | |_| | | |___|  _ < ___) | |___ / ___ \| |\  |
 |_____| |_____|_| \_\____/ \____/_/   \_\_| \_|

  Over-goals Value Radar — next 24h
  v0.1.0
"#;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    // Load configuration from TOML
    let cfg = AppConfig::load("config.toml")?;

    // Initialise structured logging
    init_logging();

    // Print startup banner
    println!("{BANNER}");
    info!(
        upstream = %cfg.upstream.base_url,
        window_hours = cfg.scanner.window_hours,
        cache_ttl_secs = cfg.server.cache_ttl_secs,
        port = cfg.server.port,
        "OVERSCAN starting up"
    );

    // -- Upstream client ---------------------------------------------------

    // Missing credentials are not fatal: the server still comes up and
    // every scan surfaces the provider's rejection as a 502.
    let user = AppConfig::resolve_env(&cfg.upstream.user_env).unwrap_or_else(|_| {
        warn!(env = %cfg.upstream.user_env, "Upstream user not set");
        String::new()
    });
    let token = AppConfig::resolve_env(&cfg.upstream.token_env).unwrap_or_else(|_| {
        warn!(env = %cfg.upstream.token_env, "Upstream token not set");
        String::new()
    });

    let source = SoccersApiClient::new(&cfg.upstream, user, SecretString::new(token))?;
    if !overscan::upstream::FixtureSource::is_configured(&source) {
        warn!("Upstream credentials incomplete — API requests will fail until set");
    }

    // -- HTTP server -------------------------------------------------------

    let state = Arc::new(AppState::new(
        Arc::new(source),
        ScanConfig::from_app(&cfg),
        Duration::from_secs(cfg.server.cache_ttl_secs),
    ));

    let app = server::build_router(state);
    let addr = format!("0.0.0.0:{}", cfg.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!(addr = %addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("OVERSCAN shut down cleanly.");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown signal received.");
    }
}

/// Initialise the `tracing` subscriber.
fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("overscan=info"));

    let json_logging = std::env::var("OVERSCAN_LOG_JSON").is_ok();

    if json_logging {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_thread_ids(true)
            .init();
    } else {
        fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .init();
    }
}
