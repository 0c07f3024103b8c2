use anyhow::{Context, Result};
use fixnet::config::Config;
use fixnet::server::{create_router, AppState};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored in production)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("fixnet=info".parse()?),
        )
        .init();

    info!("Starting FixNet intake API");

    let config = Config::from_env()?;

    if config.admin_api_key.is_none() {
        warn!("FIXNET_ADMIN_API_KEY not set, admin routes will reject every request");
    }
    if config.telegram_credentials().is_none() {
        info!("Telegram not configured, staff notifications disabled");
    }

    let state = AppState::from_config(&config);
    let app = create_router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context(format!("Failed to bind {}", addr))?;
    info!("Listening on {}", addr);

    axum::serve(listener, app)
        .await
        .context("Server error")?;

    Ok(())
}
