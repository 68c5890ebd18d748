mod config;
mod metrics;
mod render;
mod routes;
mod shell;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use config::{AppConfig, LogConfig, LogFormat};
use metrics::Metrics;
use routes::AppState;
use shell::Shell;

const DEFAULT_LOG_FILTER: &str = "api=info,umls=info,projector=info,tower_http=info";

fn init_tracing(log: &LogConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    match log.format {
        LogFormat::Json => tracing_subscriber::fmt().with_env_filter(filter).json().init(),
        LogFormat::Pretty => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine; real deployments set the variables directly.
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env()?;
    init_tracing(&config.log);

    if config.umls.api_key.is_none() {
        tracing::warn!("UMLS_API_KEY is not set; searches need a key entered on the page");
    }

    let shell = Shell::from_config(&config)?;
    let state = AppState::new(shell, Metrics::new(), config.umls.base_url.clone());
    let app = routes::router(state);

    let listener = tokio::net::TcpListener::bind(&config.server.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.server.bind_addr))?;

    tracing::info!(
        umls = %config.umls.base_url,
        version = %config.umls.version,
        "Server listening on http://{}",
        config.server.bind_addr
    );

    axum::serve(listener, app).await?;

    Ok(())
}
