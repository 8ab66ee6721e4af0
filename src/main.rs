use std::sync::Arc;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use airdisplay_api::{config::Config, routes, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env_path = std::env::var("ENV_PATH").unwrap_or_else(|_| ".env".into());
    let _ = dotenvy::from_filename(&env_path);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Arc::new(Config::from_env()?);
    info!(
        "Serving banners {:?} (expiry {}s)",
        config.banner_ids,
        config.banner_duration.as_secs()
    );

    let state = AppState::connect(config.clone()).await?;
    let app = routes::router(state);

    let addr = format!("{}:{}", config.host, config.port);
    info!("AirDisplay API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
