use std::sync::Arc;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;
use vodlink_metadata::resolve::Resolver;
use vodlink_metadata::tmdb::TmdbClient;
use vodlink_server::config::AppConfig;
use vodlink_xtream::listing::XtreamClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env().context("invalid configuration")?;

    if config.resolve.fallback_connection.is_some() {
        info!("fallback provider connection configured");
    }

    let catalog = TmdbClient::new(config.tmdb.clone()).context("failed to build TMDB client")?;
    let listings =
        XtreamClient::new(&config.xtream).context("failed to build provider client")?;

    let resolver = Resolver::new(
        Arc::new(catalog),
        Arc::new(listings),
        config.resolve.clone(),
    );

    let app_state = vodlink_server::state::AppState {
        resolver: Arc::new(resolver),
    };

    let app = vodlink_server::routes::build_router(app_state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .context("failed to bind")?;
    info!(addr = %config.bind_addr, "server listening");

    axum::serve(listener, app).await?;
    Ok(())
}
