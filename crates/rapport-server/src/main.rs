//! Binary entry point for the analysis service

use rapport_inference::{ProviderClient, ProviderConfig};
use rapport_server::{routes, AppContext, ServerConfig};
use rapport_staging::StagingArea;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Configuration is read from the environment exactly once, here.
    let server_config = ServerConfig::from_env();
    let provider_config = ProviderConfig::from_env();
    if provider_config.api_key.is_none() {
        tracing::warn!("ARK_API_KEY not set; analyze requests will be refused");
    }

    let staging = StagingArea::new(&server_config.staging_dir);
    let analyzer = Arc::new(ProviderClient::new(provider_config));
    let ctx = Arc::new(AppContext::new(staging, analyzer));

    let addr = server_config.bind_addr();
    tracing::info!(%addr, staging_dir = %server_config.staging_dir.display(), "serving");
    warp::serve(routes(ctx)).run(addr).await;

    Ok(())
}
