//! Image cache server - write-through HTTP cache for origin images
//!
//! Serves images by numeric key from a local cache directory, fetching
//! misses from the origin and storing them before responding.

use clap::Parser;
use file_image_cache::ImageCache;
use image_cache_server::{start_server, Config, Result, ServerState, SharedState};
use origin_client::OriginClient;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::parse();

    // Initialize logging
    let env_filter = EnvFilter::from_default_env()
        .add_directive("image_cache_server=info".parse()?)
        .add_directive("file_image_cache=info".parse()?)
        .add_directive("origin_client=info".parse()?);

    // Use JSON format for GCP Cloud Logging when LOG_FORMAT=json
    if std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false)
    {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_stackdriver::layer())
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    };

    info!("Starting image cache server...");
    info!("Listen address: {}", config.listen_addr());
    info!("Cache dir: {:?}", config.cache_dir);
    info!("Origin: {}", config.origin_url);

    let cache = ImageCache::new(config.cache_dir.clone());
    cache.init().await?;

    let origin = OriginClient::new(&config.origin_url, config.origin_timeout())?;

    let state: SharedState = Arc::new(ServerState::new(cache, Arc::new(origin)));

    start_server(state, &config).await?;

    Ok(())
}
