use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use starview_backend::{GaiaTapClient, StarPipeline};

mod app;
mod config;
use app::AppState;
use config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_target(false)
        .with_thread_ids(true)
        .with_level(true)
        .init();

    let config_path = std::env::args().nth(1).unwrap_or_else(|| "config.toml".to_string());
    let config = Config::load_or_default(&config_path)?;
    info!("Loaded configuration: {:?}", config);

    let catalog = GaiaTapClient::new(&config.catalog)?;
    info!("Querying {}", catalog.tap_url());
    let pipeline = StarPipeline::new(Arc::new(catalog), config.display.clone());
    let state = AppState::new(pipeline, config.fetch.clone());

    let mut app = app::router(state);

    if let Some(dir) = &config.viewer_directory {
        let viewer_path = PathBuf::from(dir);
        if !viewer_path.exists() {
            error!("Viewer directory does not exist: {}", dir);
            anyhow::bail!("Viewer directory not found: {}", dir);
        }
        info!("Serving viewer from: {}", viewer_path.display());
        app = app.nest_service(
            &config.viewer_route(),
            ServeDir::new(viewer_path)
                .precompressed_br()
                .precompressed_gzip(),
        );
    }

    if config.enable_cors {
        app = app.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );
    }
    let app = app.layer(TraceLayer::new_for_http());

    let addr = SocketAddr::from((config.bind_ip(), config.port));
    info!("Starting starview server on http://{}", addr);
    if config.viewer_directory.is_some() {
        info!("Viewer URL: http://{}{}/index.html", addr, config.viewer_route());
    }

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
