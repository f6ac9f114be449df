mod config;
mod error;
mod proxy;
mod routes;

use tracing::info;
use tracing_subscriber::{EnvFilter, filter::LevelFilter};
use wordbridge_mt::ServiceConfig;

use crate::config::ServerConfig;
use crate::routes::{AppState, build_router};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(LevelFilter::INFO.into()))
        .init();

    let services = ServiceConfig::from_env();
    let server = ServerConfig::from_env();

    let engine = services
        .engine()
        .map_err(|e| format!("Failed to initialize services: {}", e))?;
    info!("Starting wordbridge web server with {:?}", engine);

    let state = AppState::new(engine, services.languages.clone(), &server.proxy_endpoint);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&server.bind).await?;
    info!(
        "Server running at http://{} (proxy at {})",
        server.bind, server.proxy_endpoint
    );

    axum::serve(listener, app).await?;

    Ok(())
}
