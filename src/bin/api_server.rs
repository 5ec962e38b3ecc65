// Server binary entry point
//
// Usage: cargo run --bin api_server
// Configuration comes from the environment (see cotton_guide::config).

use cotton_guide::{create_router, AppConfig, AppState};
use std::net::SocketAddr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing (structured logging)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| {
                    // Default log level: info for our crate, warn for others
                    "cotton_guide=info,tower_http=debug,axum=debug,warn".into()
                }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting cotton species detection server...");

    let config = AppConfig::from_env()?;

    tracing::info!("Configuration:");
    tracing::info!("  PORT: {}", config.port);
    tracing::info!("  MODEL_PATH: {:?}", config.model_path);
    match &config.class_names {
        Some(names) => tracing::info!("  CLASS_NAMES: {}", names.join(",")),
        None => tracing::info!("  CLASS_NAMES: from model metadata"),
    }
    tracing::info!("  MODEL_INPUT_SIZE: {}", config.model_input_size);
    tracing::info!("  DETECTION_TIMEOUT: {:?}", config.detection_timeout);

    let port = config.port;

    // Load the model and background once; both are shared read-only afterwards
    tracing::info!("Initializing application state...");
    let state = AppState::new(config)?;
    tracing::info!("Application state initialized successfully");

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
