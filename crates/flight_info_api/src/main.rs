//! Flight Info API Server
//!
//! HTTP wrapper around the flight_core lookup pipeline: one endpoint that
//! scrapes live flight-tracking data and returns a normalized JSON summary.

use axum::Router;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use flight_core::{LookupPipeline, ProxyPool};
use std::{net::SocketAddr, sync::Arc};
use tokio::signal;
use tower_http::{
    compression::CompressionLayer,
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::{info, warn, Level};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod api_handler;
mod config;
mod net_info;
mod routes;

use config::AppConfig;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<LookupPipeline>,
    pub config: Arc<AppConfig>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = load_config()?;

    // Initialize tracing/logging
    init_tracing(&config)?;

    info!("Starting Flight Info API v{}", env!("CARGO_PKG_VERSION"));

    // Startup IP discovery; the public IP also feeds proxy allow-listing
    let local_ip = net_info::local_ip();
    let public_ip = net_info::public_ip().await;
    info!("Server local IP: {}", local_ip);
    match &public_ip {
        Some(ip) => info!("Server public IP: {}", ip),
        None => info!("Server public IP: unavailable"),
    }

    // One-time proxy pool provisioning; an empty pool is a degraded mode,
    // not a startup failure
    let proxy_pool = match config.proxy.provisioning_config() {
        Some(provisioning) => {
            let own_ip = public_ip.unwrap_or(local_ip);
            match flight_core::proxy::provision_pool(&provisioning, &own_ip).await {
                Ok(pool) => pool,
                Err(e) => {
                    warn!("Proxy provisioning failed, continuing without proxies: {:#}", e);
                    ProxyPool::empty()
                }
            }
        }
        None => {
            warn!("Proxy service not configured; lookups will go out directly");
            ProxyPool::empty()
        }
    };

    // Initialize the lookup pipeline
    let pipeline = LookupPipeline::new(config.lookup.to_lookup_config(), proxy_pool);

    // Create shared application state
    let app_state = AppState {
        pipeline: Arc::new(pipeline),
        config: Arc::new(config.clone()),
    };

    // Build the router
    let app = create_router(app_state);

    // Start the server
    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("Server listening on {}", addr);
    info!("Flight info API: http://{}/flight_info?flight_number=DL400", addr);
    info!("Health check available at http://{}/health", addr);

    // Start server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down gracefully");
    Ok(())
}

/// Create the main application router
fn create_router(state: AppState) -> Router {
    routes::build_routes(Arc::new(state))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(
            CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods([axum::http::Method::GET])
                .allow_headers(tower_http::cors::Any),
        )
        .layer(CompressionLayer::new())
}

/// Load application configuration from defaults, file, and environment
fn load_config() -> Result<AppConfig, Box<dyn std::error::Error>> {
    let mut figment = Figment::from(Serialized::defaults(AppConfig::default()));

    // Try to load config file if it exists (optional)
    if std::path::Path::new("Config.toml").exists() {
        figment = figment.merge(Toml::file("Config.toml"));
    }

    // Override with environment variables, e.g. FLIGHT_API_SERVER__PORT
    figment = figment.merge(Env::prefixed("FLIGHT_API_").split("__"));

    let config: AppConfig = figment.extract()?;

    Ok(config)
}

/// Initialize tracing and logging
fn init_tracing(config: &AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| config.observability.log_level.clone().into());

    if config.observability.json_logs {
        // JSON format for production
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        // Human-readable format for development
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown");
        },
        _ = terminate => {
            info!("Received SIGTERM, starting graceful shutdown");
        },
    }
}
