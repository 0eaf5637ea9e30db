mod alerts;
mod config;
mod error;
mod extractors;
mod openapi;
mod routes;
mod weather;

#[cfg(test)]
mod test_support;

use axum::{error_handling::HandleErrorLayer, http::StatusCode, BoxError, Json};
use reqwest::Client;
use std::{sync::Arc, time::Duration};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::alerts::AlertsService;
use crate::config::AppConfig;
use crate::error::ErrorResponse;
use crate::weather::WeatherService;

/// Shared HTTP client configuration
const HTTP_CONNECT_TIMEOUT_SECS: u64 = 3;
const HTTP_POOL_IDLE_TIMEOUT_SECS: u64 = 90;

#[derive(Clone)]
pub struct AppState {
    pub weather_service: Arc<WeatherService>,
    pub alerts_service: Arc<AlertsService>,
    pub config: Arc<AppConfig>,
}

/// Create the HTTP client shared by every upstream call
fn create_http_client(timeout_secs: u64) -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(HTTP_CONNECT_TIMEOUT_SECS.min(timeout_secs)))
        .pool_idle_timeout(Duration::from_secs(HTTP_POOL_IDLE_TIMEOUT_SECS))
        .pool_max_idle_per_host(10)
        .build()
}

/// Errors raised by middleware rather than by a handler
async fn handle_timeout_error(err: BoxError) -> (StatusCode, Json<ErrorResponse>) {
    if err.is::<tower::timeout::error::Elapsed>() {
        tracing::warn!("Request deadline exceeded");
        (
            StatusCode::REQUEST_TIMEOUT,
            Json(ErrorResponse::new("Request timed out")),
        )
    } else {
        tracing::error!(error = %err, "Unhandled middleware error");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new("Unexpected server error.")),
        )
    }
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for ctrl+c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "meteo_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load()?;
    tracing::info!(
        api_key_set = config.weather_api_key.is_some(),
        api_url_set = config.weather_api_url.is_some(),
        static_dir = %config.static_dir,
        "Configuration loaded"
    );
    if config.weather_api_key.is_none() {
        tracing::warn!("WEATHER_API_KEY is not set; weather and alerts lookups will fail");
    }

    // One client, cloned into every service
    let http_client = create_http_client(config.http_timeout_secs)?;
    tracing::debug!(timeout_secs = config.http_timeout_secs, "Shared HTTP client created");

    let weather_service = Arc::new(WeatherService::new(
        http_client.clone(),
        config.weather_api_key.as_deref(),
        config.weather_api_url.as_deref(),
    ));
    let alerts_service = Arc::new(AlertsService::new(
        http_client,
        config.weather_api_key.as_deref(),
        &config.alerts_api_url,
    ));

    let state = AppState {
        weather_service,
        alerts_service,
        config: Arc::new(config.clone()),
    };

    let app = routes::build_router(state.clone())
        .layer(
            ServiceBuilder::new()
                // Handle timeout errors
                .layer(HandleErrorLayer::new(handle_timeout_error))
                // Inbound deadline; dropping the handler abandons the upstream call
                .timeout(Duration::from_secs(config.request_timeout_secs)),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server with graceful shutdown
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}
