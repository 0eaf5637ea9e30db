use axum::{routing::get, Router};
use tower_http::services::ServeDir;

use crate::alerts::handlers as alerts_handlers;
use crate::openapi::openapi_json;
use crate::weather::handlers as weather_handlers;
use crate::AppState;

/// Build the JSON API routes
fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(weather_handlers::health))
        .route("/weather", get(weather_handlers::get_weather))
        .route("/alerts", get(alerts_handlers::get_alerts))
        .route("/openapi.json", get(openapi_json))
}

/// Build the complete application router
///
/// Anything outside `/api` is served from the front-end directory.
pub fn build_router(state: AppState) -> Router<AppState> {
    let static_files = ServeDir::new(&state.config.static_dir);

    Router::new()
        .nest("/api", api_routes())
        .fallback_service(static_files)
}
