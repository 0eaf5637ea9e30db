use axum::Json;
use utoipa::OpenApi;

use crate::alerts::{handlers as alerts_handlers, models::UpstreamAlert};
use crate::error::ErrorResponse;
use crate::weather::handlers::{self as weather_handlers, HealthResponse};
use crate::weather::models::{
    AlertKind, AlertSeverity, ForecastDay, ForecastHour, Weather, WeatherAlert,
};

/// OpenAPI documentation for the weather backend
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Meteo Backend API",
        version = "1.0.0",
        description = "Current weather, 3-day forecast and alerts proxied from WeatherAPI."
    ),
    paths(
        weather_handlers::health,
        weather_handlers::get_weather,
        alerts_handlers::get_alerts,
    ),
    tags(
        (name = "health", description = "Liveness"),
        (name = "weather", description = "Current weather and forecast"),
        (name = "alerts", description = "Provider weather alerts")
    ),
    components(
        schemas(
            ErrorResponse,
            HealthResponse,
            Weather,
            ForecastDay,
            ForecastHour,
            WeatherAlert,
            AlertKind,
            AlertSeverity,
            UpstreamAlert,
        )
    )
)]
pub struct ApiDoc;

/// Serve the generated OpenAPI document
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
