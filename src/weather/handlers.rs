use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use super::models::Weather;
use crate::error::{ErrorResponse, WeatherError};
use crate::extractors::CityParam;
use crate::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    #[schema(value_type = String)]
    pub status: &'static str,
}

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/api/health",
    tag = "health",
    responses((status = 200, description = "Service is up", body = HealthResponse))
)]
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// Current conditions, 3-day forecast, hourly forecast and derived alerts
///
/// GET /api/weather?city=Paris
#[utoipa::path(
    get,
    path = "/api/weather",
    tag = "weather",
    params(("city" = String, Query, description = "City name, e.g. Paris")),
    responses(
        (status = 200, description = "Weather for the city", body = Weather),
        (status = 400, description = "Missing or invalid city", body = ErrorResponse),
        (status = 404, description = "No weather data for this city", body = ErrorResponse),
        (status = 500, description = "Configuration or decoding error", body = ErrorResponse),
        (status = 502, description = "Weather provider unavailable", body = ErrorResponse)
    )
)]
pub async fn get_weather(
    State(state): State<AppState>,
    city: CityParam,
) -> Result<Json<Weather>, WeatherError> {
    let city = city
        .into_inner()
        .ok_or_else(|| WeatherError::missing_parameter("city"))?;

    let weather = state.weather_service.get_weather(&city).await?;
    Ok(Json(weather))
}
