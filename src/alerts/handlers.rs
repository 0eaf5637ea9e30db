use axum::{extract::State, Json};

use super::models::UpstreamAlert;
use crate::error::{ErrorResponse, WeatherError};
use crate::extractors::CityParam;
use crate::AppState;

/// Provider alerts for a city, defaulting to the configured city
///
/// GET /api/alerts?city=Paris
#[utoipa::path(
    get,
    path = "/api/alerts",
    tag = "alerts",
    params(("city" = Option<String>, Query, description = "City name; defaults to the configured city")),
    responses(
        (status = 200, description = "Provider alerts in provider order", body = [UpstreamAlert]),
        (status = 500, description = "Configuration or decoding error", body = ErrorResponse),
        (status = 502, description = "Weather provider unavailable", body = ErrorResponse)
    )
)]
pub async fn get_alerts(
    State(state): State<AppState>,
    city: CityParam,
) -> Result<Json<Vec<UpstreamAlert>>, WeatherError> {
    let city = city.or_default(state.config.default_alerts_city.as_str());

    let alerts = state.alerts_service.get_alerts(&city).await?;
    Ok(Json(alerts))
}
