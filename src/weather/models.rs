use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use utoipa::ToSchema;

// ============================================================================
// WeatherAPI forecast.json Response (Internal)
// Absent or null fields fall back to defaults; wrong types fail decoding.
// ============================================================================

fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ForecastApiResponse {
    #[serde(deserialize_with = "nullable")]
    pub location: ApiLocation,
    #[serde(deserialize_with = "nullable")]
    pub current: ApiCurrent,
    #[serde(deserialize_with = "nullable")]
    pub forecast: ApiForecast,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ApiLocation {
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    #[serde(deserialize_with = "nullable")]
    pub region: String,
    #[serde(deserialize_with = "nullable")]
    pub country: String,
    #[serde(deserialize_with = "nullable")]
    pub lat: f64,
    #[serde(deserialize_with = "nullable")]
    pub lon: f64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ApiCondition {
    #[serde(deserialize_with = "nullable")]
    pub text: String,
    #[serde(deserialize_with = "nullable")]
    pub icon: String,
    #[serde(deserialize_with = "nullable")]
    pub code: i32,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ApiCurrent {
    #[serde(deserialize_with = "nullable")]
    pub temp_c: f64,
    #[serde(deserialize_with = "nullable")]
    pub feelslike_c: f64,
    #[serde(deserialize_with = "nullable")]
    pub humidity: u8,
    #[serde(deserialize_with = "nullable")]
    pub wind_kph: f64,
    #[serde(deserialize_with = "nullable")]
    pub wind_degree: u16,
    #[serde(deserialize_with = "nullable")]
    pub wind_dir: String,
    #[serde(deserialize_with = "nullable")]
    pub pressure_mb: f64,
    #[serde(deserialize_with = "nullable")]
    pub vis_km: f64,
    #[serde(deserialize_with = "nullable")]
    pub uv: f64,
    #[serde(deserialize_with = "nullable")]
    pub cloud: u8,
    #[serde(deserialize_with = "nullable")]
    pub condition: ApiCondition,
    /// Only present with `aqi=yes` on plans that include air quality
    #[serde(deserialize_with = "nullable")]
    pub air_quality: HashMap<String, Option<f64>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ApiForecast {
    #[serde(deserialize_with = "nullable")]
    pub forecastday: Vec<ApiForecastDay>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ApiForecastDay {
    #[serde(deserialize_with = "nullable")]
    pub date: String,
    #[serde(deserialize_with = "nullable")]
    pub day: ApiDay,
    #[serde(deserialize_with = "nullable")]
    pub astro: ApiAstro,
    #[serde(deserialize_with = "nullable")]
    pub hour: Vec<ApiHour>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ApiDay {
    #[serde(deserialize_with = "nullable")]
    pub maxtemp_c: f64,
    #[serde(deserialize_with = "nullable")]
    pub mintemp_c: f64,
    #[serde(deserialize_with = "nullable")]
    pub avgtemp_c: f64,
    #[serde(deserialize_with = "nullable")]
    pub maxwind_kph: f64,
    #[serde(deserialize_with = "nullable")]
    pub daily_chance_of_rain: u8,
    #[serde(deserialize_with = "nullable")]
    pub daily_chance_of_snow: u8,
    #[serde(deserialize_with = "nullable")]
    pub condition: ApiCondition,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ApiAstro {
    #[serde(deserialize_with = "nullable")]
    pub sunrise: String,
    #[serde(deserialize_with = "nullable")]
    pub sunset: String,
    #[serde(deserialize_with = "nullable")]
    pub moon_phase: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ApiHour {
    #[serde(deserialize_with = "nullable")]
    pub time: String,
    #[serde(deserialize_with = "nullable")]
    pub temp_c: f64,
    #[serde(deserialize_with = "nullable")]
    pub condition: ApiCondition,
    #[serde(deserialize_with = "nullable")]
    pub chance_of_rain: u8,
    #[serde(deserialize_with = "nullable")]
    pub wind_kph: f64,
    #[serde(deserialize_with = "nullable")]
    pub gust_kph: f64,
    #[serde(deserialize_with = "nullable")]
    pub pressure_mb: f64,
    #[serde(deserialize_with = "nullable")]
    pub uv: f64,
}

// ============================================================================
// API Response Models (External - what we return to clients)
// ============================================================================

fn is_default<T: Default + PartialEq>(value: &T) -> bool {
    *value == T::default()
}

/// Current conditions plus forecast for one city
#[derive(Debug, Clone, Default, Serialize, ToSchema)]
pub struct Weather {
    pub city: String,
    #[serde(skip_serializing_if = "is_default")]
    pub country: String,
    #[serde(skip_serializing_if = "is_default")]
    pub region: String,
    #[serde(rename = "lat", skip_serializing_if = "is_default")]
    pub latitude: f64,
    #[serde(rename = "lon", skip_serializing_if = "is_default")]
    pub longitude: f64,

    pub temperature: f64,
    pub feels_like: f64,
    pub condition: String,
    pub condition_icon_url: String,
    /// Relative humidity (%)
    pub humidity: u8,
    pub wind_kph: f64,
    pub wind_degree: u16,
    /// Compass direction ("N", "NE", ...)
    pub wind_dir: String,
    pub pressure_mb: f64,
    pub visibility_km: f64,
    pub uv: f64,
    /// US EPA index, 0 when the provider sends no air quality data
    pub air_quality_index: f64,
    /// Cloud cover (%)
    #[serde(skip_serializing_if = "is_default")]
    pub cloud: u8,

    /// At most three days, in provider order
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub forecast_days: Vec<ForecastDay>,

    /// Every hour of the first forecast day
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub hourly: Vec<ForecastHour>,

    /// Derived from the forecast days, not from the provider's alert feed
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub alerts: Vec<WeatherAlert>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
pub struct ForecastDay {
    pub date: String,
    pub min_temp: f64,
    pub max_temp: f64,
    pub avg_temp: f64,
    pub condition: String,
    #[serde(rename = "condition_icon_url")]
    pub condition_icon: String,
    pub chance_of_rain: u8,
    pub chance_of_snow: u8,
    pub risk_thunder: bool,
    pub wind_max_kph: f64,
    /// Not reported per day by the provider; always 0
    pub gust_max_kph: f64,
    pub sunrise: String,
    pub sunset: String,
    pub moon_phase: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
pub struct ForecastHour {
    /// Local time, e.g. "2025-01-01 13:00"
    pub time: String,
    pub temp: f64,
    pub condition: String,
    pub chance_of_rain: u8,
    pub wind_kph: f64,
    pub gust_kph: f64,
    pub pressure_mb: f64,
    pub uv: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    Storm,
    HeavyRain,
    StrongWind,
    Heat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Moderate,
    High,
}

/// Rule-based alert computed from the forecast
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct WeatherAlert {
    #[serde(rename = "type")]
    pub kind: AlertKind,
    pub severity: AlertSeverity,
    pub message: String,
}
