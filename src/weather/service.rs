use reqwest::{Client, StatusCode, Url};

use super::models::*;
use super::rules::{derive_alerts, ensure_https_icon, is_thunder_risk};
use crate::error::{ErrorKind, WeatherError};

/// Days kept in the response, whatever the provider returns
const MAX_FORECAST_DAYS: usize = 3;

/// Provider condition language
const LANGUAGE: &str = "fr";

/// Days requested from the provider
const REQUESTED_DAYS: &str = "7";

/// Provider key under `current.air_quality` holding the overall index
const AIR_QUALITY_INDEX_KEY: &str = "us-epa-index";

pub struct WeatherService {
    client: Client,
    api_key: Option<String>,
    base_url: Option<String>,
}

impl WeatherService {
    pub fn new(client: Client, api_key: Option<&str>, base_url: Option<&str>) -> Self {
        Self {
            client,
            api_key: api_key.map(|k| k.to_string()),
            base_url: base_url.map(|u| u.to_string()),
        }
    }

    /// Fetch current conditions and forecast for `city` and reshape them.
    ///
    /// One upstream call, no retry. Every failure carries an [`ErrorKind`].
    pub async fn get_weather(&self, city: &str) -> Result<Weather, WeatherError> {
        tracing::debug!(city = %city, "Fetching weather data");

        let result = self.fetch(city).await;
        if let Err(ref e) = result {
            tracing::warn!(city = %city, kind = %e.kind(), error = %e, "Weather lookup failed");
        }
        result
    }

    async fn fetch(&self, city: &str) -> Result<Weather, WeatherError> {
        if city.is_empty() {
            return Err(WeatherError::missing_parameter("city"));
        }

        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| WeatherError::config("WEATHER_API_KEY is not set"))?;

        let base_url = self
            .base_url
            .as_deref()
            .ok_or_else(|| WeatherError::config("WEATHER_API_URL is not set"))?;

        let url = Url::parse(base_url).map_err(|e| {
            WeatherError::with_source(ErrorKind::Config, "WEATHER_API_URL is invalid", e)
        })?;

        tracing::debug!(city = %city, url = %url, "Calling WeatherAPI forecast");

        let response = self
            .client
            .get(url)
            .query(&[
                ("key", api_key),
                ("q", city),
                ("lang", LANGUAGE),
                ("days", REQUESTED_DAYS),
                ("aqi", "yes"),
                ("alerts", "no"),
            ])
            .send()
            .await
            .map_err(send_error)?;

        let status = response.status();
        tracing::debug!(city = %city, status = %status, "Received WeatherAPI response");

        check_status(status)?;

        let body = response.text().await.map_err(body_error)?;

        let data: ForecastApiResponse = serde_json::from_str(&body).map_err(|e| {
            WeatherError::with_source(
                ErrorKind::Decode,
                "could not decode the weather API response",
                e,
            )
        })?;

        let weather = transform_response(data);

        tracing::info!(
            city = %weather.city,
            temp = %weather.temperature,
            condition = %weather.condition,
            days = weather.forecast_days.len(),
            hourly = weather.hourly.len(),
            alerts = weather.alerts.len(),
            "Weather data fetched successfully"
        );

        Ok(weather)
    }
}

/// Failure before any provider response: a request that could not be built
/// is an internal error, anything else (connect, timeout) is upstream.
pub(crate) fn send_error(e: reqwest::Error) -> WeatherError {
    // The request URL carries the API key in its query string
    let e = e.without_url();
    if e.is_builder() {
        WeatherError::with_source(ErrorKind::Unknown, "could not build the HTTP request", e)
    } else {
        WeatherError::with_source(
            ErrorKind::Upstream,
            "call to the external weather API failed",
            e,
        )
    }
}

/// Failure while reading a provider response body.
pub(crate) fn body_error(e: reqwest::Error) -> WeatherError {
    WeatherError::with_source(
        ErrorKind::Upstream,
        "failed to read the provider response body",
        e.without_url(),
    )
}

/// Translate a non-200 provider status into an error kind.
pub(crate) fn check_status(status: StatusCode) -> Result<(), WeatherError> {
    match status {
        StatusCode::OK => Ok(()),
        StatusCode::BAD_REQUEST => Err(WeatherError::bad_request(
            "the requested city is invalid or malformed",
        )),
        StatusCode::NOT_FOUND => Err(WeatherError::not_found(
            "city or weather resource not found",
        )),
        s if s.is_server_error() => Err(WeatherError::upstream(format!(
            "the external weather API failed (status {})",
            s.as_u16()
        ))),
        s => Err(WeatherError::upstream(format!(
            "unexpected response from the weather API (status {})",
            s.as_u16()
        ))),
    }
}

/// Reshape a decoded forecast.json payload into a [`Weather`].
pub fn transform_response(data: ForecastApiResponse) -> Weather {
    let ForecastApiResponse {
        location,
        current,
        forecast,
    } = data;

    let air_quality_index = current
        .air_quality
        .get(AIR_QUALITY_INDEX_KEY)
        .copied()
        .flatten()
        .unwrap_or_default();

    let hourly: Vec<ForecastHour> = forecast
        .forecastday
        .first()
        .map(|day| day.hour.iter().map(transform_hour).collect())
        .unwrap_or_default();

    let forecast_days: Vec<ForecastDay> = forecast
        .forecastday
        .into_iter()
        .take(MAX_FORECAST_DAYS)
        .map(transform_day)
        .collect();

    let alerts = derive_alerts(&forecast_days);

    Weather {
        city: location.name,
        country: location.country,
        region: location.region,
        latitude: location.lat,
        longitude: location.lon,
        temperature: current.temp_c,
        feels_like: current.feelslike_c,
        condition_icon_url: ensure_https_icon(&current.condition.icon),
        condition: current.condition.text,
        humidity: current.humidity,
        wind_kph: current.wind_kph,
        wind_degree: current.wind_degree,
        wind_dir: current.wind_dir,
        pressure_mb: current.pressure_mb,
        visibility_km: current.vis_km,
        uv: current.uv,
        air_quality_index,
        cloud: current.cloud,
        forecast_days,
        hourly,
        alerts,
    }
}

fn transform_day(d: ApiForecastDay) -> ForecastDay {
    ForecastDay {
        date: d.date,
        min_temp: d.day.mintemp_c,
        max_temp: d.day.maxtemp_c,
        avg_temp: d.day.avgtemp_c,
        condition_icon: ensure_https_icon(&d.day.condition.icon),
        risk_thunder: is_thunder_risk(d.day.condition.code),
        condition: d.day.condition.text,
        chance_of_rain: d.day.daily_chance_of_rain,
        chance_of_snow: d.day.daily_chance_of_snow,
        wind_max_kph: d.day.maxwind_kph,
        gust_max_kph: 0.0,
        sunrise: d.astro.sunrise,
        sunset: d.astro.sunset,
        moon_phase: d.astro.moon_phase,
    }
}

fn transform_hour(h: &ApiHour) -> ForecastHour {
    ForecastHour {
        time: h.time.clone(),
        temp: h.temp_c,
        condition: h.condition.text.clone(),
        chance_of_rain: h.chance_of_rain,
        wind_kph: h.wind_kph,
        gust_kph: h.gust_kph,
        pressure_mb: h.pressure_mb,
        uv: h.uv,
    }
}
