use reqwest::{Client, Url};

use super::models::{AlertsApiResponse, UpstreamAlert};
use crate::error::{ErrorKind, WeatherError};
use crate::weather::service::{body_error, check_status, send_error};

pub struct AlertsService {
    client: Client,
    api_key: Option<String>,
    url: String,
}

impl AlertsService {
    pub fn new(client: Client, api_key: Option<&str>, url: &str) -> Self {
        Self {
            client,
            api_key: api_key.map(|k| k.to_string()),
            url: url.to_string(),
        }
    }

    /// Fetch the provider's own alert feed for `city`, in provider order.
    pub async fn get_alerts(&self, city: &str) -> Result<Vec<UpstreamAlert>, WeatherError> {
        let result = self.fetch(city).await;
        if let Err(ref e) = result {
            tracing::warn!(city = %city, kind = %e.kind(), error = %e, "Alerts lookup failed");
        }
        result
    }

    async fn fetch(&self, city: &str) -> Result<Vec<UpstreamAlert>, WeatherError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| WeatherError::config("WEATHER_API_KEY is not set"))?;

        let url = Url::parse(&self.url).map_err(|e| {
            WeatherError::with_source(ErrorKind::Config, "ALERTS_API_URL is invalid", e)
        })?;

        tracing::debug!(city = %city, "Fetching provider alerts");

        let response = self
            .client
            .get(url)
            .query(&[("key", api_key), ("q", city), ("days", "1"), ("alerts", "yes")])
            .send()
            .await
            .map_err(send_error)?;

        let status = response.status();
        tracing::debug!(city = %city, status = %status, "Received alerts response");

        check_status(status)?;

        let body = response.text().await.map_err(body_error)?;

        let data: AlertsApiResponse = serde_json::from_str(&body).map_err(|e| {
            WeatherError::with_source(ErrorKind::Decode, "could not decode the alerts response", e)
        })?;

        let alerts = data.alerts.alert;
        tracing::info!(city = %city, count = alerts.len(), "Provider alerts fetched");

        Ok(alerts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{alerts_fixture, capture_logs, closed_port_url, spawn_stub, stub_status};
    use axum::{extract::Query, http::StatusCode, routing::get, Json, Router};
    use serde_json::json;
    use std::collections::HashMap;

    fn service(url: &str) -> AlertsService {
        AlertsService::new(Client::new(), Some("test_api_key"), url)
    }

    #[tokio::test]
    async fn test_missing_api_key_is_config_error() {
        let service = AlertsService::new(Client::new(), None, "http://127.0.0.1:9/forecast.json");
        let err = service.get_alerts("Paris").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
    }

    #[tokio::test]
    async fn test_invalid_url_is_config_error() {
        let err = service("forecast.json").get_alerts("Paris").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
    }

    #[tokio::test]
    async fn test_get_alerts_preserves_provider_order() {
        async fn forecast(Query(params): Query<HashMap<String, String>>) -> Json<serde_json::Value> {
            let expected = [("key", "test_api_key"), ("q", "Paris"), ("days", "1"), ("alerts", "yes")];
            if expected
                .iter()
                .all(|(k, v)| params.get(*k).map(String::as_str) == Some(*v))
            {
                Json(alerts_fixture())
            } else {
                Json(json!({}))
            }
        }

        let base = spawn_stub(Router::new().route("/v1/forecast.json", get(forecast))).await;
        let alerts = service(&format!("{}/v1/forecast.json", base))
            .get_alerts("Paris")
            .await
            .unwrap();

        assert_eq!(alerts.len(), 2);
        assert_eq!(alerts[0].event, "Thunderstorm Warning");
        assert_eq!(alerts[0].severity, "Moderate");
        assert_eq!(alerts[1].event, "Heat Advisory");
        assert_eq!(alerts[1].description, "Temperatures up to 36C expected.");
    }

    #[tokio::test]
    async fn test_no_alert_block_yields_empty_list() {
        let base = spawn_stub(stub_status(StatusCode::OK, "{\"location\": {\"name\": \"Paris\"}}")).await;
        let alerts = service(&format!("{}/v1/forecast.json", base))
            .get_alerts("Paris")
            .await
            .unwrap();
        assert!(alerts.is_empty());
    }

    #[tokio::test]
    async fn test_non_200_is_an_error() {
        let base = spawn_stub(stub_status(StatusCode::SERVICE_UNAVAILABLE, "{}")).await;
        let err = service(&format!("{}/v1/forecast.json", base))
            .get_alerts("Paris")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Upstream);
    }

    #[tokio::test]
    async fn test_malformed_body_is_decode_error() {
        let base = spawn_stub(stub_status(StatusCode::OK, "{\"alerts\": {\"alert\": 3}}")).await;
        let err = service(&format!("{}/v1/forecast.json", base))
            .get_alerts("Paris")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decode);
    }

    #[tokio::test]
    async fn test_transport_error_does_not_expose_api_key() {
        let service = AlertsService::new(Client::new(), Some("secret_key_123"), &closed_port_url().await);
        let err = service.get_alerts("Paris").await.unwrap_err();

        let cause = std::error::Error::source(&err).unwrap().to_string();
        assert!(!cause.contains("secret_key_123"), "cause leaks key: {}", cause);
        assert!(!cause.contains("key="), "cause leaks query: {}", cause);
    }

    #[tokio::test]
    async fn test_failure_is_logged_with_city_and_kind() {
        let base = spawn_stub(stub_status(StatusCode::SERVICE_UNAVAILABLE, "{}")).await;
        let service = AlertsService::new(
            Client::new(),
            Some("secret_key_123"),
            &format!("{}/v1/forecast.json", base),
        );

        let (logs, _guard) = capture_logs();
        service.get_alerts("Lyon").await.unwrap_err();

        let output = logs.contents();
        assert!(output.contains("Alerts lookup failed"), "{}", output);
        assert!(output.contains("city=Lyon"), "{}", output);
        assert!(output.contains("kind=upstream_error"), "{}", output);
        assert!(!output.contains("secret_key_123"), "{}", output);
    }

    #[tokio::test]
    async fn test_transport_failure_is_upstream() {
        let err = service(&closed_port_url().await)
            .get_alerts("Paris")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Upstream);
    }
}
