use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Provider alert passed through unchanged
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize, ToSchema)]
#[serde(default)]
pub struct UpstreamAlert {
    pub headline: String,
    pub severity: String,
    pub areas: String,
    pub event: String,
    #[serde(rename = "desc")]
    pub description: String,
}

/// The slice of forecast.json read by the alerts lookup
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AlertsApiResponse {
    pub alerts: AlertList,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AlertList {
    pub alert: Vec<UpstreamAlert>,
}
