use axum::{
    extract::{FromRequestParts, Query},
    http::request::Parts,
};
use serde::Deserialize;
use std::convert::Infallible;

/// Query parameters for weather/alerts requests
#[derive(Debug, Deserialize)]
pub struct CityQuery {
    /// City name from query string
    pub city: Option<String>,
}

/// Extracts the `city` query parameter.
///
/// Absent, blank or unparsable query strings all yield `None`; the
/// handler decides whether that is an error or falls back to a default.
#[derive(Debug)]
pub struct CityParam(pub Option<String>);

impl CityParam {
    /// Get the city value or use a default
    pub fn or_default(self, default: impl Into<String>) -> String {
        self.0.unwrap_or_else(|| default.into())
    }

    /// Get the city value
    pub fn into_inner(self) -> Option<String> {
        self.0
    }
}

impl<S> FromRequestParts<S> for CityParam
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let city = Query::<CityQuery>::from_request_parts(parts, state)
            .await
            .ok()
            .and_then(|Query(query)| query.city)
            .filter(|city| !city.trim().is_empty());

        Ok(CityParam(city))
    }
}
