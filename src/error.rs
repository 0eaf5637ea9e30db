use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Standard error response format for all API errors
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code: None,
        }
    }

    pub fn with_code(error: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code: Some(code.into()),
        }
    }
}

/// Trait for errors that can be converted to HTTP responses
pub trait HttpError: std::error::Error {
    /// HTTP status code for this error
    fn status_code(&self) -> StatusCode;

    /// Optional error code for programmatic handling (e.g., "NOT_FOUND")
    fn error_code(&self) -> Option<&'static str> {
        None
    }

    /// Message shown to API clients. Defaults to the internal message.
    fn public_message(&self) -> String {
        self.to_string()
    }
}

/// Convert any HttpError into an Axum response
pub fn into_response<E: HttpError>(err: E) -> Response {
    let status = err.status_code();
    let code = err.error_code();
    let cause = std::error::Error::source(&err).map(|c| c.to_string());

    tracing::error!(
        error = %err,
        cause = ?cause,
        status = %status,
        code = ?code,
        "API error"
    );

    let message = err.public_message();
    let body = if let Some(code) = code {
        ErrorResponse::with_code(message, code)
    } else {
        ErrorResponse::new(message)
    };

    (status, Json(body)).into_response()
}

/// Macro to implement IntoResponse for HttpError types
#[macro_export]
macro_rules! impl_into_response {
    ($error_type:ty) => {
        impl axum::response::IntoResponse for $error_type {
            fn into_response(self) -> axum::response::Response {
                $crate::error::into_response(self)
            }
        }
    };
}

/// Closed set of failure categories for the WeatherAPI pipeline.
///
/// Handlers branch on the kind only; the message text is diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    BadRequest,
    NotFound,
    Upstream,
    Config,
    Decode,
    Unknown,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::BadRequest => "bad_request",
            Self::NotFound => "not_found",
            Self::Upstream => "upstream_error",
            Self::Config => "config_error",
            Self::Decode => "decode_error",
            Self::Unknown => "unknown_error",
        }
    }

    pub fn status_code(self) -> StatusCode {
        match self {
            Self::BadRequest => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Upstream => StatusCode::BAD_GATEWAY,
            Self::Config => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Decode => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unknown => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_code(self) -> &'static str {
        match self {
            Self::BadRequest => "BAD_REQUEST",
            Self::NotFound => "NOT_FOUND",
            Self::Upstream => "UPSTREAM_ERROR",
            Self::Config => "CONFIG_ERROR",
            Self::Decode => "DECODE_ERROR",
            Self::Unknown => "UNKNOWN_ERROR",
        }
    }

    pub fn public_message(self) -> &'static str {
        match self {
            Self::BadRequest => "The requested city is invalid or not supported by the weather API.",
            Self::NotFound => "No weather data found for this city.",
            Self::Config => "Server configuration error (missing API key or URL).",
            Self::Upstream => "The external weather API is not responding correctly. Try again later.",
            Self::Decode => "The server could not understand the external weather API response.",
            Self::Unknown => "An internal error occurred while fetching the weather.",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure of a WeatherAPI lookup: a kind, a diagnostic message and an
/// optional underlying cause.
#[derive(Error, Debug)]
#[error("{kind}: {message}")]
pub struct WeatherError {
    kind: ErrorKind,
    message: String,
    /// Replaces the kind's public message when set
    public: Option<String>,
    #[source]
    source: Option<BoxError>,
}

impl WeatherError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            public: None,
            source: None,
        }
    }

    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl Into<BoxError>,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            public: None,
            source: Some(source.into()),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::BadRequest, message)
    }

    /// Bad request for a required query parameter that is absent or blank.
    pub fn missing_parameter(name: &str) -> Self {
        Self {
            public: Some(format!("The '{}' parameter is required.", name)),
            ..Self::bad_request(format!("missing '{}' parameter", name))
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    pub fn upstream(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Upstream, message)
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Config, message)
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }
}

impl HttpError for WeatherError {
    fn status_code(&self) -> StatusCode {
        self.kind.status_code()
    }

    fn error_code(&self) -> Option<&'static str> {
        Some(self.kind.error_code())
    }

    fn public_message(&self) -> String {
        self.public
            .clone()
            .unwrap_or_else(|| self.kind.public_message().to_string())
    }
}

impl_into_response!(WeatherError);
