use config::{Case, Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Local env file read at startup when `PORT` is not already exported
pub const DEFAULT_ENV_PATH: &str = "./config/.env";

/// WeatherAPI forecast endpoint used by the alerts lookup
pub const WEATHERAPI_FORECAST_URL: &str = "http://api.weatherapi.com/v1/forecast.json";

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// WeatherAPI key. Missing keys are reported per request, not at startup.
    #[serde(default)]
    pub weather_api_key: Option<String>,

    /// Base URL of the forecast endpoint used by `/api/weather`
    #[serde(default)]
    pub weather_api_url: Option<String>,

    /// Forecast endpoint used by `/api/alerts`
    #[serde(default = "default_alerts_api_url")]
    pub alerts_api_url: String,

    /// City used by `/api/alerts` when the request names none
    #[serde(default = "default_alerts_city")]
    pub default_alerts_city: String,

    /// Directory holding the front-end bundle
    #[serde(default = "default_static_dir")]
    pub static_dir: String,

    /// Timeout applied to every outbound WeatherAPI call
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,

    /// Deadline for a whole inbound request
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_alerts_api_url() -> String {
    WEATHERAPI_FORECAST_URL.to_string()
}

fn default_alerts_city() -> String {
    "Paris".to_string()
}

fn default_static_dir() -> String {
    "frontend".to_string()
}

fn default_http_timeout_secs() -> u64 {
    5
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        load_env_file();
        Self::from_env(environment())
    }

    fn from_env(env: Environment) -> Result<Self, ConfigError> {
        let config = Config::builder()
            // Start with default values
            .set_default("host", default_host())?
            .set_default("port", default_port())?
            .set_default("alerts_api_url", default_alerts_api_url())?
            .set_default("default_alerts_city", default_alerts_city())?
            .set_default("static_dir", default_static_dir())?
            // Load from config file if present
            .add_source(File::with_name("config").required(false))
            .add_source(File::with_name("config.local").required(false))
            // Plain environment variables win (PORT, WEATHER_API_KEY, ...)
            .add_source(env)
            .build()?;

        config
            .try_deserialize::<AppConfig>()
            .map(AppConfig::normalized)
    }

    /// Blank credentials count as unset.
    fn normalized(mut self) -> Self {
        self.weather_api_key = self.weather_api_key.filter(|v| !v.trim().is_empty());
        self.weather_api_url = self.weather_api_url.filter(|v| !v.trim().is_empty());
        self
    }
}

/// Unprefixed environment source: `WEATHER_API_KEY` maps to `weather_api_key`
fn environment() -> Environment {
    Environment::default()
        .convert_case(Case::Snake)
        .try_parsing(true)
}

/// Load the local env file unless the environment already carries `PORT`.
///
/// A missing file is not fatal; the service still starts and reports
/// missing credentials per request.
fn load_env_file() {
    if std::env::var_os("PORT").is_some() {
        tracing::info!("PORT already set in environment, skipping env file");
        return;
    }

    let path = std::env::var("ENV_FILE").unwrap_or_else(|_| DEFAULT_ENV_PATH.to_string());
    match dotenvy::from_path(&path) {
        Ok(()) => tracing::info!(path = %path, "Env file loaded"),
        Err(e) => tracing::warn!(path = %path, error = %e, "Could not load env file"),
    }
}
