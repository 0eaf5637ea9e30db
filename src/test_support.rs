//! Stub WeatherAPI servers and fixtures shared by the unit tests.

use axum::{http::StatusCode, routing::get, Router};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

/// Serve `app` on an ephemeral local port and return its base URL.
pub async fn spawn_stub(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

/// Stub answering `/v1/forecast.json` with a fixed status and raw body.
pub fn stub_status(status: StatusCode, body: &'static str) -> Router {
    Router::new().route(
        "/v1/forecast.json",
        get(move || async move { (status, [("content-type", "application/json")], body) }),
    )
}

/// Stub answering `/v1/forecast.json` with a JSON document.
pub fn stub_json(body: Value) -> Router {
    Router::new().route(
        "/v1/forecast.json",
        get(move || {
            let body = body.clone();
            async move { axum::Json(body) }
        }),
    )
}

/// Formatted log output collected by [`capture_logs`].
#[derive(Clone, Default)]
pub struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl LogCapture {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl std::io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Route this thread's events into a buffer until the guard is dropped.
pub fn capture_logs() -> (LogCapture, tracing::subscriber::DefaultGuard) {
    let capture = LogCapture::default();
    let writer = capture.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::INFO)
        .finish();
    (capture, tracing::subscriber::set_default(subscriber))
}

/// URL of a port nothing listens on.
pub async fn closed_port_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/v1/forecast.json", addr)
}

fn hour(time: &str, temp: f64, gust: f64) -> Value {
    json!({
        "time": time,
        "temp_c": temp,
        "condition": {"text": "Clear", "icon": "//cdn.weatherapi.com/weather/64x64/night/113.png", "code": 1000},
        "chance_of_rain": 0,
        "wind_kph": 8.3,
        "gust_kph": gust,
        "pressure_mb": 1018.0,
        "uv": 0.0
    })
}

fn day(date: &str, max: f64, rain: u8, code: i32) -> Value {
    json!({
        "date": date,
        "day": {
            "maxtemp_c": max,
            "mintemp_c": 14.1,
            "avgtemp_c": 22.4,
            "maxwind_kph": 18.7,
            "daily_chance_of_rain": rain,
            "daily_chance_of_snow": 0,
            "condition": {"text": "Sunny", "icon": "//cdn.weatherapi.com/weather/64x64/day/113.png", "code": code},
            "uv": 7.0
        },
        "astro": {"sunrise": "05:47 AM", "sunset": "09:50 PM", "moon_phase": "Waxing Crescent"},
        "hour": []
    })
}

/// Paris forecast.json: four days, a hot first day, three hours on day one.
pub fn forecast_fixture() -> Value {
    let mut first = day("2025-06-01", 31.2, 10, 1000);
    first["hour"] = json!([
        hour("2025-06-01 00:00", 17.2, 10.1),
        hour("2025-06-01 01:00", 16.8, 12.4),
        hour("2025-06-01 02:00", 16.1, 11.0),
    ]);
    let mut later = day("2025-06-04", 24.0, 20, 1003);
    later["hour"] = json!([hour("2025-06-04 00:00", 15.0, 9.0)]);

    json!({
        "location": {
            "name": "Paris",
            "region": "Ile-de-France",
            "country": "France",
            "lat": 48.87,
            "lon": 2.33
        },
        "current": {
            "temp_c": 18.5,
            "feelslike_c": 17.9,
            "humidity": 55,
            "wind_kph": 11.2,
            "wind_degree": 250,
            "wind_dir": "WSW",
            "pressure_mb": 1017.0,
            "vis_km": 10.0,
            "uv": 5.0,
            "cloud": 0,
            "condition": {"text": "Clear", "icon": "//cdn.weatherapi.com/weather/64x64/day/113.png", "code": 1000},
            "air_quality": {"co": 210.3, "pm2_5": 6.1, "us-epa-index": 2, "gb-defra-index": 1}
        },
        "forecast": {
            "forecastday": [
                first,
                day("2025-06-02", 27.5, 20, 1003),
                day("2025-06-03", 25.0, 40, 1063),
                later
            ]
        }
    })
}

/// forecast.json slice carrying two provider alerts.
pub fn alerts_fixture() -> Value {
    json!({
        "location": {"name": "Paris"},
        "alerts": {
            "alert": [
                {
                    "headline": "Météo-France: orange thunderstorm warning",
                    "severity": "Moderate",
                    "areas": "Paris",
                    "event": "Thunderstorm Warning",
                    "desc": "Strong thunderstorms expected this evening."
                },
                {
                    "headline": "Météo-France: yellow heat warning",
                    "severity": "Minor",
                    "areas": "Paris; Hauts-de-Seine",
                    "event": "Heat Advisory",
                    "desc": "Temperatures up to 36C expected."
                }
            ]
        }
    })
}
