//! Pure rules applied to provider data: icon URL normalization, thunder
//! detection and the threshold-based alerts attached to every
//! [`Weather`](super::models::Weather).

use super::models::{AlertKind, AlertSeverity, ForecastDay, WeatherAlert};

/// WeatherAPI condition codes that involve thunder
const THUNDER_CODES: [i32; 5] = [1087, 1273, 1276, 1279, 1282];

const HEAVY_RAIN_CHANCE: u8 = 70;
const STRONG_WIND_KPH: f64 = 50.0;
const HEAT_MAX_TEMP_C: f64 = 30.0;

/// Prefix protocol-relative icon URLs (`//cdn.weatherapi.com/...`) with `https:`.
pub fn ensure_https_icon(icon: &str) -> String {
    if icon.starts_with("//") {
        format!("https:{}", icon)
    } else {
        icon.to_string()
    }
}

pub fn is_thunder_risk(code: i32) -> bool {
    THUNDER_CODES.contains(&code)
}

/// Derive simplified alerts from the forecast days.
///
/// Each rule fires at most once, on the first matching day. Output order
/// is storm, heavy rain, strong wind, heat.
pub fn derive_alerts(days: &[ForecastDay]) -> Vec<WeatherAlert> {
    let mut alerts = Vec::new();

    if let Some(day) = days.iter().find(|d| d.risk_thunder) {
        alerts.push(WeatherAlert {
            kind: AlertKind::Storm,
            severity: AlertSeverity::High,
            message: format!("Thunderstorm risk on {}.", day.date),
        });
    }

    if let Some(day) = days.iter().find(|d| d.chance_of_rain >= HEAVY_RAIN_CHANCE) {
        alerts.push(WeatherAlert {
            kind: AlertKind::HeavyRain,
            severity: AlertSeverity::Moderate,
            message: format!("High chance of heavy rain ({}%).", day.chance_of_rain),
        });
    }

    if let Some(day) = days.iter().find(|d| d.wind_max_kph >= STRONG_WIND_KPH) {
        alerts.push(WeatherAlert {
            kind: AlertKind::StrongWind,
            severity: AlertSeverity::High,
            message: format!("Strong winds expected (up to {:.0} km/h).", day.wind_max_kph),
        });
    }

    if let Some(day) = days.iter().find(|d| d.max_temp >= HEAT_MAX_TEMP_C) {
        alerts.push(WeatherAlert {
            kind: AlertKind::Heat,
            severity: AlertSeverity::High,
            message: format!("Heat episode (max {:.1}°C). Stay hydrated.", day.max_temp),
        });
    }

    alerts
}
