use serde::{Deserialize, Serialize};

/// A place resolved by the geocoder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    pub country: String,
    pub country_code: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub elevation: Option<f64>,
}

impl Location {
    /// "City, Country"
    pub fn display_name(&self) -> String {
        format!("{}, {}", self.name, self.country)
    }
}

/// Observations returned by the historical archive for a single day.
///
/// The `daily`/`hourly` blocks are passed through untouched since their
/// shape depends on the configured variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoricWeather {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub elevation: Option<f64>,
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub daily_units: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub daily: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hourly_units: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hourly: Option<serde_json::Value>,
}

/// Weather provider errors
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("information for the city {city}, {country} not found")]
    LocationNotFound { city: String, country: String },

    #[error("Upstream error: {status} - {reason}")]
    Upstream { status: u16, reason: String },

    #[error("Parse error: {0}")]
    Parse(String),
}

impl WeatherError {
    /// Message safe to hand back to API callers.
    pub fn user_message(&self) -> String {
        match self {
            Self::Network(e) if e.is_timeout() => "weather service timed out".to_string(),
            Self::Network(_) => "weather service is unreachable".to_string(),
            Self::LocationNotFound { .. } => self.to_string(),
            Self::Upstream { reason, .. } => format!("weather service error: {}", reason),
            Self::Parse(_) => "weather service returned an unexpected response".to_string(),
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Network(e) if e.is_timeout())
    }
}
