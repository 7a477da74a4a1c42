use meteo_core::{Config, WeatherConfig};
use meteo_weather::{ProviderOptions, WeatherError, WeatherProvider};
use std::sync::Arc;
use std::time::Duration;

/// Shared, read-only state handed to every handler
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub provider: WeatherProvider,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self, WeatherError> {
        let provider = WeatherProvider::new(provider_options(&config.weather))?;
        Ok(Self {
            config: Arc::new(config),
            provider,
        })
    }

    /// Plain string comparison against the configured token.
    pub fn token_matches(&self, token: &str) -> bool {
        token == self.config.server.api_token
    }
}

pub fn provider_options(weather: &WeatherConfig) -> ProviderOptions {
    ProviderOptions {
        geocoding_url: weather.geocoding_url.clone(),
        archive_url: weather.archive_url.clone(),
        geocoding_count: weather.geocoding_count,
        daily_variables: weather.daily_variables.clone(),
        hourly_variables: weather.hourly_variables.clone(),
        timezone: Some(weather.timezone.clone()).filter(|tz| !tz.is_empty()),
        timeout: Duration::from_secs(weather.request_timeout_secs),
    }
}
