use crate::archive::{ApiErrorBody, ArchiveQuery, ARCHIVE_URL};
use crate::geocode::{self, PlaceQuery, SearchResponse, DEFAULT_RESULT_COUNT, GEOCODING_URL};
use crate::types::{HistoricWeather, Location, WeatherError};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tracing::instrument;

const REQUEST_TIMEOUT_SECS: u64 = 10;
const USER_AGENT: &str = concat!("meteo-proxy/", env!("CARGO_PKG_VERSION"));

/// Endpoints and archive variables used by [`WeatherProvider`]
#[derive(Debug, Clone)]
pub struct ProviderOptions {
    pub geocoding_url: String,
    pub archive_url: String,
    pub geocoding_count: u32,
    pub daily_variables: Vec<String>,
    pub hourly_variables: Vec<String>,
    pub timezone: Option<String>,
    pub timeout: Duration,
}

impl Default for ProviderOptions {
    fn default() -> Self {
        Self {
            geocoding_url: GEOCODING_URL.to_string(),
            archive_url: ARCHIVE_URL.to_string(),
            geocoding_count: DEFAULT_RESULT_COUNT,
            daily_variables: Vec::new(),
            hourly_variables: Vec::new(),
            timezone: None,
            timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
        }
    }
}

/// Open-Meteo client. Cheap to clone; clones share one connection pool.
#[derive(Debug, Clone)]
pub struct WeatherProvider {
    client: Arc<Client>,
    options: Arc<ProviderOptions>,
}

impl WeatherProvider {
    pub fn new(options: ProviderOptions) -> Result<Self, WeatherError> {
        let client = Client::builder()
            .timeout(options.timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client: Arc::new(client),
            options: Arc::new(options),
        })
    }

    pub fn options(&self) -> &ProviderOptions {
        &self.options
    }

    /// Resolve a place to the first geocoding result matching both city and
    /// country exactly.
    #[instrument(skip(self), level = "info")]
    pub async fn find_location(&self, query: &PlaceQuery) -> Result<Location, WeatherError> {
        let url = query.search_url(&self.options.geocoding_url, self.options.geocoding_count);

        let response = self.client.get(&url).send().await?;
        let body: SearchResponse = self.handle_response(response).await?;
        let results = body.results.unwrap_or_default();

        tracing::debug!("Geocoder returned {} candidates", results.len());

        match geocode::find_exact_match(&results, query) {
            Some(location) => {
                tracing::info!(
                    "Resolved {} to ({}, {})",
                    location.display_name(),
                    location.latitude,
                    location.longitude
                );
                Ok(location)
            }
            None => Err(WeatherError::LocationNotFound {
                city: query.city.clone(),
                country: query.country.clone(),
            }),
        }
    }

    /// Fetch archive observations for a single day at `location`.
    #[instrument(skip(self, location), fields(place = %location.display_name()), level = "info")]
    pub async fn historic_weather(
        &self,
        location: &Location,
        date: &str,
    ) -> Result<HistoricWeather, WeatherError> {
        let query = ArchiveQuery {
            latitude: location.latitude,
            longitude: location.longitude,
            date,
            daily: &self.options.daily_variables,
            hourly: &self.options.hourly_variables,
            timezone: self.options.timezone.as_deref(),
        };
        let url = query.url(&self.options.archive_url);

        let response = self.client.get(&url).send().await?;
        self.handle_response(response).await
    }

    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, WeatherError> {
        let status = response.status();

        if status.is_success() {
            return response
                .json()
                .await
                .map_err(|e| WeatherError::Parse(format!("JSON parse error: {}", e)));
        }

        let text = match response.text().await {
            Ok(text) => text,
            Err(e) => {
                tracing::debug!("Failed to read Open-Meteo error body: {}", e);
                String::new()
            }
        };
        let reason = serde_json::from_str::<ApiErrorBody>(&text)
            .ok()
            .and_then(|body| body.reason)
            .unwrap_or_else(|| {
                if text.is_empty() {
                    status.to_string()
                } else {
                    text
                }
            });

        tracing::warn!("Open-Meteo returned {}: {}", status, reason);
        Err(WeatherError::Upstream {
            status: status.as_u16(),
            reason,
        })
    }
}
