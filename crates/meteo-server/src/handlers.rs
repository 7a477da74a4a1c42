//! Route handlers.

use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::Html;
use axum::Json;
use chrono::{DateTime, Utc};
use meteo_weather::{HistoricWeather, PlaceQuery};
use serde::{Deserialize, Serialize};
use tracing::instrument;

const HOME_PAGE: &str = "<h1>Meteo proxy</h1>\
    <p><h2>Historical weather by city and date. For the underlying API please visit: </h2>\
    <a href=\"https://open-meteo.com/\">open-meteo.com</a></p>";

/// GET / - landing page.
pub async fn home() -> Html<&'static str> {
    Html(HOME_PAGE)
}

/// Body of `POST /api/v1/weather/`. Every field is optional here so that a
/// missing one produces a specific message instead of a generic 422.
#[derive(Default, Deserialize)]
pub struct WeatherRequest {
    pub token: Option<String>,
    pub requester_name: Option<String>,
    pub location: Option<String>,
    pub date: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WeatherResponse {
    pub requester_name: String,
    pub timestamp: DateTime<Utc>,
    /// "City, Country"
    pub location: String,
    pub country_code: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub elevation: Option<f64>,
    /// The date exactly as it was sent
    pub date: String,
    pub weather: HistoricWeather,
}

/// Inputs that passed every local check; nothing upstream has been called yet.
#[derive(Debug)]
struct CheckedRequest {
    requester_name: String,
    place: PlaceQuery,
    date: String,
}

/// POST /api/v1/weather/ - historical weather for a city on a given day.
#[instrument(skip_all)]
pub async fn weather(
    State(state): State<AppState>,
    payload: Result<Json<WeatherRequest>, JsonRejection>,
) -> Result<Json<WeatherResponse>, ApiError> {
    let request_time = Utc::now();
    let Json(request) = payload?;

    let checked = check_request(&state, request)?;
    tracing::info!(
        requester = %checked.requester_name,
        city = %checked.place.city,
        country = %checked.place.country,
        date = %checked.date,
        "Weather request accepted"
    );

    let location = state.provider.find_location(&checked.place).await?;
    let weather = state
        .provider
        .historic_weather(&location, &checked.date)
        .await?;

    Ok(Json(WeatherResponse {
        requester_name: checked.requester_name,
        timestamp: request_time,
        location: location.display_name(),
        country_code: location.country_code,
        latitude: location.latitude,
        longitude: location.longitude,
        elevation: location.elevation,
        date: checked.date,
        weather,
    }))
}

/// Field presence, token, place and date checks, in that order.
fn check_request(state: &AppState, request: WeatherRequest) -> Result<CheckedRequest, ApiError> {
    let token = request.token.ok_or_else(|| ApiError::missing_field("token"))?;
    if !state.token_matches(&token) {
        tracing::warn!("Rejected request with wrong API token");
        return Err(ApiError::forbidden("wrong API token"));
    }

    let requester_name = request
        .requester_name
        .ok_or_else(|| ApiError::missing_field("requester_name"))?;

    let location = request
        .location
        .ok_or_else(|| ApiError::missing_field("location"))?;
    let place = PlaceQuery::parse(&location)
        .ok_or_else(|| ApiError::forbidden("location must contain city and country"))?;

    let date = request
        .date
        .ok_or_else(|| ApiError::missing_field("date"))?
        .trim()
        .to_string();
    meteo_weather::validate(&date)?;

    Ok(CheckedRequest {
        requester_name,
        place,
        date,
    })
}
