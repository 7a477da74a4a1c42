//! Forward geocoding: turn "City, Country" into coordinates.
//! Uses the Open-Meteo search API - free, no API key required.

use crate::types::Location;
use serde::Deserialize;

pub const GEOCODING_URL: &str = "https://geocoding-api.open-meteo.com/v1/search";
pub const DEFAULT_RESULT_COUNT: u32 = 20;

/// A place name split into its city and country parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceQuery {
    pub city: String,
    pub country: String,
}

impl PlaceQuery {
    /// Parse `"City, Country"`. Anything after a second comma is ignored.
    /// Returns `None` when either part is missing or blank.
    pub fn parse(raw: &str) -> Option<Self> {
        let mut parts = raw.trim().split(',').map(str::trim);
        let city = parts.next().filter(|c| !c.is_empty())?;
        let country = parts.next().filter(|c| !c.is_empty())?;

        Some(Self {
            city: city.to_string(),
            country: country.to_string(),
        })
    }

    pub(crate) fn search_url(&self, base_url: &str, count: u32) -> String {
        format!(
            "{}?name={}&count={}",
            base_url,
            urlencoding::encode(&self.city),
            count
        )
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchResponse {
    /// Omitted entirely by the API when nothing matches
    #[serde(default)]
    pub results: Option<Vec<SearchResult>>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct SearchResult {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub elevation: Option<f64>,
    #[serde(default)]
    pub country_code: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

/// Pick the first result whose name and country both equal the query,
/// ignoring case.
pub(crate) fn find_exact_match(results: &[SearchResult], query: &PlaceQuery) -> Option<Location> {
    let city = query.city.to_uppercase();
    let country = query.country.to_uppercase();

    results
        .iter()
        .find(|r| {
            r.name.to_uppercase() == city
                && r.country.as_deref().map(str::to_uppercase).as_deref() == Some(country.as_str())
        })
        .map(|r| Location {
            name: r.name.clone(),
            country: r.country.clone().unwrap_or_default(),
            country_code: r.country_code.clone(),
            latitude: r.latitude,
            longitude: r.longitude,
            elevation: r.elevation,
        })
}
