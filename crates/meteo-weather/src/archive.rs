//! Open-Meteo historical archive request building.

use serde::Deserialize;

pub const ARCHIVE_URL: &str = "https://archive-api.open-meteo.com/v1/archive";

/// One-day archive request for a coordinate.
#[derive(Debug, Clone)]
pub struct ArchiveQuery<'a> {
    pub latitude: f64,
    pub longitude: f64,
    /// Sent as both `start_date` and `end_date`, exactly as the caller gave it
    pub date: &'a str,
    pub daily: &'a [String],
    pub hourly: &'a [String],
    pub timezone: Option<&'a str>,
}

impl ArchiveQuery<'_> {
    pub fn url(&self, base_url: &str) -> String {
        let mut url = format!(
            "{}?latitude={}&longitude={}&start_date={}&end_date={}",
            base_url,
            self.latitude,
            self.longitude,
            urlencoding::encode(self.date),
            urlencoding::encode(self.date),
        );

        if !self.daily.is_empty() {
            url.push_str(&format!("&daily={}", urlencoding::encode(&self.daily.join(","))));
        }
        if !self.hourly.is_empty() {
            url.push_str(&format!("&hourly={}", urlencoding::encode(&self.hourly.join(","))));
        }
        if let Some(tz) = self.timezone.filter(|tz| !tz.is_empty()) {
            url.push_str(&format!("&timezone={}", urlencoding::encode(tz)));
        }

        url
    }
}

/// Error body Open-Meteo sends with 4xx responses
#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorBody {
    #[serde(default)]
    pub reason: Option<String>,
}
