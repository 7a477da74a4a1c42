//! Historical weather lookups for meteo-proxy
//!
//! Validates requested calendar dates, resolves place names through the
//! Open-Meteo geocoding API and fetches observations from the Open-Meteo
//! historical archive.

pub mod archive;
pub mod date;
pub mod geocode;
pub mod provider;
pub mod types;

pub use date::{validate, CalendarDate, DateRejection, MIN_ARCHIVE_YEAR};
pub use geocode::PlaceQuery;
pub use provider::{ProviderOptions, WeatherProvider};
pub use types::*;
