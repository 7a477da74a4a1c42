use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use url::Url;

/// Overrides the config file location.
pub const CONFIG_PATH_ENV: &str = "METEO_PROXY_CONFIG";
/// Overrides `server.api_token`.
pub const API_TOKEN_ENV: &str = "METEO_PROXY_API_TOKEN";
/// Overrides `server.bind_address`.
pub const BIND_ADDRESS_ENV: &str = "METEO_PROXY_BIND";

const APP_DIR: &str = "meteo-proxy";
const CONFIG_FILE: &str = "config.toml";

/// Open-Meteo caps geocoding searches at this many results.
const MAX_GEOCODING_COUNT: u32 = 100;

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Get a single-line summary of all errors
    pub fn error_summary(&self) -> String {
        if self.errors.is_empty() {
            return String::new();
        }
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// HTTP listener and access settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Upstream Open-Meteo settings
    #[serde(default)]
    pub weather: WeatherConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Socket address to listen on, e.g. "127.0.0.1:5000"
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Shared token every request must carry in its `token` field.
    /// Prefer setting it through `METEO_PROXY_API_TOKEN`.
    #[serde(default)]
    pub api_token: String,

    /// Maximum accepted request body size
    #[serde(default = "default_body_limit_bytes")]
    pub body_limit_bytes: usize,

    /// Whole-request timeout, upstream calls included
    #[serde(default = "default_server_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_bind_address() -> String {
    "127.0.0.1:5000".to_string()
}

fn default_body_limit_bytes() -> usize {
    16 * 1024
}

fn default_server_timeout_secs() -> u64 {
    30
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            api_token: String::new(),
            body_limit_bytes: default_body_limit_bytes(),
            request_timeout_secs: default_server_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// Open-Meteo geocoding search endpoint
    #[serde(default = "default_geocoding_url")]
    pub geocoding_url: String,

    /// Open-Meteo historical archive endpoint
    #[serde(default = "default_archive_url")]
    pub archive_url: String,

    /// How many candidates to request from the geocoder
    #[serde(default = "default_geocoding_count")]
    pub geocoding_count: u32,

    /// Daily archive variables, e.g. "temperature_2m_max"
    #[serde(default = "default_daily_variables")]
    pub daily_variables: Vec<String>,

    /// Hourly archive variables (none by default)
    #[serde(default)]
    pub hourly_variables: Vec<String>,

    /// Timezone passed to the archive API ("auto" resolves from coordinates)
    #[serde(default = "default_timezone")]
    pub timezone: String,

    /// Per-call timeout for upstream requests
    #[serde(default = "default_weather_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_geocoding_url() -> String {
    "https://geocoding-api.open-meteo.com/v1/search".to_string()
}

fn default_archive_url() -> String {
    "https://archive-api.open-meteo.com/v1/archive".to_string()
}

fn default_geocoding_count() -> u32 {
    20
}

fn default_daily_variables() -> Vec<String> {
    [
        "temperature_2m_max",
        "temperature_2m_min",
        "precipitation_sum",
        "wind_speed_10m_max",
    ]
    .iter()
    .map(|v| v.to_string())
    .collect()
}

fn default_timezone() -> String {
    "auto".to_string()
}

fn default_weather_timeout_secs() -> u64 {
    10
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            geocoding_url: default_geocoding_url(),
            archive_url: default_archive_url(),
            geocoding_count: default_geocoding_count(),
            daily_variables: default_daily_variables(),
            hourly_variables: Vec::new(),
            timezone: default_timezone(),
            request_timeout_secs: default_weather_timeout_secs(),
        }
    }
}

impl Config {
    /// Load configuration from the default location, creating it if it
    /// doesn't exist, then apply environment overrides.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        let mut config = if config_path.exists() {
            Self::load_from(&config_path)?
        } else {
            tracing::info!("No config at {}, writing defaults", config_path.display());
            let config = Self::default();
            config.save_to(&config_path)?;
            config
        };

        config.apply_overrides(
            std::env::var(API_TOKEN_ENV).ok(),
            std::env::var(BIND_ADDRESS_ENV).ok(),
        );

        Ok(config)
    }

    /// Load configuration and validate it
    ///
    /// Returns the config along with any validation warnings.
    /// Returns an error if validation fails with critical errors.
    pub fn load_validated() -> Result<(Self, ValidationResult)> {
        let config = Self::load()?;
        let validation = config.validate();

        if !validation.is_valid() {
            anyhow::bail!(
                "Configuration validation failed: {}",
                validation.error_summary()
            );
        }

        for warning in &validation.warnings {
            tracing::warn!("Config warning: {}", warning);
        }

        Ok((config, validation))
    }

    /// Read a config file without applying environment overrides.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        toml::from_str(&contents).context("Failed to parse config file")
    }

    /// Replace file values with non-empty override values.
    pub fn apply_overrides(&mut self, api_token: Option<String>, bind_address: Option<String>) {
        if let Some(token) = api_token.filter(|t| !t.is_empty()) {
            self.server.api_token = token;
        }
        if let Some(addr) = bind_address.filter(|a| !a.is_empty()) {
            self.server.bind_address = addr;
        }
    }

    /// Validate the configuration
    ///
    /// Returns a ValidationResult containing any errors or warnings.
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        if self.server.bind_address.parse::<SocketAddr>().is_err() {
            result.add_error(
                "server.bind_address",
                format!(
                    "Not a socket address: {} (expected host:port)",
                    self.server.bind_address
                ),
            );
        }

        if self.server.api_token.is_empty() {
            result.add_error(
                "server.api_token",
                format!("API token must be set in the config file or {}", API_TOKEN_ENV),
            );
        } else if self.server.api_token.len() < 16 {
            result.add_warning("server.api_token", "API token is shorter than 16 characters");
        }

        if self.server.body_limit_bytes == 0 {
            result.add_error("server.body_limit_bytes", "Body limit must be greater than 0");
        }

        if self.server.request_timeout_secs == 0 {
            result.add_error(
                "server.request_timeout_secs",
                "Request timeout must be greater than 0",
            );
        }

        self.validate_url(&self.weather.geocoding_url, "weather.geocoding_url", &mut result);
        self.validate_url(&self.weather.archive_url, "weather.archive_url", &mut result);

        if self.weather.geocoding_count == 0 {
            result.add_error("weather.geocoding_count", "Geocoding count must be greater than 0");
        } else if self.weather.geocoding_count > MAX_GEOCODING_COUNT {
            result.add_warning(
                "weather.geocoding_count",
                format!("Open-Meteo returns at most {} results", MAX_GEOCODING_COUNT),
            );
        }

        if self.weather.request_timeout_secs == 0 {
            result.add_error(
                "weather.request_timeout_secs",
                "Upstream timeout must be greater than 0",
            );
        }

        if self.weather.daily_variables.is_empty() && self.weather.hourly_variables.is_empty() {
            result.add_warning(
                "weather",
                "No daily or hourly variables - archive responses will carry no observations",
            );
        }

        if !self.weather.daily_variables.is_empty() && self.weather.timezone.is_empty() {
            result.add_warning(
                "weather.timezone",
                "Daily variables usually need a timezone (try \"auto\")",
            );
        }

        result
    }

    /// Validate a URL field
    fn validate_url(&self, url_str: &str, field_name: &str, result: &mut ValidationResult) {
        match Url::parse(url_str) {
            Ok(url) => {
                if url.scheme() != "http" && url.scheme() != "https" {
                    result.add_error(
                        field_name,
                        format!("URL must use http or https scheme, got: {}", url.scheme()),
                    );
                }

                if url.host().is_none() {
                    result.add_error(field_name, "URL must have a host");
                }

                if url.query().is_some() {
                    result.add_warning(field_name, "Query string will be replaced on each call");
                }
            }
            Err(e) => {
                result.add_error(field_name, format!("Invalid URL: {}", e));
            }
        }
    }

    /// Save configuration to the given file, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(path, contents).context("Failed to write config file")?;

        Ok(())
    }

    /// Get the path to the configuration file
    pub fn config_path() -> Result<PathBuf> {
        if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            if !path.is_empty() {
                return Ok(PathBuf::from(path));
            }
        }

        let config_dir = dirs::config_dir()
            .context("Failed to get config directory")?
            .join(APP_DIR);

        Ok(config_dir.join(CONFIG_FILE))
    }
}
