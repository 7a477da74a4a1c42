pub mod config;

pub use config::{
    Config, ConfigValidationError, ServerConfig, ValidationResult, WeatherConfig,
    API_TOKEN_ENV, BIND_ADDRESS_ENV, CONFIG_PATH_ENV,
};

use anyhow::Result;

/// Initialize logging for the service
pub fn init() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {}", e))?;

    tracing::info!("Meteo core initialized");
    Ok(())
}
