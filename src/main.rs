use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize core
    meteo_core::init()?;

    let (config, _) = meteo_core::Config::load_validated()?;

    tracing::info!(
        "Meteo proxy starting on {} (geocoding: {}, archive: {})",
        config.server.bind_address,
        config.weather.geocoding_url,
        config.weather.archive_url
    );

    meteo_server::serve(config).await?;

    tracing::info!("Meteo proxy stopped");
    Ok(())
}
