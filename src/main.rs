use std::sync::Arc;

use anyhow::{Context, Result};
use clima_cep::{ClimaCepConfig, ViaCepClient, WeatherApiClient, WeatherService, telemetry, web};

#[tokio::main]
async fn main() -> Result<()> {
    let config = ClimaCepConfig::load()?;
    telemetry::init(&config)?;

    let addresses = ViaCepClient::new(&config.viacep_base_url)
        .context("Failed to create ViaCEP client")?;
    let temperatures = WeatherApiClient::new(&config.weatherapi_base_url, config.api_key()?)
        .context("Failed to create WeatherAPI client")?;
    let service = WeatherService::new(Arc::new(addresses), Arc::new(temperatures));

    tracing::info!("clima-cep {} starting", clima_cep::VERSION);
    web::run(&config, service).await
}
