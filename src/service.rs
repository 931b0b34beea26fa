//! Weather-by-postal-code orchestration
//!
//! Validates the CEP, resolves it to an address, asks the temperature source
//! for the current reading at that address and converts it into the three
//! reported scales. Upstream failures are never retried.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use crate::cep::AddressResolver;
use crate::error::{ClimaCepError, Upstream};
use crate::models::{LocationQuery, PostalCode, WeatherResponse};
use crate::weather::TemperatureSource;

/// Service answering "what is the temperature at this CEP"
#[derive(Clone)]
pub struct WeatherService {
    addresses: Arc<dyn AddressResolver>,
    temperatures: Arc<dyn TemperatureSource>,
}

impl WeatherService {
    pub fn new(
        addresses: Arc<dyn AddressResolver>,
        temperatures: Arc<dyn TemperatureSource>,
    ) -> Self {
        Self {
            addresses,
            temperatures,
        }
    }

    /// Current temperature for the postal code `code`.
    ///
    /// `cancel` is handed to both upstream calls; cancelling it aborts
    /// whichever one is in flight.
    #[instrument(skip(self, cancel))]
    pub async fn weather_by_postal_code(
        &self,
        code: &str,
        cancel: &CancellationToken,
    ) -> crate::Result<WeatherResponse> {
        let postal_code = PostalCode::parse(code).inspect_err(|_| {
            debug!("Rejected malformed postal code");
        })?;

        let address = self
            .addresses
            .lookup(&postal_code, cancel)
            .await
            .map_err(|cause| {
                warn!("Address lookup for {} failed: {}", postal_code, cause);
                ClimaCepError::upstream(Upstream::AddressResolver, cause)
            })?;

        if !address.is_resolved() {
            info!("No address found for {}", postal_code);
            return Err(ClimaCepError::NotFound);
        }

        let query = LocationQuery::from(&address);
        debug!("Built weather query '{}'", query);

        let temp_c = self
            .temperatures
            .current_temp_c(&query, cancel)
            .await
            .map_err(|cause| {
                warn!("Temperature lookup for '{}' failed: {}", query, cause);
                ClimaCepError::upstream(Upstream::TemperatureSource, cause)
            })?;

        Ok(WeatherResponse::from_celsius(temp_c))
    }
}
