//! Current temperature lookup via WeatherAPI
//!
//! `WeatherApiClient` asks WeatherAPI for the current conditions of a free-text
//! location and keeps only the Celsius temperature. Every call is bounded by a
//! fixed timeout on top of the caller's cancellation token.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use crate::error::ClientError;
use crate::models::LocationQuery;

pub const DEFAULT_BASE_URL: &str = "https://api.weatherapi.com/v1";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Provides the current temperature for a location
#[async_trait]
pub trait TemperatureSource: Send + Sync {
    async fn current_temp_c(
        &self,
        query: &LocationQuery,
        cancel: &CancellationToken,
    ) -> Result<f64, ClientError>;
}

/// WeatherAPI client
#[derive(Clone)]
pub struct WeatherApiClient {
    client: Client,
    base_url: String,
    api_key: String,
}

// Keeps the API key out of debug output
impl std::fmt::Debug for WeatherApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeatherApiClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

/// `current.json` response, reduced to the field we consume
#[derive(Debug, Deserialize)]
struct CurrentResponse {
    current: CurrentData,
}

#[derive(Debug, Deserialize)]
struct CurrentData {
    temp_c: f64,
}

/// Anything from 400 up counts as a failed lookup, including non-standard codes
fn is_error_status(status: StatusCode) -> bool {
    status.as_u16() >= 400
}

impl WeatherApiClient {
    /// Create a new client against `base_url` (usually [`DEFAULT_BASE_URL`])
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("clima-cep/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    async fn fetch(&self, query: &LocationQuery) -> Result<f64, ClientError> {
        let url = format!("{}/current.json", self.base_url);
        let start_time = Instant::now();

        // reqwest errors carry the request URL, which holds the API key
        let response = self
            .client
            .get(&url)
            .query(&[("key", self.api_key.as_str()), ("q", query.as_str())])
            .send()
            .await
            .map_err(reqwest::Error::without_url)?;

        let status = response.status();
        if is_error_status(status) {
            warn!("WeatherAPI returned status {} for '{}'", status, query);
            return Err(ClientError::Status {
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(reqwest::Error::without_url)?;
        let decoded: CurrentResponse = serde_json::from_slice(&body)?;

        let elapsed = start_time.elapsed();
        if elapsed.as_secs() > 2 {
            warn!("Slow WeatherAPI response: {:.3}s", elapsed.as_secs_f64());
        } else {
            debug!("WeatherAPI answered in {:.3}s", elapsed.as_secs_f64());
        }

        Ok(decoded.current.temp_c)
    }
}

#[async_trait]
impl TemperatureSource for WeatherApiClient {
    #[instrument(name = "weatherapi_current", skip(self, cancel), fields(q = %query))]
    async fn current_temp_c(
        &self,
        query: &LocationQuery,
        cancel: &CancellationToken,
    ) -> Result<f64, ClientError> {
        let temp_c = tokio::select! {
            biased;
            () = cancel.cancelled() => Err(ClientError::Cancelled),
            result = self.fetch(query) => result,
        }?;

        info!("Current temperature for '{}': {}°C", query, temp_c);
        Ok(temp_c)
    }
}
