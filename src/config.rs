//! Configuration management for the clima-cep service
//!
//! Settings come from an optional TOML file overlaid by environment
//! variables. Keys are flat and match the environment variable names in
//! lowercase (`WEATHERAPI_KEY` -> `weatherapi_key`).

use std::collections::HashMap;
use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::ClimaCepError;

/// File picked up from the working directory when no path is given
const DEFAULT_CONFIG_FILE: &str = "clima-cep.toml";

/// Root configuration structure for the clima-cep service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClimaCepConfig {
    /// WeatherAPI key (required)
    #[serde(default, alias = "WEATHERAPI_KEY")]
    pub weatherapi_key: Option<String>,
    /// Listen port; empty means the default
    #[serde(default, alias = "PORT")]
    pub port: Option<String>,
    /// Base URL for the ViaCEP API
    #[serde(default = "default_viacep_base_url", alias = "VIACEP_BASE_URL")]
    pub viacep_base_url: String,
    /// Base URL for the WeatherAPI API
    #[serde(default = "default_weatherapi_base_url", alias = "WEATHERAPI_BASE_URL")]
    pub weatherapi_base_url: String,
    /// Upper bound for serving one HTTP request, in seconds
    #[serde(default = "default_request_timeout", alias = "REQUEST_TIMEOUT_SECONDS")]
    pub request_timeout_seconds: u64,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format", alias = "LOG_FORMAT")]
    pub log_format: String,
}

// Default value functions
fn default_port() -> u16 {
    8080
}

fn default_viacep_base_url() -> String {
    crate::cep::DEFAULT_BASE_URL.to_string()
}

fn default_weatherapi_base_url() -> String {
    crate::weather::DEFAULT_BASE_URL.to_string()
}

fn default_request_timeout() -> u64 {
    15
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for ClimaCepConfig {
    fn default() -> Self {
        Self {
            weatherapi_key: None,
            port: None,
            viacep_base_url: default_viacep_base_url(),
            weatherapi_base_url: default_weatherapi_base_url(),
            request_timeout_seconds: default_request_timeout(),
            log_format: default_log_format(),
        }
    }
}

impl ClimaCepConfig {
    /// Load configuration from `clima-cep.toml` (if present) and the process environment
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from the specified file and the process environment
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
        Self::build(Some(config_file), Environment::default())
    }

    /// Load configuration from an explicit set of environment variables only
    pub fn from_env_map(vars: HashMap<String, String>) -> Result<Self> {
        Self::build(None, Environment::default().source(Some(vars)))
    }

    fn build(config_file: Option<PathBuf>, environment: Environment) -> Result<Self> {
        let mut builder = Config::builder();

        if let Some(config_file) = config_file.filter(|path| path.exists()) {
            builder = builder.add_source(
                File::from(config_file)
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        builder = builder.add_source(environment);

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: ClimaCepConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Apply default values to missing configuration fields
    pub fn apply_defaults(&mut self) {
        if self.port.as_deref().is_some_and(|port| port.trim().is_empty()) {
            self.port = None;
        }
        if self.viacep_base_url.is_empty() {
            self.viacep_base_url = default_viacep_base_url();
        }
        if self.weatherapi_base_url.is_empty() {
            self.weatherapi_base_url = default_weatherapi_base_url();
        }
        if self.request_timeout_seconds == 0 {
            self.request_timeout_seconds = default_request_timeout();
        }
        if self.log_format.is_empty() {
            self.log_format = default_log_format();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.api_key()?;
        self.port()?;

        if self.request_timeout_seconds > 300 {
            return Err(
                ClimaCepError::config("Request timeout cannot exceed 300 seconds").into(),
            );
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.log_format.as_str()) {
            return Err(ClimaCepError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.log_format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        for (name, url) in [
            ("ViaCEP", &self.viacep_base_url),
            ("WeatherAPI", &self.weatherapi_base_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ClimaCepError::config(format!(
                    "{name} base URL must be a valid HTTP or HTTPS URL"
                ))
                .into());
            }
        }

        Ok(())
    }

    /// The WeatherAPI key. Missing or empty keys are a configuration error.
    pub fn api_key(&self) -> Result<&str> {
        match self.weatherapi_key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => Ok(key),
            _ => Err(ClimaCepError::config("missing WEATHERAPI_KEY").into()),
        }
    }

    /// Port to listen on
    pub fn port(&self) -> Result<u16> {
        match self.port.as_deref().map(str::trim) {
            None | Some("") => Ok(default_port()),
            Some(port) => port.parse().map_err(|_| {
                anyhow::Error::from(ClimaCepError::config(format!(
                    "Invalid PORT '{port}'. Must be 0-65535"
                )))
            }),
        }
    }

    /// Address the HTTP server binds to
    pub fn listen_addr(&self) -> Result<SocketAddr> {
        Ok(SocketAddr::from((Ipv4Addr::UNSPECIFIED, self.port()?)))
    }

    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }
}
