//! `clima-cep` - current temperature for a Brazilian postal code
//!
//! This library resolves a CEP to its city through ViaCEP, looks up the
//! current temperature there on WeatherAPI and reports it in Celsius,
//! Fahrenheit and Kelvin over HTTP.

pub mod api;
pub mod cep;
pub mod config;
pub mod error;
pub mod models;
pub mod service;
pub mod telemetry;
pub mod weather;
pub mod web;

// Re-export core types for public API
pub use cep::{AddressResolver, ViaCepClient};
pub use config::ClimaCepConfig;
pub use error::{ClientError, ClimaCepError, Upstream};
pub use models::{Address, LocationQuery, PostalCode, WeatherResponse};
pub use service::WeatherService;
pub use weather::{TemperatureSource, WeatherApiClient};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, ClimaCepError>;
