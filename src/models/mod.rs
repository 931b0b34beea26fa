//! Data models for the clima-cep service
//!
//! This module contains the core domain models organized by concern:
//! - Postal code: validated CEP input
//! - Address: resolved locality and the weather query derived from it
//! - Weather: the temperature response in three scales

pub mod address;
pub mod postal_code;
pub mod weather;

// Re-export all public types for convenient access
pub use address::{Address, LocationQuery};
pub use postal_code::PostalCode;
pub use weather::WeatherResponse;
