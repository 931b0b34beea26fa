//! Temperature response model and scale conversions

use serde::{Deserialize, Serialize};

/// Offset used for Kelvin. Deliberately 273 rather than 273.15.
const KELVIN_OFFSET: f64 = 273.0;

/// Current temperature in three scales, each rounded to one decimal place
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct WeatherResponse {
    #[serde(rename = "tempC")]
    pub temp_c: f64,
    #[serde(rename = "tempF")]
    pub temp_f: f64,
    #[serde(rename = "tempK")]
    pub temp_k: f64,
}

impl WeatherResponse {
    /// Convert a Celsius reading into all three scales
    #[must_use]
    pub fn from_celsius(celsius: f64) -> Self {
        Self {
            temp_c: round_one_decimal(celsius),
            temp_f: round_one_decimal(Self::celsius_to_fahrenheit(celsius)),
            temp_k: round_one_decimal(Self::celsius_to_kelvin(celsius)),
        }
    }

    #[must_use]
    pub fn celsius_to_fahrenheit(celsius: f64) -> f64 {
        celsius * 1.8 + 32.0
    }

    #[must_use]
    pub fn celsius_to_kelvin(celsius: f64) -> f64 {
        celsius + KELVIN_OFFSET
    }
}

/// Round half up to one decimal place: `floor(v * 10 + 0.5) / 10`.
///
/// `x.x5` always goes up, never to even.
#[must_use]
pub fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0 + 0.5).floor() / 10.0
}
