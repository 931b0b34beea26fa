//! Error types and handling for the clima-cep service

use std::fmt;

use thiserror::Error;

/// Identifies which upstream dependency an error came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upstream {
    /// Postal code lookup (ViaCEP)
    AddressResolver,
    /// Current temperature lookup (WeatherAPI)
    TemperatureSource,
}

impl fmt::Display for Upstream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Upstream::AddressResolver => write!(f, "address resolver"),
            Upstream::TemperatureSource => write!(f, "temperature source"),
        }
    }
}

/// Failure of a single outbound call made by one of the upstream clients
#[derive(Error, Debug)]
pub enum ClientError {
    /// The request could not be built or the transport failed (timeouts included)
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The upstream answered with an error status
    #[error("http error: {status}")]
    Status { status: u16 },

    /// The response body did not have the expected shape
    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// The caller gave up before the upstream answered
    #[error("request cancelled")]
    Cancelled,
}

/// Main error type for the clima-cep service
#[derive(Error, Debug)]
pub enum ClimaCepError {
    /// The postal code is not exactly 8 decimal digits
    #[error("invalid zipcode")]
    InvalidZip,

    /// The address resolver found no address for the postal code
    #[error("can not find zipcode")]
    NotFound,

    /// One of the upstream services failed
    #[error("{upstream}: {cause}")]
    Upstream {
        upstream: Upstream,
        #[source]
        cause: ClientError,
    },

    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl ClimaCepError {
    /// Wrap a client failure, remembering which upstream produced it
    pub fn upstream(upstream: Upstream, cause: ClientError) -> Self {
        Self::Upstream { upstream, cause }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            ClimaCepError::InvalidZip | ClimaCepError::NotFound => self.to_string(),
            ClimaCepError::Upstream { upstream, .. } => {
                format!("upstream service unavailable: {upstream}")
            }
            ClimaCepError::Config { .. } => {
                "Configuration error. Please check the service environment.".to_string()
            }
        }
    }
}
