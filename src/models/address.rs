//! Resolved address and the weather query built from it

use std::fmt;

/// Country literal appended to every weather query
const COUNTRY: &str = "Brazil";

/// Address returned by the address resolver for a postal code
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Address {
    /// City name (ViaCEP `localidade`)
    pub locality: String,
    /// State abbreviation (ViaCEP `uf`)
    pub state: String,
    /// False when the resolver reported that the postal code does not exist
    pub found: bool,
}

impl Address {
    #[must_use]
    pub fn new(locality: impl Into<String>, state: impl Into<String>) -> Self {
        Self {
            locality: locality.into(),
            state: state.into(),
            found: true,
        }
    }

    /// Address for a postal code the resolver does not know
    #[must_use]
    pub fn not_found() -> Self {
        Self::default()
    }

    /// Whether this address can be turned into a weather query
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.found && !self.locality.trim().is_empty() && !self.state.trim().is_empty()
    }
}

/// Free-text location sent to the temperature source, e.g. `São Paulo,SP,Brazil`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationQuery(String);

impl LocationQuery {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&Address> for LocationQuery {
    fn from(address: &Address) -> Self {
        Self(format!(
            "{},{},{COUNTRY}",
            address.locality.trim(),
            address.state.trim()
        ))
    }
}

impl fmt::Display for LocationQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
