//! Brazilian postal code (CEP)

use std::fmt;

use crate::ClimaCepError;

const CEP_LENGTH: usize = 8;

/// A CEP that is known to be exactly 8 ASCII digits
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostalCode(String);

impl PostalCode {
    /// Validate raw request input.
    ///
    /// The input is taken as-is: surrounding whitespace, dashes or any other
    /// formatting make it invalid.
    pub fn parse(raw: &str) -> Result<Self, ClimaCepError> {
        if raw.len() == CEP_LENGTH && raw.bytes().all(|b| b.is_ascii_digit()) {
            Ok(Self(raw.to_string()))
        } else {
            Err(ClimaCepError::InvalidZip)
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PostalCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_parse_accepts_eight_digits() {
        let cep = PostalCode::parse("01001000").unwrap();
        assert_eq!(cep.as_str(), "01001000");
        assert_eq!(cep.to_string(), "01001000");
    }

    #[rstest]
    #[case("")]
    #[case("123")]
    #[case("1234567")]
    #[case("123456789")]
    #[case("01001-000")]
    #[case("0100100a")]
    #[case(" 01001000")]
    #[case("01001000 ")]
    #[case("０１００１０００")]
    fn test_parse_rejects_malformed_input(#[case] raw: &str) {
        assert!(matches!(
            PostalCode::parse(raw),
            Err(ClimaCepError::InvalidZip)
        ));
    }
}
