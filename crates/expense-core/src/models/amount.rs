//! Monetary amount model

use std::fmt;
use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A money value, always held at no more than two decimal places.
///
/// Construction rounds half-up (midpoint away from zero), so `12.345`
/// becomes `12.35` and `12.344` becomes `12.34`. The stored form is the
/// decimal string produced by [`fmt::Display`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Amount(Decimal);

impl Amount {
    /// Decimal places kept after rounding
    pub const SCALE: u32 = 2;

    /// Round `value` to [`Self::SCALE`] places.
    #[must_use]
    pub fn new(value: Decimal) -> Self {
        Self(value.round_dp_with_strategy(Self::SCALE, RoundingStrategy::MidpointAwayFromZero))
    }

    /// Parse free-form amount input from a capture screen.
    ///
    /// Blank input and placeholders (`"."`, or text still carrying a `?`
    /// from an unfinished voice entry) yield `Ok(None)`.
    pub fn parse_input(text: &str) -> Result<Option<Self>> {
        let text = text.trim();
        if text.is_empty() || text == "." || text.contains('?') {
            return Ok(None);
        }
        text.parse().map(Some)
    }

    /// The rounded decimal value
    pub const fn value(self) -> Decimal {
        self.0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Amount {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let value = Decimal::from_str(s.trim())
            .map_err(|error| Error::InvalidInput(format!("invalid amount '{s}': {error}")))?;
        Ok(Self::new(value))
    }
}

impl TryFrom<String> for Amount {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Amount> for String {
    fn from(value: Amount) -> Self {
        value.to_string()
    }
}

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rounds_half_up() {
        assert_eq!("12.345".parse::<Amount>().unwrap().to_string(), "12.35");
        assert_eq!("12.344".parse::<Amount>().unwrap().to_string(), "12.34");
        assert_eq!("0.005".parse::<Amount>().unwrap().to_string(), "0.01");
    }

    #[test]
    fn test_keeps_short_values() {
        assert_eq!("10".parse::<Amount>().unwrap().to_string(), "10");
        assert_eq!("4.5".parse::<Amount>().unwrap().to_string(), "4.5");
    }

    #[test]
    fn test_parse_input_placeholders() {
        assert_eq!(Amount::parse_input("").unwrap(), None);
        assert_eq!(Amount::parse_input("  ").unwrap(), None);
        assert_eq!(Amount::parse_input(".").unwrap(), None);
        assert_eq!(Amount::parse_input("?").unwrap(), None);
        assert_eq!(
            Amount::parse_input(" 3.456 ").unwrap().map(|a| a.to_string()),
            Some("3.46".to_string())
        );
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(matches!(
            Amount::parse_input("ten"),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_serde_uses_string_form() {
        let amount: Amount = "7.125".parse().unwrap();
        let json = serde_json::to_string(&amount).unwrap();
        assert_eq!(json, "\"7.13\"");
        let back: Amount = serde_json::from_str(&json).unwrap();
        assert_eq!(back, amount);
    }
}
