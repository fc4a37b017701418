//! Amount value object.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::ValidationError;

/// Non-negative, finite monetary amount.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Amount(f64);

impl Amount {
    /// Creates an amount, rejecting NaN, infinities and negative values.
    pub fn new(value: f64) -> Result<Self, ValidationError> {
        if !value.is_finite() {
            return Err(ValidationError::invalid_format(
                "amount",
                "must be a finite number",
            ));
        }
        if value < 0.0 {
            return Err(ValidationError::negative("amount", value));
        }
        // Normalise -0.0 so equality and display behave.
        Ok(Self(if value == 0.0 { 0.0 } else { value }))
    }

    /// Coerces textual input such as `"100"` or `" 12.5 "` into an amount.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::empty_field("amount"));
        }
        let value = trimmed.parse::<f64>().map_err(|_| {
            ValidationError::invalid_format("amount", format!("'{}' is not a number", trimmed))
        })?;
        Self::new(value)
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for Amount {
    type Error = ValidationError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Amount> for f64 {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
