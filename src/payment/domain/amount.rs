//! Fee amounts expressed in whole currency units.

use super::PaymentDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

const MINOR_UNITS_PER_UNIT: u64 = 100;

/// Positive payment amount in whole currency units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaymentAmount(u32);

impl PaymentAmount {
    /// Fee charged to finalize a job application.
    pub const APPLICATION_FEE: Self = Self(100);

    /// Creates a validated amount.
    ///
    /// # Errors
    ///
    /// Returns [`PaymentDomainError::ZeroAmount`] for zero.
    pub const fn new(units: u32) -> Result<Self, PaymentDomainError> {
        if units == 0 {
            return Err(PaymentDomainError::ZeroAmount);
        }
        Ok(Self(units))
    }

    /// Reconstructs an amount from a persisted value.
    ///
    /// # Errors
    ///
    /// Returns [`PaymentDomainError::AmountOutOfRange`] when the value is not
    /// a positive `u32`.
    pub fn from_persisted(units: i64) -> Result<Self, PaymentDomainError> {
        u32::try_from(units)
            .ok()
            .filter(|value| *value > 0)
            .map(Self)
            .ok_or(PaymentDomainError::AmountOutOfRange(units))
    }

    /// Returns the amount in whole units.
    #[must_use]
    pub const fn units(self) -> u32 {
        self.0
    }

    /// Returns the amount in minor units, as charged by the processor.
    #[must_use]
    pub fn minor_units(self) -> u64 {
        u64::from(self.0) * MINOR_UNITS_PER_UNIT
    }
}

impl Default for PaymentAmount {
    fn default() -> Self {
        Self::APPLICATION_FEE
    }
}

impl fmt::Display for PaymentAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
