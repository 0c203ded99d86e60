//! Failure classification shared by every service.
//!
//! Service error enums report an [`ErrorKind`] so that outer layers can pick
//! a response without matching on individual variants.

use serde::Serialize;
use std::fmt;

/// Broad class of a service failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Input was rejected before any state was consulted.
    Validation,
    /// The caller may not perform the operation.
    Authorization,
    /// A referenced record does not exist or is hidden from the caller.
    NotFound,
    /// Current state forbids the operation.
    StateConflict,
    /// The payment processor declined the charge.
    GatewayDeclined,
    /// The payment processor did not answer in time.
    GatewayTimeout,
    /// The payment processor could not be reached.
    GatewayUnavailable,
    /// Stored data contradicts a lifecycle invariant.
    InvariantViolation,
    /// Infrastructure failure.
    Internal,
}

impl ErrorKind {
    /// Returns the stable snake-case code.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Authorization => "authorization",
            Self::NotFound => "not_found",
            Self::StateConflict => "state_conflict",
            Self::GatewayDeclined => "gateway_declined",
            Self::GatewayTimeout => "gateway_timeout",
            Self::GatewayUnavailable => "gateway_unavailable",
            Self::InvariantViolation => "invariant_violation",
            Self::Internal => "internal",
        }
    }

    /// Returns `true` when retrying the same request may succeed.
    #[must_use]
    pub const fn is_recoverable(self) -> bool {
        matches!(
            self,
            Self::GatewayDeclined | Self::GatewayTimeout | Self::GatewayUnavailable
        )
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
