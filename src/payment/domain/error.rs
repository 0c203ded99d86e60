//! Error types for payment domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing payment domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PaymentDomainError {
    /// The payment intent identifier is empty after trimming.
    #[error("payment intent identifier must not be empty")]
    EmptyIntentId,

    /// The payment amount is zero.
    #[error("payment amount must be positive")]
    ZeroAmount,

    /// A persisted minor-unit amount does not fit the domain type.
    #[error("payment amount out of range: {0}")]
    AmountOutOfRange(i64),
}

/// Error returned while parsing intent status from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown payment intent status: {0}")]
pub struct ParseIntentStatusError(pub String);
