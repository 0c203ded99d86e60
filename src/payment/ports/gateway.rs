//! Gateway port for creating and confirming payment intents.

use crate::payment::domain::{IntentId, IssuedIntent, PaymentAmount};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for payment gateway operations.
pub type PaymentGatewayResult<T> = Result<T, PaymentGatewayError>;

/// Contract for an external card processor.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Creates an intent to charge `amount`.
    ///
    /// # Errors
    ///
    /// Returns [`PaymentGatewayError::Unavailable`] when the processor cannot
    /// be reached.
    async fn create_intent(&self, amount: PaymentAmount) -> PaymentGatewayResult<IssuedIntent>;

    /// Confirms an intent and reports whether the charge succeeded.
    ///
    /// `Ok(false)` is a recoverable decline; the payer may retry. Confirming
    /// an already-succeeded intent returns `Ok(true)` again.
    ///
    /// # Errors
    ///
    /// Returns [`PaymentGatewayError::IntentNotFound`] for unknown intents or
    /// [`PaymentGatewayError::Unavailable`] when the processor cannot be
    /// reached.
    async fn confirm_intent(&self, intent_id: &IntentId) -> PaymentGatewayResult<bool>;
}

/// Errors returned by payment gateway adapters.
#[derive(Debug, Clone, Error)]
pub enum PaymentGatewayError {
    /// The gateway has no record of the intent.
    #[error("payment intent not found: {0}")]
    IntentNotFound(IntentId),

    /// The gateway could not be reached or failed internally.
    #[error("payment gateway unavailable: {0}")]
    Unavailable(Arc<dyn std::error::Error + Send + Sync>),
}

impl PaymentGatewayError {
    /// Wraps a transport or storage failure.
    pub fn unavailable(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Unavailable(Arc::new(err))
    }
}
