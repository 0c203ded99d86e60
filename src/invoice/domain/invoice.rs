//! Invoice record and payment status.

use crate::application::domain::ApplicationId;
use crate::identity::domain::UserId;
use crate::payment::domain::{IntentId, PaymentAmount};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Unique identifier for an invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InvoiceId(Uuid);

impl InvoiceId {
    /// Creates a new random invoice identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates an invoice identifier from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the wrapped UUID.
    #[must_use]
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl Default for InvoiceId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for InvoiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error returned while parsing invoice payment status.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown invoice payment status: {0}")]
pub struct ParseInvoicePaymentStatusError(pub String);

/// Settlement outcome recorded on an invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoicePaymentStatus {
    /// The fee was collected.
    Success,
    /// The charge failed after recording.
    Failed,
    /// The fee was returned.
    Refunded,
}

impl InvoicePaymentStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Failed => "failed",
            Self::Refunded => "refunded",
        }
    }
}

impl fmt::Display for InvoicePaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for InvoicePaymentStatus {
    type Error = ParseInvoicePaymentStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "success" => Ok(Self::Success),
            "failed" => Ok(Self::Failed),
            "refunded" => Ok(Self::Refunded),
            _ => Err(ParseInvoicePaymentStatusError(value.to_owned())),
        }
    }
}

/// Immutable record of a settled application fee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Invoice {
    id: InvoiceId,
    user_id: UserId,
    application_id: ApplicationId,
    amount: PaymentAmount,
    payment_status: InvoicePaymentStatus,
    payment_intent_id: IntentId,
    paid_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted invoice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedInvoiceData {
    /// Persisted invoice identifier.
    pub id: InvoiceId,
    /// Paying user.
    pub user_id: UserId,
    /// Settled application.
    pub application_id: ApplicationId,
    /// Amount in whole units.
    pub amount: PaymentAmount,
    /// Settlement outcome.
    pub payment_status: InvoicePaymentStatus,
    /// Intent that settled the application.
    pub payment_intent_id: IntentId,
    /// Settlement timestamp.
    pub paid_at: DateTime<Utc>,
}

impl Invoice {
    /// Creates a successful invoice stamped with the current time.
    #[must_use]
    pub fn settled(
        application_id: ApplicationId,
        user_id: UserId,
        amount: PaymentAmount,
        payment_intent_id: IntentId,
        clock: &impl Clock,
    ) -> Self {
        Self {
            id: InvoiceId::new(),
            user_id,
            application_id,
            amount,
            payment_status: InvoicePaymentStatus::Success,
            payment_intent_id,
            paid_at: clock.utc(),
        }
    }

    /// Reconstructs an invoice from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedInvoiceData) -> Self {
        Self {
            id: data.id,
            user_id: data.user_id,
            application_id: data.application_id,
            amount: data.amount,
            payment_status: data.payment_status,
            payment_intent_id: data.payment_intent_id,
            paid_at: data.paid_at,
        }
    }

    /// Returns the invoice identifier.
    #[must_use]
    pub const fn id(&self) -> InvoiceId {
        self.id
    }

    /// Returns the paying user.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Returns the settled application.
    #[must_use]
    pub const fn application_id(&self) -> ApplicationId {
        self.application_id
    }

    /// Returns the amount in whole units.
    #[must_use]
    pub const fn amount(&self) -> PaymentAmount {
        self.amount
    }

    /// Returns the settlement outcome.
    #[must_use]
    pub const fn payment_status(&self) -> InvoicePaymentStatus {
        self.payment_status
    }

    /// Returns the intent that settled the application.
    #[must_use]
    pub const fn payment_intent_id(&self) -> &IntentId {
        &self.payment_intent_id
    }

    /// Returns the settlement timestamp.
    #[must_use]
    pub const fn paid_at(&self) -> DateTime<Utc> {
        self.paid_at
    }
}
