//! Payment intent records held by a gateway.

use super::{ParseIntentStatusError, PaymentAmount, PaymentDomainError};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Gateway-issued identifier of an in-progress charge.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IntentId(String);

impl IntentId {
    /// Creates an intent identifier from caller-supplied text.
    ///
    /// # Errors
    ///
    /// Returns [`PaymentDomainError::EmptyIntentId`] when the value is blank.
    pub fn new(value: impl Into<String>) -> Result<Self, PaymentDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(PaymentDomainError::EmptyIntentId);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Generates a fresh `pi_`-prefixed identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(format!("pi_{}", Uuid::new_v4().simple()))
    }

    /// Returns the identifier as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IntentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Secret handed to the payer's client to complete an intent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientSecret(String);

impl ClientSecret {
    /// Generates a client secret bound to an intent.
    #[must_use]
    pub fn generate_for(intent_id: &IntentId) -> Self {
        Self(format!("{intent_id}_secret_{}", Uuid::new_v4().simple()))
    }

    /// Wraps a persisted secret.
    #[must_use]
    pub const fn from_persisted(value: String) -> Self {
        Self(value)
    }

    /// Returns the secret as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Processing status of a payment intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentStatus {
    /// Waiting for the payer to confirm.
    RequiresConfirmation,
    /// The charge succeeded.
    Succeeded,
    /// The charge was declined by the processor.
    Declined,
}

impl IntentStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RequiresConfirmation => "requires_confirmation",
            Self::Succeeded => "succeeded",
            Self::Declined => "declined",
        }
    }
}

impl fmt::Display for IntentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for IntentStatus {
    type Error = ParseIntentStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "requires_confirmation" => Ok(Self::RequiresConfirmation),
            "succeeded" => Ok(Self::Succeeded),
            "declined" => Ok(Self::Declined),
            _ => Err(ParseIntentStatusError(value.to_owned())),
        }
    }
}

/// Identifier and client secret returned when an intent is created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedIntent {
    /// Intent identifier used for confirmation.
    pub intent_id: IntentId,
    /// Secret for the payer's client.
    pub client_secret: ClientSecret,
}

/// Gateway-side record of a charge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentIntent {
    id: IntentId,
    client_secret: ClientSecret,
    amount_minor: u64,
    status: IntentStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedIntentData {
    /// Persisted intent identifier.
    pub id: IntentId,
    /// Persisted client secret.
    pub client_secret: ClientSecret,
    /// Persisted amount in minor units.
    pub amount_minor: u64,
    /// Persisted status.
    pub status: IntentStatus,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest status timestamp.
    pub updated_at: DateTime<Utc>,
}

impl PaymentIntent {
    /// Creates an intent awaiting confirmation.
    #[must_use]
    pub fn create(amount: PaymentAmount, clock: &impl Clock) -> Self {
        let id = IntentId::generate();
        let client_secret = ClientSecret::generate_for(&id);
        let timestamp = clock.utc();
        Self {
            id,
            client_secret,
            amount_minor: amount.minor_units(),
            status: IntentStatus::RequiresConfirmation,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs an intent from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedIntentData) -> Self {
        Self {
            id: data.id,
            client_secret: data.client_secret,
            amount_minor: data.amount_minor,
            status: data.status,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the intent identifier.
    #[must_use]
    pub const fn id(&self) -> &IntentId {
        &self.id
    }

    /// Returns the client secret.
    #[must_use]
    pub const fn client_secret(&self) -> &ClientSecret {
        &self.client_secret
    }

    /// Returns the charged amount in minor units.
    #[must_use]
    pub const fn amount_minor(&self) -> u64 {
        self.amount_minor
    }

    /// Returns the processing status.
    #[must_use]
    pub const fn status(&self) -> IntentStatus {
        self.status
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest status timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns the identifier and secret handed back to callers.
    #[must_use]
    pub fn issued(&self) -> IssuedIntent {
        IssuedIntent {
            intent_id: self.id.clone(),
            client_secret: self.client_secret.clone(),
        }
    }

    /// Confirms the intent and reports whether the charge succeeded.
    ///
    /// Confirming a succeeded intent again returns `true` without touching
    /// the record; declined intents stay declined.
    pub fn confirm(&mut self, clock: &impl Clock) -> bool {
        match self.status {
            IntentStatus::RequiresConfirmation => {
                self.status = IntentStatus::Succeeded;
                self.updated_at = clock.utc();
                true
            }
            IntentStatus::Succeeded => true,
            IntentStatus::Declined => false,
        }
    }

    /// Marks a pending intent as declined.
    pub fn decline(&mut self, clock: &impl Clock) {
        if self.status == IntentStatus::RequiresConfirmation {
            self.status = IntentStatus::Declined;
            self.updated_at = clock.utc();
        }
    }
}
