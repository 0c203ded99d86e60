//! Application aggregate root and lifecycle status.

use super::{ApplicationDomainError, ApplicationId, ParseApplicationStatusError, ResumeRef};
use crate::identity::domain::UserId;
use crate::job::domain::JobId;
use crate::payment::domain::IntentId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Application lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    /// Submitted; the application fee is outstanding.
    PendingPayment,
    /// Paid and awaiting employer review.
    Pending,
    /// Accepted by the employer.
    Accepted,
    /// Rejected by the employer.
    Rejected,
}

impl ApplicationStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PendingPayment => "pending_payment",
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
        }
    }

    /// Returns `true` when `target` is a legal next status.
    #[must_use]
    pub const fn can_transition_to(self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::PendingPayment, Self::Pending)
                | (Self::Pending, Self::Accepted | Self::Rejected)
        )
    }

    /// Returns `true` for review outcomes that admit no further change.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Accepted | Self::Rejected)
    }

    /// Returns the payment flag every application in this status carries.
    #[must_use]
    pub const fn implies_paid(self) -> bool {
        !matches!(self, Self::PendingPayment)
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ApplicationStatus {
    type Error = ParseApplicationStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "pending_payment" => Ok(Self::PendingPayment),
            "pending" => Ok(Self::Pending),
            "accepted" => Ok(Self::Accepted),
            "rejected" => Ok(Self::Rejected),
            _ => Err(ParseApplicationStatusError(value.to_owned())),
        }
    }
}

/// Payment progress as reported to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentState {
    /// The fee has been settled.
    Paid,
    /// The fee is outstanding.
    Pending,
}

impl PaymentState {
    /// Derives the payment state from the paid flag.
    #[must_use]
    pub const fn from_paid(is_paid: bool) -> Self {
        if is_paid { Self::Paid } else { Self::Pending }
    }
}

/// A job seeker's application to a job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Application {
    id: ApplicationId,
    job_id: JobId,
    applicant_id: UserId,
    resume: ResumeRef,
    status: ApplicationStatus,
    is_paid: bool,
    payment_intent_id: Option<IntentId>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedApplicationData {
    /// Persisted application identifier.
    pub id: ApplicationId,
    /// Job applied to.
    pub job_id: JobId,
    /// Applying user.
    pub applicant_id: UserId,
    /// Stored resume.
    pub resume: ResumeRef,
    /// Persisted status.
    pub status: ApplicationStatus,
    /// Persisted payment flag.
    pub is_paid: bool,
    /// Latest issued or settling intent.
    pub payment_intent_id: Option<IntentId>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Application {
    /// Creates an unpaid application awaiting its fee.
    #[must_use]
    pub fn submit(
        job_id: JobId,
        applicant_id: UserId,
        resume: ResumeRef,
        clock: &impl Clock,
    ) -> Self {
        let timestamp = clock.utc();
        Self {
            id: ApplicationId::new(),
            job_id,
            applicant_id,
            resume,
            status: ApplicationStatus::PendingPayment,
            is_paid: false,
            payment_intent_id: None,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs an application from persisted storage.
    ///
    /// # Errors
    ///
    /// Returns [`ApplicationDomainError::InconsistentPaymentState`] when the
    /// stored status and payment flag disagree.
    pub fn from_persisted(data: PersistedApplicationData) -> Result<Self, ApplicationDomainError> {
        if data.status.implies_paid() != data.is_paid {
            return Err(ApplicationDomainError::InconsistentPaymentState {
                application_id: data.id,
                status: data.status,
                is_paid: data.is_paid,
            });
        }
        Ok(Self {
            id: data.id,
            job_id: data.job_id,
            applicant_id: data.applicant_id,
            resume: data.resume,
            status: data.status,
            is_paid: data.is_paid,
            payment_intent_id: data.payment_intent_id,
            created_at: data.created_at,
            updated_at: data.updated_at,
        })
    }

    /// Returns the application identifier.
    #[must_use]
    pub const fn id(&self) -> ApplicationId {
        self.id
    }

    /// Returns the job applied to.
    #[must_use]
    pub const fn job_id(&self) -> JobId {
        self.job_id
    }

    /// Returns the applying user.
    #[must_use]
    pub const fn applicant_id(&self) -> UserId {
        self.applicant_id
    }

    /// Returns the stored resume reference.
    #[must_use]
    pub const fn resume(&self) -> &ResumeRef {
        &self.resume
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> ApplicationStatus {
        self.status
    }

    /// Returns whether the application fee has been settled.
    #[must_use]
    pub const fn is_paid(&self) -> bool {
        self.is_paid
    }

    /// Returns the client-facing payment state.
    #[must_use]
    pub const fn payment_state(&self) -> PaymentState {
        PaymentState::from_paid(self.is_paid)
    }

    /// Returns the latest payment intent, if one was issued.
    #[must_use]
    pub const fn payment_intent_id(&self) -> Option<&IntentId> {
        self.payment_intent_id.as_ref()
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the last modification timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Records a freshly issued intent, replacing any earlier one.
    ///
    /// # Errors
    ///
    /// Returns [`ApplicationDomainError::AlreadyPaid`] once the fee is
    /// settled.
    pub fn attach_intent(
        &mut self,
        intent_id: IntentId,
        clock: &impl Clock,
    ) -> Result<(), ApplicationDomainError> {
        self.ensure_unpaid()?;
        self.payment_intent_id = Some(intent_id);
        self.touch(clock);
        Ok(())
    }

    /// Settles the fee with `intent_id` and moves the application to review.
    ///
    /// # Errors
    ///
    /// Returns [`ApplicationDomainError::AlreadyPaid`] once the fee is
    /// settled.
    pub fn mark_paid(
        &mut self,
        intent_id: IntentId,
        clock: &impl Clock,
    ) -> Result<(), ApplicationDomainError> {
        self.ensure_unpaid()?;
        self.transition_to(ApplicationStatus::Pending)?;
        self.is_paid = true;
        self.payment_intent_id = Some(intent_id);
        self.touch(clock);
        Ok(())
    }

    /// Applies an employer review outcome.
    ///
    /// # Errors
    ///
    /// Returns [`ApplicationDomainError::InvalidStateTransition`] unless the
    /// application is `pending` and `outcome` is terminal.
    pub fn review(
        &mut self,
        outcome: ApplicationStatus,
        clock: &impl Clock,
    ) -> Result<(), ApplicationDomainError> {
        self.transition_to(outcome)?;
        self.touch(clock);
        Ok(())
    }

    const fn ensure_unpaid(&self) -> Result<(), ApplicationDomainError> {
        if self.is_paid {
            return Err(ApplicationDomainError::AlreadyPaid(self.id));
        }
        Ok(())
    }

    fn transition_to(&mut self, target: ApplicationStatus) -> Result<(), ApplicationDomainError> {
        if !self.status.can_transition_to(target) {
            return Err(ApplicationDomainError::InvalidStateTransition {
                application_id: self.id,
                from: self.status,
                to: target,
            });
        }
        self.status = target;
        Ok(())
    }

    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}
