//! Error types for the application domain.

use super::{ApplicationId, ApplicationStatus};
use thiserror::Error;

/// Errors returned by application aggregate operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApplicationDomainError {
    /// The resume reference is empty.
    #[error("resume reference must not be empty")]
    EmptyResumeRef,

    /// The requested status change is not a valid lifecycle transition.
    #[error("invalid transition for application {application_id}: {from} -> {to}")]
    InvalidStateTransition {
        /// Application being changed.
        application_id: ApplicationId,
        /// Current status.
        from: ApplicationStatus,
        /// Requested status.
        to: ApplicationStatus,
    },

    /// The application fee has already been settled.
    #[error("application {0} is already paid")]
    AlreadyPaid(ApplicationId),

    /// Persisted status and payment flag disagree.
    #[error("application {application_id} has status {status} with is_paid={is_paid}")]
    InconsistentPaymentState {
        /// Offending application.
        application_id: ApplicationId,
        /// Persisted status.
        status: ApplicationStatus,
        /// Persisted payment flag.
        is_paid: bool,
    },
}

/// Error returned while parsing application status values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown application status: {0}")]
pub struct ParseApplicationStatusError(pub String);
