//! Repository port for applications, including compare-and-swap writes.

use crate::application::domain::{Application, ApplicationId, ApplicationStatus};
use crate::identity::domain::UserId;
use crate::invoice::domain::Invoice;
use crate::job::domain::JobId;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for application repository operations.
pub type ApplicationRepositoryResult<T> = Result<T, ApplicationRepositoryError>;

/// Equality filters for application listings. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplicationQuery {
    /// Restrict to applications for any of these jobs.
    pub job_ids: Option<Vec<JobId>>,
    /// Restrict to one applicant.
    pub applicant_id: Option<UserId>,
    /// Restrict to a lifecycle status.
    pub status: Option<ApplicationStatus>,
}

impl ApplicationQuery {
    /// Creates a query that matches every application.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Restricts the query to a single job.
    #[must_use]
    pub fn for_job(job_id: JobId) -> Self {
        Self::default().with_jobs(vec![job_id])
    }

    /// Restricts the query to a set of jobs.
    #[must_use]
    pub fn with_jobs(mut self, job_ids: Vec<JobId>) -> Self {
        self.job_ids = Some(job_ids);
        self
    }

    /// Restricts the query to an applicant.
    #[must_use]
    pub const fn with_applicant(mut self, applicant_id: UserId) -> Self {
        self.applicant_id = Some(applicant_id);
        self
    }

    /// Restricts the query to a status.
    #[must_use]
    pub const fn with_status(mut self, status: ApplicationStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Returns `true` when the application satisfies every set filter.
    #[must_use]
    pub fn matches(&self, application: &Application) -> bool {
        self.job_ids
            .as_ref()
            .is_none_or(|ids| ids.contains(&application.job_id()))
            && self
                .applicant_id
                .is_none_or(|applicant| application.applicant_id() == applicant)
            && self.status.is_none_or(|status| application.status() == status)
    }
}

/// Application persistence contract.
///
/// Writes that change lifecycle state are conditional on the status the
/// caller read, so two racing requests cannot both apply a transition.
#[async_trait]
pub trait ApplicationRepository: Send + Sync {
    /// Stores a new application.
    ///
    /// # Errors
    ///
    /// Returns [`ApplicationRepositoryError::DuplicateApplication`] when the
    /// applicant already applied to the job.
    async fn store(&self, application: &Application) -> ApplicationRepositoryResult<()>;

    /// Finds an application by identifier.
    async fn find_by_id(
        &self,
        id: ApplicationId,
    ) -> ApplicationRepositoryResult<Option<Application>>;

    /// Finds the application an applicant submitted to a job.
    async fn find_by_job_and_applicant(
        &self,
        job_id: JobId,
        applicant_id: UserId,
    ) -> ApplicationRepositoryResult<Option<Application>>;

    /// Lists applications matching the query, newest first.
    async fn list(&self, query: &ApplicationQuery) -> ApplicationRepositoryResult<Vec<Application>>;

    /// Overwrites the application if its stored status is still `expected`.
    ///
    /// # Errors
    ///
    /// Returns [`ApplicationRepositoryError::StaleState`] when the stored
    /// status changed, or [`ApplicationRepositoryError::NotFound`] when the
    /// application no longer exists.
    async fn update(
        &self,
        application: &Application,
        expected: ApplicationStatus,
    ) -> ApplicationRepositoryResult<()>;

    /// Writes a paid application and its invoice as one atomic unit.
    ///
    /// Nothing is written when any part fails.
    ///
    /// # Errors
    ///
    /// Returns [`ApplicationRepositoryError::StaleState`] when the stored
    /// status is no longer `expected`,
    /// [`ApplicationRepositoryError::DuplicateInvoice`] when an invoice
    /// already exists, or [`ApplicationRepositoryError::NotFound`].
    async fn settle_payment(
        &self,
        application: &Application,
        expected: ApplicationStatus,
        invoice: &Invoice,
    ) -> ApplicationRepositoryResult<()>;
}

/// Errors returned by application repository implementations.
#[derive(Debug, Clone, Error)]
pub enum ApplicationRepositoryError {
    /// The applicant already applied to the job.
    #[error("user {applicant_id} already applied to job {job_id}")]
    DuplicateApplication {
        /// Job applied to.
        job_id: JobId,
        /// Applying user.
        applicant_id: UserId,
    },

    /// The application was not found.
    #[error("application not found: {0}")]
    NotFound(ApplicationId),

    /// The stored status no longer matches the expected status.
    #[error("application {id} is no longer {expected}")]
    StaleState {
        /// Application being written.
        id: ApplicationId,
        /// Status the writer expected.
        expected: ApplicationStatus,
    },

    /// The application already has an invoice.
    #[error("application {0} already has an invoice")]
    DuplicateInvoice(ApplicationId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl ApplicationRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
