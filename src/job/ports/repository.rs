//! Repository port for job persistence and filtered lookup.

use crate::identity::domain::UserId;
use crate::job::domain::{Job, JobId, JobStatus};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for job repository operations.
pub type JobRepositoryResult<T> = Result<T, JobRepositoryError>;

/// Equality filters for job listings. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobQuery {
    /// Restrict to jobs with this status.
    pub status: Option<JobStatus>,
    /// Restrict to jobs owned by this company (exact match).
    pub company_name: Option<String>,
    /// Restrict to jobs posted by this user.
    pub posted_by: Option<UserId>,
}

impl JobQuery {
    /// Creates a query that matches every job.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Restricts the query to a status.
    #[must_use]
    pub const fn with_status(mut self, status: JobStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Restricts the query to a company.
    #[must_use]
    pub fn with_company(mut self, company_name: impl Into<String>) -> Self {
        self.company_name = Some(company_name.into());
        self
    }

    /// Restricts the query to a poster.
    #[must_use]
    pub const fn with_poster(mut self, posted_by: UserId) -> Self {
        self.posted_by = Some(posted_by);
        self
    }

    /// Returns `true` when the job satisfies every set filter.
    #[must_use]
    pub fn matches(&self, job: &Job) -> bool {
        self.status.is_none_or(|status| job.status() == status)
            && self
                .company_name
                .as_deref()
                .is_none_or(|company| job.company_name().as_str() == company)
            && self.posted_by.is_none_or(|poster| job.posted_by() == poster)
    }
}

/// Job persistence contract.
#[async_trait]
pub trait JobRepository: Send + Sync {
    /// Stores a new job.
    ///
    /// # Errors
    ///
    /// Returns [`JobRepositoryError::DuplicateJob`] when the identifier
    /// already exists.
    async fn store(&self, job: &Job) -> JobRepositoryResult<()>;

    /// Persists changes to an existing job.
    ///
    /// # Errors
    ///
    /// Returns [`JobRepositoryError::NotFound`] when the job does not exist.
    async fn update(&self, job: &Job) -> JobRepositoryResult<()>;

    /// Deletes a job together with its applications and their invoices.
    ///
    /// # Errors
    ///
    /// Returns [`JobRepositoryError::NotFound`] when the job does not exist.
    async fn delete(&self, id: JobId) -> JobRepositoryResult<()>;

    /// Finds a job by identifier.
    async fn find_by_id(&self, id: JobId) -> JobRepositoryResult<Option<Job>>;

    /// Lists jobs matching the query, newest first.
    async fn list(&self, query: &JobQuery) -> JobRepositoryResult<Vec<Job>>;
}

/// Errors returned by job repository implementations.
#[derive(Debug, Clone, Error)]
pub enum JobRepositoryError {
    /// A job with the same identifier already exists.
    #[error("duplicate job identifier: {0}")]
    DuplicateJob(JobId),

    /// The job was not found.
    #[error("job not found: {0}")]
    NotFound(JobId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl JobRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
