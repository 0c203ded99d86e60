//! Service layer for posting, editing, and removing jobs.

use crate::error::ErrorKind;
use crate::identity::domain::{Principal, UserId};
use crate::job::{
    domain::{
        CompanyName, Job, JobChanges, JobDescription, JobDomainError, JobId, JobPosting,
        JobStatus, JobTitle,
    },
    ports::{JobQuery, JobRepository, JobRepositoryError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Request payload for posting a job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostJobRequest {
    title: String,
    description: String,
    company_name: String,
}

impl PostJobRequest {
    /// Creates a posting request.
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        company_name: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            company_name: company_name.into(),
        }
    }
}

/// Request payload for a partial job update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateJobRequest {
    title: Option<String>,
    description: Option<String>,
    company_name: Option<String>,
    status: Option<JobStatus>,
}

impl UpdateJobRequest {
    /// Creates an empty update.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a replacement title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets a replacement description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets a replacement company name.
    #[must_use]
    pub fn with_company_name(mut self, company_name: impl Into<String>) -> Self {
        self.company_name = Some(company_name.into());
        self
    }

    /// Sets a replacement status.
    #[must_use]
    pub const fn with_status(mut self, status: JobStatus) -> Self {
        self.status = Some(status);
        self
    }

    fn into_changes(self) -> Result<JobChanges, JobDomainError> {
        Ok(JobChanges {
            title: self.title.map(JobTitle::new).transpose()?,
            description: self.description.map(JobDescription::new).transpose()?,
            company_name: self.company_name.map(CompanyName::new).transpose()?,
            status: self.status,
        })
    }
}

/// Service-level errors for job catalog operations.
#[derive(Debug, Error)]
pub enum JobCatalogError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] JobDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] JobRepositoryError),
    /// No job exists with the given identifier.
    #[error("job {0} not found")]
    NotFound(JobId),
    /// The principal may not perform the operation.
    #[error("user {user_id} may not modify job postings here")]
    Unauthorized {
        /// Requesting user.
        user_id: UserId,
    },
}

impl JobCatalogError {
    /// Classifies the failure.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain(_) => ErrorKind::Validation,
            Self::NotFound(_) | Self::Repository(JobRepositoryError::NotFound(_)) => {
                ErrorKind::NotFound
            }
            Self::Unauthorized { .. } => ErrorKind::Authorization,
            Self::Repository(JobRepositoryError::DuplicateJob(_)) => ErrorKind::StateConflict,
            Self::Repository(JobRepositoryError::Persistence(_)) => ErrorKind::Internal,
        }
    }

    /// Returns the stable code naming this failure.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Domain(_) => "invalid_job",
            Self::NotFound(_) | Self::Repository(JobRepositoryError::NotFound(_)) => {
                "job_not_found"
            }
            Self::Unauthorized { .. } => "forbidden",
            Self::Repository(JobRepositoryError::DuplicateJob(_)) => "duplicate_job",
            Self::Repository(JobRepositoryError::Persistence(_)) => "internal",
        }
    }
}

/// Result type for job catalog operations.
pub type JobCatalogResult<T> = Result<T, JobCatalogError>;

/// Job catalog orchestration service.
#[derive(Clone)]
pub struct JobCatalogService<R, C>
where
    R: JobRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> JobCatalogService<R, C>
where
    R: JobRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new job catalog service.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Posts a new open job on behalf of the principal.
    ///
    /// # Errors
    ///
    /// Returns [`JobCatalogError::Unauthorized`] for principals that may not
    /// post jobs, domain errors for invalid fields, or repository errors.
    pub async fn post(
        &self,
        principal: &Principal,
        request: PostJobRequest,
    ) -> JobCatalogResult<Job> {
        if !principal.can_post_jobs() {
            return Err(JobCatalogError::Unauthorized {
                user_id: principal.user_id(),
            });
        }
        let posting = JobPosting {
            title: JobTitle::new(request.title)?,
            description: JobDescription::new(request.description)?,
            company_name: CompanyName::new(request.company_name)?,
        };
        let job = Job::post(posting, principal.user_id(), &*self.clock);
        self.repository.store(&job).await?;
        info!(job_id = %job.id(), posted_by = %job.posted_by(), "job posted");
        Ok(job)
    }

    /// Applies a partial update to a job owned by the principal.
    ///
    /// Administrators may update any job.
    ///
    /// # Errors
    ///
    /// Returns [`JobCatalogError::NotFound`] for unknown jobs,
    /// [`JobCatalogError::Unauthorized`] when the principal does not own the
    /// job, domain errors for invalid fields, or repository errors.
    pub async fn update(
        &self,
        principal: &Principal,
        job_id: JobId,
        request: UpdateJobRequest,
    ) -> JobCatalogResult<Job> {
        let mut job = self.find_managed(principal, job_id).await?;
        job.apply(request.into_changes()?);
        self.repository.update(&job).await?;
        info!(job_id = %job.id(), status = %job.status(), "job updated");
        Ok(job)
    }

    /// Deletes a job and everything attached to it.
    ///
    /// # Errors
    ///
    /// Returns [`JobCatalogError::NotFound`] for unknown jobs,
    /// [`JobCatalogError::Unauthorized`] when the principal does not own the
    /// job, or repository errors.
    pub async fn delete(&self, principal: &Principal, job_id: JobId) -> JobCatalogResult<()> {
        let job = self.find_managed(principal, job_id).await?;
        self.repository.delete(job.id()).await?;
        info!(job_id = %job_id, deleted_by = %principal.user_id(), "job deleted");
        Ok(())
    }

    /// Finds a job by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`JobCatalogError::Repository`] when lookup fails.
    pub async fn find(&self, job_id: JobId) -> JobCatalogResult<Option<Job>> {
        Ok(self.repository.find_by_id(job_id).await?)
    }

    /// Lists open jobs, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`JobCatalogError::Repository`] when lookup fails.
    pub async fn list_open(&self) -> JobCatalogResult<Vec<Job>> {
        let query = JobQuery::all().with_status(JobStatus::Open);
        Ok(self.repository.list(&query).await?)
    }

    /// Lists jobs posted by the principal, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`JobCatalogError::Repository`] when lookup fails.
    pub async fn list_posted_by(&self, principal: &Principal) -> JobCatalogResult<Vec<Job>> {
        let query = JobQuery::all().with_poster(principal.user_id());
        Ok(self.repository.list(&query).await?)
    }

    async fn find_managed(&self, principal: &Principal, job_id: JobId) -> JobCatalogResult<Job> {
        let job = self
            .repository
            .find_by_id(job_id)
            .await?
            .ok_or(JobCatalogError::NotFound(job_id))?;
        if !principal.can_manage_job(job.posted_by()) {
            return Err(JobCatalogError::Unauthorized {
                user_id: principal.user_id(),
            });
        }
        Ok(job)
    }
}
