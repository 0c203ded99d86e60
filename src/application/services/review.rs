//! Employer review of paid applications.

use super::lifecycle::domain_code;
use crate::application::{
    domain::{Application, ApplicationDomainError, ApplicationId, ApplicationStatus, PaymentState},
    ports::{ApplicationQuery, ApplicationRepository, ApplicationRepositoryError},
};
use crate::error::ErrorKind;
use crate::identity::domain::{Principal, UserId};
use crate::invoice::{
    domain::Invoice,
    ports::{InvoiceRepository, InvoiceRepositoryError},
};
use crate::job::{
    domain::{Job, JobId},
    ports::{JobQuery, JobRepository, JobRepositoryError},
};
use mockable::Clock;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// One application in an employer's inbox.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployerApplicationView {
    /// The application.
    pub application: Application,
    /// Job applied to.
    pub job: Job,
    /// Invoice, present once paid.
    pub invoice: Option<Invoice>,
    /// Derived payment state.
    pub payment_status: PaymentState,
}

/// Service-level errors for review operations.
#[derive(Debug, Error)]
pub enum ReviewError {
    /// Domain rule violated.
    #[error(transparent)]
    Domain(ApplicationDomainError),
    /// Application repository failed.
    #[error(transparent)]
    Repository(#[from] ApplicationRepositoryError),
    /// Job repository failed.
    #[error(transparent)]
    Jobs(#[from] JobRepositoryError),
    /// Invoice repository failed.
    #[error(transparent)]
    Invoices(#[from] InvoiceRepositoryError),
    /// The principal does not own the job.
    #[error("user {user_id} may not review applications for job {job_id}")]
    Unauthorized {
        /// Requesting user.
        user_id: UserId,
        /// Job being reviewed.
        job_id: JobId,
    },
    /// The job does not exist.
    #[error("job {0} not found")]
    JobNotFound(JobId),
    /// The application does not exist.
    #[error("application {0} not found")]
    NotFound(ApplicationId),
    /// The application is not awaiting review.
    #[error("application {id} is {status} and cannot be reviewed")]
    NotReviewable {
        /// Application being reviewed.
        id: ApplicationId,
        /// Its current status.
        status: ApplicationStatus,
    },
    /// The requested status is not a review outcome.
    #[error("{0} is not a review outcome; expected accepted or rejected")]
    InvalidReviewOutcome(ApplicationStatus),
}

impl ReviewError {
    /// Classifies the failure.
    ///
    /// Ownership failures are reported as not found so that callers cannot
    /// discover other employers' records.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Unauthorized { .. } | Self::JobNotFound(_) | Self::NotFound(_) => {
                ErrorKind::NotFound
            }
            Self::NotReviewable { .. } => ErrorKind::StateConflict,
            Self::InvalidReviewOutcome(_) => ErrorKind::Validation,
            Self::Domain(ApplicationDomainError::InconsistentPaymentState { .. }) => {
                ErrorKind::InvariantViolation
            }
            Self::Domain(_) => ErrorKind::StateConflict,
            Self::Repository(_) | Self::Jobs(_) | Self::Invoices(_) => ErrorKind::Internal,
        }
    }

    /// Returns the stable code naming this failure.
    ///
    /// Ownership failures share the not-found code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Domain(err) => domain_code(err),
            Self::Repository(_) | Self::Jobs(_) | Self::Invoices(_) => "internal",
            Self::Unauthorized { .. } | Self::JobNotFound(_) | Self::NotFound(_) => "not_found",
            Self::NotReviewable { .. } => "not_reviewable",
            Self::InvalidReviewOutcome(_) => "invalid_review_outcome",
        }
    }
}

/// Result type for review operations.
pub type ReviewResult<T> = Result<T, ReviewError>;

/// Lets job owners list and decide on paid applications.
#[derive(Clone)]
pub struct ReviewService<A, J, I, C>
where
    A: ApplicationRepository,
    J: JobRepository,
    I: InvoiceRepository,
    C: Clock + Send + Sync,
{
    applications: Arc<A>,
    jobs: Arc<J>,
    invoices: Arc<I>,
    clock: Arc<C>,
}

impl<A, J, I, C> ReviewService<A, J, I, C>
where
    A: ApplicationRepository,
    J: JobRepository,
    I: InvoiceRepository,
    C: Clock + Send + Sync,
{
    /// Creates a review service.
    #[must_use]
    pub const fn new(applications: Arc<A>, jobs: Arc<J>, invoices: Arc<I>, clock: Arc<C>) -> Self {
        Self {
            applications,
            jobs,
            invoices,
            clock,
        }
    }

    /// Lists a job's applications, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewError::JobNotFound`] or [`ReviewError::Unauthorized`]
    /// unless the principal owns the job or is an administrator.
    pub async fn list_for_job(
        &self,
        principal: &Principal,
        job_id: JobId,
    ) -> ReviewResult<Vec<Application>> {
        self.owned_job(principal, job_id).await?;
        Ok(self
            .applications
            .list(&ApplicationQuery::for_job(job_id))
            .await?)
    }

    /// Accepts or rejects a paid application.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewError::InvalidReviewOutcome`] for non-terminal
    /// outcomes, [`ReviewError::NotFound`] or [`ReviewError::Unauthorized`]
    /// when the application is not visible, and
    /// [`ReviewError::NotReviewable`] unless it is `pending`.
    pub async fn set_status(
        &self,
        principal: &Principal,
        application_id: ApplicationId,
        outcome: ApplicationStatus,
    ) -> ReviewResult<Application> {
        if !outcome.is_terminal() {
            return Err(ReviewError::InvalidReviewOutcome(outcome));
        }

        let mut application = self
            .applications
            .find_by_id(application_id)
            .await?
            .ok_or(ReviewError::NotFound(application_id))?;
        self.owned_job(principal, application.job_id())
            .await
            .map_err(|err| match err {
                ReviewError::JobNotFound(_) => ReviewError::NotFound(application_id),
                other => other,
            })?;

        let current = application.status();
        application
            .review(outcome, &*self.clock)
            .map_err(|err| match err {
                ApplicationDomainError::InvalidStateTransition { .. } => {
                    ReviewError::NotReviewable {
                        id: application_id,
                        status: current,
                    }
                }
                other => ReviewError::Domain(other),
            })?;

        self.applications
            .update(&application, ApplicationStatus::Pending)
            .await
            .map_err(|err| match err {
                ApplicationRepositoryError::StaleState { id, .. } => ReviewError::NotReviewable {
                    id,
                    status: current,
                },
                ApplicationRepositoryError::NotFound(id) => ReviewError::NotFound(id),
                other => ReviewError::Repository(other),
            })?;

        info!(
            application_id = %application_id,
            reviewer = %principal.user_id(),
            outcome = %outcome,
            "application reviewed"
        );
        Ok(application)
    }

    /// Lists every application across the principal's jobs with invoices.
    ///
    /// # Errors
    ///
    /// Returns repository errors.
    pub async fn list_for_employer(
        &self,
        principal: &Principal,
    ) -> ReviewResult<Vec<EmployerApplicationView>> {
        let jobs = self
            .jobs
            .list(&JobQuery::all().with_poster(principal.user_id()))
            .await?;
        if jobs.is_empty() {
            return Ok(Vec::new());
        }

        let job_ids = jobs.iter().map(Job::id).collect();
        let applications = self
            .applications
            .list(&ApplicationQuery::all().with_jobs(job_ids))
            .await?;
        let application_ids: Vec<ApplicationId> =
            applications.iter().map(Application::id).collect();
        let mut invoices: HashMap<ApplicationId, Invoice> = self
            .invoices
            .list_for_applications(&application_ids)
            .await?
            .into_iter()
            .map(|invoice| (invoice.application_id(), invoice))
            .collect();
        let jobs_by_id: HashMap<JobId, Job> = jobs.into_iter().map(|job| (job.id(), job)).collect();

        Ok(applications
            .into_iter()
            .filter_map(|application| {
                let job = jobs_by_id.get(&application.job_id())?.clone();
                Some(EmployerApplicationView {
                    invoice: invoices.remove(&application.id()),
                    payment_status: application.payment_state(),
                    job,
                    application,
                })
            })
            .collect())
    }

    async fn owned_job(&self, principal: &Principal, job_id: JobId) -> ReviewResult<Job> {
        let job = self
            .jobs
            .find_by_id(job_id)
            .await?
            .ok_or(ReviewError::JobNotFound(job_id))?;
        if !principal.can_manage_job(job.posted_by()) {
            return Err(ReviewError::Unauthorized {
                user_id: principal.user_id(),
                job_id,
            });
        }
        Ok(job)
    }
}
