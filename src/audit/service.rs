//! Filtered platform-wide listings for administrators.

use crate::application::{
    domain::{Application, ApplicationId, ApplicationStatus},
    ports::{ApplicationQuery, ApplicationRepository, ApplicationRepositoryError},
};
use crate::error::ErrorKind;
use crate::identity::domain::{Principal, UserId};
use crate::invoice::{
    domain::{Invoice, InvoicePaymentStatus},
    ports::{InvoiceRepository, InvoiceRepositoryError},
};
use crate::job::{
    domain::{Job, JobId, JobStatus},
    ports::{JobQuery, JobRepository, JobRepositoryError},
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// Filters for the application audit listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplicationAuditFilter {
    /// Restrict to jobs owned by this company.
    pub company_name: Option<String>,
    /// Restrict to a lifecycle status.
    pub status: Option<ApplicationStatus>,
    /// Restrict to one job.
    pub job_id: Option<JobId>,
}

/// Filters for the job audit listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobAuditFilter {
    /// Restrict to this company.
    pub company_name: Option<String>,
    /// Restrict to a job status.
    pub status: Option<JobStatus>,
}

/// An application together with the job it targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditedApplication {
    /// The application.
    pub application: Application,
    /// Job applied to.
    pub job: Job,
}

/// Identifier and status of an application, as listed under its job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ApplicationSummary {
    /// Application identifier.
    pub id: ApplicationId,
    /// Lifecycle status.
    pub status: ApplicationStatus,
}

/// A job together with its applications.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditedJob {
    /// The job.
    pub job: Job,
    /// Applications submitted to the job.
    pub applications: Vec<ApplicationSummary>,
}

/// Number of applications listed under [`CompanyAnalytics::recent_applications`].
pub const RECENT_APPLICATION_LIMIT: usize = 5;

/// Application counts by review outcome.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusBreakdown {
    /// Paid and awaiting review.
    pub pending: usize,
    /// Accepted by the employer.
    pub accepted: usize,
    /// Rejected by the employer.
    pub rejected: usize,
}

impl StatusBreakdown {
    fn tally(applications: &[Application]) -> Self {
        let mut breakdown = Self::default();
        for application in applications {
            match application.status() {
                ApplicationStatus::Pending => breakdown.pending += 1,
                ApplicationStatus::Accepted => breakdown.accepted += 1,
                ApplicationStatus::Rejected => breakdown.rejected += 1,
                ApplicationStatus::PendingPayment => {}
            }
        }
        breakdown
    }
}

/// Payment totals across a company's applications.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PaymentAnalytics {
    /// Sum of invoice amounts.
    pub total_revenue: u64,
    /// Invoices recorded as successful.
    pub successful_payments: usize,
    /// Applications not yet paid.
    pub pending_payments: usize,
}

/// Per-job application count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobAnalytics {
    /// Job identifier.
    pub job_id: JobId,
    /// Job title.
    pub job_title: String,
    /// Whether the job accepts applications.
    pub status: JobStatus,
    /// Applications submitted to the job.
    pub total_applications: usize,
    /// When the job was posted.
    pub created_at: DateTime<Utc>,
}

/// One of a company's newest applications.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecentApplication {
    /// Application identifier.
    pub application_id: ApplicationId,
    /// Job applied to.
    pub job_id: JobId,
    /// Lifecycle status.
    pub status: ApplicationStatus,
    /// Whether the fee was paid.
    pub is_paid: bool,
    /// When the application was submitted.
    pub created_at: DateTime<Utc>,
    /// Invoice, present once paid.
    pub invoice: Option<Invoice>,
}

/// Hiring and payment activity for one company.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompanyAnalytics {
    /// Company the figures cover.
    pub company_name: String,
    /// Jobs posted by the company.
    pub total_jobs: usize,
    /// Jobs still open.
    pub active_jobs: usize,
    /// Jobs closed to applications.
    pub closed_jobs: usize,
    /// Applications across all the company's jobs.
    pub total_applications: usize,
    /// Applications by review outcome.
    pub applications_by_status: StatusBreakdown,
    /// Fee collection figures.
    pub payment_analytics: PaymentAnalytics,
    /// Application counts per job, newest job first.
    pub job_analytics: Vec<JobAnalytics>,
    /// Newest applications first.
    pub recent_applications: Vec<RecentApplication>,
}

/// Errors returned by audit operations.
#[derive(Debug, Error)]
pub enum AuditError {
    /// The principal is not an administrator.
    #[error("user {0} may not audit the platform")]
    Forbidden(UserId),
    /// Application repository failed.
    #[error(transparent)]
    Repository(#[from] ApplicationRepositoryError),
    /// Job repository failed.
    #[error(transparent)]
    Jobs(#[from] JobRepositoryError),
    /// Invoice repository failed.
    #[error(transparent)]
    Invoices(#[from] InvoiceRepositoryError),
    /// Analytics were requested without a company.
    #[error("company name is required")]
    MissingCompany,
}

impl AuditError {
    /// Classifies the failure.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Forbidden(_) => ErrorKind::Authorization,
            Self::MissingCompany => ErrorKind::Validation,
            Self::Repository(_) | Self::Jobs(_) | Self::Invoices(_) => ErrorKind::Internal,
        }
    }

    /// Returns the stable code naming this failure.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Forbidden(_) => "forbidden",
            Self::MissingCompany => "company_required",
            Self::Repository(_) | Self::Jobs(_) | Self::Invoices(_) => "internal",
        }
    }
}

/// Result type for audit operations.
pub type AuditResult<T> = Result<T, AuditError>;

/// Read-only administrator views over jobs, applications and invoices.
#[derive(Clone)]
pub struct AuditService<A, J, I>
where
    A: ApplicationRepository,
    J: JobRepository,
    I: InvoiceRepository,
{
    applications: Arc<A>,
    jobs: Arc<J>,
    invoices: Arc<I>,
}

impl<A, J, I> AuditService<A, J, I>
where
    A: ApplicationRepository,
    J: JobRepository,
    I: InvoiceRepository,
{
    /// Creates an audit service.
    #[must_use]
    pub const fn new(applications: Arc<A>, jobs: Arc<J>, invoices: Arc<I>) -> Self {
        Self {
            applications,
            jobs,
            invoices,
        }
    }

    /// Lists applications across the platform, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::Forbidden`] for non-administrators.
    pub async fn list_applications(
        &self,
        principal: &Principal,
        filter: ApplicationAuditFilter,
    ) -> AuditResult<Vec<AuditedApplication>> {
        ensure_auditor(principal)?;
        let ApplicationAuditFilter {
            company_name,
            status,
            job_id,
        } = filter;

        let mut job_query = JobQuery::all();
        if let Some(company) = company_name {
            job_query = job_query.with_company(company);
        }
        let jobs: HashMap<JobId, Job> = self
            .jobs
            .list(&job_query)
            .await?
            .into_iter()
            .filter(|job| job_id.is_none_or(|wanted| job.id() == wanted))
            .map(|job| (job.id(), job))
            .collect();
        if jobs.is_empty() {
            return Ok(Vec::new());
        }

        let mut query = ApplicationQuery::all().with_jobs(jobs.keys().copied().collect());
        if let Some(wanted) = status {
            query = query.with_status(wanted);
        }
        let applications = self.applications.list(&query).await?;

        Ok(applications
            .into_iter()
            .filter_map(|application| {
                let job = jobs.get(&application.job_id())?.clone();
                Some(AuditedApplication { application, job })
            })
            .collect())
    }

    /// Lists jobs across the platform with their applications, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::Forbidden`] for non-administrators.
    pub async fn list_jobs(
        &self,
        principal: &Principal,
        filter: JobAuditFilter,
    ) -> AuditResult<Vec<AuditedJob>> {
        ensure_auditor(principal)?;
        let mut job_query = JobQuery::all();
        if let Some(company) = filter.company_name {
            job_query = job_query.with_company(company);
        }
        if let Some(status) = filter.status {
            job_query = job_query.with_status(status);
        }
        let jobs = self.jobs.list(&job_query).await?;
        if jobs.is_empty() {
            return Ok(Vec::new());
        }

        let job_ids = jobs.iter().map(Job::id).collect();
        let mut by_job: HashMap<JobId, Vec<ApplicationSummary>> = HashMap::new();
        for application in self
            .applications
            .list(&ApplicationQuery::all().with_jobs(job_ids))
            .await?
        {
            by_job
                .entry(application.job_id())
                .or_default()
                .push(ApplicationSummary {
                    id: application.id(),
                    status: application.status(),
                });
        }

        Ok(jobs
            .into_iter()
            .map(|job| AuditedJob {
                applications: by_job.remove(&job.id()).unwrap_or_default(),
                job,
            })
            .collect())
    }

    /// Summarizes a company's jobs, applications and fee revenue.
    ///
    /// Revenue sums every invoice recorded against the company's
    /// applications.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::Forbidden`] for non-administrators and
    /// [`AuditError::MissingCompany`] when `company` is blank.
    pub async fn company_analytics(
        &self,
        principal: &Principal,
        company: &str,
    ) -> AuditResult<CompanyAnalytics> {
        ensure_auditor(principal)?;
        let company_name = company.trim();
        if company_name.is_empty() {
            return Err(AuditError::MissingCompany);
        }

        let jobs = self
            .jobs
            .list(&JobQuery::all().with_company(company_name))
            .await?;
        let applications = if jobs.is_empty() {
            Vec::new()
        } else {
            self.applications
                .list(&ApplicationQuery::all().with_jobs(jobs.iter().map(Job::id).collect()))
                .await?
        };
        let application_ids: Vec<ApplicationId> =
            applications.iter().map(Application::id).collect();
        let mut invoices: HashMap<ApplicationId, Invoice> = if application_ids.is_empty() {
            HashMap::new()
        } else {
            self.invoices
                .list_for_applications(&application_ids)
                .await?
                .into_iter()
                .map(|invoice| (invoice.application_id(), invoice))
                .collect()
        };

        let mut per_job: HashMap<JobId, usize> = HashMap::new();
        for application in &applications {
            *per_job.entry(application.job_id()).or_default() += 1;
        }

        let payments = PaymentAnalytics {
            total_revenue: invoices
                .values()
                .map(|invoice| u64::from(invoice.amount().units()))
                .sum(),
            successful_payments: invoices
                .values()
                .filter(|invoice| invoice.payment_status() == InvoicePaymentStatus::Success)
                .count(),
            pending_payments: applications
                .iter()
                .filter(|application| !application.is_paid())
                .count(),
        };

        let active_jobs = jobs.iter().filter(|job| job.is_open()).count();
        let job_analytics: Vec<JobAnalytics> = jobs
            .iter()
            .map(|job| JobAnalytics {
                job_id: job.id(),
                job_title: job.title().as_str().to_owned(),
                status: job.status(),
                total_applications: per_job.get(&job.id()).copied().unwrap_or_default(),
                created_at: job.created_at(),
            })
            .collect();

        // Repositories list applications newest first.
        let recent_applications = applications
            .iter()
            .take(RECENT_APPLICATION_LIMIT)
            .map(|application| RecentApplication {
                application_id: application.id(),
                job_id: application.job_id(),
                status: application.status(),
                is_paid: application.is_paid(),
                created_at: application.created_at(),
                invoice: invoices.remove(&application.id()),
            })
            .collect();

        Ok(CompanyAnalytics {
            company_name: company_name.to_owned(),
            total_jobs: jobs.len(),
            active_jobs,
            closed_jobs: jobs.len() - active_jobs,
            total_applications: applications.len(),
            applications_by_status: StatusBreakdown::tally(&applications),
            payment_analytics: payments,
            job_analytics,
            recent_applications,
        })
    }
}

fn ensure_auditor(principal: &Principal) -> AuditResult<()> {
    if principal.can_audit() {
        Ok(())
    } else {
        Err(AuditError::Forbidden(principal.user_id()))
    }
}
