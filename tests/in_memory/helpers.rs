//! Shared test helpers for in-memory integration tests.

use hireme::application::{
    domain::{Application, ResumeRef},
    services::{ApplicationLifecycleService, InitiateApplicationRequest, ReviewService},
};
use hireme::audit::AuditService;
use hireme::identity::domain::{Principal, Role, UserId};
use hireme::job::{
    domain::Job,
    services::{JobCatalogService, PostJobRequest},
};
use hireme::payment::adapters::InMemoryPaymentGateway;
use hireme::persistence::InMemoryHiringStore;
use mockable::DefaultClock;
use rstest::fixture;
use std::sync::Arc;

/// Lifecycle service over the in-memory store and gateway.
pub type Lifecycle = ApplicationLifecycleService<
    InMemoryHiringStore,
    InMemoryHiringStore,
    InMemoryHiringStore,
    InMemoryPaymentGateway,
    DefaultClock,
>;

/// Every service wired to one in-memory store.
pub struct Platform {
    pub store: Arc<InMemoryHiringStore>,
    pub gateway: Arc<InMemoryPaymentGateway>,
    pub lifecycle: Lifecycle,
    pub review:
        ReviewService<InMemoryHiringStore, InMemoryHiringStore, InMemoryHiringStore, DefaultClock>,
    pub jobs: JobCatalogService<InMemoryHiringStore, DefaultClock>,
    pub audit: AuditService<InMemoryHiringStore, InMemoryHiringStore, InMemoryHiringStore>,
}

/// Provides a fresh platform for each test.
#[fixture]
pub fn platform() -> Platform {
    let store = Arc::new(InMemoryHiringStore::new());
    let gateway = Arc::new(InMemoryPaymentGateway::new());
    let clock = Arc::new(DefaultClock);
    Platform {
        lifecycle: ApplicationLifecycleService::new(
            Arc::clone(&store),
            Arc::clone(&store),
            Arc::clone(&store),
            Arc::clone(&gateway),
            Arc::clone(&clock),
        ),
        review: ReviewService::new(
            Arc::clone(&store),
            Arc::clone(&store),
            Arc::clone(&store),
            Arc::clone(&clock),
        ),
        jobs: JobCatalogService::new(Arc::clone(&store), clock),
        audit: AuditService::new(Arc::clone(&store), Arc::clone(&store), Arc::clone(&store)),
        store,
        gateway,
    }
}

/// Creates an employee principal for `company`.
#[must_use]
pub fn employee(company: &str) -> Principal {
    Principal::new(UserId::new(), Role::Employee).with_company(company)
}

/// Creates a job seeker principal.
#[must_use]
pub fn seeker() -> Principal {
    Principal::new(UserId::new(), Role::JobSeeker)
}

/// Creates an administrator principal.
#[must_use]
pub fn admin() -> Principal {
    Principal::new(UserId::new(), Role::Admin)
}

impl Platform {
    /// Posts an open job as `poster`.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog rejects the posting.
    pub async fn post_job(&self, poster: &Principal, title: &str) -> eyre::Result<Job> {
        let company = poster.company_name().unwrap_or("Acme Robotics");
        Ok(self
            .jobs
            .post(
                poster,
                PostJobRequest::new(title, "Work on the hiring platform end to end", company),
            )
            .await?)
    }

    /// Applies to `job` as `applicant` and leaves the application unpaid.
    ///
    /// # Errors
    ///
    /// Returns an error if initiation fails.
    pub async fn apply(&self, applicant: &Principal, job: &Job) -> eyre::Result<Application> {
        let request = InitiateApplicationRequest::new(
            job.id(),
            applicant.user_id(),
            ResumeRef::new("memory://resumes/cv.pdf")?,
        );
        Ok(self.lifecycle.initiate(applicant, request).await?.application)
    }

    /// Applies to `job` and settles the fee.
    ///
    /// # Errors
    ///
    /// Returns an error if any lifecycle step fails.
    pub async fn apply_and_pay(
        &self,
        applicant: &Principal,
        job: &Job,
    ) -> eyre::Result<Application> {
        self.apply(applicant, job).await?;
        let issued = self
            .lifecycle
            .request_payment(applicant, job.id(), applicant.user_id())
            .await?;
        let confirmed = self
            .lifecycle
            .confirm_payment(
                applicant,
                job.id(),
                applicant.user_id(),
                issued.intent.intent_id,
            )
            .await?;
        Ok(confirmed.application)
    }
}
