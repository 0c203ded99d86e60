//! Shared fixtures for application service tests.

use crate::application::{domain::ResumeRef, services::ApplicationLifecycleService};
use crate::identity::domain::{Principal, Role, UserId};
use crate::job::{
    domain::{CompanyName, Job, JobChanges, JobDescription, JobPosting, JobStatus, JobTitle},
    ports::JobRepository,
};
use crate::payment::ports::PaymentGateway;
use crate::persistence::InMemoryHiringStore;
use mockable::DefaultClock;
use std::sync::Arc;

pub(super) type Lifecycle<G> = ApplicationLifecycleService<
    InMemoryHiringStore,
    InMemoryHiringStore,
    InMemoryHiringStore,
    G,
    DefaultClock,
>;

pub(super) fn lifecycle<G: PaymentGateway>(
    store: &Arc<InMemoryHiringStore>,
    gateway: Arc<G>,
) -> Lifecycle<G> {
    ApplicationLifecycleService::new(
        Arc::clone(store),
        Arc::clone(store),
        Arc::clone(store),
        gateway,
        Arc::new(DefaultClock),
    )
}

pub(super) fn seeker() -> Principal {
    Principal::new(UserId::new(), Role::JobSeeker)
}

pub(super) fn employer() -> Principal {
    Principal::new(UserId::new(), Role::Employee).with_company("Acme Robotics")
}

pub(super) fn admin() -> Principal {
    Principal::new(UserId::new(), Role::Admin)
}

pub(super) fn resume() -> eyre::Result<ResumeRef> {
    Ok(ResumeRef::new("uploads/resumes/3f2a9c.pdf")?)
}

pub(super) async fn post_job(
    store: &InMemoryHiringStore,
    poster: &Principal,
    status: JobStatus,
) -> eyre::Result<Job> {
    let posting = JobPosting {
        title: JobTitle::new("Backend Engineer")?,
        description: JobDescription::new("Own the payment-gated application pipeline")?,
        company_name: CompanyName::new(poster.company_name().unwrap_or("Acme Robotics"))?,
    };
    let mut job = Job::post(posting, poster.user_id(), &DefaultClock);
    if matches!(status, JobStatus::Closed) {
        job.apply(JobChanges {
            status: Some(JobStatus::Closed),
            ..JobChanges::default()
        });
    }
    JobRepository::store(store, &job).await?;
    Ok(job)
}
