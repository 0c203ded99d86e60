//! End-to-end hiring flow over the `PostgreSQL` adapters.

use super::helpers::{open_job, test_database};
use hireme::application::{
    domain::{ApplicationStatus, ResumeRef},
    services::{
        ApplicationLifecycleService, InitiateApplicationRequest, LifecycleError, ReviewService,
    },
};
use hireme::identity::domain::{Principal, Role, UserId};
use hireme::invoice::ports::InvoiceRepository;
use hireme::job::ports::JobRepository;
use hireme::payment::adapters::PostgresPaymentGateway;
use hireme::persistence::PostgresHiringStore;
use mockable::DefaultClock;
use std::sync::Arc;

#[tokio::test(flavor = "multi_thread")]
async fn paid_application_reaches_review_with_one_invoice() -> eyre::Result<()> {
    let Some(db) = test_database().await? else {
        return Ok(());
    };
    let store = Arc::new(PostgresHiringStore::new(db.pool.clone()));
    let gateway = Arc::new(PostgresPaymentGateway::new(db.pool.clone()));
    let clock = Arc::new(DefaultClock);
    let lifecycle = ApplicationLifecycleService::new(
        Arc::clone(&store),
        Arc::clone(&store),
        Arc::clone(&store),
        gateway,
        Arc::clone(&clock),
    );
    let review = ReviewService::new(
        Arc::clone(&store),
        Arc::clone(&store),
        Arc::clone(&store),
        clock,
    );

    let owner = Principal::new(UserId::new(), Role::Employee).with_company("Acme Robotics");
    let applicant = Principal::new(UserId::new(), Role::JobSeeker);
    let job = open_job(owner.user_id(), "Backend Engineer")?;
    JobRepository::store(&*store, &job).await?;

    let request = InitiateApplicationRequest::new(
        job.id(),
        applicant.user_id(),
        ResumeRef::new("file://resumes/cv.pdf")?,
    );
    lifecycle.initiate(&applicant, request).await?;

    let stale = lifecycle
        .request_payment(&applicant, job.id(), applicant.user_id())
        .await?;
    let current = lifecycle
        .request_payment(&applicant, job.id(), applicant.user_id())
        .await?;

    let Err(err) = lifecycle
        .confirm_payment(
            &applicant,
            job.id(),
            applicant.user_id(),
            stale.intent.intent_id,
        )
        .await
    else {
        eyre::bail!("superseded intent settled the application");
    };
    eyre::ensure!(
        matches!(err, LifecycleError::IntentNotFound(_)),
        "unexpected error: {err}"
    );

    let confirmed = lifecycle
        .confirm_payment(
            &applicant,
            job.id(),
            applicant.user_id(),
            current.intent.intent_id.clone(),
        )
        .await?;
    eyre::ensure!(confirmed.newly_settled);
    eyre::ensure!(confirmed.application.status() == ApplicationStatus::Pending);

    let again = lifecycle
        .confirm_payment(
            &applicant,
            job.id(),
            applicant.user_id(),
            current.intent.intent_id,
        )
        .await?;
    eyre::ensure!(!again.newly_settled);
    eyre::ensure!(again.invoice.id() == confirmed.invoice.id());
    eyre::ensure!(
        InvoiceRepository::list_for_user(&*store, applicant.user_id())
            .await?
            .len()
            == 1
    );

    let accepted = review
        .set_status(&owner, confirmed.application.id(), ApplicationStatus::Accepted)
        .await?;
    eyre::ensure!(accepted.status() == ApplicationStatus::Accepted);
    Ok(())
}
