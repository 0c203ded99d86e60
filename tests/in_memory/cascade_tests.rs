//! In-memory integration tests for cascading deletes and store constraints.

use super::helpers::{Platform, admin, employee, platform, seeker};
use hireme::application::{
    domain::{Application, ResumeRef},
    ports::{ApplicationRepository, ApplicationRepositoryError},
};
use hireme::invoice::ports::InvoiceRepository;
use hireme::job::domain::JobId;
use mockable::DefaultClock;
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deleting_a_job_removes_applications_and_invoices(
    platform: Platform,
) -> eyre::Result<()> {
    let owner = employee("Acme Robotics");
    let applicant = seeker();
    let job = platform.post_job(&owner, "Site Reliability Engineer").await?;
    let paid = platform.apply_and_pay(&applicant, &job).await?;

    platform.jobs.delete(&owner, job.id()).await?;

    eyre::ensure!(
        ApplicationRepository::find_by_id(&*platform.store, paid.id())
            .await?
            .is_none()
    );
    eyre::ensure!(
        InvoiceRepository::find_by_application(&*platform.store, paid.id())
            .await?
            .is_none()
    );
    eyre::ensure!(
        InvoiceRepository::list_for_user(&*platform.store, applicant.user_id())
            .await?
            .is_empty()
    );

    // The pair index is cleared too, so a re-posted job accepts the seeker.
    let reposted = platform.post_job(&owner, "Site Reliability Engineer").await?;
    platform.apply(&applicant, &reposted).await?;
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn admin_may_delete_any_job(platform: Platform) -> eyre::Result<()> {
    let owner = employee("Acme Robotics");
    let job = platform.post_job(&owner, "Technical Writer").await?;

    platform.jobs.delete(&admin(), job.id()).await?;

    eyre::ensure!(platform.jobs.find(job.id()).await?.is_none());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn store_rejects_second_application_for_pair(platform: Platform) -> eyre::Result<()> {
    let owner = employee("Acme Robotics");
    let applicant = seeker();
    let job = platform.post_job(&owner, "Mobile Engineer").await?;
    platform.apply(&applicant, &job).await?;

    let bypass = Application::submit(
        job.id(),
        applicant.user_id(),
        ResumeRef::new("memory://resumes/other.pdf")?,
        &DefaultClock,
    );
    let result = ApplicationRepository::store(&*platform.store, &bypass).await;

    eyre::ensure!(matches!(
        result,
        Err(ApplicationRepositoryError::DuplicateApplication { .. })
    ));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn store_rejects_application_for_unknown_job(platform: Platform) -> eyre::Result<()> {
    let orphan = Application::submit(
        JobId::new(),
        seeker().user_id(),
        ResumeRef::new("memory://resumes/cv.pdf")?,
        &DefaultClock,
    );

    let result = ApplicationRepository::store(&*platform.store, &orphan).await;

    eyre::ensure!(matches!(
        result,
        Err(ApplicationRepositoryError::Persistence(_))
    ));
    Ok(())
}
