//! In-memory integration tests for the apply, pay, and review flow.

use super::helpers::{Platform, employee, platform, seeker};
use hireme::application::{
    domain::{ApplicationStatus, PaymentState},
    ports::{ApplicationQuery, ApplicationRepository},
    services::{LifecycleError, ReviewError},
};
use hireme::invoice::ports::InvoiceRepository;
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn paid_application_reaches_employer_and_is_accepted(
    platform: Platform,
) -> eyre::Result<()> {
    let owner = employee("Acme Robotics");
    let applicant = seeker();
    let job = platform.post_job(&owner, "Firmware Engineer").await?;

    let paid = platform.apply_and_pay(&applicant, &job).await?;
    eyre::ensure!(paid.status() == ApplicationStatus::Pending);

    let views = platform.review.list_for_employer(&owner).await?;
    eyre::ensure!(views.len() == 1, "expected one application for the employer");
    let view = views
        .first()
        .ok_or_else(|| eyre::eyre!("missing employer view"))?;
    eyre::ensure!(view.payment_status == PaymentState::Paid);
    eyre::ensure!(
        view.invoice
            .as_ref()
            .is_some_and(|invoice| invoice.amount().units() == 100)
    );

    let accepted = platform
        .review
        .set_status(&owner, paid.id(), ApplicationStatus::Accepted)
        .await?;
    eyre::ensure!(accepted.status() == ApplicationStatus::Accepted);

    let again = platform
        .review
        .set_status(&owner, paid.id(), ApplicationStatus::Accepted)
        .await;
    eyre::ensure!(matches!(again, Err(ReviewError::NotReviewable { .. })));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn paid_flag_matches_invoice_presence(platform: Platform) -> eyre::Result<()> {
    let owner = employee("Acme Robotics");
    let job = platform.post_job(&owner, "Support Engineer").await?;
    for pay in [true, false, true, false] {
        let applicant = seeker();
        if pay {
            platform.apply_and_pay(&applicant, &job).await?;
        } else {
            platform.apply(&applicant, &job).await?;
        }
    }

    let applications =
        ApplicationRepository::list(&*platform.store, &ApplicationQuery::for_job(job.id()))
            .await?;
    eyre::ensure!(applications.len() == 4);
    for application in applications {
        let invoice =
            InvoiceRepository::find_by_application(&*platform.store, application.id()).await?;
        eyre::ensure!(
            application.is_paid() == invoice.is_some(),
            "is_paid and invoice presence disagree for {}",
            application.id()
        );
    }
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn closed_job_rejects_new_applications(platform: Platform) -> eyre::Result<()> {
    let owner = employee("Acme Robotics");
    let job = platform.post_job(&owner, "Data Analyst").await?;
    platform
        .jobs
        .update(
            &owner,
            job.id(),
            hireme::job::services::UpdateJobRequest::new()
                .with_status(hireme::job::domain::JobStatus::Closed),
        )
        .await?;

    let result = platform.apply(&seeker(), &job).await;

    let rejected = result
        .err()
        .and_then(|report| report.downcast::<LifecycleError>().ok());
    eyre::ensure!(matches!(rejected, Some(LifecycleError::JobNotOpen(_))));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn each_seeker_applies_independently(platform: Platform) -> eyre::Result<()> {
    let owner = employee("Acme Robotics");
    let job = platform.post_job(&owner, "QA Engineer").await?;
    let first = seeker();
    let second = seeker();

    platform.apply(&first, &job).await?;
    platform.apply(&second, &job).await?;
    let duplicate = platform.apply(&first, &job).await;

    eyre::ensure!(duplicate.is_err());
    let listed = platform.review.list_for_job(&owner, job.id()).await?;
    eyre::ensure!(listed.len() == 2);
    Ok(())
}
