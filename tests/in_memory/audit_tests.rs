//! In-memory integration tests for administrator listings.

use super::helpers::{Platform, admin, employee, platform, seeker};
use hireme::application::domain::ApplicationStatus;
use hireme::audit::{
    ApplicationAuditFilter, AuditError, JobAuditFilter, RECENT_APPLICATION_LIMIT, StatusBreakdown,
};
use hireme::job::{
    domain::{JobId, JobStatus},
    services::UpdateJobRequest,
};
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn audit_filters_applications_by_company_status_and_job(
    platform: Platform,
) -> eyre::Result<()> {
    let acme = employee("Acme Robotics");
    let globex = employee("Globex");
    let acme_job = platform.post_job(&acme, "Controls Engineer").await?;
    let globex_job = platform.post_job(&globex, "Sales Engineer").await?;
    platform.apply_and_pay(&seeker(), &acme_job).await?;
    platform.apply(&seeker(), &acme_job).await?;
    platform.apply(&seeker(), &globex_job).await?;
    let auditor = admin();

    let everything = platform
        .audit
        .list_applications(&auditor, ApplicationAuditFilter::default())
        .await?;
    eyre::ensure!(everything.len() == 3);

    let acme_only = platform
        .audit
        .list_applications(
            &auditor,
            ApplicationAuditFilter {
                company_name: Some("Acme Robotics".to_owned()),
                ..ApplicationAuditFilter::default()
            },
        )
        .await?;
    eyre::ensure!(acme_only.len() == 2);
    eyre::ensure!(acme_only.iter().all(|row| row.job.id() == acme_job.id()));

    let paid_acme = platform
        .audit
        .list_applications(
            &auditor,
            ApplicationAuditFilter {
                company_name: Some("Acme Robotics".to_owned()),
                status: Some(ApplicationStatus::Pending),
                job_id: Some(acme_job.id()),
            },
        )
        .await?;
    eyre::ensure!(paid_acme.len() == 1);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn audit_lists_jobs_with_application_summaries(platform: Platform) -> eyre::Result<()> {
    let acme = employee("Acme Robotics");
    let open = platform.post_job(&acme, "Robotics Engineer").await?;
    let closed = platform.post_job(&acme, "Hardware Engineer").await?;
    platform.apply(&seeker(), &open).await?;
    platform.apply(&seeker(), &open).await?;
    platform
        .jobs
        .update(
            &acme,
            closed.id(),
            UpdateJobRequest::new().with_status(JobStatus::Closed),
        )
        .await?;

    let open_jobs = platform
        .audit
        .list_jobs(
            &admin(),
            JobAuditFilter {
                company_name: None,
                status: Some(JobStatus::Open),
            },
        )
        .await?;

    eyre::ensure!(open_jobs.len() == 1);
    let audited = open_jobs
        .first()
        .ok_or_else(|| eyre::eyre!("missing audited job"))?;
    eyre::ensure!(audited.job.id() == open.id());
    eyre::ensure!(audited.applications.len() == 2);
    eyre::ensure!(
        audited
            .applications
            .iter()
            .all(|summary| summary.status == ApplicationStatus::PendingPayment)
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn audit_is_admin_only(platform: Platform) -> eyre::Result<()> {
    let result = platform
        .audit
        .list_jobs(&employee("Acme Robotics"), JobAuditFilter::default())
        .await;

    eyre::ensure!(matches!(result, Err(AuditError::Forbidden(_))));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn company_analytics_summarizes_jobs_applications_and_revenue(
    platform: Platform,
) -> eyre::Result<()> {
    let acme = employee("Acme Robotics");
    let globex = employee("Globex");
    let open = platform.post_job(&acme, "Robotics Engineer").await?;
    let closing = platform.post_job(&acme, "Hardware Engineer").await?;
    let elsewhere = platform.post_job(&globex, "Sales Engineer").await?;

    let accepted = platform.apply_and_pay(&seeker(), &open).await?;
    platform.apply_and_pay(&seeker(), &open).await?;
    let unpaid = platform.apply(&seeker(), &open).await?;
    let rejected = platform.apply_and_pay(&seeker(), &closing).await?;
    platform.apply_and_pay(&seeker(), &elsewhere).await?;
    platform
        .review
        .set_status(&acme, accepted.id(), ApplicationStatus::Accepted)
        .await?;
    platform
        .review
        .set_status(&acme, rejected.id(), ApplicationStatus::Rejected)
        .await?;
    platform
        .jobs
        .update(
            &acme,
            closing.id(),
            UpdateJobRequest::new().with_status(JobStatus::Closed),
        )
        .await?;

    let analytics = platform
        .audit
        .company_analytics(&admin(), "  Acme Robotics ")
        .await?;

    eyre::ensure!(analytics.company_name == "Acme Robotics");
    eyre::ensure!(analytics.total_jobs == 2);
    eyre::ensure!(analytics.active_jobs == 1);
    eyre::ensure!(analytics.closed_jobs == 1);
    eyre::ensure!(analytics.total_applications == 4);
    eyre::ensure!(
        analytics.applications_by_status
            == StatusBreakdown {
                pending: 1,
                accepted: 1,
                rejected: 1,
            }
    );
    eyre::ensure!(analytics.payment_analytics.total_revenue == 300);
    eyre::ensure!(analytics.payment_analytics.successful_payments == 3);
    eyre::ensure!(analytics.payment_analytics.pending_payments == 1);

    let per_job = |id: JobId| {
        analytics
            .job_analytics
            .iter()
            .find(|row| row.job_id == id)
            .map(|row| (row.total_applications, row.status))
    };
    eyre::ensure!(per_job(open.id()) == Some((3, JobStatus::Open)));
    eyre::ensure!(per_job(closing.id()) == Some((1, JobStatus::Closed)));

    eyre::ensure!(analytics.recent_applications.len() == 4);
    let unpaid_row = analytics
        .recent_applications
        .iter()
        .find(|row| row.application_id == unpaid.id())
        .ok_or_else(|| eyre::eyre!("unpaid application missing from recent list"))?;
    eyre::ensure!(!unpaid_row.is_paid);
    eyre::ensure!(unpaid_row.invoice.is_none());
    eyre::ensure!(
        analytics
            .recent_applications
            .iter()
            .filter(|row| row.invoice.is_some())
            .count()
            == 3
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn company_analytics_lists_only_the_newest_applications(
    platform: Platform,
) -> eyre::Result<()> {
    let acme = employee("Acme Robotics");
    let job = platform.post_job(&acme, "Robotics Engineer").await?;
    for _ in 0..=RECENT_APPLICATION_LIMIT {
        platform.apply(&seeker(), &job).await?;
    }

    let analytics = platform
        .audit
        .company_analytics(&admin(), "Acme Robotics")
        .await?;

    eyre::ensure!(analytics.total_applications == RECENT_APPLICATION_LIMIT + 1);
    eyre::ensure!(analytics.recent_applications.len() == RECENT_APPLICATION_LIMIT);
    eyre::ensure!(
        analytics
            .recent_applications
            .windows(2)
            .all(|pair| match pair {
                [newer, older] => newer.created_at >= older.created_at,
                _ => false,
            })
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn company_analytics_for_unknown_company_is_empty(platform: Platform) -> eyre::Result<()> {
    platform
        .post_job(&employee("Acme Robotics"), "Robotics Engineer")
        .await?;

    let analytics = platform.audit.company_analytics(&admin(), "Initech").await?;

    eyre::ensure!(analytics.total_jobs == 0);
    eyre::ensure!(analytics.total_applications == 0);
    eyre::ensure!(analytics.job_analytics.is_empty());
    eyre::ensure!(analytics.recent_applications.is_empty());
    Ok(())
}

#[rstest]
#[case::missing("")]
#[case::blank("   ")]
#[tokio::test(flavor = "multi_thread")]
async fn company_analytics_requires_a_company(
    platform: Platform,
    #[case] company: &str,
) -> eyre::Result<()> {
    let result = platform.audit.company_analytics(&admin(), company).await;

    eyre::ensure!(matches!(result, Err(AuditError::MissingCompany)));
    eyre::ensure!(
        result.as_ref().err().map(AuditError::code) == Some("company_required")
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn company_analytics_is_admin_only(platform: Platform) -> eyre::Result<()> {
    let result = platform
        .audit
        .company_analytics(&employee("Acme Robotics"), "Acme Robotics")
        .await;

    eyre::ensure!(matches!(result, Err(AuditError::Forbidden(_))));
    Ok(())
}
