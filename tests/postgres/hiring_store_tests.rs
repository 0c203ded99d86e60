//! Store-level tests for conditional writes and database constraints.

use super::helpers::{open_job, test_database, unpaid_application};
use diesel::prelude::*;
use hireme::application::{
    domain::ApplicationStatus,
    ports::{ApplicationQuery, ApplicationRepository, ApplicationRepositoryError},
};
use hireme::identity::domain::UserId;
use hireme::invoice::{domain::Invoice, ports::InvoiceRepository};
use hireme::job::ports::JobRepository;
use hireme::payment::domain::{IntentId, PaymentAmount};
use hireme::persistence::PostgresHiringStore;
use mockable::DefaultClock;

#[tokio::test(flavor = "multi_thread")]
async fn duplicate_application_is_rejected_by_the_pair_index() -> eyre::Result<()> {
    let Some(db) = test_database().await? else {
        return Ok(());
    };
    let store = PostgresHiringStore::new(db.pool.clone());
    let applicant = UserId::new();
    let job = open_job(UserId::new(), "Backend Engineer")?;
    JobRepository::store(&store, &job).await?;

    ApplicationRepository::store(&store, &unpaid_application(&job, applicant)?).await?;
    let second = unpaid_application(&job, applicant)?;
    let Err(err) = ApplicationRepository::store(&store, &second).await else {
        eyre::bail!("second application for the same pair was accepted");
    };

    eyre::ensure!(
        matches!(err, ApplicationRepositoryError::DuplicateApplication { .. }),
        "unexpected error: {err}"
    );
    let stored = ApplicationRepository::list(&store, &ApplicationQuery::for_job(job.id())).await?;
    eyre::ensure!(stored.len() == 1);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn update_with_a_stale_expectation_writes_nothing() -> eyre::Result<()> {
    let Some(db) = test_database().await? else {
        return Ok(());
    };
    let store = PostgresHiringStore::new(db.pool.clone());
    let job = open_job(UserId::new(), "Backend Engineer")?;
    JobRepository::store(&store, &job).await?;
    let mut application = unpaid_application(&job, UserId::new())?;
    ApplicationRepository::store(&store, &application).await?;

    application.mark_paid(IntentId::new("pi_stale")?, &DefaultClock)?;
    let Err(err) =
        ApplicationRepository::update(&store, &application, ApplicationStatus::Pending).await
    else {
        eyre::bail!("write guarded by the wrong status succeeded");
    };

    eyre::ensure!(
        matches!(err, ApplicationRepositoryError::StaleState { .. }),
        "unexpected error: {err}"
    );
    let stored = ApplicationRepository::find_by_id(&store, application.id())
        .await?
        .ok_or_else(|| eyre::eyre!("application disappeared"))?;
    eyre::ensure!(stored.status() == ApplicationStatus::PendingPayment);
    eyre::ensure!(!stored.is_paid());
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn settle_payment_writes_application_and_invoice_together() -> eyre::Result<()> {
    let Some(db) = test_database().await? else {
        return Ok(());
    };
    let store = PostgresHiringStore::new(db.pool.clone());
    let applicant = UserId::new();
    let job = open_job(UserId::new(), "Backend Engineer")?;
    JobRepository::store(&store, &job).await?;
    let mut application = unpaid_application(&job, applicant)?;
    ApplicationRepository::store(&store, &application).await?;

    let intent = IntentId::new("pi_settled")?;
    application.mark_paid(intent.clone(), &DefaultClock)?;
    let invoice = Invoice::settled(
        application.id(),
        applicant,
        PaymentAmount::new(100)?,
        intent,
        &DefaultClock,
    );
    ApplicationRepository::settle_payment(
        &store,
        &application,
        ApplicationStatus::PendingPayment,
        &invoice,
    )
    .await?;

    let stored = ApplicationRepository::find_by_id(&store, application.id())
        .await?
        .ok_or_else(|| eyre::eyre!("application disappeared"))?;
    eyre::ensure!(stored.status() == ApplicationStatus::Pending);
    eyre::ensure!(stored.is_paid());
    let persisted = InvoiceRepository::find_by_application(&store, application.id())
        .await?
        .ok_or_else(|| eyre::eyre!("invoice missing"))?;
    eyre::ensure!(persisted.id() == invoice.id());
    eyre::ensure!(persisted.amount() == invoice.amount());
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn settle_payment_rolls_back_when_an_invoice_exists() -> eyre::Result<()> {
    let Some(db) = test_database().await? else {
        return Ok(());
    };
    let store = PostgresHiringStore::new(db.pool.clone());
    let applicant = UserId::new();
    let job = open_job(UserId::new(), "Backend Engineer")?;
    JobRepository::store(&store, &job).await?;
    let mut application = unpaid_application(&job, applicant)?;
    ApplicationRepository::store(&store, &application).await?;

    let amount = PaymentAmount::new(100)?;
    let earlier = Invoice::settled(
        application.id(),
        applicant,
        amount,
        IntentId::new("pi_earlier")?,
        &DefaultClock,
    );
    InvoiceRepository::store(&store, &earlier).await?;

    let intent = IntentId::new("pi_later")?;
    application.mark_paid(intent.clone(), &DefaultClock)?;
    let later = Invoice::settled(application.id(), applicant, amount, intent, &DefaultClock);
    let Err(err) = ApplicationRepository::settle_payment(
        &store,
        &application,
        ApplicationStatus::PendingPayment,
        &later,
    )
    .await
    else {
        eyre::bail!("second invoice was accepted");
    };

    eyre::ensure!(
        matches!(err, ApplicationRepositoryError::DuplicateInvoice(_)),
        "unexpected error: {err}"
    );
    let stored = ApplicationRepository::find_by_id(&store, application.id())
        .await?
        .ok_or_else(|| eyre::eyre!("application disappeared"))?;
    eyre::ensure!(stored.status() == ApplicationStatus::PendingPayment);
    eyre::ensure!(!stored.is_paid());
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn deleting_a_job_cascades_to_applications_and_invoices() -> eyre::Result<()> {
    let Some(db) = test_database().await? else {
        return Ok(());
    };
    let store = PostgresHiringStore::new(db.pool.clone());
    let applicant = UserId::new();
    let job = open_job(UserId::new(), "Backend Engineer")?;
    JobRepository::store(&store, &job).await?;
    let mut application = unpaid_application(&job, applicant)?;
    ApplicationRepository::store(&store, &application).await?;
    let intent = IntentId::new("pi_cascade")?;
    application.mark_paid(intent.clone(), &DefaultClock)?;
    let invoice = Invoice::settled(
        application.id(),
        applicant,
        PaymentAmount::new(100)?,
        intent,
        &DefaultClock,
    );
    ApplicationRepository::settle_payment(
        &store,
        &application,
        ApplicationStatus::PendingPayment,
        &invoice,
    )
    .await?;

    JobRepository::delete(&store, job.id()).await?;

    eyre::ensure!(JobRepository::find_by_id(&store, job.id()).await?.is_none());
    eyre::ensure!(
        ApplicationRepository::find_by_id(&store, application.id())
            .await?
            .is_none()
    );
    eyre::ensure!(
        InvoiceRepository::list_for_user(&store, applicant)
            .await?
            .is_empty()
    );
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn database_rejects_a_paid_flag_that_contradicts_the_status() -> eyre::Result<()> {
    let Some(db) = test_database().await? else {
        return Ok(());
    };
    let store = PostgresHiringStore::new(db.pool.clone());
    let job = open_job(UserId::new(), "Backend Engineer")?;
    JobRepository::store(&store, &job).await?;
    let application = unpaid_application(&job, UserId::new())?;
    ApplicationRepository::store(&store, &application).await?;

    let pool = db.pool.clone();
    let id = application.id().into_inner();
    let outcome = tokio::task::spawn_blocking(move || -> eyre::Result<QueryResult<usize>> {
        let mut connection = pool.get()?;
        Ok(
            diesel::sql_query("UPDATE applications SET is_paid = TRUE WHERE id = $1")
                .bind::<diesel::sql_types::Uuid, _>(id)
                .execute(&mut connection),
        )
    })
    .await??;

    eyre::ensure!(outcome.is_err(), "inconsistent row was written");
    Ok(())
}
