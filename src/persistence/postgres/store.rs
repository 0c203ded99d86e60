//! `PostgreSQL` store implementing the job, application, and invoice ports.

use super::{
    models::{ApplicationChangeset, ApplicationRow, InvoiceRow, JobChangeset, JobRow},
    schema::{applications, invoices, jobs},
};
use crate::application::{
    domain::{
        Application, ApplicationId, ApplicationStatus, PersistedApplicationData, ResumeRef,
    },
    ports::{
        ApplicationQuery, ApplicationRepository, ApplicationRepositoryError,
        ApplicationRepositoryResult,
    },
};
use crate::identity::domain::UserId;
use crate::invoice::{
    domain::{Invoice, InvoiceId, InvoicePaymentStatus, PersistedInvoiceData},
    ports::{InvoiceRepository, InvoiceRepositoryError, InvoiceRepositoryResult},
};
use crate::job::{
    domain::{
        CompanyName, Job, JobDescription, JobId, JobStatus, JobTitle, PersistedJobData,
    },
    ports::{JobQuery, JobRepository, JobRepositoryError, JobRepositoryResult},
};
use crate::payment::domain::{IntentId, PaymentAmount};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL` connection pool type used by hiring adapters.
pub type HiringPgPool = Pool<ConnectionManager<PgConnection>>;

const APPLICATION_PAIR_INDEX: &str = "idx_applications_job_applicant_unique";
const INVOICE_APPLICATION_INDEX: &str = "idx_invoices_application_unique";

/// `PostgreSQL`-backed hiring store.
#[derive(Debug, Clone)]
pub struct PostgresHiringStore {
    pool: HiringPgPool,
}

trait FromPersistence {
    fn from_persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self;
}

impl FromPersistence for JobRepositoryError {
    fn from_persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::persistence(err)
    }
}

impl FromPersistence for ApplicationRepositoryError {
    fn from_persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::persistence(err)
    }
}

impl FromPersistence for InvoiceRepositoryError {
    fn from_persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::persistence(err)
    }
}

impl PostgresHiringStore {
    /// Creates a new store from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: HiringPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T, E>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut PgConnection) -> Result<T, E> + Send + 'static,
        T: Send + 'static,
        E: FromPersistence + Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(E::from_persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(E::from_persistence)?
    }
}

fn violates(err: &DieselError, index: &str) -> bool {
    matches!(
        err,
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info)
            if constraint_is(info.as_ref(), index)
    )
}

fn constraint_is(info: &dyn DatabaseErrorInformation, index: &str) -> bool {
    info.constraint_name().is_some_and(|name| name == index)
}

#[async_trait]
impl JobRepository for PostgresHiringStore {
    async fn store(&self, job: &Job) -> JobRepositoryResult<()> {
        let job_id = job.id();
        let row = job_to_row(job);
        self.run_blocking(move |connection| {
            diesel::insert_into(jobs::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        JobRepositoryError::DuplicateJob(job_id)
                    }
                    _ => JobRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn update(&self, job: &Job) -> JobRepositoryResult<()> {
        let job_id = job.id();
        let changes = JobChangeset {
            title: job.title().as_str().to_owned(),
            description: job.description().as_str().to_owned(),
            company_name: job.company_name().as_str().to_owned(),
            status: job.status().as_str().to_owned(),
        };
        self.run_blocking(move |connection| {
            let updated = diesel::update(jobs::table.find(job_id.into_inner()))
                .set(&changes)
                .execute(connection)
                .map_err(JobRepositoryError::persistence)?;
            if updated == 0 {
                return Err(JobRepositoryError::NotFound(job_id));
            }
            Ok(())
        })
        .await
    }

    async fn delete(&self, id: JobId) -> JobRepositoryResult<()> {
        self.run_blocking(move |connection| {
            let deleted = diesel::delete(jobs::table.find(id.into_inner()))
                .execute(connection)
                .map_err(JobRepositoryError::persistence)?;
            if deleted == 0 {
                return Err(JobRepositoryError::NotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: JobId) -> JobRepositoryResult<Option<Job>> {
        self.run_blocking(move |connection| {
            let row = jobs::table
                .find(id.into_inner())
                .select(JobRow::as_select())
                .first::<JobRow>(connection)
                .optional()
                .map_err(JobRepositoryError::persistence)?;
            row.map(row_to_job).transpose()
        })
        .await
    }

    async fn list(&self, query: &JobQuery) -> JobRepositoryResult<Vec<Job>> {
        let filters = query.clone();
        self.run_blocking(move |connection| {
            let mut statement = jobs::table.select(JobRow::as_select()).into_boxed();
            if let Some(status) = filters.status {
                statement = statement.filter(jobs::status.eq(status.as_str()));
            }
            if let Some(company) = filters.company_name {
                statement = statement.filter(jobs::company_name.eq(company));
            }
            if let Some(poster) = filters.posted_by {
                statement = statement.filter(jobs::posted_by.eq(poster.into_inner()));
            }
            let rows = statement
                .order(jobs::created_at.desc())
                .load::<JobRow>(connection)
                .map_err(JobRepositoryError::persistence)?;
            rows.into_iter().map(row_to_job).collect()
        })
        .await
    }
}

enum SettleError {
    Diesel(DieselError),
    Repository(ApplicationRepositoryError),
}

impl From<DieselError> for SettleError {
    fn from(err: DieselError) -> Self {
        Self::Diesel(err)
    }
}

fn conditional_update(
    connection: &mut PgConnection,
    application: &Application,
    expected: ApplicationStatus,
) -> Result<(), SettleError> {
    let id = application.id();
    let changes = ApplicationChangeset {
        status: application.status().as_str().to_owned(),
        is_paid: application.is_paid(),
        payment_intent_id: application
            .payment_intent_id()
            .map(|intent| intent.as_str().to_owned()),
        updated_at: application.updated_at(),
    };
    let updated = diesel::update(
        applications::table
            .filter(applications::id.eq(id.into_inner()))
            .filter(applications::status.eq(expected.as_str())),
    )
    .set(&changes)
    .execute(connection)?;
    if updated > 0 {
        return Ok(());
    }

    let exists = diesel::select(diesel::dsl::exists(
        applications::table.filter(applications::id.eq(id.into_inner())),
    ))
    .get_result::<bool>(connection)?;
    Err(SettleError::Repository(if exists {
        ApplicationRepositoryError::StaleState { id, expected }
    } else {
        ApplicationRepositoryError::NotFound(id)
    }))
}

fn settle_error(err: SettleError, application_id: ApplicationId) -> ApplicationRepositoryError {
    match err {
        SettleError::Repository(inner) => inner,
        SettleError::Diesel(inner) if violates(&inner, INVOICE_APPLICATION_INDEX) => {
            ApplicationRepositoryError::DuplicateInvoice(application_id)
        }
        SettleError::Diesel(inner) => ApplicationRepositoryError::persistence(inner),
    }
}

#[async_trait]
impl ApplicationRepository for PostgresHiringStore {
    async fn store(&self, application: &Application) -> ApplicationRepositoryResult<()> {
        let job_id = application.job_id();
        let applicant_id = application.applicant_id();
        let row = application_to_row(application);
        self.run_blocking(move |connection| {
            diesel::insert_into(applications::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| {
                    if violates(&err, APPLICATION_PAIR_INDEX) {
                        ApplicationRepositoryError::DuplicateApplication {
                            job_id,
                            applicant_id,
                        }
                    } else {
                        ApplicationRepositoryError::persistence(err)
                    }
                })?;
            Ok(())
        })
        .await
    }

    async fn find_by_id(
        &self,
        id: ApplicationId,
    ) -> ApplicationRepositoryResult<Option<Application>> {
        self.run_blocking(move |connection| {
            let row = applications::table
                .find(id.into_inner())
                .select(ApplicationRow::as_select())
                .first::<ApplicationRow>(connection)
                .optional()
                .map_err(ApplicationRepositoryError::persistence)?;
            row.map(row_to_application).transpose()
        })
        .await
    }

    async fn find_by_job_and_applicant(
        &self,
        job_id: JobId,
        applicant_id: UserId,
    ) -> ApplicationRepositoryResult<Option<Application>> {
        self.run_blocking(move |connection| {
            let row = applications::table
                .filter(applications::job_id.eq(job_id.into_inner()))
                .filter(applications::applicant_id.eq(applicant_id.into_inner()))
                .select(ApplicationRow::as_select())
                .first::<ApplicationRow>(connection)
                .optional()
                .map_err(ApplicationRepositoryError::persistence)?;
            row.map(row_to_application).transpose()
        })
        .await
    }

    async fn list(&self, query: &ApplicationQuery) -> ApplicationRepositoryResult<Vec<Application>> {
        let filters = query.clone();
        self.run_blocking(move |connection| {
            let mut statement = applications::table
                .select(ApplicationRow::as_select())
                .into_boxed();
            if let Some(job_ids) = filters.job_ids {
                let ids: Vec<uuid::Uuid> = job_ids.into_iter().map(JobId::into_inner).collect();
                statement = statement.filter(applications::job_id.eq_any(ids));
            }
            if let Some(applicant) = filters.applicant_id {
                statement = statement.filter(applications::applicant_id.eq(applicant.into_inner()));
            }
            if let Some(status) = filters.status {
                statement = statement.filter(applications::status.eq(status.as_str()));
            }
            let rows = statement
                .order(applications::created_at.desc())
                .load::<ApplicationRow>(connection)
                .map_err(ApplicationRepositoryError::persistence)?;
            rows.into_iter().map(row_to_application).collect()
        })
        .await
    }

    async fn update(
        &self,
        application: &Application,
        expected: ApplicationStatus,
    ) -> ApplicationRepositoryResult<()> {
        let snapshot = application.clone();
        self.run_blocking(move |connection| {
            conditional_update(connection, &snapshot, expected)
                .map_err(|err| settle_error(err, snapshot.id()))
        })
        .await
    }

    async fn settle_payment(
        &self,
        application: &Application,
        expected: ApplicationStatus,
        invoice: &Invoice,
    ) -> ApplicationRepositoryResult<()> {
        let snapshot = application.clone();
        let invoice_row = invoice_to_row(invoice);
        self.run_blocking(move |connection| {
            connection
                .transaction::<(), SettleError, _>(|tx| {
                    conditional_update(tx, &snapshot, expected)?;
                    diesel::insert_into(invoices::table)
                        .values(&invoice_row)
                        .execute(tx)?;
                    Ok(())
                })
                .map_err(|err| settle_error(err, snapshot.id()))
        })
        .await
    }
}

#[async_trait]
impl InvoiceRepository for PostgresHiringStore {
    async fn store(&self, invoice: &Invoice) -> InvoiceRepositoryResult<()> {
        let application_id = invoice.application_id();
        let row = invoice_to_row(invoice);
        self.run_blocking(move |connection| {
            diesel::insert_into(invoices::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| {
                    if violates(&err, INVOICE_APPLICATION_INDEX) {
                        InvoiceRepositoryError::DuplicateInvoice(application_id)
                    } else {
                        InvoiceRepositoryError::persistence(err)
                    }
                })?;
            Ok(())
        })
        .await
    }

    async fn find_by_application(
        &self,
        application_id: ApplicationId,
    ) -> InvoiceRepositoryResult<Option<Invoice>> {
        self.run_blocking(move |connection| {
            let row = invoices::table
                .filter(invoices::application_id.eq(application_id.into_inner()))
                .select(InvoiceRow::as_select())
                .first::<InvoiceRow>(connection)
                .optional()
                .map_err(InvoiceRepositoryError::persistence)?;
            row.map(row_to_invoice).transpose()
        })
        .await
    }

    async fn list_for_applications(
        &self,
        application_ids: &[ApplicationId],
    ) -> InvoiceRepositoryResult<Vec<Invoice>> {
        let ids: Vec<uuid::Uuid> = application_ids
            .iter()
            .copied()
            .map(ApplicationId::into_inner)
            .collect();
        self.run_blocking(move |connection| {
            let rows = invoices::table
                .filter(invoices::application_id.eq_any(ids))
                .select(InvoiceRow::as_select())
                .load::<InvoiceRow>(connection)
                .map_err(InvoiceRepositoryError::persistence)?;
            rows.into_iter().map(row_to_invoice).collect()
        })
        .await
    }

    async fn list_for_user(&self, user_id: UserId) -> InvoiceRepositoryResult<Vec<Invoice>> {
        self.run_blocking(move |connection| {
            let rows = invoices::table
                .filter(invoices::user_id.eq(user_id.into_inner()))
                .order(invoices::paid_at.desc())
                .select(InvoiceRow::as_select())
                .load::<InvoiceRow>(connection)
                .map_err(InvoiceRepositoryError::persistence)?;
            rows.into_iter().map(row_to_invoice).collect()
        })
        .await
    }
}

fn job_to_row(job: &Job) -> JobRow {
    JobRow {
        id: job.id().into_inner(),
        title: job.title().as_str().to_owned(),
        description: job.description().as_str().to_owned(),
        company_name: job.company_name().as_str().to_owned(),
        posted_by: job.posted_by().into_inner(),
        status: job.status().as_str().to_owned(),
        created_at: job.created_at(),
    }
}

fn row_to_job(row: JobRow) -> JobRepositoryResult<Job> {
    let JobRow {
        id,
        title,
        description,
        company_name,
        posted_by,
        status,
        created_at,
    } = row;

    let data = PersistedJobData {
        id: JobId::from_uuid(id),
        title: JobTitle::new(title).map_err(JobRepositoryError::persistence)?,
        description: JobDescription::new(description).map_err(JobRepositoryError::persistence)?,
        company_name: CompanyName::new(company_name).map_err(JobRepositoryError::persistence)?,
        posted_by: UserId::from_uuid(posted_by),
        status: JobStatus::try_from(status.as_str()).map_err(JobRepositoryError::persistence)?,
        created_at,
    };
    Ok(Job::from_persisted(data))
}

fn application_to_row(application: &Application) -> ApplicationRow {
    ApplicationRow {
        id: application.id().into_inner(),
        job_id: application.job_id().into_inner(),
        applicant_id: application.applicant_id().into_inner(),
        resume_ref: application.resume().as_str().to_owned(),
        status: application.status().as_str().to_owned(),
        is_paid: application.is_paid(),
        payment_intent_id: application
            .payment_intent_id()
            .map(|intent| intent.as_str().to_owned()),
        created_at: application.created_at(),
        updated_at: application.updated_at(),
    }
}

fn row_to_application(row: ApplicationRow) -> ApplicationRepositoryResult<Application> {
    let ApplicationRow {
        id,
        job_id,
        applicant_id,
        resume_ref,
        status,
        is_paid,
        payment_intent_id,
        created_at,
        updated_at,
    } = row;

    let data = PersistedApplicationData {
        id: ApplicationId::from_uuid(id),
        job_id: JobId::from_uuid(job_id),
        applicant_id: UserId::from_uuid(applicant_id),
        resume: ResumeRef::new(resume_ref).map_err(ApplicationRepositoryError::persistence)?,
        status: ApplicationStatus::try_from(status.as_str())
            .map_err(ApplicationRepositoryError::persistence)?,
        is_paid,
        payment_intent_id: payment_intent_id
            .map(IntentId::new)
            .transpose()
            .map_err(ApplicationRepositoryError::persistence)?,
        created_at,
        updated_at,
    };
    Application::from_persisted(data).map_err(ApplicationRepositoryError::persistence)
}

fn invoice_to_row(invoice: &Invoice) -> InvoiceRow {
    InvoiceRow {
        id: invoice.id().into_inner(),
        user_id: invoice.user_id().into_inner(),
        application_id: invoice.application_id().into_inner(),
        amount: i64::from(invoice.amount().units()),
        payment_status: invoice.payment_status().as_str().to_owned(),
        payment_intent_id: invoice.payment_intent_id().as_str().to_owned(),
        paid_at: invoice.paid_at(),
    }
}

fn row_to_invoice(row: InvoiceRow) -> InvoiceRepositoryResult<Invoice> {
    let InvoiceRow {
        id,
        user_id,
        application_id,
        amount,
        payment_status,
        payment_intent_id,
        paid_at,
    } = row;

    let data = PersistedInvoiceData {
        id: InvoiceId::from_uuid(id),
        user_id: UserId::from_uuid(user_id),
        application_id: ApplicationId::from_uuid(application_id),
        amount: PaymentAmount::from_persisted(amount)
            .map_err(InvoiceRepositoryError::persistence)?,
        payment_status: InvoicePaymentStatus::try_from(payment_status.as_str())
            .map_err(InvoiceRepositoryError::persistence)?,
        payment_intent_id: IntentId::new(payment_intent_id)
            .map_err(InvoiceRepositoryError::persistence)?,
        paid_at,
    };
    Ok(Invoice::from_persisted(data))
}
