//! Shared test helpers for `PostgreSQL` integration tests.

use diesel::connection::SimpleConnection;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool};
use hireme::application::domain::{Application, ResumeRef};
use hireme::identity::domain::UserId;
use hireme::job::domain::{CompanyName, Job, JobDescription, JobPosting, JobTitle};
use hireme::persistence::{HiringPgPool, apply_schema};
use mockable::DefaultClock;
use uuid::Uuid;

/// Environment variable naming the server used by the suite.
pub const TEST_DATABASE_URL_ENV: &str = "HIREME_TEST_DATABASE_URL";

/// Points every pooled connection at one schema.
#[derive(Debug)]
struct SearchPath(String);

impl CustomizeConnection<PgConnection, diesel::r2d2::Error> for SearchPath {
    fn on_acquire(&self, connection: &mut PgConnection) -> Result<(), diesel::r2d2::Error> {
        connection
            .batch_execute(&format!("SET search_path TO {}", self.0))
            .map_err(diesel::r2d2::Error::QueryError)
    }
}

/// A migrated schema that is dropped when the value goes out of scope.
pub struct TestDatabase {
    /// Pool whose connections resolve tables inside the test schema.
    pub pool: HiringPgPool,
    url: String,
    schema: String,
}

impl Drop for TestDatabase {
    fn drop(&mut self) {
        let Ok(mut connection) = PgConnection::establish(&self.url) else {
            return;
        };
        let sql = format!("DROP SCHEMA IF EXISTS {} CASCADE", self.schema);
        if let Err(err) = connection.batch_execute(&sql) {
            tracing::warn!(schema = %self.schema, error = %err, "failed to drop test schema");
        }
    }
}

/// Creates a fresh schema with every hiring table applied.
///
/// Returns `None` when no test server is configured.
///
/// # Errors
///
/// Returns an error if the server is unreachable or the schema fails to
/// apply.
pub async fn test_database() -> eyre::Result<Option<TestDatabase>> {
    let Ok(url) = std::env::var(TEST_DATABASE_URL_ENV) else {
        return Ok(None);
    };

    let database = tokio::task::spawn_blocking(move || -> eyre::Result<TestDatabase> {
        let schema = format!("hireme_test_{}", Uuid::new_v4().simple());
        let mut admin = PgConnection::establish(&url)?;
        admin.batch_execute(&format!("CREATE SCHEMA {schema}"))?;

        let pool = Pool::builder()
            .max_size(4)
            .connection_customizer(Box::new(SearchPath(schema.clone())))
            .build(ConnectionManager::<PgConnection>::new(url.clone()))?;
        let mut connection = pool.get()?;
        apply_schema(&mut connection)?;

        Ok(TestDatabase { pool, url, schema })
    })
    .await??;

    Ok(Some(database))
}

/// Builds an open job posted by `poster`.
///
/// # Errors
///
/// Returns an error if a posting field fails validation.
pub fn open_job(poster: UserId, title: &str) -> eyre::Result<Job> {
    let posting = JobPosting {
        title: JobTitle::new(title)?,
        description: JobDescription::new("Keep the hiring platform healthy")?,
        company_name: CompanyName::new("Acme Robotics")?,
    };
    Ok(Job::post(posting, poster, &DefaultClock))
}

/// Builds an unpaid application for `job`.
///
/// # Errors
///
/// Returns an error if the resume reference is rejected.
pub fn unpaid_application(job: &Job, applicant: UserId) -> eyre::Result<Application> {
    Ok(Application::submit(
        job.id(),
        applicant,
        ResumeRef::new("file://resumes/cv.pdf")?,
        &DefaultClock,
    ))
}
