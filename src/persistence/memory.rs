//! In-memory hiring store for tests and local runs.

use crate::application::{
    domain::{Application, ApplicationId, ApplicationStatus},
    ports::{
        ApplicationQuery, ApplicationRepository, ApplicationRepositoryError,
        ApplicationRepositoryResult,
    },
};
use crate::identity::domain::UserId;
use crate::invoice::{
    domain::Invoice,
    ports::{InvoiceRepository, InvoiceRepositoryError, InvoiceRepositoryResult},
};
use crate::job::{
    domain::{Job, JobId},
    ports::{JobQuery, JobRepository, JobRepositoryError, JobRepositoryResult},
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Thread-safe in-memory store for jobs, applications, and invoices.
///
/// A single lock guards all three collections, which makes every write,
/// including settlement and cascading deletes, atomic.
#[derive(Debug, Clone, Default)]
pub struct InMemoryHiringStore {
    state: Arc<RwLock<HiringState>>,
}

#[derive(Debug, Default)]
struct HiringState {
    jobs: HashMap<JobId, Job>,
    applications: HashMap<ApplicationId, Application>,
    applicant_index: HashMap<(JobId, UserId), ApplicationId>,
    invoices: HashMap<ApplicationId, Invoice>,
}

fn poisoned(err: impl std::fmt::Display) -> std::io::Error {
    std::io::Error::other(err.to_string())
}

impl InMemoryHiringStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, HiringState>, std::io::Error> {
        self.state.read().map_err(poisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, HiringState>, std::io::Error> {
        self.state.write().map_err(poisoned)
    }
}

fn newest_first<T>(items: &mut [T], created_at: impl Fn(&T) -> chrono::DateTime<chrono::Utc>) {
    items.sort_by(|left, right| created_at(right).cmp(&created_at(left)));
}

impl HiringState {
    fn check_expected(
        &self,
        application: &Application,
        expected: ApplicationStatus,
    ) -> ApplicationRepositoryResult<()> {
        let stored = self
            .applications
            .get(&application.id())
            .ok_or(ApplicationRepositoryError::NotFound(application.id()))?;
        if stored.status() != expected {
            return Err(ApplicationRepositoryError::StaleState {
                id: application.id(),
                expected,
            });
        }
        Ok(())
    }
}

#[async_trait]
impl JobRepository for InMemoryHiringStore {
    async fn store(&self, job: &Job) -> JobRepositoryResult<()> {
        let mut state = self.write().map_err(JobRepositoryError::persistence)?;
        if state.jobs.contains_key(&job.id()) {
            return Err(JobRepositoryError::DuplicateJob(job.id()));
        }
        state.jobs.insert(job.id(), job.clone());
        Ok(())
    }

    async fn update(&self, job: &Job) -> JobRepositoryResult<()> {
        let mut state = self.write().map_err(JobRepositoryError::persistence)?;
        let stored = state
            .jobs
            .get_mut(&job.id())
            .ok_or(JobRepositoryError::NotFound(job.id()))?;
        *stored = job.clone();
        Ok(())
    }

    async fn delete(&self, id: JobId) -> JobRepositoryResult<()> {
        let mut state = self.write().map_err(JobRepositoryError::persistence)?;
        if state.jobs.remove(&id).is_none() {
            return Err(JobRepositoryError::NotFound(id));
        }
        let HiringState {
            applications,
            applicant_index,
            invoices,
            ..
        } = &mut *state;
        applications.retain(|application_id, application| {
            if application.job_id() != id {
                return true;
            }
            invoices.remove(application_id);
            applicant_index.remove(&(id, application.applicant_id()));
            false
        });
        Ok(())
    }

    async fn find_by_id(&self, id: JobId) -> JobRepositoryResult<Option<Job>> {
        let state = self.read().map_err(JobRepositoryError::persistence)?;
        Ok(state.jobs.get(&id).cloned())
    }

    async fn list(&self, query: &JobQuery) -> JobRepositoryResult<Vec<Job>> {
        let state = self.read().map_err(JobRepositoryError::persistence)?;
        let mut jobs: Vec<Job> = state
            .jobs
            .values()
            .filter(|job| query.matches(job))
            .cloned()
            .collect();
        newest_first(&mut jobs, Job::created_at);
        Ok(jobs)
    }
}

#[async_trait]
impl ApplicationRepository for InMemoryHiringStore {
    async fn store(&self, application: &Application) -> ApplicationRepositoryResult<()> {
        let mut state = self
            .write()
            .map_err(ApplicationRepositoryError::persistence)?;
        let key = (application.job_id(), application.applicant_id());
        if state.applicant_index.contains_key(&key) {
            return Err(ApplicationRepositoryError::DuplicateApplication {
                job_id: key.0,
                applicant_id: key.1,
            });
        }
        if !state.jobs.contains_key(&application.job_id()) {
            return Err(ApplicationRepositoryError::persistence(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("job {} does not exist", application.job_id()),
            )));
        }
        state.applicant_index.insert(key, application.id());
        state
            .applications
            .insert(application.id(), application.clone());
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: ApplicationId,
    ) -> ApplicationRepositoryResult<Option<Application>> {
        let state = self
            .read()
            .map_err(ApplicationRepositoryError::persistence)?;
        Ok(state.applications.get(&id).cloned())
    }

    async fn find_by_job_and_applicant(
        &self,
        job_id: JobId,
        applicant_id: UserId,
    ) -> ApplicationRepositoryResult<Option<Application>> {
        let state = self
            .read()
            .map_err(ApplicationRepositoryError::persistence)?;
        Ok(state
            .applicant_index
            .get(&(job_id, applicant_id))
            .and_then(|id| state.applications.get(id))
            .cloned())
    }

    async fn list(&self, query: &ApplicationQuery) -> ApplicationRepositoryResult<Vec<Application>> {
        let state = self
            .read()
            .map_err(ApplicationRepositoryError::persistence)?;
        let mut applications: Vec<Application> = state
            .applications
            .values()
            .filter(|application| query.matches(application))
            .cloned()
            .collect();
        newest_first(&mut applications, Application::created_at);
        Ok(applications)
    }

    async fn update(
        &self,
        application: &Application,
        expected: ApplicationStatus,
    ) -> ApplicationRepositoryResult<()> {
        let mut state = self
            .write()
            .map_err(ApplicationRepositoryError::persistence)?;
        state.check_expected(application, expected)?;
        state
            .applications
            .insert(application.id(), application.clone());
        Ok(())
    }

    async fn settle_payment(
        &self,
        application: &Application,
        expected: ApplicationStatus,
        invoice: &Invoice,
    ) -> ApplicationRepositoryResult<()> {
        let mut state = self
            .write()
            .map_err(ApplicationRepositoryError::persistence)?;
        state.check_expected(application, expected)?;
        if state.invoices.contains_key(&application.id()) {
            return Err(ApplicationRepositoryError::DuplicateInvoice(
                application.id(),
            ));
        }
        state.invoices.insert(application.id(), invoice.clone());
        state
            .applications
            .insert(application.id(), application.clone());
        Ok(())
    }
}

#[async_trait]
impl InvoiceRepository for InMemoryHiringStore {
    async fn store(&self, invoice: &Invoice) -> InvoiceRepositoryResult<()> {
        let mut state = self.write().map_err(InvoiceRepositoryError::persistence)?;
        if state.invoices.contains_key(&invoice.application_id()) {
            return Err(InvoiceRepositoryError::DuplicateInvoice(
                invoice.application_id(),
            ));
        }
        state
            .invoices
            .insert(invoice.application_id(), invoice.clone());
        Ok(())
    }

    async fn find_by_application(
        &self,
        application_id: ApplicationId,
    ) -> InvoiceRepositoryResult<Option<Invoice>> {
        let state = self.read().map_err(InvoiceRepositoryError::persistence)?;
        Ok(state.invoices.get(&application_id).cloned())
    }

    async fn list_for_applications(
        &self,
        application_ids: &[ApplicationId],
    ) -> InvoiceRepositoryResult<Vec<Invoice>> {
        let state = self.read().map_err(InvoiceRepositoryError::persistence)?;
        Ok(application_ids
            .iter()
            .filter_map(|id| state.invoices.get(id).cloned())
            .collect())
    }

    async fn list_for_user(&self, user_id: UserId) -> InvoiceRepositoryResult<Vec<Invoice>> {
        let state = self.read().map_err(InvoiceRepositoryError::persistence)?;
        let mut invoices: Vec<Invoice> = state
            .invoices
            .values()
            .filter(|invoice| invoice.user_id() == user_id)
            .cloned()
            .collect();
        newest_first(&mut invoices, Invoice::paid_at);
        Ok(invoices)
    }
}
