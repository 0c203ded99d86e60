//! Shared state handed to every handler.

use crate::application::{
    ports::ResumeStore,
    services::{ApplicationLifecycleService, DEFAULT_GATEWAY_TIMEOUT, ReviewService},
};
use crate::audit::AuditService;
use crate::identity::ports::IdentityProvider;
use crate::job::services::JobCatalogService;
use crate::payment::{domain::PaymentAmount, ports::PaymentGateway};
use crate::persistence::HiringStore;
use mockable::DefaultClock;
use std::sync::Arc;
use std::time::Duration;

const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Tunables applied when building the services.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceSettings {
    /// Fee charged per application.
    pub application_fee: PaymentAmount,
    /// Bound on each payment gateway call.
    pub gateway_timeout: Duration,
    /// Largest accepted request body for resume uploads.
    pub max_upload_bytes: usize,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            application_fee: PaymentAmount::APPLICATION_FEE,
            gateway_timeout: DEFAULT_GATEWAY_TIMEOUT,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

/// Services and adapters shared by all handlers.
pub struct AppState<S, G>
where
    S: HiringStore,
    G: PaymentGateway + 'static,
{
    pub(crate) lifecycle: Arc<ApplicationLifecycleService<S, S, S, G, DefaultClock>>,
    pub(crate) review: Arc<ReviewService<S, S, S, DefaultClock>>,
    pub(crate) jobs: Arc<JobCatalogService<S, DefaultClock>>,
    pub(crate) audit: Arc<AuditService<S, S, S>>,
    pub(crate) identity: Arc<dyn IdentityProvider>,
    pub(crate) resumes: Arc<dyn ResumeStore>,
    pub(crate) max_upload_bytes: usize,
}

impl<S, G> Clone for AppState<S, G>
where
    S: HiringStore,
    G: PaymentGateway + 'static,
{
    fn clone(&self) -> Self {
        Self {
            lifecycle: Arc::clone(&self.lifecycle),
            review: Arc::clone(&self.review),
            jobs: Arc::clone(&self.jobs),
            audit: Arc::clone(&self.audit),
            identity: Arc::clone(&self.identity),
            resumes: Arc::clone(&self.resumes),
            max_upload_bytes: self.max_upload_bytes,
        }
    }
}

impl<S, G> AppState<S, G>
where
    S: HiringStore,
    G: PaymentGateway + 'static,
{
    /// Wires every service over one store and gateway.
    #[must_use]
    pub fn new(
        store: Arc<S>,
        gateway: Arc<G>,
        identity: Arc<dyn IdentityProvider>,
        resumes: Arc<dyn ResumeStore>,
        settings: ServiceSettings,
    ) -> Self {
        let clock = Arc::new(DefaultClock);
        let lifecycle = ApplicationLifecycleService::new(
            Arc::clone(&store),
            Arc::clone(&store),
            Arc::clone(&store),
            gateway,
            Arc::clone(&clock),
        )
        .with_fee(settings.application_fee)
        .with_gateway_timeout(settings.gateway_timeout);
        let review = ReviewService::new(
            Arc::clone(&store),
            Arc::clone(&store),
            Arc::clone(&store),
            Arc::clone(&clock),
        );
        let jobs = JobCatalogService::new(Arc::clone(&store), clock);
        let audit = AuditService::new(Arc::clone(&store), Arc::clone(&store), store);

        Self {
            lifecycle: Arc::new(lifecycle),
            review: Arc::new(review),
            jobs: Arc::new(jobs),
            audit: Arc::new(audit),
            identity,
            resumes,
            max_upload_bytes: settings.max_upload_bytes,
        }
    }
}
