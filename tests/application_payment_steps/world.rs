//! Shared world state for payment-gated application scenarios.

use hireme::application::{
    domain::Application,
    services::{ApplicationLifecycleService, LifecycleError, ReviewError, ReviewService},
};
use hireme::identity::domain::Principal;
use hireme::invoice::domain::Invoice;
use hireme::job::{domain::Job, services::JobCatalogService};
use hireme::payment::{adapters::InMemoryPaymentGateway, domain::IntentId};
use hireme::persistence::InMemoryHiringStore;
use mockable::DefaultClock;
use rstest::fixture;
use std::sync::Arc;

/// Lifecycle service type used by the BDD world.
pub type TestLifecycle = ApplicationLifecycleService<
    InMemoryHiringStore,
    InMemoryHiringStore,
    InMemoryHiringStore,
    InMemoryPaymentGateway,
    DefaultClock,
>;

/// Review service type used by the BDD world.
pub type TestReview =
    ReviewService<InMemoryHiringStore, InMemoryHiringStore, InMemoryHiringStore, DefaultClock>;

/// Scenario world for payment-gated application behaviour tests.
pub struct HiringWorld {
    pub store: Arc<InMemoryHiringStore>,
    pub gateway: Arc<InMemoryPaymentGateway>,
    pub lifecycle: TestLifecycle,
    pub review: TestReview,
    pub jobs: JobCatalogService<InMemoryHiringStore, DefaultClock>,
    pub employer: Option<Principal>,
    pub seeker: Option<Principal>,
    pub job: Option<Job>,
    pub application: Option<Application>,
    pub intents: Vec<IntentId>,
    pub last_lifecycle_error: Option<LifecycleError>,
    pub last_review_error: Option<ReviewError>,
    pub last_confirmation: Option<(Invoice, bool)>,
}

impl HiringWorld {
    /// Creates a world with empty pending scenario state.
    #[must_use]
    pub fn new() -> Self {
        let store = Arc::new(InMemoryHiringStore::new());
        let gateway = Arc::new(InMemoryPaymentGateway::new());
        let clock = Arc::new(DefaultClock);
        Self {
            lifecycle: ApplicationLifecycleService::new(
                Arc::clone(&store),
                Arc::clone(&store),
                Arc::clone(&store),
                Arc::clone(&gateway),
                Arc::clone(&clock),
            ),
            review: ReviewService::new(
                Arc::clone(&store),
                Arc::clone(&store),
                Arc::clone(&store),
                Arc::clone(&clock),
            ),
            jobs: JobCatalogService::new(Arc::clone(&store), clock),
            store,
            gateway,
            employer: None,
            seeker: None,
            job: None,
            application: None,
            intents: Vec::new(),
            last_lifecycle_error: None,
            last_review_error: None,
            last_confirmation: None,
        }
    }

    /// Returns the scenario's job seeker.
    ///
    /// # Errors
    ///
    /// Returns an error if no seeker was set up.
    pub fn seeker(&self) -> Result<&Principal, eyre::Report> {
        self.seeker
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing job seeker in scenario world"))
    }

    /// Returns the scenario's employer.
    ///
    /// # Errors
    ///
    /// Returns an error if no employer was set up.
    pub fn employer(&self) -> Result<&Principal, eyre::Report> {
        self.employer
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing employer in scenario world"))
    }

    /// Returns the scenario's job.
    ///
    /// # Errors
    ///
    /// Returns an error if no job was posted.
    pub fn job(&self) -> Result<&Job, eyre::Report> {
        self.job
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing job in scenario world"))
    }

    /// Returns the scenario's current application.
    ///
    /// # Errors
    ///
    /// Returns an error if nothing was applied for.
    pub fn application(&self) -> Result<&Application, eyre::Report> {
        self.application
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing application in scenario world"))
    }
}

impl Default for HiringWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> HiringWorld {
    HiringWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
