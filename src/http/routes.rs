//! Route table.

use super::handlers::{admin, applications, health, jobs};
use super::state::AppState;
use crate::payment::ports::PaymentGateway;
use crate::persistence::HiringStore;
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post, put};
use tower_http::trace::TraceLayer;

/// Multipart framing allowance on top of the resume size limit.
const UPLOAD_OVERHEAD_BYTES: usize = 64 * 1024;

/// Builds the service router.
///
/// Payment steps are under `/api/applications/{job_id}/{user_id}/…`,
/// review under `/api/applications/{application_id}/status`, the job
/// catalog under `/api/jobs` and audit listings under `/api/admin`.
pub fn router<S, G>(state: AppState<S, G>) -> Router
where
    S: HiringStore,
    G: PaymentGateway + 'static,
{
    let body_limit = state.max_upload_bytes.saturating_add(UPLOAD_OVERHEAD_BYTES);

    let applications = Router::new()
        .route("/{id}/{user_id}/initiate", post(applications::initiate::<S, G>))
        .route("/{id}/{user_id}/payment", post(applications::request_payment::<S, G>))
        .route(
            "/{id}/{user_id}/confirm-payment",
            post(applications::confirm_payment::<S, G>),
        )
        .route("/{id}/status", put(applications::set_status::<S, G>))
        .route("/{id}", get(applications::details::<S, G>))
        .route("/job/{id}", get(applications::list_for_job::<S, G>))
        .route(
            "/user/applications",
            get(applications::list_for_employer::<S, G>),
        )
        .layer(DefaultBodyLimit::max(body_limit));

    let jobs = Router::new()
        .route("/", get(jobs::list_open::<S, G>).post(jobs::create::<S, G>))
        .route("/employee/jobs", get(jobs::list_posted::<S, G>))
        .route(
            "/{id}",
            get(jobs::find::<S, G>)
                .put(jobs::update::<S, G>)
                .delete(jobs::delete::<S, G>),
        );

    let admin = Router::new()
        .route("/applications", get(admin::applications::<S, G>))
        .route("/jobs", get(admin::jobs::<S, G>))
        .route("/analytics", get(admin::analytics::<S, G>));

    Router::new()
        .route("/health", get(health::health))
        .nest("/api/applications", applications)
        .nest("/api/jobs", jobs)
        .nest("/api/admin", admin)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
