//! Job catalog endpoints.

use super::{json_body, parse_id};
use crate::http::{auth::Authenticated, error::ApiError, state::AppState};
use crate::job::domain::{Job, JobId, JobStatus};
use crate::job::services::{PostJobRequest, UpdateJobRequest};
use crate::payment::ports::PaymentGateway;
use crate::persistence::HiringStore;
use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub(in crate::http) struct CreateJobBody {
    job_title: String,
    job_description: String,
    company_name: String,
}

#[derive(Debug, Default, Deserialize)]
pub(in crate::http) struct UpdateJobBody {
    job_title: Option<String>,
    job_description: Option<String>,
    company_name: Option<String>,
    job_status: Option<String>,
}

#[derive(Debug, Serialize)]
pub(in crate::http) struct DeletedBody {
    message: &'static str,
    job_id: JobId,
}

impl UpdateJobBody {
    fn into_request(self) -> Result<UpdateJobRequest, ApiError> {
        let mut request = UpdateJobRequest::new();
        if let Some(title) = self.job_title {
            request = request.with_title(title);
        }
        if let Some(description) = self.job_description {
            request = request.with_description(description);
        }
        if let Some(company) = self.company_name {
            request = request.with_company_name(company);
        }
        if let Some(raw) = self.job_status {
            let status = JobStatus::try_from(raw.as_str())
                .map_err(|err| ApiError::bad_request(err.to_string()))?;
            request = request.with_status(status);
        }
        Ok(request)
    }
}

pub(in crate::http) async fn list_open<S, G>(
    State(state): State<AppState<S, G>>,
) -> Result<Json<Vec<Job>>, ApiError>
where
    S: HiringStore,
    G: PaymentGateway + 'static,
{
    Ok(Json(state.jobs.list_open().await?))
}

pub(in crate::http) async fn find<S, G>(
    State(state): State<AppState<S, G>>,
    Path(id): Path<String>,
) -> Result<Json<Job>, ApiError>
where
    S: HiringStore,
    G: PaymentGateway + 'static,
{
    let job_id = parse_id(&id, "job id", JobId::from_uuid)?;
    state
        .jobs
        .find(job_id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("job not found: {job_id}")))
}

pub(in crate::http) async fn create<S, G>(
    State(state): State<AppState<S, G>>,
    Authenticated(principal): Authenticated,
    body: Result<Json<CreateJobBody>, JsonRejection>,
) -> Result<(StatusCode, Json<Job>), ApiError>
where
    S: HiringStore,
    G: PaymentGateway + 'static,
{
    if !principal.can_post_jobs() {
        return Err(ApiError::forbidden("only employers can post jobs"));
    }
    let CreateJobBody {
        job_title,
        job_description,
        company_name,
    } = json_body(body)?;
    let job = state
        .jobs
        .post(
            &principal,
            PostJobRequest::new(job_title, job_description, company_name),
        )
        .await?;
    Ok((StatusCode::CREATED, Json(job)))
}

pub(in crate::http) async fn update<S, G>(
    State(state): State<AppState<S, G>>,
    Authenticated(principal): Authenticated,
    Path(id): Path<String>,
    body: Result<Json<UpdateJobBody>, JsonRejection>,
) -> Result<Json<Job>, ApiError>
where
    S: HiringStore,
    G: PaymentGateway + 'static,
{
    let job_id = parse_id(&id, "job id", JobId::from_uuid)?;
    if !principal.can_post_jobs() {
        return Err(ApiError::forbidden("only employers can edit jobs"));
    }
    let request = json_body(body)?.into_request()?;
    Ok(Json(state.jobs.update(&principal, job_id, request).await?))
}

pub(in crate::http) async fn delete<S, G>(
    State(state): State<AppState<S, G>>,
    Authenticated(principal): Authenticated,
    Path(id): Path<String>,
) -> Result<Json<DeletedBody>, ApiError>
where
    S: HiringStore,
    G: PaymentGateway + 'static,
{
    let job_id = parse_id(&id, "job id", JobId::from_uuid)?;
    if !principal.can_post_jobs() {
        return Err(ApiError::forbidden("only employers can delete jobs"));
    }
    state.jobs.delete(&principal, job_id).await?;
    Ok(Json(DeletedBody {
        message: "job deleted",
        job_id,
    }))
}

pub(in crate::http) async fn list_posted<S, G>(
    State(state): State<AppState<S, G>>,
    Authenticated(principal): Authenticated,
) -> Result<Json<Vec<Job>>, ApiError>
where
    S: HiringStore,
    G: PaymentGateway + 'static,
{
    if !principal.can_post_jobs() {
        return Err(ApiError::forbidden("only employers have posted jobs"));
    }
    Ok(Json(state.jobs.list_posted_by(&principal).await?))
}
