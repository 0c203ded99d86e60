//! Administrator audit endpoints.

use super::parse_id;
use crate::application::domain::{Application, ApplicationStatus};
use crate::audit::{
    ApplicationAuditFilter, ApplicationSummary, AuditedApplication, AuditedJob, CompanyAnalytics,
    JobAuditFilter,
};
use crate::http::{auth::Authenticated, error::ApiError, state::AppState};
use crate::job::domain::{Job, JobId, JobStatus};
use crate::payment::ports::PaymentGateway;
use crate::persistence::HiringStore;
use axum::Json;
use axum::extract::{Query, State};
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Deserialize)]
pub(in crate::http) struct ApplicationAuditQuery {
    company: Option<String>,
    status: Option<String>,
    job_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(in crate::http) struct JobAuditQuery {
    company: Option<String>,
    status: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(in crate::http) struct AnalyticsQuery {
    company: Option<String>,
}

#[derive(Debug, Serialize)]
pub(in crate::http) struct AuditedApplicationBody {
    #[serde(flatten)]
    application: Application,
    job: Job,
}

#[derive(Debug, Serialize)]
pub(in crate::http) struct AuditedJobBody {
    #[serde(flatten)]
    job: Job,
    applications: Vec<ApplicationSummary>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|raw| !raw.trim().is_empty())
}

impl ApplicationAuditQuery {
    fn into_filter(self) -> Result<ApplicationAuditFilter, ApiError> {
        let status = non_blank(self.status)
            .map(|raw| ApplicationStatus::try_from(raw.as_str()))
            .transpose()
            .map_err(|err| ApiError::bad_request(err.to_string()))?;
        let job_id = non_blank(self.job_id)
            .map(|raw| parse_id(&raw, "job id", JobId::from_uuid))
            .transpose()?;
        Ok(ApplicationAuditFilter {
            company_name: non_blank(self.company),
            status,
            job_id,
        })
    }
}

impl JobAuditQuery {
    fn into_filter(self) -> Result<JobAuditFilter, ApiError> {
        let status = non_blank(self.status)
            .map(|raw| JobStatus::try_from(raw.as_str()))
            .transpose()
            .map_err(|err| ApiError::bad_request(err.to_string()))?;
        Ok(JobAuditFilter {
            company_name: non_blank(self.company),
            status,
        })
    }
}

pub(in crate::http) async fn applications<S, G>(
    State(state): State<AppState<S, G>>,
    Authenticated(principal): Authenticated,
    Query(query): Query<ApplicationAuditQuery>,
) -> Result<Json<Vec<AuditedApplicationBody>>, ApiError>
where
    S: HiringStore,
    G: PaymentGateway + 'static,
{
    let filter = query.into_filter()?;
    let audited = state.audit.list_applications(&principal, filter).await?;
    Ok(Json(
        audited
            .into_iter()
            .map(|AuditedApplication { application, job }| AuditedApplicationBody {
                application,
                job,
            })
            .collect(),
    ))
}

pub(in crate::http) async fn jobs<S, G>(
    State(state): State<AppState<S, G>>,
    Authenticated(principal): Authenticated,
    Query(query): Query<JobAuditQuery>,
) -> Result<Json<Vec<AuditedJobBody>>, ApiError>
where
    S: HiringStore,
    G: PaymentGateway + 'static,
{
    let filter = query.into_filter()?;
    let audited = state.audit.list_jobs(&principal, filter).await?;
    Ok(Json(
        audited
            .into_iter()
            .map(|AuditedJob { job, applications }| AuditedJobBody { job, applications })
            .collect(),
    ))
}

pub(in crate::http) async fn analytics<S, G>(
    State(state): State<AppState<S, G>>,
    Authenticated(principal): Authenticated,
    Query(query): Query<AnalyticsQuery>,
) -> Result<Json<CompanyAnalytics>, ApiError>
where
    S: HiringStore,
    G: PaymentGateway + 'static,
{
    let company = query.company.unwrap_or_default();
    Ok(Json(state.audit.company_analytics(&principal, &company).await?))
}
