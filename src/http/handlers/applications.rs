//! Application lifecycle and review endpoints.

use super::{json_body, parse_id};
use crate::application::{
    domain::{Application, ApplicationId, ApplicationStatus, PaymentState},
    ports::ResumeUpload,
    services::{EmployerApplicationView, InitiateApplicationRequest},
};
use crate::http::{auth::Authenticated, error::ApiError, state::AppState};
use crate::identity::domain::{Principal, UserId};
use crate::invoice::domain::Invoice;
use crate::job::domain::{Job, JobId};
use crate::payment::{
    domain::{IntentId, PaymentAmount},
    ports::PaymentGateway,
};
use crate::persistence::HiringStore;
use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

const RESUME_FIELD: &str = "resume";

#[derive(Debug, Serialize)]
pub(in crate::http) struct InitiatedBody {
    message: &'static str,
    application: Application,
    payment_required: bool,
    payment_amount: PaymentAmount,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(in crate::http) struct PaymentBody {
    message: &'static str,
    client_secret: String,
    payment_intent_id: IntentId,
    amount: PaymentAmount,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(in crate::http) struct ConfirmPaymentBody {
    payment_intent_id: String,
}

#[derive(Debug, Serialize)]
pub(in crate::http) struct ConfirmedBody {
    message: &'static str,
    application_id: ApplicationId,
    invoice_id: String,
    amount: PaymentAmount,
}

#[derive(Debug, Deserialize)]
pub(in crate::http) struct StatusBody {
    status: String,
}

#[derive(Debug, Serialize)]
pub(in crate::http) struct DetailsBody {
    #[serde(flatten)]
    application: Application,
    invoice: Option<Invoice>,
    payment_status: PaymentState,
    payment_amount: PaymentAmount,
}

#[derive(Debug, Serialize)]
pub(in crate::http) struct EmployerViewBody {
    #[serde(flatten)]
    application: Application,
    job: Job,
    invoice: Option<Invoice>,
    payment_status: PaymentState,
}

impl From<EmployerApplicationView> for EmployerViewBody {
    fn from(view: EmployerApplicationView) -> Self {
        Self {
            application: view.application,
            job: view.job,
            invoice: view.invoice,
            payment_status: view.payment_status,
        }
    }
}

fn applicant_path(job_id: &str, user_id: &str) -> Result<(JobId, UserId), ApiError> {
    Ok((
        parse_id(job_id, "job id", JobId::from_uuid)?,
        parse_id(user_id, "user id", UserId::from_uuid)?,
    ))
}

async fn read_resume(mut multipart: Multipart) -> Result<ResumeUpload, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| ApiError::bad_request(err.body_text()))?
    {
        if field.name() != Some(RESUME_FIELD) {
            continue;
        }
        let file_name = field.file_name().unwrap_or("resume").to_owned();
        let bytes = field
            .bytes()
            .await
            .map_err(|err| ApiError::bad_request(err.body_text()))?;
        return Ok(ResumeUpload::new(file_name, bytes.to_vec()));
    }
    Err(ApiError::bad_request("resume file is required"))
}

fn ensure_applicant(principal: &Principal, applicant_id: UserId) -> Result<(), ApiError> {
    if principal.can_apply_to_jobs() && principal.acts_for(applicant_id) {
        Ok(())
    } else {
        Err(ApiError::forbidden("you can only apply on your own behalf"))
    }
}

pub(in crate::http) async fn initiate<S, G>(
    State(state): State<AppState<S, G>>,
    Authenticated(principal): Authenticated,
    Path((job_id, user_id)): Path<(String, String)>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<InitiatedBody>), ApiError>
where
    S: HiringStore,
    G: PaymentGateway + 'static,
{
    let (job_id, applicant_id) = applicant_path(&job_id, &user_id)?;
    // Eligibility is settled before the upload so rejections store no file.
    ensure_applicant(&principal, applicant_id)?;
    state
        .lifecycle
        .check_eligibility(&principal, job_id, applicant_id)
        .await?;
    let resume = state.resumes.save(read_resume(multipart).await?).await?;

    let initiated = state
        .lifecycle
        .initiate(
            &principal,
            InitiateApplicationRequest::new(job_id, applicant_id, resume),
        )
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(InitiatedBody {
            message: "application created, payment required",
            application: initiated.application,
            payment_required: initiated.payment_required,
            payment_amount: initiated.payment_amount,
        }),
    ))
}

pub(in crate::http) async fn request_payment<S, G>(
    State(state): State<AppState<S, G>>,
    Authenticated(principal): Authenticated,
    Path((job_id, user_id)): Path<(String, String)>,
) -> Result<Json<PaymentBody>, ApiError>
where
    S: HiringStore,
    G: PaymentGateway + 'static,
{
    let (job_id, applicant_id) = applicant_path(&job_id, &user_id)?;
    let issued = state
        .lifecycle
        .request_payment(&principal, job_id, applicant_id)
        .await?;
    Ok(Json(PaymentBody {
        message: "payment intent created",
        client_secret: issued.intent.client_secret.as_str().to_owned(),
        payment_intent_id: issued.intent.intent_id,
        amount: issued.amount,
    }))
}

pub(in crate::http) async fn confirm_payment<S, G>(
    State(state): State<AppState<S, G>>,
    Authenticated(principal): Authenticated,
    Path((job_id, user_id)): Path<(String, String)>,
    body: Result<Json<ConfirmPaymentBody>, JsonRejection>,
) -> Result<Json<ConfirmedBody>, ApiError>
where
    S: HiringStore,
    G: PaymentGateway + 'static,
{
    let (job_id, applicant_id) = applicant_path(&job_id, &user_id)?;
    let ConfirmPaymentBody { payment_intent_id } = json_body(body)?;
    let intent_id = IntentId::new(payment_intent_id)
        .map_err(|err| ApiError::bad_request(err.to_string()))?;

    let confirmed = state
        .lifecycle
        .confirm_payment(&principal, job_id, applicant_id, intent_id)
        .await?;
    Ok(Json(ConfirmedBody {
        message: "payment confirmed, application submitted",
        application_id: confirmed.application.id(),
        invoice_id: confirmed.invoice.id().to_string(),
        amount: confirmed.invoice.amount(),
    }))
}

pub(in crate::http) async fn set_status<S, G>(
    State(state): State<AppState<S, G>>,
    Authenticated(principal): Authenticated,
    Path(id): Path<String>,
    body: Result<Json<StatusBody>, JsonRejection>,
) -> Result<Json<Application>, ApiError>
where
    S: HiringStore,
    G: PaymentGateway + 'static,
{
    let application_id = parse_id(&id, "application id", ApplicationId::from_uuid)?;
    let StatusBody { status } = json_body(body)?;
    let outcome = ApplicationStatus::try_from(status.as_str())
        .map_err(|err| ApiError::bad_request(err.to_string()))?;
    if !principal.can_post_jobs() {
        return Err(ApiError::forbidden("only employers can review applications"));
    }

    let application = state
        .review
        .set_status(&principal, application_id, outcome)
        .await?;
    Ok(Json(application))
}

pub(in crate::http) async fn details<S, G>(
    State(state): State<AppState<S, G>>,
    Authenticated(principal): Authenticated,
    Path(id): Path<String>,
) -> Result<Json<DetailsBody>, ApiError>
where
    S: HiringStore,
    G: PaymentGateway + 'static,
{
    let application_id = parse_id(&id, "application id", ApplicationId::from_uuid)?;
    let details = state
        .lifecycle
        .application_details(&principal, application_id)
        .await?;
    Ok(Json(DetailsBody {
        application: details.application,
        invoice: details.invoice,
        payment_status: details.payment_status,
        payment_amount: details.payment_amount,
    }))
}

pub(in crate::http) async fn list_for_job<S, G>(
    State(state): State<AppState<S, G>>,
    Authenticated(principal): Authenticated,
    Path(id): Path<String>,
) -> Result<Json<Vec<Application>>, ApiError>
where
    S: HiringStore,
    G: PaymentGateway + 'static,
{
    let job_id = parse_id(&id, "job id", JobId::from_uuid)?;
    if !principal.can_post_jobs() {
        return Err(ApiError::forbidden("only employers can list job applications"));
    }
    let applications = state.review.list_for_job(&principal, job_id).await?;
    Ok(Json(applications))
}

pub(in crate::http) async fn list_for_employer<S, G>(
    State(state): State<AppState<S, G>>,
    Authenticated(principal): Authenticated,
) -> Result<Json<Vec<EmployerViewBody>>, ApiError>
where
    S: HiringStore,
    G: PaymentGateway + 'static,
{
    if !principal.can_post_jobs() {
        return Err(ApiError::forbidden("only employers can list applications"));
    }
    let views = state.review.list_for_employer(&principal).await?;
    Ok(Json(views.into_iter().map(EmployerViewBody::from).collect()))
}
