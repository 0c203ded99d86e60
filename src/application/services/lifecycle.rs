//! Application lifecycle engine: initiation, payment request, confirmation.
//!
//! Every step re-reads persisted state and writes conditionally on the status
//! it read, so arbitrary delays and repeated calls between steps are safe.
//! Gateway calls are the only suspension points and are bounded by a timeout.

use crate::application::{
    domain::{
        Application, ApplicationDomainError, ApplicationId, ApplicationStatus, PaymentState,
        ResumeRef,
    },
    ports::{ApplicationRepository, ApplicationRepositoryError},
};
use crate::error::ErrorKind;
use crate::identity::domain::{Principal, UserId};
use crate::invoice::{
    domain::Invoice,
    ports::InvoiceRepository,
    services::{InvoiceRecorder, InvoiceRecorderError},
};
use crate::job::{
    domain::JobId,
    ports::{JobRepository, JobRepositoryError},
};
use crate::payment::{
    domain::{IntentId, IssuedIntent, PaymentAmount},
    ports::{PaymentGateway, PaymentGatewayError},
};
use mockable::Clock;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{error, info, warn};

/// Default bound on a single payment gateway call.
pub const DEFAULT_GATEWAY_TIMEOUT: Duration = Duration::from_secs(10);

/// Request payload for starting an application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitiateApplicationRequest {
    job_id: JobId,
    applicant_id: UserId,
    resume: ResumeRef,
}

impl InitiateApplicationRequest {
    /// Creates an initiation request.
    #[must_use]
    pub const fn new(job_id: JobId, applicant_id: UserId, resume: ResumeRef) -> Self {
        Self {
            job_id,
            applicant_id,
            resume,
        }
    }
}

/// Outcome of a successful initiation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitiatedApplication {
    /// The stored application.
    pub application: Application,
    /// Always `true`: a fresh application awaits its fee.
    pub payment_required: bool,
    /// Fee to settle.
    pub payment_amount: PaymentAmount,
}

/// Intent handed to the applicant for payment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedPayment {
    /// Gateway intent details.
    pub intent: IssuedIntent,
    /// Fee being charged.
    pub amount: PaymentAmount,
}

/// Outcome of a successful confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmedPayment {
    /// The paid application.
    pub application: Application,
    /// Invoice settling the application.
    pub invoice: Invoice,
    /// `false` when the application had already been settled by this intent.
    pub newly_settled: bool,
}

/// An applicant's view of one application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationDetails {
    /// The application.
    pub application: Application,
    /// Invoice, present once paid.
    pub invoice: Option<Invoice>,
    /// Derived payment state.
    pub payment_status: PaymentState,
    /// Fee for the application.
    pub payment_amount: PaymentAmount,
}

/// Service-level errors for the application lifecycle.
#[derive(Debug, Error)]
pub enum LifecycleError {
    /// Domain rule violated.
    #[error(transparent)]
    Domain(#[from] ApplicationDomainError),
    /// Application repository failed.
    #[error(transparent)]
    Repository(#[from] ApplicationRepositoryError),
    /// Job repository failed.
    #[error(transparent)]
    Jobs(#[from] JobRepositoryError),
    /// Invoice lookup failed.
    #[error(transparent)]
    Invoices(#[from] InvoiceRecorderError),
    /// The principal may not act for the applicant.
    #[error("user {user_id} may not act for applicant {applicant_id}")]
    Forbidden {
        /// Requesting user.
        user_id: UserId,
        /// Applicant named in the request.
        applicant_id: UserId,
    },
    /// The job does not exist or is closed.
    #[error("job {0} not found or not open for applications")]
    JobNotOpen(JobId),
    /// The applicant already applied to the job.
    #[error("user {applicant_id} has already applied for job {job_id}")]
    DuplicateApplication {
        /// Job applied to.
        job_id: JobId,
        /// Applying user.
        applicant_id: UserId,
    },
    /// No unpaid application exists for the pair.
    #[error("no pending application found for job {job_id} and user {applicant_id}")]
    NoPendingApplication {
        /// Job in the request.
        job_id: JobId,
        /// Applicant in the request.
        applicant_id: UserId,
    },
    /// The application fee has already been settled.
    #[error("payment already processed for application {0}")]
    AlreadyPaid(ApplicationId),
    /// The intent is unknown or not the one issued for this application.
    #[error("payment intent {0} not found for this application")]
    IntentNotFound(IntentId),
    /// The processor declined the charge.
    #[error("payment {0} was not confirmed; please try again")]
    PaymentNotConfirmed(IntentId),
    /// The processor did not answer in time.
    #[error("payment gateway did not respond within {0:?}")]
    GatewayTimeout(Duration),
    /// The processor could not be reached.
    #[error("payment gateway unavailable")]
    GatewayUnavailable(#[source] PaymentGatewayError),
    /// A concurrent writer changed the application.
    #[error("application {0} was modified concurrently")]
    ConcurrentModification(ApplicationId),
    /// An invoice already exists for an unpaid application.
    #[error("application {0} already has an invoice")]
    DuplicateInvoice(ApplicationId),
    /// A paid application has no invoice.
    #[error("paid application {0} has no invoice")]
    MissingInvoice(ApplicationId),
    /// No visible application with this identifier.
    #[error("application {0} not found")]
    NotFound(ApplicationId),
}

impl LifecycleError {
    /// Classifies the failure.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain(ApplicationDomainError::EmptyResumeRef) | Self::IntentNotFound(_) => {
                ErrorKind::Validation
            }
            Self::Domain(
                ApplicationDomainError::AlreadyPaid(_)
                | ApplicationDomainError::InvalidStateTransition { .. },
            )
            | Self::DuplicateApplication { .. }
            | Self::AlreadyPaid(_) => ErrorKind::StateConflict,
            Self::Domain(ApplicationDomainError::InconsistentPaymentState { .. })
            | Self::ConcurrentModification(_)
            | Self::DuplicateInvoice(_)
            | Self::MissingInvoice(_) => ErrorKind::InvariantViolation,
            Self::Forbidden { .. } => ErrorKind::Authorization,
            Self::JobNotOpen(_) | Self::NoPendingApplication { .. } | Self::NotFound(_) => {
                ErrorKind::NotFound
            }
            Self::PaymentNotConfirmed(_) => ErrorKind::GatewayDeclined,
            Self::GatewayTimeout(_) => ErrorKind::GatewayTimeout,
            Self::GatewayUnavailable(_) => ErrorKind::GatewayUnavailable,
            Self::Repository(_) | Self::Jobs(_) | Self::Invoices(_) => ErrorKind::Internal,
        }
    }

    /// Returns the stable code naming this failure.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Domain(err) => domain_code(err),
            Self::Repository(_) | Self::Jobs(_) | Self::Invoices(_) => "internal",
            Self::Forbidden { .. } => "forbidden",
            Self::JobNotOpen(_) => "job_not_open",
            Self::DuplicateApplication { .. } => "duplicate_application",
            Self::NoPendingApplication { .. } => "no_pending_application",
            Self::AlreadyPaid(_) => "already_paid",
            Self::IntentNotFound(_) => "intent_not_found",
            Self::PaymentNotConfirmed(_) => "payment_not_confirmed",
            Self::GatewayTimeout(_) => "gateway_timeout",
            Self::GatewayUnavailable(_) => "gateway_unavailable",
            Self::ConcurrentModification(_) => "concurrent_modification",
            Self::DuplicateInvoice(_) => "duplicate_invoice",
            Self::MissingInvoice(_) => "missing_invoice",
            Self::NotFound(_) => "application_not_found",
        }
    }
}

/// Code for a domain rule failure, shared with the review workflow.
pub(crate) const fn domain_code(err: &ApplicationDomainError) -> &'static str {
    match err {
        ApplicationDomainError::EmptyResumeRef => "invalid_resume",
        ApplicationDomainError::InvalidStateTransition { .. } => "invalid_state_transition",
        ApplicationDomainError::AlreadyPaid(_) => "already_paid",
        ApplicationDomainError::InconsistentPaymentState { .. } => "inconsistent_payment_state",
    }
}

/// Result type for lifecycle operations.
pub type LifecycleResult<T> = Result<T, LifecycleError>;

/// Drives applications from submission through payment settlement.
#[derive(Clone)]
pub struct ApplicationLifecycleService<A, J, I, G, C>
where
    A: ApplicationRepository,
    J: JobRepository,
    I: InvoiceRepository,
    G: PaymentGateway,
    C: Clock + Send + Sync,
{
    applications: Arc<A>,
    jobs: Arc<J>,
    invoices: InvoiceRecorder<I, C>,
    gateway: Arc<G>,
    clock: Arc<C>,
    fee: PaymentAmount,
    gateway_timeout: Duration,
}

impl<A, J, I, G, C> ApplicationLifecycleService<A, J, I, G, C>
where
    A: ApplicationRepository,
    J: JobRepository,
    I: InvoiceRepository,
    G: PaymentGateway,
    C: Clock + Send + Sync,
{
    /// Creates a lifecycle service charging the standard application fee.
    #[must_use]
    pub fn new(
        applications: Arc<A>,
        jobs: Arc<J>,
        invoices: Arc<I>,
        gateway: Arc<G>,
        clock: Arc<C>,
    ) -> Self {
        Self {
            applications,
            jobs,
            invoices: InvoiceRecorder::new(invoices, Arc::clone(&clock)),
            gateway,
            clock,
            fee: PaymentAmount::APPLICATION_FEE,
            gateway_timeout: DEFAULT_GATEWAY_TIMEOUT,
        }
    }

    /// Overrides the application fee.
    #[must_use]
    pub const fn with_fee(mut self, fee: PaymentAmount) -> Self {
        self.fee = fee;
        self
    }

    /// Overrides the bound on each gateway call.
    #[must_use]
    pub const fn with_gateway_timeout(mut self, timeout: Duration) -> Self {
        self.gateway_timeout = timeout;
        self
    }

    /// Returns the fee charged per application.
    #[must_use]
    pub const fn fee(&self) -> PaymentAmount {
        self.fee
    }

    /// Checks that the principal may apply to the job right now.
    ///
    /// Callers storing a resume run this first so that a rejected
    /// application leaves no upload behind. [`Self::initiate`] repeats the
    /// checks and the repository's unique pair constraint settles races.
    ///
    /// # Errors
    ///
    /// Returns the same rejections as [`Self::initiate`].
    pub async fn check_eligibility(
        &self,
        principal: &Principal,
        job_id: JobId,
        applicant_id: UserId,
    ) -> LifecycleResult<()> {
        authorize_applicant(principal, applicant_id)?;

        let job = self.jobs.find_by_id(job_id).await?;
        if !job.is_some_and(|found| found.is_open()) {
            return Err(LifecycleError::JobNotOpen(job_id));
        }

        if self
            .applications
            .find_by_job_and_applicant(job_id, applicant_id)
            .await?
            .is_some()
        {
            return Err(LifecycleError::DuplicateApplication {
                job_id,
                applicant_id,
            });
        }
        Ok(())
    }

    /// Submits an application to an open job.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::Forbidden`] when the principal is not the
    /// applicant, [`LifecycleError::JobNotOpen`] when the job is missing or
    /// closed, and [`LifecycleError::DuplicateApplication`] when the applicant
    /// already applied.
    pub async fn initiate(
        &self,
        principal: &Principal,
        request: InitiateApplicationRequest,
    ) -> LifecycleResult<InitiatedApplication> {
        let InitiateApplicationRequest {
            job_id,
            applicant_id,
            resume,
        } = request;
        self.check_eligibility(principal, job_id, applicant_id).await?;

        let application = Application::submit(job_id, applicant_id, resume, &*self.clock);
        self.applications
            .store(&application)
            .await
            .map_err(|err| match err {
                ApplicationRepositoryError::DuplicateApplication {
                    job_id,
                    applicant_id,
                } => LifecycleError::DuplicateApplication {
                    job_id,
                    applicant_id,
                },
                other => LifecycleError::Repository(other),
            })?;

        info!(
            application_id = %application.id(),
            job_id = %job_id,
            applicant_id = %applicant_id,
            "application initiated"
        );
        Ok(InitiatedApplication {
            application,
            payment_required: true,
            payment_amount: self.fee,
        })
    }

    /// Issues a fresh payment intent for an unpaid application.
    ///
    /// A repeated call replaces the stored intent; only the latest one can
    /// be confirmed.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::NoPendingApplication`] or
    /// [`LifecycleError::AlreadyPaid`] when the application is missing or
    /// settled, and gateway errors when the intent cannot be created.
    pub async fn request_payment(
        &self,
        principal: &Principal,
        job_id: JobId,
        applicant_id: UserId,
    ) -> LifecycleResult<IssuedPayment> {
        authorize_applicant(principal, applicant_id)?;
        let mut application = self.load_unpaid(job_id, applicant_id).await?;

        let intent = self
            .call_gateway(self.gateway.create_intent(self.fee))
            .await?;
        application.attach_intent(intent.intent_id.clone(), &*self.clock)?;

        self.applications
            .update(&application, ApplicationStatus::PendingPayment)
            .await
            .map_err(|err| match err {
                ApplicationRepositoryError::StaleState { id, .. } => {
                    LifecycleError::AlreadyPaid(id)
                }
                ApplicationRepositoryError::NotFound(_) => LifecycleError::NoPendingApplication {
                    job_id,
                    applicant_id,
                },
                other => LifecycleError::Repository(other),
            })?;

        info!(
            application_id = %application.id(),
            intent_id = %intent.intent_id,
            "payment intent issued"
        );
        Ok(IssuedPayment {
            intent,
            amount: self.fee,
        })
    }

    /// Confirms the applicant's payment and settles the application.
    ///
    /// On success the application becomes `pending` and exactly one invoice
    /// is written with it. Confirming again with the intent that settled the
    /// application returns the existing invoice.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::NoPendingApplication`],
    /// [`LifecycleError::AlreadyPaid`], [`LifecycleError::IntentNotFound`],
    /// [`LifecycleError::PaymentNotConfirmed`], gateway errors, or
    /// [`LifecycleError::ConcurrentModification`] when a racing writer won.
    pub async fn confirm_payment(
        &self,
        principal: &Principal,
        job_id: JobId,
        applicant_id: UserId,
        intent_id: IntentId,
    ) -> LifecycleResult<ConfirmedPayment> {
        authorize_applicant(principal, applicant_id)?;
        let Some(mut application) = self
            .applications
            .find_by_job_and_applicant(job_id, applicant_id)
            .await?
        else {
            return Err(LifecycleError::NoPendingApplication {
                job_id,
                applicant_id,
            });
        };

        if application.is_paid() {
            return self.settled_by(application, &intent_id).await;
        }
        if application.payment_intent_id() != Some(&intent_id) {
            return Err(LifecycleError::IntentNotFound(intent_id));
        }

        let confirmed = self
            .call_gateway(self.gateway.confirm_intent(&intent_id))
            .await?;
        if !confirmed {
            warn!(
                application_id = %application.id(),
                intent_id = %intent_id,
                "payment declined"
            );
            return Err(LifecycleError::PaymentNotConfirmed(intent_id));
        }

        let invoice = self.invoices.prepare(
            application.id(),
            applicant_id,
            self.fee,
            intent_id.clone(),
        );
        application.mark_paid(intent_id.clone(), &*self.clock)?;

        match self
            .applications
            .settle_payment(&application, ApplicationStatus::PendingPayment, &invoice)
            .await
        {
            Ok(()) => {
                info!(
                    application_id = %application.id(),
                    invoice_id = %invoice.id(),
                    amount = %self.fee,
                    "payment settled"
                );
                Ok(ConfirmedPayment {
                    application,
                    invoice,
                    newly_settled: true,
                })
            }
            Err(ApplicationRepositoryError::StaleState { id, .. }) => {
                self.resolve_lost_settlement(id, &intent_id).await
            }
            Err(ApplicationRepositoryError::DuplicateInvoice(id)) => {
                error!(application_id = %id, "invoice exists for unpaid application");
                Err(LifecycleError::DuplicateInvoice(id))
            }
            Err(ApplicationRepositoryError::NotFound(_)) => {
                Err(LifecycleError::NoPendingApplication {
                    job_id,
                    applicant_id,
                })
            }
            Err(other) => Err(LifecycleError::Repository(other)),
        }
    }

    /// Returns an application with its invoice for the applicant.
    ///
    /// Administrators may view any application; other principals see
    /// [`LifecycleError::NotFound`] for applications that are not theirs.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::NotFound`] or repository errors.
    pub async fn application_details(
        &self,
        principal: &Principal,
        application_id: ApplicationId,
    ) -> LifecycleResult<ApplicationDetails> {
        let application = self
            .applications
            .find_by_id(application_id)
            .await?
            .filter(|found| principal.is_admin() || principal.acts_for(found.applicant_id()))
            .ok_or(LifecycleError::NotFound(application_id))?;

        let invoice = self.invoices.find_for_application(application_id).await?;
        if application.is_paid() && invoice.is_none() {
            error!(application_id = %application_id, "paid application has no invoice");
            return Err(LifecycleError::MissingInvoice(application_id));
        }

        Ok(ApplicationDetails {
            payment_status: application.payment_state(),
            payment_amount: self.fee,
            application,
            invoice,
        })
    }

    async fn load_unpaid(
        &self,
        job_id: JobId,
        applicant_id: UserId,
    ) -> LifecycleResult<Application> {
        let application = self
            .applications
            .find_by_job_and_applicant(job_id, applicant_id)
            .await?
            .ok_or(LifecycleError::NoPendingApplication {
                job_id,
                applicant_id,
            })?;
        if application.is_paid() {
            return Err(LifecycleError::AlreadyPaid(application.id()));
        }
        Ok(application)
    }

    async fn settled_by(
        &self,
        application: Application,
        intent_id: &IntentId,
    ) -> LifecycleResult<ConfirmedPayment> {
        if application.payment_intent_id() != Some(intent_id) {
            return Err(LifecycleError::AlreadyPaid(application.id()));
        }
        let invoice = self
            .invoices
            .find_for_application(application.id())
            .await?
            .ok_or_else(|| {
                error!(application_id = %application.id(), "paid application has no invoice");
                LifecycleError::MissingInvoice(application.id())
            })?;
        Ok(ConfirmedPayment {
            application,
            invoice,
            newly_settled: false,
        })
    }

    async fn resolve_lost_settlement(
        &self,
        application_id: ApplicationId,
        intent_id: &IntentId,
    ) -> LifecycleResult<ConfirmedPayment> {
        let current = self.applications.find_by_id(application_id).await?;
        match current {
            Some(application)
                if application.is_paid()
                    && application.payment_intent_id() == Some(intent_id) =>
            {
                self.settled_by(application, intent_id).await
            }
            _ => {
                error!(
                    application_id = %application_id,
                    intent_id = %intent_id,
                    "settlement lost to a concurrent writer"
                );
                Err(LifecycleError::ConcurrentModification(application_id))
            }
        }
    }

    async fn call_gateway<T>(
        &self,
        call: impl Future<Output = Result<T, PaymentGatewayError>>,
    ) -> LifecycleResult<T> {
        match tokio::time::timeout(self.gateway_timeout, call).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(PaymentGatewayError::IntentNotFound(intent_id))) => {
                Err(LifecycleError::IntentNotFound(intent_id))
            }
            Ok(Err(err @ PaymentGatewayError::Unavailable(_))) => {
                warn!(error = %err, "payment gateway unavailable");
                Err(LifecycleError::GatewayUnavailable(err))
            }
            Err(_) => {
                warn!(timeout = ?self.gateway_timeout, "payment gateway timed out");
                Err(LifecycleError::GatewayTimeout(self.gateway_timeout))
            }
        }
    }
}

fn authorize_applicant(principal: &Principal, applicant_id: UserId) -> LifecycleResult<()> {
    if principal.can_apply_to_jobs() && principal.acts_for(applicant_id) {
        return Ok(());
    }
    Err(LifecycleError::Forbidden {
        user_id: principal.user_id(),
        applicant_id,
    })
}
