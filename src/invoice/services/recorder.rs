//! Records settled application fees as invoices.

use crate::application::domain::ApplicationId;
use crate::identity::domain::UserId;
use crate::invoice::{
    domain::Invoice,
    ports::{InvoiceRepository, InvoiceRepositoryError},
};
use crate::payment::domain::{IntentId, PaymentAmount};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Service-level errors for invoice recording.
#[derive(Debug, Error)]
pub enum InvoiceRecorderError {
    /// The application already has an invoice.
    #[error("application {0} already has an invoice")]
    DuplicateInvoice(ApplicationId),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(InvoiceRepositoryError),
}

impl From<InvoiceRepositoryError> for InvoiceRecorderError {
    fn from(err: InvoiceRepositoryError) -> Self {
        match err {
            InvoiceRepositoryError::DuplicateInvoice(application_id) => {
                Self::DuplicateInvoice(application_id)
            }
            other @ InvoiceRepositoryError::Persistence(_) => Self::Repository(other),
        }
    }
}

/// Result type for invoice recording.
pub type InvoiceRecorderResult<T> = Result<T, InvoiceRecorderError>;

/// Builds and persists invoices for paid applications.
#[derive(Clone)]
pub struct InvoiceRecorder<I, C>
where
    I: InvoiceRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<I>,
    clock: Arc<C>,
}

impl<I, C> InvoiceRecorder<I, C>
where
    I: InvoiceRepository,
    C: Clock + Send + Sync,
{
    /// Creates a recorder.
    #[must_use]
    pub const fn new(repository: Arc<I>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Builds a successful invoice without persisting it.
    ///
    /// Used when the invoice is written together with the application
    /// update in one atomic settlement.
    #[must_use]
    pub fn prepare(
        &self,
        application_id: ApplicationId,
        user_id: UserId,
        amount: PaymentAmount,
        intent_id: IntentId,
    ) -> Invoice {
        Invoice::settled(
            application_id,
            user_id,
            amount,
            intent_id,
            self.clock.as_ref(),
        )
    }

    /// Builds and stores a successful invoice.
    ///
    /// Payment confirmation does not call this; it writes the invoice
    /// built by [`Self::prepare`] inside the repository's atomic settlement.
    /// Use it to record invoices outside that path, such as backfills.
    ///
    /// # Errors
    ///
    /// Returns [`InvoiceRecorderError::DuplicateInvoice`] when the
    /// application already has an invoice.
    pub async fn record(
        &self,
        application_id: ApplicationId,
        user_id: UserId,
        amount: PaymentAmount,
        intent_id: IntentId,
    ) -> InvoiceRecorderResult<Invoice> {
        let invoice = self.prepare(application_id, user_id, amount, intent_id);
        self.repository.store(&invoice).await?;
        info!(
            invoice_id = %invoice.id(),
            application_id = %application_id,
            amount = %amount,
            "invoice recorded"
        );
        Ok(invoice)
    }

    /// Finds the invoice for an application.
    ///
    /// # Errors
    ///
    /// Returns repository errors.
    pub async fn find_for_application(
        &self,
        application_id: ApplicationId,
    ) -> InvoiceRecorderResult<Option<Invoice>> {
        Ok(self.repository.find_by_application(application_id).await?)
    }
}
