//! Repository port for invoice storage.

use crate::application::domain::ApplicationId;
use crate::identity::domain::UserId;
use crate::invoice::domain::Invoice;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for invoice repository operations.
pub type InvoiceRepositoryResult<T> = Result<T, InvoiceRepositoryError>;

/// Invoice persistence contract.
#[async_trait]
pub trait InvoiceRepository: Send + Sync {
    /// Stores a new invoice.
    ///
    /// # Errors
    ///
    /// Returns [`InvoiceRepositoryError::DuplicateInvoice`] when the
    /// application already has an invoice.
    async fn store(&self, invoice: &Invoice) -> InvoiceRepositoryResult<()>;

    /// Finds the invoice for an application.
    async fn find_by_application(
        &self,
        application_id: ApplicationId,
    ) -> InvoiceRepositoryResult<Option<Invoice>>;

    /// Returns the invoices for any of the given applications.
    async fn list_for_applications(
        &self,
        application_ids: &[ApplicationId],
    ) -> InvoiceRepositoryResult<Vec<Invoice>>;

    /// Returns every invoice paid by a user, newest first.
    ///
    /// Not exposed over HTTP.
    async fn list_for_user(&self, user_id: UserId) -> InvoiceRepositoryResult<Vec<Invoice>>;
}

/// Errors returned by invoice repository implementations.
#[derive(Debug, Clone, Error)]
pub enum InvoiceRepositoryError {
    /// The application already has an invoice.
    #[error("application {0} already has an invoice")]
    DuplicateInvoice(ApplicationId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl InvoiceRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
