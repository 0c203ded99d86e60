//! Port contracts for invoice persistence.

mod repository;

pub use repository::{InvoiceRepository, InvoiceRepositoryError, InvoiceRepositoryResult};
