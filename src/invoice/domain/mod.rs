//! Invoice domain types.

mod invoice;

pub use invoice::{
    Invoice, InvoiceId, InvoicePaymentStatus, ParseInvoicePaymentStatusError,
    PersistedInvoiceData,
};
