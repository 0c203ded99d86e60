//! Invoice orchestration services.

mod recorder;

pub use recorder::{InvoiceRecorder, InvoiceRecorderError, InvoiceRecorderResult};
