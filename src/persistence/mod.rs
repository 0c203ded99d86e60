//! Storage adapters implementing the job, application, and invoice ports.
//!
//! One store backs all three ports so that payment settlement can update an
//! application and insert its invoice atomically, and so that deleting a job
//! cascades to its applications and invoices.

use crate::application::ports::ApplicationRepository;
use crate::invoice::ports::InvoiceRepository;
use crate::job::ports::JobRepository;

pub mod memory;
pub mod postgres;

pub use memory::InMemoryHiringStore;
pub use postgres::{HiringPgPool, PostgresHiringStore, apply_schema};

/// A store backing every hiring repository port.
pub trait HiringStore: JobRepository + ApplicationRepository + InvoiceRepository + 'static {}

impl<T> HiringStore for T where T: JobRepository + ApplicationRepository + InvoiceRepository + 'static {}
