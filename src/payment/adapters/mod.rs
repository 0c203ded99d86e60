//! Payment gateway adapters.

pub mod memory;
pub mod postgres;

pub use memory::InMemoryPaymentGateway;
pub use postgres::PostgresPaymentGateway;
