//! `PostgreSQL`-backed payment gateway.
//!
//! Intents are kept in the `payment_intents` table so that a single-node
//! deployment can run the full payment protocol without an external
//! processor.

mod gateway;
mod models;
mod schema;

pub use gateway::PostgresPaymentGateway;
