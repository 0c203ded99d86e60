//! `PostgreSQL` adapters for hiring persistence.

mod bootstrap;
mod models;
mod schema;
mod store;

pub use bootstrap::apply_schema;
pub use store::{HiringPgPool, PostgresHiringStore};
