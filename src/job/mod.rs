//! Job postings for the hiring platform.
//!
//! Jobs are the parent records that applications attach to. The catalog
//! supports posting, editing, closing, and deleting jobs, with mutation
//! restricted to the poster or an administrator. The module follows
//! hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Orchestration services in [`services`]
//!
//! Storage adapters live in [`crate::persistence`] because job deletion
//! cascades into applications and invoices within the same store.

pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
