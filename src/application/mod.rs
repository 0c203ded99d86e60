//! Job application lifecycle with payment gating.
//!
//! An application moves from `pending_payment` to `pending` once its fee is
//! settled, and from `pending` to a terminal `accepted` or `rejected` outcome
//! when the employer reviews it. The applicant drives the payment steps; the
//! employer drives review.
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Resume storage adapters in [`adapters`]
//! - Orchestration in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
