//! Request identity for the hiring platform.
//!
//! The identity layer turns a bearer credential into a verified
//! [`domain::Principal`] and exposes capability checks over it, so handlers
//! and services never compare role strings directly.
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]

pub mod adapters;
pub mod domain;
pub mod ports;
