//! Port contracts for request identity.

pub mod provider;

pub use provider::{IdentityError, IdentityProvider, IdentityResult};
