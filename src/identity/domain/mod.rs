//! Domain model for authenticated principals.

mod error;
mod ids;
mod principal;
mod role;

pub use error::ParseRoleError;
pub use ids::UserId;
pub use principal::Principal;
pub use role::Role;
