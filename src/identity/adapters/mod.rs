//! Adapter implementations for request identity.

pub mod jwt;

pub use jwt::JwtIdentityProvider;
