//! Identity provider port.

use crate::identity::domain::{ParseRoleError, Principal};
use std::sync::Arc;
use thiserror::Error;

/// Result type for identity operations.
pub type IdentityResult<T> = Result<T, IdentityError>;

/// Verifies bearer credentials and yields the authenticated principal.
pub trait IdentityProvider: Send + Sync {
    /// Authenticates a raw bearer token.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError`] when the token is malformed, expired, or
    /// carries claims that do not describe a valid principal.
    fn authenticate(&self, bearer_token: &str) -> IdentityResult<Principal>;
}

/// Errors returned by identity adapters.
#[derive(Debug, Clone, Error)]
pub enum IdentityError {
    /// No credential was supplied.
    #[error("missing bearer credential")]
    MissingCredential,

    /// The credential is not a bearer token.
    #[error("malformed authorization header")]
    MalformedCredential,

    /// The token failed signature or structure validation.
    #[error("invalid token: {0}")]
    InvalidToken(String),

    /// The token has expired.
    #[error("token has expired")]
    Expired,

    /// The token subject is not a user identifier.
    #[error("invalid token subject: {0}")]
    InvalidSubject(String),

    /// The token role claim is unknown.
    #[error(transparent)]
    UnknownRole(#[from] ParseRoleError),

    /// Token issuance failed.
    #[error("token issuance failed: {0}")]
    Issuance(Arc<dyn std::error::Error + Send + Sync>),
}

impl IdentityError {
    /// Wraps a token issuance error.
    pub fn issuance(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Issuance(Arc::new(err))
    }
}
