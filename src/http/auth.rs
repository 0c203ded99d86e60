//! Bearer-token authentication extractor.

use super::{error::ApiError, state::AppState};
use crate::identity::{domain::Principal, ports::IdentityError};
use crate::payment::ports::PaymentGateway;
use crate::persistence::HiringStore;
use axum::extract::FromRequestParts;
use axum::http::{header::AUTHORIZATION, request::Parts};

/// The authenticated caller of a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Authenticated(pub Principal);

/// Extracts the token from an `Authorization: Bearer <token>` header value.
///
/// # Errors
///
/// Returns [`IdentityError::MalformedCredential`] for other schemes or an
/// empty token.
pub fn bearer_token(header: &str) -> Result<&str, IdentityError> {
    let (scheme, token) = header
        .trim()
        .split_once(' ')
        .ok_or(IdentityError::MalformedCredential)?;
    let token = token.trim();
    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return Err(IdentityError::MalformedCredential);
    }
    Ok(token)
}

impl<S, G> FromRequestParts<AppState<S, G>> for Authenticated
where
    S: HiringStore,
    G: PaymentGateway + 'static,
{
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState<S, G>,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or(IdentityError::MissingCredential)?
            .to_str()
            .map_err(|_| IdentityError::MalformedCredential)?;
        let principal = state.identity.authenticate(bearer_token(header)?)?;
        Ok(Self(principal))
    }
}
