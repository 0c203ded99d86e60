//! HMAC-signed JWT identity adapter.

use crate::identity::{
    domain::{Principal, Role, UserId},
    ports::{IdentityError, IdentityProvider, IdentityResult},
};
use chrono::Duration;
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, errors::ErrorKind as JwtErrorKind,
};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Default lifetime of issued tokens.
pub const DEFAULT_TOKEN_TTL_SECS: i64 = 24 * 60 * 60;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    company_name: Option<String>,
    iat: i64,
    exp: i64,
}

/// Identity provider backed by HS256 JSON web tokens.
#[derive(Clone)]
pub struct JwtIdentityProvider {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    token_ttl: Duration,
}

impl JwtIdentityProvider {
    /// Creates a provider from a shared secret.
    #[must_use]
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation: Validation::new(Algorithm::HS256),
            token_ttl: Duration::seconds(DEFAULT_TOKEN_TTL_SECS),
        }
    }

    /// Overrides the lifetime of issued tokens.
    #[must_use]
    pub const fn with_token_ttl(mut self, token_ttl: Duration) -> Self {
        self.token_ttl = token_ttl;
        self
    }

    /// Issues a signed token for the principal.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::Issuance`] when signing fails.
    pub fn issue(&self, principal: &Principal, clock: &impl Clock) -> IdentityResult<String> {
        let issued_at = clock.utc();
        let claims = Claims {
            sub: principal.user_id().to_string(),
            role: principal.role().as_str().to_owned(),
            company_name: principal.company_name().map(str::to_owned),
            iat: issued_at.timestamp(),
            exp: (issued_at + self.token_ttl).timestamp(),
        };
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(IdentityError::issuance)
    }
}

impl fmt::Debug for JwtIdentityProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtIdentityProvider")
            .field("token_ttl", &self.token_ttl)
            .finish_non_exhaustive()
    }
}

impl IdentityProvider for JwtIdentityProvider {
    fn authenticate(&self, bearer_token: &str) -> IdentityResult<Principal> {
        let token = jsonwebtoken::decode::<Claims>(bearer_token, &self.decoding, &self.validation)
            .map_err(|err| match err.kind() {
                JwtErrorKind::ExpiredSignature => IdentityError::Expired,
                _ => IdentityError::InvalidToken(err.to_string()),
            })?;
        let Claims {
            sub,
            role,
            company_name,
            ..
        } = token.claims;

        let user_id = Uuid::parse_str(&sub)
            .map(UserId::from_uuid)
            .map_err(|_| IdentityError::InvalidSubject(sub.clone()))?;
        let principal = Principal::new(user_id, Role::try_from(role.as_str())?);
        Ok(match company_name {
            Some(company) => principal.with_company(company),
            None => principal,
        })
    }
}
