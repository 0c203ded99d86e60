//! Error types for identity parsing.

use thiserror::Error;

/// Error returned while parsing a role from a token claim or query string.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown role: {0}")]
pub struct ParseRoleError(pub String);
