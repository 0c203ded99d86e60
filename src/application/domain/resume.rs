//! Opaque reference to a stored resume artifact.

use super::ApplicationDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Location of an uploaded resume, as returned by the resume store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResumeRef(String);

impl ResumeRef {
    /// Creates a resume reference.
    ///
    /// # Errors
    ///
    /// Returns [`ApplicationDomainError::EmptyResumeRef`] when the value is
    /// blank.
    pub fn new(value: impl Into<String>) -> Result<Self, ApplicationDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ApplicationDomainError::EmptyResumeRef);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the reference as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResumeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
