//! Validated text fields of a job posting.

use super::JobDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

const MIN_TITLE_CHARS: usize = 3;
const MIN_DESCRIPTION_CHARS: usize = 10;
const MIN_COMPANY_CHARS: usize = 2;

/// Job title with at least three visible characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobTitle(String);

impl JobTitle {
    /// Creates a validated job title.
    ///
    /// # Errors
    ///
    /// Returns [`JobDomainError::TitleTooShort`] when the trimmed title has
    /// fewer than three characters.
    pub fn new(value: impl Into<String>) -> Result<Self, JobDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.chars().count() < MIN_TITLE_CHARS {
            return Err(JobDomainError::TitleTooShort(raw));
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the title as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Free-form job description with at least ten visible characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobDescription(String);

impl JobDescription {
    /// Creates a validated job description.
    ///
    /// # Errors
    ///
    /// Returns [`JobDomainError::DescriptionTooShort`] when the trimmed text
    /// has fewer than ten characters.
    pub fn new(value: impl Into<String>) -> Result<Self, JobDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.chars().count() < MIN_DESCRIPTION_CHARS {
            return Err(JobDomainError::DescriptionTooShort);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the description as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Name of the company that owns a job posting.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompanyName(String);

impl CompanyName {
    /// Creates a validated company name.
    ///
    /// # Errors
    ///
    /// Returns [`JobDomainError::CompanyNameTooShort`] when the trimmed name
    /// has fewer than two characters.
    pub fn new(value: impl Into<String>) -> Result<Self, JobDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.chars().count() < MIN_COMPANY_CHARS {
            return Err(JobDomainError::CompanyNameTooShort(raw));
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the company name as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CompanyName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
