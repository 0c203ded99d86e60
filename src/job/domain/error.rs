//! Error types for job domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing job domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum JobDomainError {
    /// The job title is shorter than three characters after trimming.
    #[error("job title must be at least 3 characters: '{0}'")]
    TitleTooShort(String),

    /// The job description is shorter than ten characters after trimming.
    #[error("job description must be at least 10 characters")]
    DescriptionTooShort,

    /// The company name is shorter than two characters after trimming.
    #[error("company name must be at least 2 characters: '{0}'")]
    CompanyNameTooShort(String),
}

/// Error returned while parsing job status from persistence or input.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown job status: {0}")]
pub struct ParseJobStatusError(pub String);
