//! Job aggregate root and related lifecycle types.

use super::{CompanyName, JobDescription, JobId, JobTitle, ParseJobStatusError};
use crate::identity::domain::UserId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether a job accepts new applications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// The job accepts applications.
    Open,
    /// The job no longer accepts applications.
    Closed,
}

impl JobStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for JobStatus {
    type Error = ParseJobStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "open" => Ok(Self::Open),
            "closed" => Ok(Self::Closed),
            _ => Err(ParseJobStatusError(value.to_owned())),
        }
    }
}

/// Validated content of a new job posting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobPosting {
    /// Job title.
    pub title: JobTitle,
    /// Job description.
    pub description: JobDescription,
    /// Owning company.
    pub company_name: CompanyName,
}

/// Validated partial update of a job posting.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobChanges {
    /// Replacement title.
    pub title: Option<JobTitle>,
    /// Replacement description.
    pub description: Option<JobDescription>,
    /// Replacement company name.
    pub company_name: Option<CompanyName>,
    /// Replacement status.
    pub status: Option<JobStatus>,
}

/// Job aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    id: JobId,
    title: JobTitle,
    description: JobDescription,
    company_name: CompanyName,
    posted_by: UserId,
    status: JobStatus,
    created_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted job aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedJobData {
    /// Persisted job identifier.
    pub id: JobId,
    /// Persisted title.
    pub title: JobTitle,
    /// Persisted description.
    pub description: JobDescription,
    /// Persisted company name.
    pub company_name: CompanyName,
    /// Persisted poster.
    pub posted_by: UserId,
    /// Persisted status.
    pub status: JobStatus,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Job {
    /// Creates a new open job posted by `posted_by`.
    #[must_use]
    pub fn post(posting: JobPosting, posted_by: UserId, clock: &impl Clock) -> Self {
        let JobPosting {
            title,
            description,
            company_name,
        } = posting;
        Self {
            id: JobId::new(),
            title,
            description,
            company_name,
            posted_by,
            status: JobStatus::Open,
            created_at: clock.utc(),
        }
    }

    /// Reconstructs a job from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedJobData) -> Self {
        Self {
            id: data.id,
            title: data.title,
            description: data.description,
            company_name: data.company_name,
            posted_by: data.posted_by,
            status: data.status,
            created_at: data.created_at,
        }
    }

    /// Returns the job identifier.
    #[must_use]
    pub const fn id(&self) -> JobId {
        self.id
    }

    /// Returns the job title.
    #[must_use]
    pub const fn title(&self) -> &JobTitle {
        &self.title
    }

    /// Returns the job description.
    #[must_use]
    pub const fn description(&self) -> &JobDescription {
        &self.description
    }

    /// Returns the owning company.
    #[must_use]
    pub const fn company_name(&self) -> &CompanyName {
        &self.company_name
    }

    /// Returns the user who posted the job.
    #[must_use]
    pub const fn posted_by(&self) -> UserId {
        self.posted_by
    }

    /// Returns the job status.
    #[must_use]
    pub const fn status(&self) -> JobStatus {
        self.status
    }

    /// Returns `true` when the job accepts applications.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        matches!(self.status, JobStatus::Open)
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Applies a partial update. Absent fields keep their current value.
    pub fn apply(&mut self, changes: JobChanges) {
        let JobChanges {
            title,
            description,
            company_name,
            status,
        } = changes;
        if let Some(value) = title {
            self.title = value;
        }
        if let Some(value) = description {
            self.description = value;
        }
        if let Some(value) = company_name {
            self.company_name = value;
        }
        if let Some(value) = status {
            self.status = value;
        }
    }
}
