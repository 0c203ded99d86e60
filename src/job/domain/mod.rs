//! Domain model for job postings.

mod error;
mod fields;
mod ids;
mod job;

pub use error::{JobDomainError, ParseJobStatusError};
pub use fields::{CompanyName, JobDescription, JobTitle};
pub use ids::JobId;
pub use job::{Job, JobChanges, JobPosting, JobStatus, PersistedJobData};
