//! Port contracts for job postings.

pub mod repository;

pub use repository::{JobQuery, JobRepository, JobRepositoryError, JobRepositoryResult};
