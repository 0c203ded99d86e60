//! Port contracts for application persistence and resume storage.

mod repository;
mod resume;

pub use repository::{
    ApplicationQuery, ApplicationRepository, ApplicationRepositoryError,
    ApplicationRepositoryResult,
};
pub use resume::{ResumeStore, ResumeStoreError, ResumeStoreResult, ResumeUpload};
