//! Application services for the job catalog.

mod catalog;

pub use catalog::{
    JobCatalogError, JobCatalogResult, JobCatalogService, PostJobRequest, UpdateJobRequest,
};
