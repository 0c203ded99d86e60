//! Domain model for job applications.

mod application;
mod error;
mod ids;
mod resume;

pub use application::{Application, ApplicationStatus, PaymentState, PersistedApplicationData};
pub use error::{ApplicationDomainError, ParseApplicationStatusError};
pub use ids::ApplicationId;
pub use resume::ResumeRef;
