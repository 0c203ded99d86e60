//! Orchestration services for the application lifecycle.

mod lifecycle;
mod review;

pub use lifecycle::{
    ApplicationDetails, ApplicationLifecycleService, ConfirmedPayment, DEFAULT_GATEWAY_TIMEOUT,
    InitiateApplicationRequest, InitiatedApplication, IssuedPayment, LifecycleError,
    LifecycleResult,
};
pub use review::{EmployerApplicationView, ReviewError, ReviewResult, ReviewService};
