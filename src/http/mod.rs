//! HTTP surface for the hiring service.
//!
//! Handlers authenticate the caller, translate JSON and multipart bodies
//! into service requests, and map service errors onto status codes through
//! [`error::ApiError`].

pub mod auth;
pub mod error;
mod handlers;
mod routes;
pub mod state;

pub use routes::router;
pub use state::{AppState, ServiceSettings};
