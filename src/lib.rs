//! hireme: job-board backend with payment-gated applications.
//!
//! Job seekers apply to jobs posted by employers. Every application must be
//! paid for before the employer can review it, and administrators can audit
//! activity across the platform.
//!
//! # Architecture
//!
//! hireme follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (database, gateway, files)
//!
//! # Modules
//!
//! - [`application`]: Application lifecycle, payment gating, and review
//! - [`job`]: Job postings
//! - [`payment`]: Payment gateway port and adapters
//! - [`invoice`]: Invoices for settled applications
//! - [`identity`]: Request principals and bearer-token verification
//! - [`audit`]: Administrator listings
//! - [`persistence`]: Stores implementing every repository port
//! - [`http`]: axum router

pub mod application;
pub mod audit;
pub mod config;
pub mod error;
pub mod http;
pub mod identity;
pub mod invoice;
pub mod job;
pub mod payment;
pub mod persistence;
pub mod telemetry;
