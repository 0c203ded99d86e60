//! Payment gateway integration for application fees.
//!
//! The gateway follows a two-call protocol: an intent is created for an
//! amount, the payer confirms it out of band, and the platform then asks the
//! gateway whether the intent succeeded. The module follows hexagonal
//! architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]

pub mod adapters;
pub mod domain;
pub mod ports;
