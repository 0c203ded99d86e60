//! Step definitions for payment-gated application scenarios.

pub mod given;
pub mod then;
pub mod when;
pub mod world;
