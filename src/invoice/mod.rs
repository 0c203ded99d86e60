//! Financial records for settled application fees.
//!
//! An invoice is written exactly once, when a payment confirmation succeeds,
//! and is never mutated afterwards.

pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
