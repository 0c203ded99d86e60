//! Port contracts for payment processing.

mod gateway;

pub use gateway::{PaymentGateway, PaymentGatewayError, PaymentGatewayResult};
