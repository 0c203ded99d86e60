//! Domain model for payment intents and fee amounts.

mod amount;
mod error;
mod intent;

pub use amount::PaymentAmount;
pub use error::{ParseIntentStatusError, PaymentDomainError};
pub use intent::{
    ClientSecret, IntentId, IntentStatus, IssuedIntent, PaymentIntent, PersistedIntentData,
};
