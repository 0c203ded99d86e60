//! In-memory payment gateway for tests and local runs.

use crate::payment::{
    domain::{IntentId, IssuedIntent, PaymentAmount, PaymentIntent},
    ports::{PaymentGateway, PaymentGatewayError, PaymentGatewayResult},
};
use async_trait::async_trait;
use mockable::DefaultClock;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};

/// In-memory payment gateway.
///
/// Intents succeed on confirmation unless a decline has been scheduled for
/// them, in which case the intent moves to declined for good. The gateway
/// can also be switched into an unavailable state to model processor
/// outages.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPaymentGateway {
    state: Arc<RwLock<InMemoryGatewayState>>,
}

#[derive(Debug, Default)]
struct InMemoryGatewayState {
    intents: HashMap<IntentId, PaymentIntent>,
    declines_pending: HashSet<IntentId>,
    unavailable: bool,
    confirm_calls: usize,
}

fn lock_error(err: impl std::fmt::Display) -> PaymentGatewayError {
    PaymentGatewayError::unavailable(std::io::Error::other(err.to_string()))
}

impl InMemoryPaymentGateway {
    /// Creates an empty gateway.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next confirmation of `intent_id` decline it.
    ///
    /// A declined intent never confirms; paying again needs a fresh intent.
    ///
    /// # Errors
    ///
    /// Returns gateway errors when lock acquisition fails.
    pub fn decline_next_confirmation(&self, intent_id: &IntentId) -> PaymentGatewayResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.declines_pending.insert(intent_id.clone());
        Ok(())
    }

    /// Toggles simulated processor outage.
    ///
    /// # Errors
    ///
    /// Returns gateway errors when lock acquisition fails.
    pub fn set_unavailable(&self, unavailable: bool) -> PaymentGatewayResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.unavailable = unavailable;
        Ok(())
    }

    /// Returns a snapshot of a stored intent.
    ///
    /// # Errors
    ///
    /// Returns gateway errors when lock acquisition fails.
    pub fn intent(&self, intent_id: &IntentId) -> PaymentGatewayResult<Option<PaymentIntent>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.intents.get(intent_id).cloned())
    }

    /// Returns the number of intents created so far.
    ///
    /// # Errors
    ///
    /// Returns gateway errors when lock acquisition fails.
    pub fn intent_count(&self) -> PaymentGatewayResult<usize> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.intents.len())
    }

    /// Returns how many confirmations have been requested.
    ///
    /// # Errors
    ///
    /// Returns gateway errors when lock acquisition fails.
    pub fn confirm_calls(&self) -> PaymentGatewayResult<usize> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.confirm_calls)
    }
}

fn outage() -> PaymentGatewayError {
    PaymentGatewayError::unavailable(std::io::Error::new(
        std::io::ErrorKind::ConnectionRefused,
        "simulated processor outage",
    ))
}

#[async_trait]
impl PaymentGateway for InMemoryPaymentGateway {
    async fn create_intent(&self, amount: PaymentAmount) -> PaymentGatewayResult<IssuedIntent> {
        let mut state = self.state.write().map_err(lock_error)?;
        if state.unavailable {
            return Err(outage());
        }
        let intent = PaymentIntent::create(amount, &DefaultClock);
        let issued = intent.issued();
        state.intents.insert(intent.id().clone(), intent);
        Ok(issued)
    }

    async fn confirm_intent(&self, intent_id: &IntentId) -> PaymentGatewayResult<bool> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.confirm_calls += 1;
        if state.unavailable {
            return Err(outage());
        }
        let declining = state.declines_pending.remove(intent_id);
        let intent = state
            .intents
            .get_mut(intent_id)
            .ok_or_else(|| PaymentGatewayError::IntentNotFound(intent_id.clone()))?;
        if declining {
            intent.decline(&DefaultClock);
        }
        Ok(intent.confirm(&DefaultClock))
    }
}
