//! `PostgreSQL` implementation of the payment gateway port.

use super::{models::IntentRow, schema::payment_intents};
use crate::payment::{
    domain::{
        ClientSecret, IntentId, IntentStatus, IssuedIntent, PaymentAmount, PaymentIntent,
        PersistedIntentData,
    },
    ports::{PaymentGateway, PaymentGatewayError, PaymentGatewayResult},
};
use crate::persistence::postgres::HiringPgPool;
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::Error as DieselError;
use mockable::DefaultClock;

/// Payment gateway that stores intents in `PostgreSQL`.
#[derive(Debug, Clone)]
pub struct PostgresPaymentGateway {
    pool: HiringPgPool,
}

enum ConfirmError {
    Diesel(DieselError),
    Gateway(PaymentGatewayError),
}

impl From<DieselError> for ConfirmError {
    fn from(err: DieselError) -> Self {
        Self::Diesel(err)
    }
}

impl From<PaymentGatewayError> for ConfirmError {
    fn from(err: PaymentGatewayError) -> Self {
        Self::Gateway(err)
    }
}

impl From<ConfirmError> for PaymentGatewayError {
    fn from(err: ConfirmError) -> Self {
        match err {
            ConfirmError::Diesel(source) => Self::unavailable(source),
            ConfirmError::Gateway(source) => source,
        }
    }
}

impl PostgresPaymentGateway {
    /// Creates a gateway backed by the given pool.
    #[must_use]
    pub const fn new(pool: HiringPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> PaymentGatewayResult<T>
    where
        F: FnOnce(&mut PgConnection) -> PaymentGatewayResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(PaymentGatewayError::unavailable)?;
            f(&mut connection)
        })
        .await
        .map_err(PaymentGatewayError::unavailable)?
    }
}

#[async_trait]
impl PaymentGateway for PostgresPaymentGateway {
    async fn create_intent(&self, amount: PaymentAmount) -> PaymentGatewayResult<IssuedIntent> {
        let intent = PaymentIntent::create(amount, &DefaultClock);
        let issued = intent.issued();
        let row = to_row(&intent)?;

        self.run_blocking(move |connection| {
            diesel::insert_into(payment_intents::table)
                .values(&row)
                .execute(connection)
                .map_err(PaymentGatewayError::unavailable)?;
            Ok(())
        })
        .await?;
        Ok(issued)
    }

    async fn confirm_intent(&self, intent_id: &IntentId) -> PaymentGatewayResult<bool> {
        let lookup = intent_id.clone();
        self.run_blocking(move |connection| {
            connection
                .transaction::<bool, ConfirmError, _>(|tx| {
                    let row = payment_intents::table
                        .find(lookup.as_str())
                        .for_update()
                        .select(IntentRow::as_select())
                        .first::<IntentRow>(tx)
                        .optional()?
                        .ok_or_else(|| PaymentGatewayError::IntentNotFound(lookup.clone()))?;

                    let mut intent = row_to_intent(row)?;
                    let before = intent.status();
                    let succeeded = intent.confirm(&DefaultClock);
                    if intent.status() != before {
                        diesel::update(payment_intents::table.find(lookup.as_str()))
                            .set((
                                payment_intents::status.eq(intent.status().as_str()),
                                payment_intents::updated_at.eq(intent.updated_at()),
                            ))
                            .execute(tx)?;
                    }
                    Ok(succeeded)
                })
                .map_err(PaymentGatewayError::from)
        })
        .await
    }
}

fn to_row(intent: &PaymentIntent) -> PaymentGatewayResult<IntentRow> {
    let amount_minor =
        i64::try_from(intent.amount_minor()).map_err(PaymentGatewayError::unavailable)?;
    Ok(IntentRow {
        id: intent.id().as_str().to_owned(),
        client_secret: intent.client_secret().as_str().to_owned(),
        amount_minor,
        status: intent.status().as_str().to_owned(),
        created_at: intent.created_at(),
        updated_at: intent.updated_at(),
    })
}

fn row_to_intent(row: IntentRow) -> PaymentGatewayResult<PaymentIntent> {
    let IntentRow {
        id,
        client_secret,
        amount_minor,
        status,
        created_at,
        updated_at,
    } = row;

    let data = PersistedIntentData {
        id: IntentId::new(id).map_err(PaymentGatewayError::unavailable)?,
        client_secret: ClientSecret::from_persisted(client_secret),
        amount_minor: u64::try_from(amount_minor).map_err(PaymentGatewayError::unavailable)?,
        status: IntentStatus::try_from(status.as_str())
            .map_err(PaymentGatewayError::unavailable)?,
        created_at,
        updated_at,
    };
    Ok(PaymentIntent::from_persisted(data))
}
