//! Diesel row models for payment intents.

use super::schema::payment_intents;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query and insert row for payment intents.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = payment_intents)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct IntentRow {
    /// Gateway intent identifier.
    pub id: String,
    /// Secret handed to the payer.
    pub client_secret: String,
    /// Charged amount in minor units.
    pub amount_minor: i64,
    /// Processing status.
    pub status: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last status change timestamp.
    pub updated_at: DateTime<Utc>,
}
