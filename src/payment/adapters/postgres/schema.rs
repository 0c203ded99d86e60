//! Diesel schema for payment intent storage.

diesel::table! {
    /// Payment intents issued by the local gateway.
    payment_intents (id) {
        /// Gateway intent identifier.
        #[max_length = 64]
        id -> Varchar,
        /// Secret handed to the payer.
        #[max_length = 128]
        client_secret -> Varchar,
        /// Charged amount in minor units.
        amount_minor -> Int8,
        /// Processing status.
        #[max_length = 32]
        status -> Varchar,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last status change timestamp.
        updated_at -> Timestamptz,
    }
}
