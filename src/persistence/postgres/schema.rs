//! Diesel schema for jobs, applications, and invoices.

diesel::table! {
    /// Job postings.
    jobs (id) {
        /// Internal job identifier.
        id -> Uuid,
        /// Job title.
        #[max_length = 255]
        title -> Varchar,
        /// Job description.
        description -> Text,
        /// Owning company.
        #[max_length = 255]
        company_name -> Varchar,
        /// Posting user.
        posted_by -> Uuid,
        /// Job status.
        #[max_length = 16]
        status -> Varchar,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Job applications.
    applications (id) {
        /// Internal application identifier.
        id -> Uuid,
        /// Job applied to.
        job_id -> Uuid,
        /// Applying user.
        applicant_id -> Uuid,
        /// Stored resume reference.
        resume_ref -> Text,
        /// Lifecycle status.
        #[max_length = 32]
        status -> Varchar,
        /// Whether the fee has been settled.
        is_paid -> Bool,
        /// Latest payment intent.
        #[max_length = 64]
        payment_intent_id -> Nullable<Varchar>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Invoices for settled application fees.
    invoices (id) {
        /// Internal invoice identifier.
        id -> Uuid,
        /// Paying user.
        user_id -> Uuid,
        /// Settled application.
        application_id -> Uuid,
        /// Amount in whole units.
        amount -> Int8,
        /// Settlement outcome.
        #[max_length = 16]
        payment_status -> Varchar,
        /// Intent that settled the application.
        #[max_length = 64]
        payment_intent_id -> Varchar,
        /// Settlement timestamp.
        paid_at -> Timestamptz,
    }
}

diesel::joinable!(applications -> jobs (job_id));
diesel::joinable!(invoices -> applications (application_id));
diesel::allow_tables_to_appear_in_same_query!(jobs, applications, invoices);
