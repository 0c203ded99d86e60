//! Diesel row models for hiring persistence.

use super::schema::{applications, invoices, jobs};
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query and insert row for jobs.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = jobs)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct JobRow {
    /// Internal job identifier.
    pub id: uuid::Uuid,
    /// Job title.
    pub title: String,
    /// Job description.
    pub description: String,
    /// Owning company.
    pub company_name: String,
    /// Posting user.
    pub posted_by: uuid::Uuid,
    /// Job status.
    pub status: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Mutable job columns.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = jobs)]
pub struct JobChangeset {
    /// Job title.
    pub title: String,
    /// Job description.
    pub description: String,
    /// Owning company.
    pub company_name: String,
    /// Job status.
    pub status: String,
}

/// Query and insert row for applications.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = applications)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ApplicationRow {
    /// Internal application identifier.
    pub id: uuid::Uuid,
    /// Job applied to.
    pub job_id: uuid::Uuid,
    /// Applying user.
    pub applicant_id: uuid::Uuid,
    /// Stored resume reference.
    pub resume_ref: String,
    /// Lifecycle status.
    pub status: String,
    /// Whether the fee has been settled.
    pub is_paid: bool,
    /// Latest payment intent.
    pub payment_intent_id: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Lifecycle columns written by conditional updates.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = applications)]
#[diesel(treat_none_as_null = true)]
pub struct ApplicationChangeset {
    /// Lifecycle status.
    pub status: String,
    /// Whether the fee has been settled.
    pub is_paid: bool,
    /// Latest payment intent.
    pub payment_intent_id: Option<String>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Query and insert row for invoices.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = invoices)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct InvoiceRow {
    /// Internal invoice identifier.
    pub id: uuid::Uuid,
    /// Paying user.
    pub user_id: uuid::Uuid,
    /// Settled application.
    pub application_id: uuid::Uuid,
    /// Amount in whole units.
    pub amount: i64,
    /// Settlement outcome.
    pub payment_status: String,
    /// Intent that settled the application.
    pub payment_intent_id: String,
    /// Settlement timestamp.
    pub paid_at: DateTime<Utc>,
}
