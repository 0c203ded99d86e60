//! Schema bootstrap for fresh databases.

use diesel::connection::SimpleConnection;
use diesel::pg::PgConnection;
use diesel::result::QueryResult;

const HIRING_TABLES_SQL: &str =
    include_str!("../../../migrations/2026-10-01-000000_create_hiring_tables/up.sql");
const PAYMENT_INTENTS_SQL: &str =
    include_str!("../../../migrations/2026-10-01-000001_create_payment_intents/up.sql");

/// Creates every table and index the service needs.
///
/// The statements are idempotent, so this is safe to run on each start.
///
/// # Errors
///
/// Returns the Diesel error raised by the first failing statement.
pub fn apply_schema(connection: &mut PgConnection) -> QueryResult<()> {
    connection.batch_execute(HIRING_TABLES_SQL)?;
    connection.batch_execute(PAYMENT_INTENTS_SQL)
}
