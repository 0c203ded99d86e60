//! Tests for the `PostgreSQL`-backed payment gateway.

use super::helpers::test_database;
use hireme::payment::{
    adapters::PostgresPaymentGateway,
    domain::{IntentId, PaymentAmount},
    ports::{PaymentGateway, PaymentGatewayError},
};

#[tokio::test(flavor = "multi_thread")]
async fn created_intent_confirms_once_and_stays_succeeded() -> eyre::Result<()> {
    let Some(db) = test_database().await? else {
        return Ok(());
    };
    let gateway = PostgresPaymentGateway::new(db.pool.clone());

    let issued = gateway.create_intent(PaymentAmount::new(100)?).await?;
    eyre::ensure!(!issued.client_secret.as_str().is_empty());

    eyre::ensure!(gateway.confirm_intent(&issued.intent_id).await?);
    eyre::ensure!(gateway.confirm_intent(&issued.intent_id).await?);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn every_intent_gets_a_distinct_identifier() -> eyre::Result<()> {
    let Some(db) = test_database().await? else {
        return Ok(());
    };
    let gateway = PostgresPaymentGateway::new(db.pool.clone());
    let amount = PaymentAmount::new(100)?;

    let first = gateway.create_intent(amount).await?;
    let second = gateway.create_intent(amount).await?;

    eyre::ensure!(first.intent_id != second.intent_id);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn confirming_an_unknown_intent_reports_not_found() -> eyre::Result<()> {
    let Some(db) = test_database().await? else {
        return Ok(());
    };
    let gateway = PostgresPaymentGateway::new(db.pool.clone());

    let Err(err) = gateway.confirm_intent(&IntentId::new("pi_missing")?).await else {
        eyre::bail!("unknown intent confirmed");
    };

    eyre::ensure!(
        matches!(err, PaymentGatewayError::IntentNotFound(_)),
        "unexpected error: {err}"
    );
    Ok(())
}
