//! Then steps for payment-gated application scenarios.

use super::world::{HiringWorld, run_async};
use hireme::application::{
    domain::ApplicationStatus,
    ports::{ApplicationQuery, ApplicationRepository},
    services::{LifecycleError, ReviewError},
};
use hireme::invoice::ports::InvoiceRepository;
use rstest_bdd_macros::then;

#[then(r#"the application status is "{status}""#)]
fn application_status_is(world: &HiringWorld, status: String) -> Result<(), eyre::Report> {
    let expected = ApplicationStatus::try_from(status.as_str())
        .map_err(|err| eyre::eyre!("invalid expected status in scenario: {err}"))?;
    let id = world.application()?.id();
    let stored = run_async(ApplicationRepository::find_by_id(&*world.store, id))?
        .ok_or_else(|| eyre::eyre!("application {id} missing from store"))?;
    eyre::ensure!(
        stored.status() == expected,
        "expected status {expected}, found {}",
        stored.status()
    );
    eyre::ensure!(
        stored.is_paid() == expected.implies_paid(),
        "payment flag disagrees with status {expected}"
    );
    Ok(())
}

#[then("a payment intent is issued")]
fn payment_intent_issued(world: &HiringWorld) -> Result<(), eyre::Report> {
    let intent = world
        .intents
        .last()
        .ok_or_else(|| eyre::eyre!("no payment intent recorded"))?;
    eyre::ensure!(intent.as_str().starts_with("pi_"), "unexpected intent id {intent}");
    Ok(())
}

#[then("exactly {count:u32} invoice of {amount:u32} exists for the job seeker")]
fn invoices_exist(world: &HiringWorld, count: u32, amount: u32) -> Result<(), eyre::Report> {
    let expected = usize::try_from(count)?;
    let seeker = world.seeker()?;
    let invoices = run_async(InvoiceRepository::list_for_user(
        &*world.store,
        seeker.user_id(),
    ))?;
    eyre::ensure!(
        invoices.len() == expected,
        "expected {expected} invoices, found {}",
        invoices.len()
    );
    eyre::ensure!(
        invoices
            .iter()
            .all(|invoice| invoice.amount().units() == amount),
        "unexpected invoice amount"
    );
    Ok(())
}

#[then("the review fails because the application is not reviewable")]
fn review_not_reviewable(world: &HiringWorld) -> Result<(), eyre::Report> {
    eyre::ensure!(
        matches!(
            world.last_review_error,
            Some(ReviewError::NotReviewable { .. })
        ),
        "expected NotReviewable, got {:?}",
        world.last_review_error
    );
    Ok(())
}

#[then("the application fails because the job is not open")]
fn job_not_open(world: &HiringWorld) -> Result<(), eyre::Report> {
    eyre::ensure!(
        matches!(world.last_lifecycle_error, Some(LifecycleError::JobNotOpen(_))),
        "expected JobNotOpen, got {:?}",
        world.last_lifecycle_error
    );
    Ok(())
}

#[then("no application exists for the job")]
fn no_application(world: &HiringWorld) -> Result<(), eyre::Report> {
    let job_id = world.job()?.id();
    let stored = run_async(ApplicationRepository::list(
        &*world.store,
        &ApplicationQuery::for_job(job_id),
    ))?;
    eyre::ensure!(stored.is_empty(), "expected no applications, found {}", stored.len());
    Ok(())
}

#[then("the application fails as a duplicate")]
fn duplicate_application(world: &HiringWorld) -> Result<(), eyre::Report> {
    eyre::ensure!(
        matches!(
            world.last_lifecycle_error,
            Some(LifecycleError::DuplicateApplication { .. })
        ),
        "expected DuplicateApplication, got {:?}",
        world.last_lifecycle_error
    );
    Ok(())
}

#[then("the two payment intents differ")]
fn intents_differ(world: &HiringWorld) -> Result<(), eyre::Report> {
    match world.intents.as_slice() {
        [first, second] => {
            eyre::ensure!(first != second, "payment intents should differ");
            Ok(())
        }
        other => Err(eyre::eyre!("expected two intents, found {}", other.len())),
    }
}

#[then("the confirmation fails because the intent is not found")]
fn intent_not_found(world: &HiringWorld) -> Result<(), eyre::Report> {
    eyre::ensure!(
        matches!(
            world.last_lifecycle_error,
            Some(LifecycleError::IntentNotFound(_))
        ),
        "expected IntentNotFound, got {:?}",
        world.last_lifecycle_error
    );
    Ok(())
}

#[then("the confirmation fails because the payment was declined")]
fn payment_declined(world: &HiringWorld) -> Result<(), eyre::Report> {
    eyre::ensure!(
        matches!(
            world.last_lifecycle_error,
            Some(LifecycleError::PaymentNotConfirmed(_))
        ),
        "expected PaymentNotConfirmed, got {:?}",
        world.last_lifecycle_error
    );
    Ok(())
}

#[then("the last confirmation succeeded without settling again")]
fn confirmation_idempotent(world: &HiringWorld) -> Result<(), eyre::Report> {
    eyre::ensure!(
        world.last_lifecycle_error.is_none(),
        "unexpected error {:?}",
        world.last_lifecycle_error
    );
    let (_, newly_settled) = world
        .last_confirmation
        .as_ref()
        .ok_or_else(|| eyre::eyre!("no confirmation recorded"))?;
    eyre::ensure!(!newly_settled, "second confirmation should not settle again");
    Ok(())
}
