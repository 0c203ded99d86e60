//! When steps for payment-gated application scenarios.

use super::world::{HiringWorld, run_async};
use hireme::application::{
    domain::{ApplicationStatus, ResumeRef},
    services::InitiateApplicationRequest,
};
use hireme::payment::domain::IntentId;
use rstest_bdd_macros::when;

fn confirm(world: &mut HiringWorld, intent_id: IntentId) -> Result<(), eyre::Report> {
    let seeker = world.seeker()?.clone();
    let job_id = world.job()?.id();
    let result = run_async(world.lifecycle.confirm_payment(
        &seeker,
        job_id,
        seeker.user_id(),
        intent_id,
    ));
    match result {
        Ok(confirmed) => {
            world.application = Some(confirmed.application);
            world.last_confirmation = Some((confirmed.invoice, confirmed.newly_settled));
            world.last_lifecycle_error = None;
        }
        Err(err) => world.last_lifecycle_error = Some(err),
    }
    Ok(())
}

#[when("the job seeker applies to the job")]
fn apply(world: &mut HiringWorld) -> Result<(), eyre::Report> {
    let seeker = world.seeker()?.clone();
    let request = InitiateApplicationRequest::new(
        world.job()?.id(),
        seeker.user_id(),
        ResumeRef::new("memory://resumes/cv.pdf")?,
    );
    match run_async(world.lifecycle.initiate(&seeker, request)) {
        Ok(initiated) => {
            world.application = Some(initiated.application);
            world.last_lifecycle_error = None;
        }
        Err(err) => world.last_lifecycle_error = Some(err),
    }
    Ok(())
}

#[when("the job seeker requests payment")]
fn request_payment(world: &mut HiringWorld) -> Result<(), eyre::Report> {
    let seeker = world.seeker()?.clone();
    let job_id = world.job()?.id();
    let issued = run_async(
        world
            .lifecycle
            .request_payment(&seeker, job_id, seeker.user_id()),
    )?;
    world.intents.push(issued.intent.intent_id);
    Ok(())
}

#[when("the job seeker confirms the latest payment")]
fn confirm_latest(world: &mut HiringWorld) -> Result<(), eyre::Report> {
    let intent_id = world
        .intents
        .last()
        .cloned()
        .ok_or_else(|| eyre::eyre!("no payment intent issued in scenario"))?;
    confirm(world, intent_id)
}

#[when("the job seeker confirms the first payment")]
fn confirm_first(world: &mut HiringWorld) -> Result<(), eyre::Report> {
    let intent_id = world
        .intents
        .first()
        .cloned()
        .ok_or_else(|| eyre::eyre!("no payment intent issued in scenario"))?;
    confirm(world, intent_id)
}

#[when("the processor declines the next confirmation")]
fn processor_declines(world: &mut HiringWorld) -> Result<(), eyre::Report> {
    let intent_id = world
        .intents
        .last()
        .ok_or_else(|| eyre::eyre!("no payment intent issued in scenario"))?;
    world.gateway.decline_next_confirmation(intent_id)?;
    Ok(())
}

#[when(r#"the employer sets the application status to "{status}""#)]
fn employer_reviews(world: &mut HiringWorld, status: String) -> Result<(), eyre::Report> {
    let outcome = ApplicationStatus::try_from(status.as_str())
        .map_err(|err| eyre::eyre!("invalid status in scenario: {err}"))?;
    let employer = world.employer()?.clone();
    let application_id = world.application()?.id();
    match run_async(world.review.set_status(&employer, application_id, outcome)) {
        Ok(updated) => {
            world.application = Some(updated);
            world.last_review_error = None;
        }
        Err(err) => world.last_review_error = Some(err),
    }
    Ok(())
}
