//! Given steps for payment-gated application scenarios.

use super::world::{HiringWorld, run_async};
use eyre::WrapErr;
use hireme::identity::domain::{Principal, Role, UserId};
use hireme::job::{
    domain::JobStatus,
    services::{PostJobRequest, UpdateJobRequest},
};
use rstest_bdd_macros::given;

fn post_job(world: &mut HiringWorld, status: JobStatus) -> Result<(), eyre::Report> {
    let employer = Principal::new(UserId::new(), Role::Employee).with_company("Acme Robotics");
    let request = PostJobRequest::new(
        "Backend Engineer",
        "Build the payment-gated application pipeline",
        "Acme Robotics",
    );
    let mut job = run_async(world.jobs.post(&employer, request)).wrap_err("post scenario job")?;
    if matches!(status, JobStatus::Closed) {
        job = run_async(world.jobs.update(
            &employer,
            job.id(),
            UpdateJobRequest::new().with_status(JobStatus::Closed),
        ))
        .wrap_err("close scenario job")?;
    }
    world.employer = Some(employer);
    world.job = Some(job);
    Ok(())
}

#[given("an open job posted by an employer")]
fn open_job(world: &mut HiringWorld) -> Result<(), eyre::Report> {
    post_job(world, JobStatus::Open)
}

#[given("a closed job posted by an employer")]
fn closed_job(world: &mut HiringWorld) -> Result<(), eyre::Report> {
    post_job(world, JobStatus::Closed)
}

#[given("a job seeker")]
fn job_seeker(world: &mut HiringWorld) {
    world.seeker = Some(Principal::new(UserId::new(), Role::JobSeeker));
}
