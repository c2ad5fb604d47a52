//! Background polling of the backend's active download jobs.
//!
//! The poller keeps a live, best-effort view of in-flight jobs. A failed tick
//! never touches the stored snapshot; it is only counted and logged.

mod jobs;
mod worker;

pub use jobs::{ActiveJobsResponse, ActiveJobsSnapshot, JobDescriptor, JobState, JobsSource};
pub use worker::{JobStatusPoller, PollStats};

#[cfg(test)]
mod tests;
