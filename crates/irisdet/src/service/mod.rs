//! Caller-side bookkeeping around detection.
//!
//! Detection itself is pure. Running it for files on disk needs a path-keyed
//! in-flight registry (at most one job per image, rename redirection,
//! discard on delete) and a metadata sink for the resulting overlay.

mod in_flight;
mod job;

pub use in_flight::{InFlightRegistry, InFlightTracker};
pub use job::{run_detection_job, spawn_detection_job, JobOutcome, MetadataStore};
