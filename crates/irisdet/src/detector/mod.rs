//! Detection primitives independent of orchestration.
//!
//! The `pipeline` module owns the stage order. This module provides the
//! candidate scorer, the iris boundary walker, and the shared configuration.

pub(crate) mod boundary;
pub(crate) mod config;
pub(crate) mod scoring;

pub use config::{DetectConfig, IrisBoundaryConfig};
pub use scoring::CandidateScore;
