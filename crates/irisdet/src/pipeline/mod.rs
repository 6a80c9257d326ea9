//! Multi-resolution detection pipeline.
//!
//! Stage order: coarse full-area scan -> pupil hill-climb per resolution ->
//! full-resolution iris boundary walk. Algorithmic building blocks live in
//! `crate::detector` and `crate::radial`; this module owns the call order,
//! coordinate conversions between stages, and the run trace.

mod result;
mod run;
mod trace;

#[cfg(test)]
mod tests;

pub use result::{Circle, DetectionResult, Point2D};
pub use trace::{BoundaryWalkTrace, DetectionTrace, InitialScanTrace, RefinementStageTrace};

pub(crate) use run::detect_with_trace;
