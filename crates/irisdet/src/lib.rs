//! irisdet: pure-Rust pupil and iris locator for close-up eye photographs.
//!
//! Works on per-pixel brightness statistics only, with bounded and
//! deterministic compute cost. The pipeline stages are:
//!
//! 1. **Initial scan** – full-area search at a coarse resolution. Each
//!    candidate center in the central half of the image is scored by radial
//!    brightness quantiles; the best pupil/iris radius pair wins.
//! 2. **Pupil refinement** – 3×3 hill-climb at each larger resolution,
//!    restricted to a radius window around the previous estimate.
//! 3. **Iris boundary walk** – one scanline pass at source resolution that
//!    locates the iris/sclera transition row by row and fits a circle.
//!
//! # Public API
//! - [`Detector`] as the primary entry point
//! - [`DetectConfig`] for tuning
//! - [`PixelSource`] for custom image types
//! - [`DetectionResult`], [`OverlayPosition`] and [`DetectionTrace`] outputs
//! - [`service`] helpers for running detection jobs on image files
//!
//! All result coordinates are normalized: `x / width`, `y / height`, radius
//! divided by the longer image side.

mod api;
mod brightness;
mod detector;
mod error;
mod overlay;
mod pipeline;
mod pixel_source;
mod radial;
pub mod service;

#[cfg(test)]
pub(crate) mod test_utils;

pub use api::Detector;
pub use brightness::{brightness, BrightnessField, BrightnessMap, SourceBrightness};
pub use detector::{CandidateScore, DetectConfig, IrisBoundaryConfig};
pub use error::DetectError;
pub use overlay::OverlayPosition;
pub use pipeline::{
    BoundaryWalkTrace, Circle, DetectionResult, DetectionTrace, InitialScanTrace, Point2D,
    RefinementStageTrace,
};
pub use pixel_source::{resized_dimensions, Color, PixelSource};
pub use radial::RadialStatistics;
