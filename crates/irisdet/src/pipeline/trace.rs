//! Serializable record of one detection run.

use crate::detector::CandidateScore;

use super::Circle;

/// Coarse full-area scan.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct InitialScanTrace {
    /// Working image size `[width, height]`.
    pub working_size: [u32; 2],
    /// Number of candidate centers evaluated.
    pub candidates: usize,
    /// Best candidate in working-image pixels, if any scored.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub best: Option<CandidateScore>,
}

/// One pupil refinement stage.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RefinementStageTrace {
    /// Configured long-side resolution of this stage.
    pub resolution: u32,
    /// Working image size `[width, height]`.
    pub working_size: [u32; 2],
    /// Hill-climb rounds executed.
    pub rounds: usize,
    /// The stage reached a fixed point before the round limit.
    pub stable: bool,
    /// Normalized pupil after the stage.
    pub pupil: Circle,
}

/// Full-resolution iris boundary walk.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BoundaryWalkTrace {
    /// Normalized seed circle.
    pub seed: Circle,
    /// Accepted scanlines.
    pub accepted_points: usize,
    /// Whether the fitted circle replaced the seed.
    pub applied: bool,
    /// Normalized iris reported by the run.
    pub iris: Circle,
}

/// Stage-by-stage record returned by `Detector::detect_with_trace`.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DetectionTrace {
    /// Source image size `[width, height]`.
    pub image_size: [u32; 2],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial: Option<InitialScanTrace>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub refinement: Vec<RefinementStageTrace>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub boundary: Option<BoundaryWalkTrace>,
}
