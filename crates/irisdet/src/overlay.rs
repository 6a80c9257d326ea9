//! Overlay placement derived from a detection.
//!
//! An overlay is a square image whose iris disc spans `3/8` of its side.
//! Placing it on the photo needs the overlay scale, the pupil offset relative
//! to the iris, and the pupil size relative to the iris.

use crate::pipeline::{DetectionResult, Point2D};

/// Ratio between the overlay side and the iris radius.
const OVERLAY_SCALE_PER_IRIS_RADIUS: f32 = 8.0 / 3.0;

/// Overlay parameters in normalized image units.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct OverlayPosition {
    /// Iris center, where the overlay is anchored.
    pub center: Point2D,
    /// Overlay side length: `iris_radius * 8 / 3`.
    pub scale: f32,
    /// Pupil center minus iris center, divided by the iris diameter.
    pub pupil_offset: Point2D,
    /// Pupil radius divided by iris radius.
    pub pupil_size: f32,
}

impl OverlayPosition {
    /// Convert a detection; `None` when the iris radius is zero.
    pub fn from_detection(result: &DetectionResult) -> Option<Self> {
        let iris = result.iris;
        let pupil = result.pupil;
        if !(iris.radius > 0.0) {
            return None;
        }
        let diameter = 2.0 * iris.radius;
        Some(Self {
            center: iris.center,
            scale: iris.radius * OVERLAY_SCALE_PER_IRIS_RADIUS,
            pupil_offset: Point2D::new(
                (pupil.center.x - iris.center.x) / diameter,
                (pupil.center.y - iris.center.y) / diameter,
            ),
            pupil_size: pupil.radius / iris.radius,
        })
    }
}
