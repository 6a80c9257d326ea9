use crate::overlay::OverlayPosition;

/// 2D point.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Point2D {
    pub x: f32,
    pub y: f32,
}

impl Point2D {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    #[inline]
    pub fn distance(&self, other: &Point2D) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Circle given by center and radius.
///
/// In a [`DetectionResult`] both are normalized: `x / width`, `y / height`,
/// `radius / max(width, height)`. Internal stages use pixel units.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Circle {
    pub center: Point2D,
    pub radius: f32,
}

impl Circle {
    pub const fn new(center: Point2D, radius: f32) -> Self {
        Self { center, radius }
    }
}

/// Detected pupil and iris circles in normalized image coordinates.
///
/// The default value (both circles centered at `(0.5, 0.5)` with radius `0`)
/// means "no confident detection".
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DetectionResult {
    pub pupil: Circle,
    pub iris: Circle,
}

impl Default for DetectionResult {
    fn default() -> Self {
        let center = Point2D::new(0.5, 0.5);
        Self {
            pupil: Circle::new(center, 0.0),
            iris: Circle::new(center, 0.0),
        }
    }
}

impl DetectionResult {
    /// Whether the detector found a pupil/iris pair.
    pub fn is_confident(&self) -> bool {
        self.pupil.radius > 0.0 && self.iris.radius > 0.0
    }

    /// Overlay placement derived from this result; `None` without an iris.
    pub fn overlay_position(&self) -> Option<OverlayPosition> {
        OverlayPosition::from_detection(self)
    }
}
