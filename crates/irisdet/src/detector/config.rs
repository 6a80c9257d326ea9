use std::path::Path;

use crate::error::DetectError;
use crate::radial::profile::QuantileLevels;

/// Configuration for the full-resolution iris boundary walk.
///
/// Every length is relative to the seed iris radius.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct IrisBoundaryConfig {
    /// Run the boundary walk after pupil refinement. When disabled the coarse
    /// iris from the initial scan is reported.
    pub enable: bool,
    /// Scanlines within `search_range * radius` of the seed center are walked.
    pub search_range: f32,
    /// Initial half-width of the per-side search window.
    pub uncertainty_factor: f32,
    /// Window shrink factor applied after a rejected walk.
    pub retry_factor: f32,
    /// Give up on a scanline once the window half-width drops below this.
    pub min_range: f32,
    /// Reject a walk whose wrong-side count exceeds this fraction of the
    /// window half-width.
    pub wrong_brightness_quota: f32,
    /// Minimum accepted scanlines before the seed is replaced.
    pub min_boundary_points: usize,
    /// Fraction of the widest scanlines averaged for the vertical center.
    pub points_considered_for_y_center: f32,
}

impl Default for IrisBoundaryConfig {
    fn default() -> Self {
        Self {
            enable: true,
            search_range: 0.7,
            uncertainty_factor: 0.2,
            retry_factor: 0.7,
            min_range: 0.05,
            wrong_brightness_quota: 0.2,
            min_boundary_points: 10,
            points_considered_for_y_center: 0.2,
        }
    }
}

/// Top-level detector configuration.
///
/// Relative lengths (`max_leap_width`, `min_iris_pupil_distance`,
/// `initial_search_radius`) are fractions of the working image's long side.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct DetectConfig {
    /// Long-side working resolutions in increasing order. The first entry is
    /// the coarse full-area scan; the rest are pupil refinement stages.
    pub resolutions: Vec<u32>,
    /// Hill-climb rounds per refinement stage; also the fixed part of the
    /// refinement radius window.
    pub max_refinement_steps: usize,
    /// Maximum brightness-leap width.
    pub max_leap_width: f32,
    /// Minimum relative brightness jump for a pupil leap.
    pub min_leap_diff: f32,
    /// Brightness offset added to both sides of the pupil ratio.
    pub assumed_pupil_brightness: f32,
    /// Quantile level that must still be dark inside the pupil.
    pub min_black_quota: f32,
    /// Quantile level that must already be bright outside the pupil.
    pub max_black_quota: f32,
    /// Iris edge test compares the `1 - min_white_quota` quantiles.
    pub min_white_quota: f32,
    /// Second iris edge level, `1 - min_white_quota2`.
    pub min_white_quota2: f32,
    /// Minimum gap between iris and pupil radius.
    pub min_iris_pupil_distance: f32,
    /// Largest radius sampled around each coarse-scan candidate.
    pub initial_search_radius: f32,
    /// Full-resolution iris boundary walk.
    pub iris_boundary: IrisBoundaryConfig,
}

impl Default for DetectConfig {
    fn default() -> Self {
        Self {
            resolutions: vec![100, 200, 400, 800, 1600],
            max_refinement_steps: 5,
            max_leap_width: 0.05,
            min_leap_diff: 0.5,
            assumed_pupil_brightness: 0.25,
            min_black_quota: 0.75,
            max_black_quota: 0.25,
            min_white_quota: 0.3,
            min_white_quota2: 0.8,
            min_iris_pupil_distance: 0.08,
            initial_search_radius: 0.5,
            iris_boundary: IrisBoundaryConfig::default(),
        }
    }
}

impl DetectConfig {
    /// Load a (possibly partial) JSON override; missing fields keep defaults.
    pub fn from_json_file(path: &Path) -> Result<Self, DetectError> {
        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges and cross-field consistency.
    pub fn validate(&self) -> Result<(), DetectError> {
        let fail = |msg: String| Err(DetectError::InvalidConfig(msg));

        if self.resolutions.is_empty() {
            return fail("resolutions must not be empty".to_string());
        }
        if self.resolutions[0] < 8 {
            return fail(format!(
                "initial resolution {} is below 8 pixels",
                self.resolutions[0]
            ));
        }
        if self.resolutions.windows(2).any(|w| w[1] <= w[0]) {
            return fail(format!(
                "resolutions must be strictly increasing, got {:?}",
                self.resolutions
            ));
        }
        for (name, v) in [
            ("min_black_quota", self.min_black_quota),
            ("max_black_quota", self.max_black_quota),
            ("min_white_quota", self.min_white_quota),
            ("min_white_quota2", self.min_white_quota2),
        ] {
            if !(v > 0.0 && v < 1.0) {
                return fail(format!("{} must lie in (0, 1), got {}", name, v));
            }
        }
        if !(self.max_leap_width > 0.0 && self.max_leap_width <= 0.5) {
            return fail(format!(
                "max_leap_width must lie in (0, 0.5], got {}",
                self.max_leap_width
            ));
        }
        if !(self.min_leap_diff >= 0.0) {
            return fail(format!(
                "min_leap_diff must be non-negative, got {}",
                self.min_leap_diff
            ));
        }
        if !(self.assumed_pupil_brightness > 0.0) {
            return fail(format!(
                "assumed_pupil_brightness must be positive, got {}",
                self.assumed_pupil_brightness
            ));
        }
        if !(self.min_iris_pupil_distance >= 0.0 && self.min_iris_pupil_distance < 0.5) {
            return fail(format!(
                "min_iris_pupil_distance must lie in [0, 0.5), got {}",
                self.min_iris_pupil_distance
            ));
        }
        if !(self.initial_search_radius > 0.0 && self.initial_search_radius <= 1.0) {
            return fail(format!(
                "initial_search_radius must lie in (0, 1], got {}",
                self.initial_search_radius
            ));
        }

        let ib = &self.iris_boundary;
        if !(ib.search_range > 0.0 && ib.search_range <= 1.0) {
            return fail(format!(
                "iris_boundary.search_range must lie in (0, 1], got {}",
                ib.search_range
            ));
        }
        if !(ib.retry_factor > 0.0 && ib.retry_factor < 1.0) {
            return fail(format!(
                "iris_boundary.retry_factor must lie in (0, 1), got {}",
                ib.retry_factor
            ));
        }
        if !(ib.min_range > 0.0 && ib.min_range <= ib.uncertainty_factor) {
            return fail(format!(
                "iris_boundary.min_range must lie in (0, uncertainty_factor={}], got {}",
                ib.uncertainty_factor, ib.min_range
            ));
        }
        if !(ib.wrong_brightness_quota >= 0.0) {
            return fail(format!(
                "iris_boundary.wrong_brightness_quota must be non-negative, got {}",
                ib.wrong_brightness_quota
            ));
        }
        if ib.min_boundary_points == 0 {
            return fail("iris_boundary.min_boundary_points must be at least 1".to_string());
        }
        if !(ib.points_considered_for_y_center > 0.0 && ib.points_considered_for_y_center <= 1.0)
        {
            return fail(format!(
                "iris_boundary.points_considered_for_y_center must lie in (0, 1], got {}",
                ib.points_considered_for_y_center
            ));
        }
        Ok(())
    }

    /// Leap width `L` in pixels for a working image with the given long side.
    #[inline]
    pub(crate) fn leap_width_px(&self, resolution: u32) -> usize {
        ((self.max_leap_width * resolution as f32).round() as usize).max(1)
    }

    /// Minimum iris/pupil radius gap in pixels at the given long side.
    #[inline]
    pub(crate) fn min_gap_px(&self, resolution: u32) -> f32 {
        self.min_iris_pupil_distance * resolution as f32
    }

    pub(crate) fn quantile_levels(&self) -> QuantileLevels {
        QuantileLevels {
            dark_inside: self.min_black_quota,
            dark_outside: self.max_black_quota,
            white: 1.0 - self.min_white_quota,
            white2: 1.0 - self.min_white_quota2,
        }
    }
}
