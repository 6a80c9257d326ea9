//! High-level detection API.
//!
//! [`Detector`] is the primary entry point. It wraps a [`DetectConfig`] and
//! runs the multi-resolution pipeline on any [`PixelSource`].

use std::path::Path;

use crate::detector::DetectConfig;
use crate::error::DetectError;
use crate::pipeline::{self, DetectionResult, DetectionTrace};
use crate::pixel_source::PixelSource;

/// Primary detection interface.
///
/// Create once, detect on many images. Detection is synchronous and
/// deterministic; callers run it on a worker thread.
///
/// # Examples
///
/// ```no_run
/// use irisdet::Detector;
///
/// let image = image::open("eye.jpg").unwrap().to_rgb8();
/// let result = Detector::new().detect(&image).unwrap();
/// if result.is_confident() {
///     println!("pupil r={:.3}, iris r={:.3}", result.pupil.radius, result.iris.radius);
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct Detector {
    config: DetectConfig,
}

impl Detector {
    /// Create a detector with default tuning.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with full config control.
    pub fn with_config(config: DetectConfig) -> Self {
        Self { config }
    }

    /// Load a JSON config override and create a detector in one step.
    pub fn from_config_json_file(path: &Path) -> Result<Self, DetectError> {
        Ok(Self::with_config(DetectConfig::from_json_file(path)?))
    }

    /// Access the current configuration.
    pub fn config(&self) -> &DetectConfig {
        &self.config
    }

    /// Mutable access to configuration for post-construction tuning.
    pub fn config_mut(&mut self) -> &mut DetectConfig {
        &mut self.config
    }

    /// Detect pupil and iris.
    ///
    /// Returns the default result when the image shows no pupil. Fails only
    /// on an empty source or an invalid configuration.
    pub fn detect<S: PixelSource>(&self, source: &S) -> Result<DetectionResult, DetectError> {
        self.detect_with_trace(source).map(|(result, _)| result)
    }

    /// Detect and also return the stage-by-stage trace.
    pub fn detect_with_trace<S: PixelSource>(
        &self,
        source: &S,
    ) -> Result<(DetectionResult, DetectionTrace), DetectError> {
        let (width, height) = (source.width(), source.height());
        if width == 0 || height == 0 {
            return Err(DetectError::EmptyImage { width, height });
        }
        self.config.validate()?;
        Ok(pipeline::detect_with_trace(source, &self.config))
    }
}

#[cfg(test)]
mod tests {
    use image::{GrayImage, RgbImage};

    use super::*;

    #[test]
    fn zero_sized_source_is_an_error() {
        let det = Detector::new();
        let err = det.detect(&RgbImage::new(0, 10)).unwrap_err();
        assert!(matches!(
            err,
            DetectError::EmptyImage {
                width: 0,
                height: 10
            }
        ));
    }

    #[test]
    fn invalid_config_is_reported_before_detection() {
        let mut det = Detector::new();
        det.config_mut().resolutions = vec![200, 100];
        let err = det.detect(&GrayImage::new(50, 50)).unwrap_err();
        assert!(matches!(err, DetectError::InvalidConfig(_)));
    }

    #[test]
    fn with_config_keeps_the_given_config() {
        let cfg = DetectConfig {
            max_refinement_steps: 2,
            ..DetectConfig::default()
        };
        let det = Detector::with_config(cfg.clone());
        assert_eq!(det.config(), &cfg);
    }
}
