use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread::JoinHandle;

use crate::api::Detector;
use crate::error::DetectError;
use crate::overlay::OverlayPosition;
use crate::pipeline::DetectionResult;

use super::InFlightTracker;

/// Sink for overlay metadata of an image file.
///
/// Implementations own write ordering per path; the job only calls `store`
/// once per finished detection.
pub trait MetadataStore: Send + Sync {
    fn store(&self, path: &Path, overlay: &OverlayPosition) -> Result<(), DetectError>;
}

/// What a detection job did.
#[derive(Debug, Clone, PartialEq)]
pub enum JobOutcome {
    /// A job for the same file was already running; nothing was done.
    AlreadyRunning,
    /// The image showed no pupil/iris; nothing was stored.
    NoDetection,
    /// The file was deleted while the job ran; the result was dropped.
    Discarded,
    /// The overlay was stored for the file at this path.
    Stored(PathBuf),
}

/// Decode `path`, detect, and store the overlay at the file's final path.
///
/// The tracker entry is always ended, also when decoding or detection fails.
pub fn run_detection_job(
    detector: &Detector,
    path: &Path,
    tracker: &dyn InFlightTracker,
    store: &dyn MetadataStore,
) -> Result<JobOutcome, DetectError> {
    if !tracker.try_begin(path) {
        return Ok(JobOutcome::AlreadyRunning);
    }
    tracing::info!("detecting {}", path.display());
    let detection = detect_file(detector, path);
    let target = tracker.end(path);
    let result = detection?;

    let Some(target) = target else {
        tracing::info!("{} was removed during detection, dropping result", path.display());
        return Ok(JobOutcome::Discarded);
    };
    let Some(overlay) = result.overlay_position() else {
        return Ok(JobOutcome::NoDetection);
    };
    store.store(&target, &overlay)?;
    tracing::info!("stored overlay for {}", target.display());
    Ok(JobOutcome::Stored(target))
}

fn detect_file(detector: &Detector, path: &Path) -> Result<DetectionResult, DetectError> {
    let image = image::open(path)?.to_rgb8();
    detector.detect(&image)
}

/// Run [`run_detection_job`] on a dedicated worker thread.
pub fn spawn_detection_job(
    detector: Arc<Detector>,
    path: PathBuf,
    tracker: Arc<dyn InFlightTracker>,
    store: Arc<dyn MetadataStore>,
) -> JoinHandle<Result<JobOutcome, DetectError>> {
    std::thread::spawn(move || run_detection_job(&detector, &path, tracker.as_ref(), store.as_ref()))
}
