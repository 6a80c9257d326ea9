//! Library error type.

// ── Error type ─────────────────────────────────────────────────────────────

/// Errors returned by the detector and the caller-side job helpers.
///
/// Ambiguous image content (no visible pupil, weak iris edge) is never an
/// error: the detector falls back to [`DetectionResult::default`]. Only
/// conditions that indicate a caller bug or an I/O failure surface here.
///
/// [`DetectionResult::default`]: crate::DetectionResult
#[derive(Debug)]
pub enum DetectError {
    /// The pixel source has zero width or height.
    EmptyImage {
        /// Reported width in pixels.
        width: u32,
        /// Reported height in pixels.
        height: u32,
    },
    /// A configuration value is out of range or inconsistent.
    InvalidConfig(String),
    /// Image decoding failed.
    Image(image::ImageError),
    /// Filesystem access failed.
    Io(std::io::Error),
    /// A configuration file could not be parsed.
    ConfigFormat(serde_json::Error),
    /// The metadata store rejected a write.
    Store(String),
}

impl std::fmt::Display for DetectError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyImage { width, height } => {
                write!(f, "empty image: {}x{} pixels", width, height)
            }
            Self::InvalidConfig(reason) => write!(f, "invalid detector config: {}", reason),
            Self::Image(e) => write!(f, "image decoding failed: {}", e),
            Self::Io(e) => write!(f, "i/o error: {}", e),
            Self::ConfigFormat(e) => write!(f, "malformed config file: {}", e),
            Self::Store(reason) => write!(f, "metadata store failed: {}", reason),
        }
    }
}

impl std::error::Error for DetectError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Image(e) => Some(e),
            Self::Io(e) => Some(e),
            Self::ConfigFormat(e) => Some(e),
            Self::EmptyImage { .. } | Self::InvalidConfig(_) | Self::Store(_) => None,
        }
    }
}

impl From<image::ImageError> for DetectError {
    fn from(e: image::ImageError) -> Self {
        Self::Image(e)
    }
}

impl From<std::io::Error> for DetectError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for DetectError {
    fn from(e: serde_json::Error) -> Self {
        Self::ConfigFormat(e)
    }
}
