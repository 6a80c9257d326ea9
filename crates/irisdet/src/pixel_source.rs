//! Read-only pixel access used by every detection stage.
//!
//! The detector never decodes files itself. It consumes a [`PixelSource`],
//! which can report its size, return the color of any in-bounds pixel, and
//! produce an aspect-preserving downscaled copy.

use image::imageops::{self, FilterType};
use image::{GrayImage, RgbImage};

/// RGB color with channels normalized to `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    /// Construct a color from normalized channels.
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Achromatic color with all channels set to `v`.
    pub const fn gray(v: f32) -> Self {
        Self { r: v, g: v, b: v }
    }

    /// Convert 8-bit channels to a normalized color.
    #[inline]
    pub fn from_u8(rgb: [u8; 3]) -> Self {
        Self {
            r: rgb[0] as f32 / 255.0,
            g: rgb[1] as f32 / 255.0,
            b: rgb[2] as f32 / 255.0,
        }
    }
}

/// Image abstraction consumed by the detector.
///
/// Implementations must keep `color_at` total over `0..width() x 0..height()`;
/// the detector never queries outside that range.
///
/// # Example
///
/// ```
/// use irisdet::{Color, PixelSource};
///
/// struct Flat {
///     w: u32,
///     h: u32,
/// }
///
/// impl PixelSource for Flat {
///     fn width(&self) -> u32 {
///         self.w
///     }
///     fn height(&self) -> u32 {
///         self.h
///     }
///     fn color_at(&self, _x: u32, _y: u32) -> Color {
///         Color::gray(0.5)
///     }
///     fn resized(&self, max_dimension: u32) -> Self {
///         let [w, h] = irisdet::resized_dimensions(self.w, self.h, max_dimension);
///         Flat { w, h }
///     }
/// }
/// ```
pub trait PixelSource {
    /// Width in pixels.
    fn width(&self) -> u32;
    /// Height in pixels.
    fn height(&self) -> u32;
    /// Color of pixel `(x, y)`.
    fn color_at(&self, x: u32, y: u32) -> Color;
    /// Downscaled copy whose long side is at most `max_dimension`.
    ///
    /// Preserves aspect ratio and never upscales.
    fn resized(&self, max_dimension: u32) -> Self
    where
        Self: Sized;
}

/// Target size for an aspect-preserving downscale to `max_dimension`.
///
/// Returns the input size unchanged when it already fits.
pub fn resized_dimensions(width: u32, height: u32, max_dimension: u32) -> [u32; 2] {
    let long = width.max(height);
    if long == 0 || max_dimension >= long {
        return [width, height];
    }
    let scale = max_dimension.max(1) as f64 / long as f64;
    let w = ((width as f64 * scale).round() as u32).max(1);
    let h = ((height as f64 * scale).round() as u32).max(1);
    [w, h]
}

impl PixelSource for RgbImage {
    fn width(&self) -> u32 {
        self.dimensions().0
    }

    fn height(&self) -> u32 {
        self.dimensions().1
    }

    #[inline]
    fn color_at(&self, x: u32, y: u32) -> Color {
        Color::from_u8(self.get_pixel(x, y).0)
    }

    fn resized(&self, max_dimension: u32) -> Self {
        let (w, h) = self.dimensions();
        let [nw, nh] = resized_dimensions(w, h, max_dimension);
        if nw == w && nh == h {
            return self.clone();
        }
        imageops::resize(self, nw, nh, FilterType::Triangle)
    }
}

impl PixelSource for GrayImage {
    fn width(&self) -> u32 {
        self.dimensions().0
    }

    fn height(&self) -> u32 {
        self.dimensions().1
    }

    #[inline]
    fn color_at(&self, x: u32, y: u32) -> Color {
        Color::gray(self.get_pixel(x, y)[0] as f32 / 255.0)
    }

    fn resized(&self, max_dimension: u32) -> Self {
        let (w, h) = self.dimensions();
        let [nw, nh] = resized_dimensions(w, h, max_dimension);
        if nw == w && nh == h {
            return self.clone();
        }
        imageops::resize(self, nw, nh, FilterType::Triangle)
    }
}
