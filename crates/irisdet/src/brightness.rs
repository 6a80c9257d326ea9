//! Scalar brightness used by all radial statistics.

use crate::pixel_source::{Color, PixelSource};

/// Brightness of one color: sum of channels minus the smallest channel.
///
/// Equivalent to the sum of the two largest channels. Saturated colors score
/// above a dark gray, while white scores above any single primary, which keeps
/// colored iris tissue separable from both the achromatic pupil and sclera.
#[inline]
pub fn brightness(c: Color) -> f32 {
    c.r + c.g + c.b - c.r.min(c.g).min(c.b)
}

/// Per-pixel brightness lookup over a rectangular grid.
pub trait BrightnessField {
    /// Grid size `[width, height]`.
    fn dimensions(&self) -> [u32; 2];
    /// Brightness at an in-bounds pixel.
    fn brightness_at(&self, x: u32, y: u32) -> f32;
}

/// Dense brightness grid computed once per working resolution.
#[derive(Debug, Clone)]
pub struct BrightnessMap {
    width: u32,
    height: u32,
    data: Vec<f32>,
}

impl BrightnessMap {
    /// Evaluate [`brightness`] for every pixel of `src`.
    pub fn from_source<S: PixelSource + ?Sized>(src: &S) -> Self {
        let (width, height) = (src.width(), src.height());
        let mut data = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                data.push(brightness(src.color_at(x, y)));
            }
        }
        Self {
            width,
            height,
            data,
        }
    }
}

impl BrightnessField for BrightnessMap {
    #[inline]
    fn dimensions(&self) -> [u32; 2] {
        [self.width, self.height]
    }

    #[inline]
    fn brightness_at(&self, x: u32, y: u32) -> f32 {
        self.data[y as usize * self.width as usize + x as usize]
    }
}

/// On-demand brightness view over a pixel source.
///
/// Used at full resolution where only a few scanlines are visited and a
/// dense grid would cost more than it saves.
#[derive(Clone, Copy)]
pub struct SourceBrightness<'a, S: ?Sized> {
    src: &'a S,
}

impl<'a, S: PixelSource + ?Sized> SourceBrightness<'a, S> {
    pub fn new(src: &'a S) -> Self {
        Self { src }
    }
}

impl<S: PixelSource + ?Sized> BrightnessField for SourceBrightness<'_, S> {
    #[inline]
    fn dimensions(&self) -> [u32; 2] {
        [self.src.width(), self.src.height()]
    }

    #[inline]
    fn brightness_at(&self, x: u32, y: u32) -> f32 {
        brightness(self.src.color_at(x, y))
    }
}
