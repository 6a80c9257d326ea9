//! Shared synthetic-eye renderers for unit tests.

use image::{GrayImage, Luma};

/// Region of a synthetic eye a pixel center falls into.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Region {
    Pupil,
    Iris,
    Sclera,
}

fn region(x: u32, y: u32, center: [f32; 2], pupil_radius: f32, iris_radius: f32) -> Region {
    let dx = x as f32 + 0.5 - center[0];
    let dy = y as f32 + 0.5 - center[1];
    let d = (dx * dx + dy * dy).sqrt();
    if d < pupil_radius {
        Region::Pupil
    } else if d < iris_radius {
        Region::Iris
    } else {
        Region::Sclera
    }
}

/// Render concentric pupil and iris discs on a uniform background.
///
/// `center` is in continuous pixel coordinates (pixel `k` spans `[k, k+1)`).
/// A pixel belongs to a disc when its center lies strictly inside the
/// radius; pass `0.0` to omit a disc.
#[allow(clippy::too_many_arguments)]
pub(crate) fn draw_gray_eye(
    w: u32,
    h: u32,
    center: [f32; 2],
    pupil_radius: f32,
    iris_radius: f32,
    pupil_pix: u8,
    iris_pix: u8,
    bg_pix: u8,
) -> GrayImage {
    GrayImage::from_fn(w, h, |x, y| {
        let v = match region(x, y, center, pupil_radius, iris_radius) {
            Region::Pupil => pupil_pix,
            Region::Iris => iris_pix,
            Region::Sclera => bg_pix,
        };
        Luma([v])
    })
}

/// Gaussian-blur a `GrayImage` via `imageproc`.
pub(crate) fn blur_gray(img: &GrayImage, sigma: f32) -> GrayImage {
    let (w, h) = img.dimensions();
    let f = image::ImageBuffer::<Luma<f32>, Vec<f32>>::from_fn(w, h, |x, y| {
        Luma([img.get_pixel(x, y)[0] as f32 / 255.0])
    });
    let blurred = imageproc::filter::gaussian_blur_f32(&f, sigma);
    GrayImage::from_fn(w, h, |x, y| {
        let v = blurred.get_pixel(x, y)[0].clamp(0.0, 1.0);
        Luma([(v * 255.0).round() as u8])
    })
}
