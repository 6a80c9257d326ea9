//! End-to-end detection on rendered eyes.

use image::{GrayImage, Luma, Rgb, RgbImage};
use irisdet::{DetectError, DetectionResult, Detector};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

struct Eye {
    size: [u32; 2],
    center: [f32; 2],
    pupil_radius: f32,
    iris_radius: f32,
}

/// Render with flat regions; a pixel belongs to a disc when its center lies
/// strictly inside the radius.
fn render(eye: &Eye, pupil: [u8; 3], iris: [u8; 3], sclera: [u8; 3]) -> RgbImage {
    RgbImage::from_fn(eye.size[0], eye.size[1], |x, y| {
        let dx = x as f32 + 0.5 - eye.center[0];
        let dy = y as f32 + 0.5 - eye.center[1];
        let d = (dx * dx + dy * dy).sqrt();
        if d < eye.pupil_radius {
            Rgb(pupil)
        } else if d < eye.iris_radius {
            Rgb(iris)
        } else {
            Rgb(sclera)
        }
    })
}

fn gray(v: f32) -> [u8; 3] {
    let b = (v * 255.0).round() as u8;
    [b, b, b]
}

fn assert_matches(eye: &Eye, result: &DetectionResult, center_tol_px: f32, radius_rel_tol: f32) {
    let [w, h] = eye.size;
    let long = w.max(h) as f32;
    for (name, circle, radius) in [
        ("pupil", result.pupil, eye.pupil_radius),
        ("iris", result.iris, eye.iris_radius),
    ] {
        let cx = circle.center.x * w as f32;
        let cy = circle.center.y * h as f32;
        let r = circle.radius * long;
        assert!(
            (cx - eye.center[0]).abs() <= center_tol_px,
            "{name} cx {cx} vs {}",
            eye.center[0]
        );
        assert!(
            (cy - eye.center[1]).abs() <= center_tol_px,
            "{name} cy {cy} vs {}",
            eye.center[1]
        );
        assert!(
            ((r - radius) / radius).abs() <= radius_rel_tol,
            "{name} r {r} vs {radius}"
        );
    }
}

#[test]
fn reference_eye_600() {
    let eye = Eye {
        size: [600, 600],
        center: [300.0, 300.0],
        pupil_radius: 40.0,
        iris_radius: 220.0,
    };
    let img = render(&eye, gray(0.05), gray(0.5), gray(0.95));
    let result = Detector::new().detect(&img).unwrap();

    assert!(result.is_confident());
    assert!((result.pupil.center.x - 0.5).abs() < 0.01);
    assert!((result.pupil.center.y - 0.5).abs() < 0.01);
    assert!((result.pupil.radius - 0.0667).abs() < 0.005);
    assert!((result.iris.center.x - 0.5).abs() < 0.01);
    assert!((result.iris.center.y - 0.5).abs() < 0.01);
    assert!((result.iris.radius - 0.367).abs() < 0.01);
}

/// Add uniform grey noise in `±amplitude` to every pixel.
fn add_noise(img: &mut RgbImage, amplitude: i32, seed: u64) {
    let mut rng = StdRng::seed_from_u64(seed);
    for p in img.pixels_mut() {
        let n = rng.gen_range(-amplitude..=amplitude);
        let v = (p[0] as i32 + n).clamp(0, 255) as u8;
        *p = Rgb([v, v, v]);
    }
}

#[test]
fn noisy_reference_eye_keeps_full_pupil_radius() {
    let eye = Eye {
        size: [600, 600],
        center: [300.0, 300.0],
        pupil_radius: 40.0,
        iris_radius: 220.0,
    };
    for (amplitude, seed) in [(10, 7), (25, 11)] {
        let mut img = render(&eye, [13; 3], [128; 3], [242; 3]);
        add_noise(&mut img, amplitude, seed);
        let (result, trace) = Detector::new().detect_with_trace(&img).unwrap();
        assert_matches(&eye, &result, 4.0, 0.08);
        let last = trace.refinement.last().unwrap();
        let r = last.pupil.radius * 600.0;
        assert!(r >= 36.0, "noise ±{amplitude}: stage {} pupil r {r}", last.resolution);
    }
}

#[test]
fn converges_on_landscape_eye() {
    let eye = Eye {
        size: [400, 300],
        center: [210.0, 140.0],
        pupil_radius: 25.0,
        iris_radius: 100.0,
    };
    let img = render(&eye, gray(0.05), gray(0.5), gray(0.95));
    let result = Detector::new().detect(&img).unwrap();
    assert_matches(&eye, &result, 4.0, 0.08);
}

#[test]
fn converges_on_portrait_eye_with_colored_iris() {
    let eye = Eye {
        size: [300, 400],
        center: [145.0, 215.0],
        pupil_radius: 30.0,
        iris_radius: 110.0,
    };
    let img = render(&eye, gray(0.05), [140, 89, 51], gray(0.9));
    let result = Detector::new().detect(&img).unwrap();
    assert_matches(&eye, &result, 4.0, 0.08);
}

#[test]
fn converges_on_gray_source() {
    let eye = Eye {
        size: [360, 360],
        center: [170.0, 190.0],
        pupil_radius: 35.0,
        iris_radius: 120.0,
    };
    let rgb = render(&eye, gray(0.1), gray(0.45), gray(0.9));
    let img = GrayImage::from_fn(360, 360, |x, y| Luma([rgb.get_pixel(x, y)[0]]));
    let result = Detector::new().detect(&img).unwrap();
    assert_matches(&eye, &result, 4.0, 0.08);
    assert!(result.iris.radius > result.pupil.radius);
}

#[test]
fn detection_is_deterministic() {
    let eye = Eye {
        size: [400, 300],
        center: [200.0, 150.0],
        pupil_radius: 20.0,
        iris_radius: 90.0,
    };
    let img = render(&eye, gray(0.05), gray(0.5), gray(0.95));
    let det = Detector::new();
    let (a, trace_a) = det.detect_with_trace(&img).unwrap();
    let (b, trace_b) = det.detect_with_trace(&img).unwrap();
    assert_eq!(a, b);
    assert_eq!(trace_a, trace_b);
}

#[test]
fn blank_image_returns_default() {
    let img = RgbImage::from_pixel(320, 240, Rgb([180, 180, 180]));
    let result = Detector::new().detect(&img).unwrap();
    assert_eq!(result, DetectionResult::default());
    assert!(result.overlay_position().is_none());
}

#[test]
fn empty_image_is_an_error() {
    let err = Detector::new().detect(&GrayImage::new(0, 0)).unwrap_err();
    assert!(matches!(err, DetectError::EmptyImage { .. }));
}
