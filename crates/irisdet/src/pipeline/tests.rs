use image::{GrayImage, Luma};

use super::*;
use crate::detector::DetectConfig;
use crate::test_utils::draw_gray_eye;

const BG: u8 = 242;
const IRIS: u8 = 128;
const PUPIL: u8 = 13;

fn landscape_eye() -> GrayImage {
    draw_gray_eye(400, 300, [210.0, 140.0], 25.0, 100.0, PUPIL, IRIS, BG)
}

#[test]
fn trace_records_every_stage() {
    let img = landscape_eye();
    let (result, trace) = detect_with_trace(&img, &DetectConfig::default());
    assert!(result.is_confident());
    assert_eq!(trace.image_size, [400, 300]);

    let initial = trace.initial.as_ref().unwrap();
    assert_eq!(initial.working_size, [100, 75]);
    assert_eq!(initial.candidates, 50 * 39);
    assert!(initial.best.is_some());

    // 200 is a resized stage; 400 covers the source and is the last one.
    let resolutions: Vec<u32> = trace.refinement.iter().map(|s| s.resolution).collect();
    assert_eq!(resolutions, vec![200, 400]);
    assert_eq!(trace.refinement[1].working_size, [400, 300]);
    assert_eq!(trace.refinement.last().unwrap().pupil, result.pupil);

    let walk = trace.boundary.as_ref().unwrap();
    assert!(walk.applied);
    assert_eq!(walk.iris, result.iris);
}

#[test]
fn refinement_moves_within_step_window() {
    let img = landscape_eye();
    let config = DetectConfig::default();
    let (_, trace) = detect_with_trace(&img, &config);

    let initial = trace.initial.unwrap();
    let best = initial.best.unwrap();
    let [w0, h0] = initial.working_size;
    let mut prev = Circle::new(
        Point2D::new(
            (best.x as f32 + 0.5) / w0 as f32,
            (best.y as f32 + 0.5) / h0 as f32,
        ),
        (best.pupil_radius as f32 + 0.5) / w0.max(h0) as f32,
    );

    for stage in &trace.refinement {
        let [w, h] = stage.working_size;
        let long = w.max(h) as f32;
        let leap_width = config.leap_width_px(w.max(h)) as f32;
        let steps = config.max_refinement_steps as f32;
        // One pixel of slack for re-quantizing the previous estimate.
        let dx = (stage.pupil.center.x - prev.center.x).abs() * w as f32;
        let dy = (stage.pupil.center.y - prev.center.y).abs() * h as f32;
        let dr = (stage.pupil.radius - prev.radius).abs() * long;
        assert!(dx <= steps + 1.0, "stage {} dx {}", stage.resolution, dx);
        assert!(dy <= steps + 1.0, "stage {} dy {}", stage.resolution, dy);
        assert!(dr <= steps + leap_width + 1.0, "stage {} dr {}", stage.resolution, dr);
        assert!(stage.rounds >= 1 && stage.rounds <= config.max_refinement_steps);
        prev = stage.pupil;
    }
}

#[test]
fn small_source_skips_refinement() {
    let img = draw_gray_eye(80, 60, [40.0, 30.0], 6.0, 22.0, PUPIL, IRIS, BG);
    let (result, trace) = detect_with_trace(&img, &DetectConfig::default());
    assert!(trace.refinement.is_empty());
    assert_eq!(trace.initial.unwrap().working_size, [80, 60]);
    assert!(result.is_confident());
    assert!((result.iris.center.x * 80.0 - 40.0).abs() <= 2.0);
    assert!((result.iris.radius * 80.0 - 22.0).abs() <= 2.0);
    assert!(result.iris.radius > result.pupil.radius);
}

#[test]
fn disabled_walker_reports_coarse_iris() {
    let img = landscape_eye();
    let mut config = DetectConfig::default();
    config.iris_boundary.enable = false;
    let (result, trace) = detect_with_trace(&img, &config);

    assert!(trace.boundary.is_none());
    let initial = trace.initial.unwrap();
    let best = initial.best.unwrap();
    let q = best.iris_radius.unwrap() as f32;
    assert_eq!(result.iris.radius, q / 100.0);
    assert_eq!(result.iris.center.x, (best.x as f32 + 0.5) / 100.0);
}

#[test]
fn single_resolution_stops_after_initial_scan() {
    let img = landscape_eye();
    let config = DetectConfig {
        resolutions: vec![100],
        ..DetectConfig::default()
    };
    let (result, trace) = detect_with_trace(&img, &config);
    assert!(trace.refinement.is_empty());
    assert!(trace.boundary.is_some());
    assert!(result.is_confident());
}

#[test]
fn blank_image_yields_default_and_empty_trace() {
    let img = GrayImage::from_pixel(160, 120, Luma([90]));
    let (result, trace) = detect_with_trace(&img, &DetectConfig::default());
    assert_eq!(result, DetectionResult::default());
    assert!(trace.initial.unwrap().best.is_none());
    assert!(trace.refinement.is_empty());
    assert!(trace.boundary.is_none());
}

#[test]
fn trace_serializes_to_json() {
    let img = draw_gray_eye(80, 60, [40.0, 30.0], 6.0, 22.0, PUPIL, IRIS, BG);
    let (_, trace) = detect_with_trace(&img, &DetectConfig::default());
    let json = serde_json::to_value(&trace).unwrap();
    assert_eq!(json["image_size"][0], 80);
    assert!(json["initial"]["best"]["pupil_radius"].is_u64());
    assert!(json.get("refinement").is_none());
}
