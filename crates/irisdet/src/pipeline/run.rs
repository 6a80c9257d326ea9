//! Top-level orchestrator: initial scan -> pupil refinement -> iris walk.

use crate::brightness::{BrightnessField, BrightnessMap, SourceBrightness};
use crate::detector::boundary::{collect_boundary_points, fit_boundary_circle};
use crate::detector::scoring::{CandidateScorer, RadiusWindow, SearchPhase};
use crate::detector::{CandidateScore, DetectConfig};
use crate::pixel_source::PixelSource;

use super::{
    BoundaryWalkTrace, Circle, DetectionResult, DetectionTrace, InitialScanTrace, Point2D,
    RefinementStageTrace,
};

/// 3x3 neighborhood offsets; the current center comes first so ties keep it.
const NEIGHBORHOOD: [(i64, i64); 9] = [
    (0, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Normalized pupil and iris estimate carried between stages.
#[derive(Debug, Clone, Copy)]
struct Estimate {
    pupil: Circle,
    iris: Circle,
}

impl Estimate {
    fn into_result(self) -> DetectionResult {
        DetectionResult {
            pupil: self.pupil,
            iris: self.iris,
        }
    }
}

enum Stage {
    Initial,
    PupilRefining { next: usize, estimate: Estimate },
    IrisRefining { estimate: Estimate },
    Done(DetectionResult),
}

fn long_side(size: [u32; 2]) -> u32 {
    size[0].max(size[1])
}

/// Run all stages on a validated config and a non-empty source.
pub(crate) fn detect_with_trace<S: PixelSource>(
    src: &S,
    config: &DetectConfig,
) -> (DetectionResult, DetectionTrace) {
    let image_size = [src.width(), src.height()];
    let mut trace = DetectionTrace {
        image_size,
        ..DetectionTrace::default()
    };

    let mut stage = Stage::Initial;
    let result = loop {
        stage = match stage {
            Stage::Initial => {
                let (estimate, initial) = initial_scan(src, config);
                let full = covers_source(config.resolutions[0], image_size);
                trace.initial = Some(initial);
                match estimate {
                    None => Stage::Done(DetectionResult::default()),
                    Some(estimate) if full => Stage::IrisRefining { estimate },
                    Some(estimate) => Stage::PupilRefining { next: 1, estimate },
                }
            }
            Stage::PupilRefining { next, estimate } => match config.resolutions.get(next) {
                None => Stage::IrisRefining { estimate },
                Some(&resolution) => {
                    let full = covers_source(resolution, image_size);
                    let (pupil, stage_trace) = if full {
                        let map = BrightnessMap::from_source(src);
                        refine_pupil(&map, config, resolution, estimate)
                    } else {
                        let map = BrightnessMap::from_source(&src.resized(resolution));
                        refine_pupil(&map, config, resolution, estimate)
                    };
                    trace.refinement.push(stage_trace);
                    match pupil {
                        Some(pupil) if !full => Stage::PupilRefining {
                            next: next + 1,
                            estimate: Estimate { pupil, ..estimate },
                        },
                        Some(pupil) => Stage::IrisRefining {
                            estimate: Estimate { pupil, ..estimate },
                        },
                        None => Stage::IrisRefining { estimate },
                    }
                }
            },
            Stage::IrisRefining { estimate } => {
                if !config.iris_boundary.enable {
                    Stage::Done(estimate.into_result())
                } else {
                    let (iris, walk) = refine_iris(src, config, estimate);
                    trace.boundary = Some(walk);
                    Stage::Done(DetectionResult {
                        pupil: estimate.pupil,
                        iris,
                    })
                }
            }
            Stage::Done(result) => break result,
        };
    };

    if result.is_confident() {
        tracing::info!(
            "pupil ({:.4}, {:.4}) r={:.4}, iris ({:.4}, {:.4}) r={:.4}",
            result.pupil.center.x,
            result.pupil.center.y,
            result.pupil.radius,
            result.iris.center.x,
            result.iris.center.y,
            result.iris.radius,
        );
    } else {
        tracing::info!("no pupil/iris found, returning default result");
    }
    (result, trace)
}

fn covers_source(resolution: u32, size: [u32; 2]) -> bool {
    resolution >= size[0] && resolution >= size[1]
}

/// Coarse scan over the central half of the smallest working image.
fn initial_scan<S: PixelSource>(
    src: &S,
    config: &DetectConfig,
) -> (Option<Estimate>, InitialScanTrace) {
    let working = src.resized(config.resolutions[0]);
    let map = BrightnessMap::from_source(&working);
    let [w, h] = map.dimensions();
    let long = long_side([w, h]);

    let mut scorer = CandidateScorer::new(config, long);
    let max_radius = (config.initial_search_radius * long as f32).round() as usize;
    let phase = SearchPhase::Initial { max_radius };

    let mut candidates = 0usize;
    let mut best: Option<CandidateScore> = None;
    for y in h / 4..h - h / 4 {
        for x in w / 4..w - w / 4 {
            candidates += 1;
            if let Some(score) = scorer.score(&map, [x, y], &phase) {
                if best.map_or(true, |b| score.leap > b.leap) {
                    best = Some(score);
                }
            }
        }
    }

    let estimate = best.and_then(|b| {
        let q = b.iris_radius?;
        let center = Point2D::new((b.x as f32 + 0.5) / w as f32, (b.y as f32 + 0.5) / h as f32);
        Some(Estimate {
            pupil: Circle::new(center, (b.pupil_radius as f32 + 0.5) / long as f32),
            iris: Circle::new(center, q as f32 / long as f32),
        })
    });

    match &best {
        Some(b) => tracing::info!(
            "initial scan {}x{}: {} candidates, best at ({}, {}) pupil={} iris={:?} leap={:.3}",
            w,
            h,
            candidates,
            b.x,
            b.y,
            b.pupil_radius,
            b.iris_radius,
            b.leap
        ),
        None => tracing::info!(
            "initial scan {}x{}: {} candidates, no leap found",
            w,
            h,
            candidates
        ),
    }

    let trace = InitialScanTrace {
        working_size: [w, h],
        candidates,
        best,
    };
    (estimate, trace)
}

/// Hill-climb the pupil on one working image.
///
/// Returns `None` for the pupil when no candidate scored in the first round;
/// the caller then keeps the previous estimate and stops refining.
fn refine_pupil(
    map: &BrightnessMap,
    config: &DetectConfig,
    resolution: u32,
    estimate: Estimate,
) -> (Option<Circle>, RefinementStageTrace) {
    let [w, h] = map.dimensions();
    let long = long_side([w, h]);
    let long_f = long as f32;

    let mut scorer = CandidateScorer::new(config, long);
    let delta = config.max_refinement_steps + scorer.leap_width();

    let to_index = |v: f32, size: u32| ((v * size as f32 - 0.5).round().max(0.0) as u32).min(size - 1);
    let mut cx = to_index(estimate.pupil.center.x, w);
    let mut cy = to_index(estimate.pupil.center.y, h);
    let mut radius = (estimate.pupil.radius * long_f - 0.5).round().max(1.0) as usize;

    // Keep the pupil `min_iris_pupil_distance` inside the current iris.
    let cap = (estimate.iris.radius * long_f - config.min_gap_px(long) - 0.5).floor();
    let window = RadiusWindow {
        min: radius.saturating_sub(delta).max(1),
        max: if cap >= 0.0 {
            (radius + delta).min(cap as usize)
        } else {
            0
        },
    };
    let phase = SearchPhase::PupilRefinement { window };

    let mut rounds = 0usize;
    let mut stable = false;
    let mut found = false;
    for _ in 0..config.max_refinement_steps {
        rounds += 1;
        let mut best: Option<CandidateScore> = None;
        for (dx, dy) in NEIGHBORHOOD {
            let x = cx as i64 + dx;
            let y = cy as i64 + dy;
            if x < 0 || y < 0 || x >= w as i64 || y >= h as i64 {
                continue;
            }
            if let Some(score) = scorer.score(map, [x as u32, y as u32], &phase) {
                if best.map_or(true, |b| score.leap > b.leap) {
                    best = Some(score);
                }
            }
        }
        let Some(best) = best else {
            break;
        };
        found = true;
        if best.x == cx && best.y == cy && best.pupil_radius == radius {
            stable = true;
            break;
        }
        cx = best.x;
        cy = best.y;
        radius = best.pupil_radius;
    }

    let pupil = found.then(|| {
        Circle::new(
            Point2D::new((cx as f32 + 0.5) / w as f32, (cy as f32 + 0.5) / h as f32),
            (radius as f32 + 0.5) / long_f,
        )
    });

    match &pupil {
        Some(p) => tracing::debug!(
            "refine {}x{}: {} rounds{}, pupil ({:.4}, {:.4}) r={:.4}",
            w,
            h,
            rounds,
            if stable { " (stable)" } else { "" },
            p.center.x,
            p.center.y,
            p.radius
        ),
        None => tracing::warn!(
            "refine {}x{}: no candidate in radius window [{}, {}], keeping previous pupil",
            w,
            h,
            window.min,
            window.max
        ),
    }

    let stage_trace = RefinementStageTrace {
        resolution,
        working_size: [w, h],
        rounds,
        stable,
        pupil: pupil.unwrap_or(estimate.pupil),
    };
    (pupil, stage_trace)
}

/// Single boundary walk at source resolution, seeded by the coarse iris.
fn refine_iris<S: PixelSource>(
    src: &S,
    config: &DetectConfig,
    estimate: Estimate,
) -> (Circle, BoundaryWalkTrace) {
    let field = SourceBrightness::new(src);
    let [w, h] = field.dimensions();
    let (wf, hf, lf) = (w as f32, h as f32, long_side([w, h]) as f32);

    let iris = estimate.iris;
    let seed = Circle::new(
        Point2D::new(iris.center.x * wf, iris.center.y * hf),
        iris.radius * lf,
    );
    let cfg = &config.iris_boundary;
    let points = collect_boundary_points(&field, seed, cfg);
    let fitted = fit_boundary_circle(&points, cfg).map(|c| {
        Circle::new(
            Point2D::new(c.center.x / wf, c.center.y / hf),
            c.radius / lf,
        )
    });

    let accepted = fitted.filter(|c| {
        c.radius.is_finite() && c.radius - estimate.pupil.radius >= config.min_iris_pupil_distance
    });
    match (&fitted, &accepted) {
        (None, _) => tracing::debug!(
            "iris walk: {} boundary points, below minimum {}, keeping seed",
            points.len(),
            cfg.min_boundary_points
        ),
        (Some(c), None) => tracing::debug!(
            "iris walk: fitted r={:.4} too close to pupil r={:.4}, keeping seed",
            c.radius,
            estimate.pupil.radius
        ),
        (Some(_), Some(c)) => tracing::debug!(
            "iris walk: {} boundary points, iris ({:.4}, {:.4}) r={:.4}",
            points.len(),
            c.center.x,
            c.center.y,
            c.radius
        ),
    }

    let result = accepted.unwrap_or(iris);
    let walk = BoundaryWalkTrace {
        seed: iris,
        accepted_points: points.len(),
        applied: accepted.is_some(),
        iris: result,
    };
    (result, walk)
}
