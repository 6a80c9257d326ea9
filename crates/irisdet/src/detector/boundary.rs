//! Scanline walker for the outer iris boundary.
//!
//! Starting from a seed circle, each horizontal scanline near the seed center
//! is searched for the iris/sclera transition on both sides. The accepted
//! `(y, x_left, x_right)` triples are then aggregated into a circle with
//! robust statistics: the median chord midpoint for `x`, the mean row of the
//! widest chords for `y`, and the mean endpoint distance for the radius.
//!
//! All coordinates are continuous pixel coordinates of the walked image.

use crate::brightness::BrightnessField;
use crate::pipeline::{Circle, Point2D};

use super::config::IrisBoundaryConfig;

/// One accepted scanline.
///
/// Rows are never negative here, and the chord ends fall between pixels, so
/// the row is unsigned and the ends are continuous pixel-edge coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct BoundaryPoint {
    /// Pixel row.
    pub(crate) y: u32,
    /// Left pixel edge of the inner run.
    pub(crate) x_left: f32,
    /// Right pixel edge of the inner run.
    pub(crate) x_right: f32,
}

impl BoundaryPoint {
    #[inline]
    fn span(&self) -> f32 {
        self.x_right - self.x_left
    }

    #[inline]
    fn mid(&self) -> f32 {
        0.5 * (self.x_left + self.x_right)
    }

    #[inline]
    fn row_center(&self) -> f32 {
        self.y as f32 + 0.5
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Left,
    Right,
}

/// Walk the scanlines around `seed` and return every accepted point.
///
/// Rows are visited outward from the seed row: `yc, yc+1, yc-1, yc+2, ...`.
pub(crate) fn collect_boundary_points<F: BrightnessField + ?Sized>(
    field: &F,
    seed: Circle,
    cfg: &IrisBoundaryConfig,
) -> Vec<BoundaryPoint> {
    let [_, h] = field.dimensions();
    let r = seed.radius;
    let mut points = Vec::new();
    if !(r > 0.0) || h == 0 {
        return points;
    }

    let cx = seed.center.x;
    let cy = seed.center.y;
    let yc = cy.floor() as i64;
    let reach = (cfg.search_range * r).floor().max(0.0) as i64;
    let mut samples = Vec::new();

    for off in 0..=reach {
        let rows = if off == 0 {
            [Some(yc), None]
        } else {
            [Some(yc + off), Some(yc - off)]
        };
        for y in rows.into_iter().flatten() {
            if y < 0 || y >= h as i64 {
                continue;
            }
            let dy = y as f32 + 0.5 - cy;
            if dy.abs() >= r {
                continue;
            }
            let e = (r * r - dy * dy).sqrt();
            let y = y as u32;
            let Some(x_left) = locate_edge(field, y, cx - e, Side::Left, r, cfg, &mut samples)
            else {
                continue;
            };
            let Some(x_right) = locate_edge(field, y, cx + e, Side::Right, r, cfg, &mut samples)
            else {
                continue;
            };
            if x_right > x_left {
                points.push(BoundaryPoint {
                    y,
                    x_left,
                    x_right,
                });
            }
        }
    }
    points
}

/// Search one side of one scanline, shrinking the window after rejections.
fn locate_edge<F: BrightnessField + ?Sized>(
    field: &F,
    y: u32,
    expected_x: f32,
    side: Side,
    radius: f32,
    cfg: &IrisBoundaryConfig,
    samples: &mut Vec<f32>,
) -> Option<f32> {
    let w = field.dimensions()[0] as i64;
    let min_range = cfg.min_range * radius;
    let mut range = cfg.uncertainty_factor * radius;

    while range >= min_range && range > 0.0 {
        let x0 = ((expected_x - range).floor() as i64).max(0);
        let x1 = ((expected_x + range).ceil() as i64).min(w);
        if x1 - x0 >= 2 {
            samples.clear();
            match side {
                Side::Left => samples.extend((x0..x1).map(|x| field.brightness_at(x as u32, y))),
                Side::Right => {
                    samples.extend((x0..x1).rev().map(|x| field.brightness_at(x as u32, y)))
                }
            }
            if let Some(o) = walk_window(samples, cfg.wrong_brightness_quota * range) {
                return Some(match side {
                    Side::Left => (x0 + o as i64) as f32,
                    Side::Right => (x1 - o as i64) as f32,
                });
            }
        }
        range *= cfg.retry_factor;
    }
    None
}

/// Two-pointer transition search over samples ordered outer to inner.
///
/// Returns the index of the first inner sample, or `None` when either walk
/// counted more than `max_wrong` wrong-side pixels or no transition lies
/// strictly inside the window.
fn walk_window(samples: &[f32], max_wrong: f32) -> Option<usize> {
    let n = samples.len();
    if n < 2 {
        return None;
    }
    let avg = samples.iter().sum::<f32>() / n as f32;

    let (mut lo, mut hi) = (0usize, n);
    let (mut wrong_outer, mut wrong_inner) = (0usize, 0usize);
    while lo < hi {
        if samples[lo] >= avg {
            lo += 1;
        } else if samples[hi - 1] < avg {
            hi -= 1;
        } else if wrong_outer <= wrong_inner {
            wrong_outer += 1;
            lo += 1;
        } else {
            wrong_inner += 1;
            hi -= 1;
        }
    }

    if wrong_outer as f32 > max_wrong || wrong_inner as f32 > max_wrong {
        return None;
    }
    if lo == 0 || lo == n {
        return None;
    }
    Some(lo)
}

/// Aggregate accepted points into a circle.
///
/// `None` when fewer than `min_boundary_points` were accepted.
pub(crate) fn fit_boundary_circle(
    points: &[BoundaryPoint],
    cfg: &IrisBoundaryConfig,
) -> Option<Circle> {
    if points.is_empty() || points.len() < cfg.min_boundary_points {
        return None;
    }

    let mut mids: Vec<f32> = points.iter().map(BoundaryPoint::mid).collect();
    mids.sort_unstable_by(f32::total_cmp);
    let m = mids.len();
    let xc = if m % 2 == 1 {
        mids[m / 2]
    } else {
        0.5 * (mids[m / 2 - 1] + mids[m / 2])
    };

    let mut spans: Vec<f32> = points.iter().map(BoundaryPoint::span).collect();
    spans.sort_unstable_by(|a, b| b.total_cmp(a));
    let k = ((cfg.points_considered_for_y_center * m as f32).ceil() as usize).clamp(1, m);
    let cutoff = spans[k - 1];
    let (sum_y, count_y) = points
        .iter()
        .filter(|p| p.span() >= cutoff)
        .fold((0.0f64, 0usize), |(s, c), p| (s + p.row_center() as f64, c + 1));
    let yc = (sum_y / count_y as f64) as f32;

    let center = Point2D::new(xc, yc);
    let total: f64 = points
        .iter()
        .map(|p| {
            let row = p.row_center();
            let left = center.distance(&Point2D::new(p.x_left, row));
            let right = center.distance(&Point2D::new(p.x_right, row));
            left as f64 + right as f64
        })
        .sum();
    let radius = (total / (2 * m) as f64) as f32;

    Some(Circle::new(center, radius))
}
