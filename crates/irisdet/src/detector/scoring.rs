//! Candidate scoring from radial brightness leaps.
//!
//! For one candidate center the scorer builds [`RadialStatistics`], caches
//! the quantile levels it needs, and evaluates:
//!
//! - a **pupil leap** per radius: a dark-inside / bright-outside ratio jump,
//!   weighted toward large uniformly dark discs;
//! - an **iris leap** per radius: the averaged outward brightness increase of
//!   two upper quantiles.
//!
//! Phase-specific entry points live on [`SearchPhase`]; both share the
//! per-radius leap helpers and the arena held by [`CandidateScorer`].

use crate::brightness::BrightnessField;
use crate::radial::profile::{QuantileLevels, QuantileProfile};
use crate::radial::RadialStatistics;

use super::config::DetectConfig;

/// Best pixel-space hypothesis for one candidate center.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CandidateScore {
    /// Center column in working-image pixels.
    pub x: u32,
    /// Center row in working-image pixels.
    pub y: u32,
    /// Pupil radius bucket (last uniformly dark bucket).
    pub pupil_radius: usize,
    /// Iris radius bucket; only scored in the initial phase.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iris_radius: Option<usize>,
    /// Combined (initial) or pupil-only (refinement) leap value.
    pub leap: f32,
}

/// Inclusive radius range in working-image pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RadiusWindow {
    pub(crate) min: usize,
    pub(crate) max: usize,
}

/// Scoring phase with its phase-specific bounds.
#[derive(Debug, Clone, Copy)]
pub(crate) enum SearchPhase {
    /// Full-area scan: joint pupil/iris pairs over radii `1..=max_radius`.
    Initial { max_radius: usize },
    /// Local refinement: pupil-only leaps over a window around the previous
    /// estimate.
    PupilRefinement { window: RadiusWindow },
}

/// Smallest bucket population trusted by the refinement inner band.
///
/// Around an integer center, buckets `0..=3` hold 1, 8, 12 and 16 pixels;
/// their upper quantiles follow single noisy pixels.
const MIN_REFINEMENT_BUCKET_SAMPLES: usize = 20;

/// Inner band used by the pupil leap.
#[derive(Debug, Clone, Copy)]
enum InnerBand {
    /// `[i-j-L, i-j]`: stops short of the transition zone.
    BeforeTransition,
    /// `[i-j-L, i]`: runs up to the candidate radius itself.
    ThroughRadius,
}

impl InnerBand {
    fn min_samples(self) -> usize {
        match self {
            InnerBand::BeforeTransition => 1,
            InnerBand::ThroughRadius => MIN_REFINEMENT_BUCKET_SAMPLES,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct LeapParams {
    leap_width: usize,
    min_leap_diff: f32,
    offset: f32,
    min_gap_px: f32,
}

/// Reusable scoring state for one working resolution.
pub(crate) struct CandidateScorer {
    params: LeapParams,
    levels: QuantileLevels,
    stats: RadialStatistics,
    profile: QuantileProfile,
    pupil: Vec<f32>,
    iris: Vec<f32>,
    // Best iris leap at radius >= q, paired with its smallest radius.
    iris_suffix: Vec<(f32, usize)>,
}

impl CandidateScorer {
    /// Scorer for a working image whose long side is `resolution` pixels.
    pub(crate) fn new(config: &DetectConfig, resolution: u32) -> Self {
        Self {
            params: LeapParams {
                leap_width: config.leap_width_px(resolution),
                min_leap_diff: config.min_leap_diff,
                offset: config.assumed_pupil_brightness,
                min_gap_px: config.min_gap_px(resolution),
            },
            levels: config.quantile_levels(),
            stats: RadialStatistics::new(),
            profile: QuantileProfile::new(),
            pupil: Vec::new(),
            iris: Vec::new(),
            iris_suffix: Vec::new(),
        }
    }

    /// Leap width `L` in pixels at this resolution.
    #[inline]
    pub(crate) fn leap_width(&self) -> usize {
        self.params.leap_width
    }

    /// Score one candidate center; `None` when no radius shows a leap.
    pub(crate) fn score<F: BrightnessField + ?Sized>(
        &mut self,
        field: &F,
        center: [u32; 2],
        phase: &SearchPhase,
    ) -> Option<CandidateScore> {
        match *phase {
            SearchPhase::Initial { max_radius } => self.score_initial(field, center, max_radius),
            SearchPhase::PupilRefinement { window } => self.score_pupil(field, center, window),
        }
    }

    fn score_initial<F: BrightnessField + ?Sized>(
        &mut self,
        field: &F,
        center: [u32; 2],
        max_radius: usize,
    ) -> Option<CandidateScore> {
        if max_radius < 2 {
            return None;
        }
        self.stats.collect(field, center, max_radius);
        self.profile.fill(&self.stats, &self.levels);

        let n = self.profile.len();
        self.pupil.clear();
        self.pupil.resize(n, 0.0);
        self.iris.clear();
        self.iris.resize(n, 0.0);
        for i in 1..n {
            self.pupil[i] = pupil_leap(&self.profile, i, &self.params, InnerBand::BeforeTransition);
            self.iris[i] = iris_leap(&self.profile, i, self.params.leap_width);
        }

        self.iris_suffix.clear();
        self.iris_suffix.resize(n + 1, (0.0, usize::MAX));
        for q in (1..n).rev() {
            let next = self.iris_suffix[q + 1];
            self.iris_suffix[q] = if next.1 == usize::MAX || self.iris[q] >= next.0 {
                (self.iris[q], q)
            } else {
                next
            };
        }

        let mut best: Option<CandidateScore> = None;
        for p in 1..n {
            let pupil = self.pupil[p];
            if pupil <= 0.0 {
                continue;
            }
            let q_min = (p as f32 + 0.5 + self.params.min_gap_px).ceil() as usize;
            if q_min >= n {
                break;
            }
            let (iris, q) = self.iris_suffix[q_min];
            let leap = pupil * (1.0 + iris);
            if best.map_or(true, |b| leap > b.leap) {
                best = Some(CandidateScore {
                    x: center[0],
                    y: center[1],
                    pupil_radius: p,
                    iris_radius: Some(q),
                    leap,
                });
            }
        }
        best
    }

    fn score_pupil<F: BrightnessField + ?Sized>(
        &mut self,
        field: &F,
        center: [u32; 2],
        window: RadiusWindow,
    ) -> Option<CandidateScore> {
        let min = window.min.max(1);
        if min > window.max {
            return None;
        }
        let l = self.params.leap_width;
        self.stats.collect(field, center, window.max + 2 * l);
        self.profile.fill(&self.stats, &self.levels);

        let mut best: Option<CandidateScore> = None;
        for i in min..=window.max {
            let leap = pupil_leap(&self.profile, i, &self.params, InnerBand::ThroughRadius);
            if leap > 0.0 && best.map_or(true, |b| leap > b.leap) {
                best = Some(CandidateScore {
                    x: center[0],
                    y: center[1],
                    pupil_radius: i,
                    iris_radius: None,
                    leap,
                });
            }
        }
        best
    }
}

/// Pupil leap at radius `i`.
///
/// Best `diff / j^0.8` over leap offsets `j`, scaled by
/// `sqrt(i) / innerDarkness(i)`.
fn pupil_leap(profile: &QuantileProfile, i: usize, params: &LeapParams, band: InnerBand) -> f32 {
    let l = params.leap_width;
    let a = params.offset;
    let max_j = l.min(i);

    let mut best = 0.0f32;
    for j in 1..=max_j {
        let Some(outer) = profile.max_dark_outside(i + j, i + j + l - 1) else {
            continue;
        };
        let inner_to = match band {
            InnerBand::BeforeTransition => i - j,
            InnerBand::ThroughRadius => i,
        };
        let from = (i - j).saturating_sub(l);
        let Some(inner) = profile.min_dark_inside(from, inner_to, band.min_samples()) else {
            continue;
        };
        let diff = (a + outer) / (a + inner) - 1.0;
        if diff > params.min_leap_diff {
            best = best.max(diff / (j as f32).powf(0.8));
        }
    }
    if best <= 0.0 {
        return 0.0;
    }
    match profile.inner_darkness(i) {
        Some(dark) => best * (i as f32).sqrt() / (a + dark),
        None => 0.0,
    }
}

/// Iris leap at radius `i`: running maximum of the averaged outward
/// brightness increase. Never negative.
fn iris_leap(profile: &QuantileProfile, i: usize, leap_width: usize) -> f32 {
    let max_j = leap_width.min(i);
    let mut sum = 0.0f32;
    let mut best = 0.0f32;
    for j in 1..=max_j {
        let (Some((out1, out2)), Some((in1, in2))) =
            (profile.white_levels(i + j), profile.white_levels(i - j))
        else {
            break;
        };
        sum += (out1 - in1 + out2 - in2) / (2.0 * (j as f32).sqrt());
        best = best.max(sum / j as f32);
    }
    best
}

#[cfg(test)]
mod tests {
    use image::{GrayImage, Luma};

    use super::*;
    use crate::brightness::BrightnessMap;
    use crate::test_utils::draw_gray_eye;

    const BG: u8 = 230;
    const IRIS: u8 = 128;
    const PUPIL: u8 = 20;

    fn scorer(size: u32) -> CandidateScorer {
        CandidateScorer::new(&DetectConfig::default(), size)
    }

    #[test]
    fn pupil_refinement_picks_last_dark_bucket() {
        let img = draw_gray_eye(61, 61, [30.5, 30.5], 10.0, 0.0, PUPIL, IRIS, BG);
        let map = BrightnessMap::from_source(&img);
        let mut s = scorer(100);
        let phase = SearchPhase::PupilRefinement {
            window: RadiusWindow { min: 2, max: 20 },
        };
        let best = s.score(&map, [30, 30], &phase).expect("pupil found");
        assert_eq!(best.pupil_radius, 9);
        assert_eq!(best.iris_radius, None);
        assert_eq!([best.x, best.y], [30, 30]);
    }

    #[test]
    fn initial_phase_pairs_pupil_with_iris_edge() {
        let img = draw_gray_eye(61, 61, [30.5, 30.5], 6.0, 20.0, PUPIL, IRIS, BG);
        let map = BrightnessMap::from_source(&img);
        let mut s = scorer(61);
        let best = s
            .score(&map, [30, 30], &SearchPhase::Initial { max_radius: 29 })
            .expect("candidate scored");
        assert_eq!(best.pupil_radius, 5);
        assert_eq!(best.iris_radius, Some(20));
        assert!(best.leap > 0.0);
    }

    #[test]
    fn off_center_candidate_scores_lower() {
        let img = draw_gray_eye(61, 61, [30.5, 30.5], 6.0, 20.0, PUPIL, IRIS, BG);
        let map = BrightnessMap::from_source(&img);
        let mut s = scorer(61);
        let phase = SearchPhase::Initial { max_radius: 29 };
        let centered = s.score(&map, [30, 30], &phase).unwrap();
        let shifted = s.score(&map, [33, 30], &phase).unwrap();
        assert!(centered.leap > shifted.leap);
    }

    #[test]
    fn blank_image_has_no_leap() {
        let img = GrayImage::from_pixel(41, 41, Luma([140]));
        let map = BrightnessMap::from_source(&img);
        let mut s = scorer(41);
        assert!(s
            .score(&map, [20, 20], &SearchPhase::Initial { max_radius: 20 })
            .is_none());
        let phase = SearchPhase::PupilRefinement {
            window: RadiusWindow { min: 1, max: 10 },
        };
        assert!(s.score(&map, [20, 20], &phase).is_none());
    }

    #[test]
    fn empty_window_scores_nothing() {
        let img = draw_gray_eye(61, 61, [30.5, 30.5], 10.0, 0.0, PUPIL, IRIS, BG);
        let map = BrightnessMap::from_source(&img);
        let mut s = scorer(100);
        let phase = SearchPhase::PupilRefinement {
            window: RadiusWindow { min: 12, max: 11 },
        };
        assert!(s.score(&map, [30, 30], &phase).is_none());
    }

    #[test]
    fn iris_leap_peaks_on_the_boundary_bucket() {
        let img = draw_gray_eye(61, 61, [30.5, 30.5], 0.0, 20.0, PUPIL, IRIS, BG);
        let map = BrightnessMap::from_source(&img);
        let cfg = DetectConfig::default();
        let mut stats = RadialStatistics::new();
        stats.collect(&map, [30, 30], 29);
        let mut profile = QuantileProfile::new();
        profile.fill(&stats, &cfg.quantile_levels());

        let leaps: Vec<f32> = (1..26).map(|i| iris_leap(&profile, i, 3)).collect();
        let peak = leaps
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(i, _)| i + 1)
            .unwrap();
        assert_eq!(peak, 20);
        assert_eq!(iris_leap(&profile, 10, 3), 0.0);
    }
}
