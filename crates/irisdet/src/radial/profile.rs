//! Cached per-radius quantiles and band helpers used by the scorer.

use super::statistics::RadialStatistics;

/// Quantile levels queried once per bucket.
#[derive(Debug, Clone, Copy)]
pub(crate) struct QuantileLevels {
    /// Level for "inside is dark" tests (`min_black_quota`).
    pub(crate) dark_inside: f32,
    /// Level for "outside is bright" tests (`max_black_quota`).
    pub(crate) dark_outside: f32,
    /// First iris edge level (`1 - min_white_quota`).
    pub(crate) white: f32,
    /// Second iris edge level (`1 - min_white_quota2`).
    pub(crate) white2: f32,
}

/// Quantile profile of one candidate center.
///
/// Each `RadialStatistics` bucket is queried exactly once per level; the
/// scorer then works on these flat arrays. Empty buckets are `None` and are
/// skipped by the band helpers. Storage is reused across candidates.
#[derive(Debug, Clone, Default)]
pub(crate) struct QuantileProfile {
    dark_inside: Vec<Option<f32>>,
    dark_outside: Vec<Option<f32>>,
    white: Vec<Option<f32>>,
    white2: Vec<Option<f32>>,
    samples: Vec<usize>,
    // Prefix sums of r * dark_inside(r) and r over non-empty buckets.
    darkness_num: Vec<f64>,
    darkness_den: Vec<f64>,
}

impl QuantileProfile {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Rebuild the profile from freshly collected statistics.
    pub(crate) fn fill(&mut self, stats: &RadialStatistics, levels: &QuantileLevels) {
        let n = stats.max_radius() + 1;
        self.dark_inside.clear();
        self.dark_outside.clear();
        self.white.clear();
        self.white2.clear();
        self.samples.clear();
        self.darkness_num.clear();
        self.darkness_den.clear();

        let mut num = 0.0f64;
        let mut den = 0.0f64;
        for r in 0..n {
            let inside = stats.quantile(r, levels.dark_inside);
            self.dark_inside.push(inside);
            self.dark_outside.push(stats.quantile(r, levels.dark_outside));
            self.white.push(stats.quantile(r, levels.white));
            self.white2.push(stats.quantile(r, levels.white2));
            self.samples.push(stats.bucket_len(r));
            if let Some(v) = inside {
                num += r as f64 * v as f64;
                den += r as f64;
            }
            self.darkness_num.push(num);
            self.darkness_den.push(den);
        }
    }

    /// Number of radii covered (`max_radius + 1`).
    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.dark_inside.len()
    }

    /// Largest "outside is bright" quantile over radii `[from, to]`.
    pub(crate) fn max_dark_outside(&self, from: usize, to: usize) -> Option<f32> {
        band(&self.dark_outside, from, to).fold(None, |acc, v| match acc {
            Some(a) if a >= v => Some(a),
            _ => Some(v),
        })
    }

    /// Smallest "inside is dark" quantile over radii `[from, to]`, skipping
    /// buckets with fewer than `min_samples` pixels.
    pub(crate) fn min_dark_inside(&self, from: usize, to: usize, min_samples: usize) -> Option<f32> {
        let end = to.min(self.len().saturating_sub(1));
        if from > end || from >= self.len() {
            return None;
        }
        self.dark_inside[from..=end]
            .iter()
            .zip(&self.samples[from..=end])
            .filter_map(|(v, &n)| v.filter(|_| n >= min_samples))
            .fold(None, |acc, v| match acc {
                Some(a) if a <= v => Some(a),
                _ => Some(v),
            })
    }

    /// Radius-weighted mean of the "inside is dark" quantile over `0..=i`.
    pub(crate) fn inner_darkness(&self, i: usize) -> Option<f32> {
        let den = *self.darkness_den.get(i)?;
        if den <= 0.0 {
            return None;
        }
        Some((self.darkness_num[i] / den) as f32)
    }

    /// Both iris edge levels at radius `r`.
    #[inline]
    pub(crate) fn white_levels(&self, r: usize) -> Option<(f32, f32)> {
        Some((*self.white.get(r)?.as_ref()?, *self.white2.get(r)?.as_ref()?))
    }
}

fn band(values: &[Option<f32>], from: usize, to: usize) -> impl Iterator<Item = f32> + '_ {
    let end = to.min(values.len().saturating_sub(1));
    let slice = if from <= end && from < values.len() {
        &values[from..=end]
    } else {
        &values[..0]
    };
    slice.iter().filter_map(|v| *v)
}
