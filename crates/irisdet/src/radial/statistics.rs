//! Per-center brightness buckets keyed by integer radius.

use crate::brightness::BrightnessField;

/// Brightness samples around one candidate center, bucketed by rounded
/// Euclidean distance.
///
/// Buckets are reused across candidates: `collect` clears and refills them
/// without releasing capacity, so evaluating a candidate grid allocates only
/// while the buckets grow to their working size.
#[derive(Debug, Clone, Default)]
pub struct RadialStatistics {
    buckets: Vec<Vec<f32>>,
    max_radius: usize,
    sorted: bool,
}

impl RadialStatistics {
    /// Empty statistics; every quantile query returns `None`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Refill buckets `0..=max_radius` around pixel `center`.
    ///
    /// A pixel lands in bucket `round(dist)` when that value is at most
    /// `max_radius`; pixels outside the field are skipped. Buckets are sorted
    /// before returning.
    pub fn collect<F: BrightnessField + ?Sized>(
        &mut self,
        field: &F,
        center: [u32; 2],
        max_radius: usize,
    ) {
        let [w, h] = field.dimensions();
        if self.buckets.len() <= max_radius {
            self.buckets.resize_with(max_radius + 1, Vec::new);
        }
        for bucket in &mut self.buckets[..=max_radius] {
            bucket.clear();
        }
        self.max_radius = max_radius;
        self.sorted = false;

        if w == 0 || h == 0 {
            self.sorted = true;
            return;
        }

        let r = max_radius as i64;
        let cx = center[0] as i64;
        let cy = center[1] as i64;
        let x0 = (cx - r).max(0);
        let x1 = (cx + r).min(w as i64 - 1);
        let y0 = (cy - r).max(0);
        let y1 = (cy + r).min(h as i64 - 1);

        for y in y0..=y1 {
            let dy = y - cy;
            for x in x0..=x1 {
                let dx = x - cx;
                let d = ((dx * dx + dy * dy) as f32).sqrt().round() as usize;
                if d <= max_radius {
                    self.buckets[d].push(field.brightness_at(x as u32, y as u32));
                }
            }
        }

        for bucket in &mut self.buckets[..=max_radius] {
            bucket.sort_unstable_by(f32::total_cmp);
        }
        self.sorted = true;
    }

    /// Largest radius filled by the last `collect`.
    #[inline]
    pub fn max_radius(&self) -> usize {
        self.max_radius
    }

    /// Number of samples in bucket `radius`.
    #[inline]
    pub fn bucket_len(&self, radius: usize) -> usize {
        if radius > self.max_radius {
            return 0;
        }
        self.buckets.get(radius).map_or(0, Vec::len)
    }

    /// Brightness at rank `floor(n * p)` of bucket `radius`.
    ///
    /// Returns `None` for empty or out-of-range buckets.
    #[inline]
    pub fn quantile(&self, radius: usize, p: f32) -> Option<f32> {
        if radius > self.max_radius {
            return None;
        }
        let bucket = self.buckets.get(radius)?;
        debug_assert!(self.sorted, "quantile queried before buckets were sorted");
        if bucket.is_empty() {
            return None;
        }
        let idx = ((bucket.len() as f32 * p).floor() as usize).min(bucket.len() - 1);
        Some(bucket[idx])
    }
}
