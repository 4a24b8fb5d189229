//! Summary statistics over per-run DPS samples: mean, sample standard
//! deviation, interpolated quantiles, and an equal-width histogram.

use serde::{Deserialize, Serialize};

/// Histogram bin-count bounds; requested counts are clamped into this range.
pub const MIN_BINS: usize = 5;
pub const MAX_BINS: usize = 60;

const RANGE_EPS: f64 = 1e-9;

pub fn mean(samples: &[f64]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    samples.iter().sum::<f64>() / samples.len() as f64
}

/// Sample standard deviation (N−1 denominator); 0 for fewer than two samples.
pub fn sample_std(samples: &[f64]) -> f64 {
    if samples.len() < 2 {
        return 0.0;
    }
    let m = mean(samples);
    let var = samples.iter().map(|x| (x - m) * (x - m)).sum::<f64>()
        / (samples.len() - 1) as f64;
    var.sqrt()
}

/// Quantile by linear interpolation between order statistics. `sorted` must
/// be ascending; `q` in [0, 1].
pub fn quantile(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let base = pos.floor() as usize;
    let rest = pos - base as f64;
    if base + 1 < sorted.len() {
        sorted[base] + rest * (sorted[base + 1] - sorted[base])
    } else {
        sorted[base]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    pub min: f64,
    pub max: f64,
    pub counts: Vec<usize>,
}

impl Histogram {
    pub fn bin_width(&self) -> f64 {
        (self.max - self.min) / self.counts.len() as f64
    }
}

/// Distribute samples into `bins` equal-width buckets between the observed
/// min and max. Returns `None` for fewer than two samples or a degenerate
/// range (all samples equal).
pub fn histogram(samples: &[f64], bins: usize) -> Option<Histogram> {
    if samples.len() < 2 {
        return None;
    }
    let min = samples.iter().copied().fold(f64::INFINITY, f64::min);
    let max = samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if max <= min + RANGE_EPS {
        return None;
    }
    let bins = bins.clamp(MIN_BINS, MAX_BINS);
    let mut counts = vec![0usize; bins];
    for &x in samples {
        let t = (x - min) / (max - min);
        let idx = ((t * bins as f64) as usize).min(bins - 1);
        counts[idx] += 1;
    }
    Some(Histogram { min, max, counts })
}
