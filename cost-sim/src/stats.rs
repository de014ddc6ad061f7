//! Statistics reduction over a sample of path totals.
//!
//! Standard deviation is the population form (divided by `N`) and percentiles
//! interpolate linearly between order statistics at rank `(N - 1) * q`.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::{ConfigError, SimulationError};
use crate::numbers::{floor_f64_to_usize, u64_to_f64, usize_to_f64};

/// Summary of a cost sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SummaryStatistics {
    pub mean: f64,
    pub median: f64,
    pub std: f64,
    pub min: f64,
    pub max: f64,
    pub p10: f64,
    pub p25: f64,
    pub p75: f64,
    pub p90: f64,
    pub per_capita_mean: f64,
}

impl SummaryStatistics {
    /// Metric names paired with their values, in report order.
    #[must_use]
    pub const fn metrics(&self) -> [(&'static str, f64); 10] {
        [
            ("mean", self.mean),
            ("median", self.median),
            ("std", self.std),
            ("min", self.min),
            ("max", self.max),
            ("p10", self.p10),
            ("p25", self.p25),
            ("p75", self.p75),
            ("p90", self.p90),
            ("per_capita_mean", self.per_capita_mean),
        ]
    }

    #[must_use]
    pub fn get(&self, metric: &str) -> Option<f64> {
        self.metrics()
            .into_iter()
            .find(|(name, _)| *name == metric)
            .map(|(_, value)| value)
    }

    #[must_use]
    pub fn to_map(&self) -> BTreeMap<&'static str, f64> {
        self.metrics().into_iter().collect()
    }
}

/// Reduce `sample` to summary statistics, with the mean also spread over
/// `population`.
///
/// # Errors
///
/// Returns `SimulationError::EmptySample` for an empty sample and
/// `ConfigError::ZeroPopulation` when `population` is zero.
pub fn summarize(sample: &[f64], population: u64) -> Result<SummaryStatistics, SimulationError> {
    if sample.is_empty() {
        return Err(SimulationError::EmptySample);
    }
    if population == 0 {
        return Err(ConfigError::ZeroPopulation.into());
    }

    let count = usize_to_f64(sample.len());
    let mean = sample.iter().sum::<f64>() / count;
    let variance = sample
        .iter()
        .map(|value| {
            let delta = value - mean;
            delta * delta
        })
        .sum::<f64>()
        / count;

    let sorted = sorted_copy(sample);
    let min = sorted[0];
    let max = sorted[sorted.len() - 1];

    Ok(SummaryStatistics {
        mean,
        median: percentile_sorted(&sorted, 50.0),
        std: variance.sqrt(),
        min,
        max,
        p10: percentile_sorted(&sorted, 10.0),
        p25: percentile_sorted(&sorted, 25.0),
        p75: percentile_sorted(&sorted, 75.0),
        p90: percentile_sorted(&sorted, 90.0),
        per_capita_mean: mean / u64_to_f64(population),
    })
}

/// Linear-interpolation percentile of an unsorted sample, `q` in `[0, 100]`.
///
/// # Errors
///
/// Returns `SimulationError::EmptySample` for an empty sample and a range
/// violation when `q` lies outside `[0, 100]`.
pub fn percentile_linear(sample: &[f64], q: f64) -> Result<f64, SimulationError> {
    if sample.is_empty() {
        return Err(SimulationError::EmptySample);
    }
    if !(0.0..=100.0).contains(&q) {
        return Err(ConfigError::RangeViolation {
            field: "percentile",
            min: 0.0,
            max: 100.0,
            value: q,
        }
        .into());
    }
    Ok(percentile_sorted(&sorted_copy(sample), q))
}

fn sorted_copy(sample: &[f64]) -> Vec<f64> {
    let mut sorted = sample.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted
}

/// Caller guarantees `sorted` is non-empty and ascending.
fn percentile_sorted(sorted: &[f64], q: f64) -> f64 {
    let last = sorted.len() - 1;
    let rank = usize_to_f64(last) * q / 100.0;
    let lower = floor_f64_to_usize(rank).min(last);
    let upper = (lower + 1).min(last);
    let fraction = rank - usize_to_f64(lower);
    let (below, above) = (sorted[lower], sorted[upper]);
    // Rounding must not push the result past its bracketing order statistics.
    (below + fraction * (above - below)).max(below).min(above)
}

/// Equal-width histogram bin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Equal-width histogram over the sample range.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Histogram {
    pub bins: Vec<HistogramBin>,
}

impl Histogram {
    #[must_use]
    pub fn total(&self) -> usize {
        self.bins.iter().map(|bin| bin.count).sum()
    }
}

/// Bucket `sample` into `bin_count` equal-width bins spanning its range.
///
/// The last bin is closed on the right so the maximum is counted. A sample
/// with a single distinct value is spread over `[value - 0.5, value + 0.5]`.
///
/// # Errors
///
/// Returns `SimulationError::EmptySample` for an empty sample and a
/// `ConfigError::MinViolation` when `bin_count` is zero.
pub fn histogram(sample: &[f64], bin_count: usize) -> Result<Histogram, SimulationError> {
    if sample.is_empty() {
        return Err(SimulationError::EmptySample);
    }
    if bin_count == 0 {
        return Err(ConfigError::MinViolation {
            field: "histogram.bins",
            min: 1.0,
            value: 0.0,
        }
        .into());
    }

    let (mut low, mut high) = sample
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), value| {
            (lo.min(*value), hi.max(*value))
        });
    if (high - low).abs() < f64::EPSILON {
        low -= 0.5;
        high += 0.5;
    }

    let bins_f = usize_to_f64(bin_count);
    let width = (high - low) / bins_f;
    let mut counts = vec![0usize; bin_count];
    for value in sample {
        let slot = floor_f64_to_usize((value - low) / width).min(bin_count - 1);
        counts[slot] += 1;
    }

    let bins = counts
        .into_iter()
        .enumerate()
        .map(|(index, count)| HistogramBin {
            lower: low + width * usize_to_f64(index),
            upper: low + width * usize_to_f64(index + 1),
            count,
        })
        .collect();
    Ok(Histogram { bins })
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn matches_linear_percentile_reference_values() {
        let sample = [4.0, 1.0, 3.0, 2.0, 5.0];
        let stats = summarize(&sample, 2).unwrap();
        assert!((stats.mean - 3.0).abs() < EPS);
        assert!((stats.median - 3.0).abs() < EPS);
        assert!((stats.p10 - 1.4).abs() < EPS);
        assert!((stats.p25 - 2.0).abs() < EPS);
        assert!((stats.p75 - 4.0).abs() < EPS);
        assert!((stats.p90 - 4.6).abs() < EPS);
        assert!((stats.min - 1.0).abs() < EPS);
        assert!((stats.max - 5.0).abs() < EPS);
        assert!((stats.per_capita_mean - 1.5).abs() < EPS);
    }

    #[test]
    fn std_divides_by_sample_size() {
        let stats = summarize(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0], 1).unwrap();
        assert!((stats.std - 2.0).abs() < EPS);
    }

    #[test]
    fn even_sample_median_interpolates() {
        let stats = summarize(&[10.0, 20.0, 30.0, 40.0], 1).unwrap();
        assert!((stats.median - 25.0).abs() < EPS);
    }

    #[test]
    fn single_value_sample_collapses_every_metric() {
        let stats = summarize(&[7.5], 3).unwrap();
        for (name, value) in stats.metrics() {
            if name == "std" {
                assert!(value.abs() < EPS);
            } else if name == "per_capita_mean" {
                assert!((value - 2.5).abs() < EPS);
            } else {
                assert!((value - 7.5).abs() < EPS, "{name} drifted to {value}");
            }
        }
    }

    #[test]
    fn rejects_empty_sample_and_zero_population() {
        assert_eq!(summarize(&[], 10), Err(SimulationError::EmptySample));
        assert_eq!(
            summarize(&[1.0], 0),
            Err(SimulationError::Config(ConfigError::ZeroPopulation))
        );
    }

    #[test]
    fn summary_is_bit_reproducible() {
        let sample: Vec<f64> = (0..1_000).map(|i| f64::from(i).sin().abs() * 1e9).collect();
        let first = summarize(&sample, 8_500_000).unwrap();
        let second = summarize(&sample, 8_500_000).unwrap();
        for ((_, a), (_, b)) in first.metrics().into_iter().zip(second.metrics()) {
            assert_eq!(a.to_bits(), b.to_bits());
        }
    }

    #[test]
    fn metric_lookup_and_map_agree() {
        let stats = summarize(&[1.0, 2.0, 3.0], 1).unwrap();
        let map = stats.to_map();
        assert_eq!(map.len(), 10);
        assert_eq!(stats.get("p90"), map.get("p90").copied());
        assert_eq!(stats.get("unknown"), None);
    }

    #[test]
    fn percentile_linear_validates_inputs() {
        assert_eq!(
            percentile_linear(&[], 50.0),
            Err(SimulationError::EmptySample)
        );
        assert!(percentile_linear(&[1.0], 101.0).is_err());
        let p = percentile_linear(&[0.0, 10.0], 30.0).unwrap();
        assert!((p - 3.0).abs() < EPS);
    }

    #[test]
    fn histogram_counts_every_value_including_max() {
        let sample = [0.0, 1.0, 2.0, 3.0, 4.0, 10.0];
        let hist = histogram(&sample, 5).unwrap();
        assert_eq!(hist.bins.len(), 5);
        assert_eq!(hist.total(), sample.len());
        assert_eq!(hist.bins[4].count, 1);
        assert!((hist.bins[0].lower - 0.0).abs() < EPS);
        assert!((hist.bins[4].upper - 10.0).abs() < EPS);
    }

    #[test]
    fn histogram_of_constant_sample_uses_unit_range() {
        let hist = histogram(&[3.0, 3.0, 3.0], 2).unwrap();
        assert!((hist.bins[0].lower - 2.5).abs() < EPS);
        assert!((hist.bins[1].upper - 3.5).abs() < EPS);
        assert_eq!(hist.total(), 3);
        assert_eq!(hist.bins[1].count, 3);
        assert!(histogram(&[1.0], 0).is_err());
    }
}
