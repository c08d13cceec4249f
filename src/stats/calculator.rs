//! Statistics Calculator Module
//! Aggregations the charts draw: means with confidence intervals, quartiles,
//! correlation, kernel density estimates and histogram binning.

use statrs::distribution::{Continuous, ContinuousCDF, Normal, StudentsT};
use statrs::statistics::Statistics;

/// Confidence level of the error bars on bar charts.
pub const CONFIDENCE_LEVEL: f64 = 0.95;

/// Upper bound on automatic histogram bins.
pub const MAX_BINS: usize = 5000;

/// Mean of a sample with its confidence interval.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeanEstimate {
    pub count: usize,
    pub mean: f64,
    pub ci_low: f64,
    pub ci_high: f64,
}

/// Gaussian kernel density estimate with Scott's bandwidth.
#[derive(Debug, Clone)]
pub struct Kde {
    values: Vec<f64>,
    bandwidth: f64,
    kernel: Normal,
}

impl Kde {
    /// `None` for fewer than two values or zero spread.
    pub fn new(values: &[f64]) -> Option<Self> {
        let bandwidth = StatsCalculator::scott_bandwidth(values)?;
        let kernel = Normal::new(0.0, 1.0).ok()?;
        Some(Self {
            values: values.to_vec(),
            bandwidth,
            kernel,
        })
    }

    pub fn density(&self, x: f64) -> f64 {
        let n = self.values.len() as f64;
        let sum: f64 = self
            .values
            .iter()
            .map(|v| self.kernel.pdf((x - v) / self.bandwidth))
            .sum();
        sum / (n * self.bandwidth)
    }

    /// Evaluate on `gridsize` points spanning the data extended by
    /// `cut` bandwidths on each side.
    pub fn curve(&self, cut: f64, gridsize: usize) -> Vec<[f64; 2]> {
        let lo = self.values.iter().copied().fold(f64::INFINITY, f64::min) - cut * self.bandwidth;
        let hi =
            self.values.iter().copied().fold(f64::NEG_INFINITY, f64::max) + cut * self.bandwidth;
        let steps = gridsize.max(2) - 1;
        let step = (hi - lo) / steps as f64;

        (0..=steps)
            .map(|i| {
                let x = lo + i as f64 * step;
                [x, self.density(x)]
            })
            .collect()
    }
}

/// Stateless statistical helpers.
pub struct StatsCalculator;

impl StatsCalculator {
    /// Mean with a Student t confidence interval at [`CONFIDENCE_LEVEL`].
    pub fn mean_with_ci(values: &[f64]) -> Option<MeanEstimate> {
        let n = values.len();
        if n == 0 {
            return None;
        }

        let mean = values.mean();
        if n == 1 {
            return Some(MeanEstimate {
                count: 1,
                mean,
                ci_low: mean,
                ci_high: mean,
            });
        }

        let sem = values.std_dev() / (n as f64).sqrt();
        let t = StudentsT::new(0.0, 1.0, (n - 1) as f64)
            .map(|dist| dist.inverse_cdf(0.5 + CONFIDENCE_LEVEL / 2.0))
            .unwrap_or(1.96);

        Some(MeanEstimate {
            count: n,
            mean,
            ci_low: mean - t * sem,
            ci_high: mean + t * sem,
        })
    }

    /// Calculate percentile using linear interpolation (NumPy compatible).
    pub fn percentile(sorted_values: &[f64], p: f64) -> f64 {
        let n = sorted_values.len();
        if n == 0 {
            return f64::NAN;
        }
        if n == 1 {
            return sorted_values[0];
        }

        let rank = (p / 100.0) * (n - 1) as f64;
        let lower = rank.floor() as usize;
        let upper = (rank.ceil() as usize).min(n - 1);
        let frac = rank - lower as f64;

        if lower == upper {
            sorted_values[lower]
        } else {
            sorted_values[lower] * (1.0 - frac) + sorted_values[upper] * frac
        }
    }

    /// First quartile, median and third quartile.
    pub fn quartiles(values: &[f64]) -> Option<[f64; 3]> {
        if values.is_empty() {
            return None;
        }
        let sorted = Self::sorted(values);
        Some([
            Self::percentile(&sorted, 25.0),
            Self::percentile(&sorted, 50.0),
            Self::percentile(&sorted, 75.0),
        ])
    }

    /// Pearson correlation over the rows where both sides are present.
    /// NaN when fewer than two pairs remain or either side is constant.
    pub fn pearson(x: &[Option<f64>], y: &[Option<f64>]) -> f64 {
        let (xs, ys): (Vec<f64>, Vec<f64>) = x
            .iter()
            .zip(y.iter())
            .filter_map(|(a, b)| Some(((*a)?, (*b)?)))
            .unzip();

        if xs.len() < 2 {
            return f64::NAN;
        }

        let sx = xs.iter().std_dev();
        let sy = ys.iter().std_dev();
        if sx == 0.0 || sy == 0.0 {
            return f64::NAN;
        }

        xs.iter().covariance(ys.iter()) / (sx * sy)
    }

    /// Square correlation matrix over the given columns.
    pub fn correlation_matrix(columns: &[Vec<Option<f64>>]) -> Vec<Vec<f64>> {
        let k = columns.len();
        let mut matrix = vec![vec![f64::NAN; k]; k];

        for i in 0..k {
            for j in i..k {
                let r = Self::pearson(&columns[i], &columns[j]);
                // Self-correlation is exactly one unless undefined.
                let r = if i == j && !r.is_nan() { 1.0 } else { r };
                matrix[i][j] = r;
                matrix[j][i] = r;
            }
        }

        matrix
    }

    /// Scott's rule: sample standard deviation times n^(-1/5).
    pub fn scott_bandwidth(values: &[f64]) -> Option<f64> {
        if values.len() < 2 {
            return None;
        }
        let std = values.std_dev();
        if !std.is_finite() || std <= 0.0 {
            return None;
        }
        Some(std * (values.len() as f64).powf(-0.2))
    }

    /// Histogram bin edges using the larger bin count of the Sturges and
    /// Freedman-Diaconis rules.
    pub fn auto_bin_edges(values: &[f64]) -> Vec<f64> {
        if values.is_empty() {
            return Vec::new();
        }

        let sorted = Self::sorted(values);
        let min = sorted[0];
        let max = sorted[sorted.len() - 1];
        if min == max {
            return vec![min - 0.5, max + 0.5];
        }

        let n = sorted.len() as f64;
        let range = max - min;
        let sturges = range / (n.log2() + 1.0);
        let iqr = Self::percentile(&sorted, 75.0) - Self::percentile(&sorted, 25.0);
        let fd = 2.0 * iqr * n.powf(-1.0 / 3.0);
        let width = if fd > 0.0 { fd.min(sturges) } else { sturges };

        let bins = ((range / width).ceil() as usize).clamp(1, MAX_BINS);
        let step = range / bins as f64;
        (0..=bins).map(|i| min + i as f64 * step).collect()
    }

    /// Count values per bin. The last bin is closed on the right.
    pub fn histogram_counts(values: &[f64], edges: &[f64]) -> Vec<usize> {
        if edges.len() < 2 {
            return Vec::new();
        }

        let bins = edges.len() - 1;
        let lo = edges[0];
        let hi = edges[bins];
        let mut counts = vec![0usize; bins];

        for &v in values {
            if v < lo || v > hi || v.is_nan() {
                continue;
            }
            let idx = edges[1..].partition_point(|&edge| edge <= v).min(bins - 1);
            counts[idx] += 1;
        }

        counts
    }

    fn sorted(values: &[f64]) -> Vec<f64> {
        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        sorted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() <= tol
    }

    #[test]
    fn test_mean_with_ci() {
        let est = StatsCalculator::mean_with_ci(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        assert_eq!(est.count, 5);
        assert!(close(est.mean, 3.0, 1e-12));
        // t(0.975, 4) = 2.776, sem = sqrt(2.5)/sqrt(5)
        let half = 2.776445 * (2.5f64).sqrt() / (5.0f64).sqrt();
        assert!(close(est.ci_high - est.mean, half, 1e-4));
        assert!(close(est.mean - est.ci_low, half, 1e-4));
    }

    #[test]
    fn test_mean_with_ci_degenerate() {
        assert!(StatsCalculator::mean_with_ci(&[]).is_none());
        let single = StatsCalculator::mean_with_ci(&[42.0]).unwrap();
        assert_eq!((single.ci_low, single.mean, single.ci_high), (42.0, 42.0, 42.0));
    }

    #[test]
    fn test_quartiles() {
        let q = StatsCalculator::quartiles(&[4.0, 1.0, 3.0, 2.0, 5.0]).unwrap();
        assert_eq!(q, [2.0, 3.0, 4.0]);
        assert!(StatsCalculator::quartiles(&[]).is_none());
    }

    #[test]
    fn test_pearson() {
        let x = vec![Some(1.0), Some(2.0), Some(3.0), None, Some(4.0)];
        let y = vec![Some(2.0), Some(4.0), Some(6.0), Some(100.0), Some(8.0)];
        let z = vec![Some(8.0), Some(6.0), Some(4.0), Some(0.0), Some(2.0)];

        assert!(close(StatsCalculator::pearson(&x, &y), 1.0, 1e-12));
        assert!(close(StatsCalculator::pearson(&x, &z), -1.0, 1e-12));

        let constant = vec![Some(1.0); 5];
        assert!(StatsCalculator::pearson(&x, &constant).is_nan());
    }

    #[test]
    fn test_correlation_matrix_symmetric() {
        let columns = vec![
            vec![Some(1.0), Some(2.0), Some(3.0), Some(5.0)],
            vec![Some(3.0), Some(1.0), Some(4.0), Some(1.0)],
            vec![Some(2.0), Some(4.0), Some(6.0), Some(10.0)],
        ];
        let m = StatsCalculator::correlation_matrix(&columns);
        assert_eq!(m.len(), 3);
        for i in 0..3 {
            assert_eq!(m[i][i], 1.0);
            for j in 0..3 {
                assert_eq!(m[i][j], m[j][i]);
            }
        }
        assert!(close(m[0][2], 1.0, 1e-12));
    }

    #[test]
    fn test_kde_integrates_to_one() {
        let values = [1.0, 2.0, 2.5, 3.0, 4.0, 7.0, 7.5, 8.0];
        let kde = Kde::new(&values).unwrap();
        let curve = kde.curve(3.0, 400);

        let area: f64 = curve
            .windows(2)
            .map(|w| (w[1][0] - w[0][0]) * (w[0][1] + w[1][1]) / 2.0)
            .sum();
        assert!(close(area, 1.0, 0.01), "area was {area}");
        assert!(curve.iter().all(|p| p[1] >= 0.0));
    }

    #[test]
    fn test_kde_requires_spread() {
        assert!(Kde::new(&[3.0]).is_none());
        assert!(Kde::new(&[3.0, 3.0, 3.0]).is_none());
    }

    #[test]
    fn test_scott_bandwidth() {
        let values: Vec<f64> = (0..32).map(|i| i as f64).collect();
        let bw = StatsCalculator::scott_bandwidth(&values).unwrap();
        let std = values.iter().std_dev();
        assert!(close(bw, std * 32f64.powf(-0.2), 1e-12));
    }

    #[test]
    fn test_histogram_counts_cover_all_values() {
        let values: Vec<f64> = (0..100).map(|i| (i * 7 % 53) as f64).collect();
        let edges = StatsCalculator::auto_bin_edges(&values);
        assert!(edges.len() >= 2);
        assert_eq!(edges[0], 0.0);
        assert!(close(*edges.last().unwrap(), 52.0, 1e-9));

        let counts = StatsCalculator::histogram_counts(&values, &edges);
        assert_eq!(counts.len(), edges.len() - 1);
        assert_eq!(counts.iter().sum::<usize>(), values.len());
    }

    #[test]
    fn test_histogram_constant_values() {
        let edges = StatsCalculator::auto_bin_edges(&[5.0, 5.0, 5.0]);
        assert_eq!(edges, vec![4.5, 5.5]);
        assert_eq!(StatsCalculator::histogram_counts(&[5.0, 5.0, 5.0], &edges), vec![3]);
    }

    #[test]
    fn test_histogram_right_edge_inclusive() {
        let counts = StatsCalculator::histogram_counts(&[0.0, 0.5, 1.0, 2.0], &[0.0, 1.0, 2.0]);
        assert_eq!(counts, vec![2, 2]);
    }
}
