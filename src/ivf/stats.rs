//! Cluster size statistics, for judging how balanced a build came out.

use serde::Serialize;

/// Percentiles reported by [`ClusterStats`].
pub const PERCENTILES: [u8; 10] = [1, 5, 10, 20, 25, 50, 75, 90, 95, 99];

/// Distribution of cluster sizes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusterStats {
    pub cluster_count: usize,
    /// Sum of all cluster sizes.
    pub point_count: usize,
    /// Clusters with no members.
    pub empty: usize,
    pub min: usize,
    pub max: usize,
    pub mean: f64,
    /// Population standard deviation.
    pub std_dev: f64,
    /// `(percentile, size)` pairs, linearly interpolated between ranks.
    pub percentiles: Vec<(u8, f64)>,
}

impl ClusterStats {
    pub fn from_sizes(sizes: &[usize]) -> Self {
        let cluster_count = sizes.len();
        if cluster_count == 0 {
            return Self {
                cluster_count,
                point_count: 0,
                empty: 0,
                min: 0,
                max: 0,
                mean: 0.0,
                std_dev: 0.0,
                percentiles: Vec::new(),
            };
        }

        let mut sorted = sizes.to_vec();
        sorted.sort_unstable();
        let point_count: usize = sorted.iter().sum();
        let mean = point_count as f64 / cluster_count as f64;
        let variance = sorted
            .iter()
            .map(|&s| (s as f64 - mean).powi(2))
            .sum::<f64>()
            / cluster_count as f64;

        Self {
            cluster_count,
            point_count,
            empty: sorted.iter().take_while(|&&s| s == 0).count(),
            min: sorted[0],
            max: sorted[cluster_count - 1],
            mean,
            std_dev: variance.sqrt(),
            percentiles: PERCENTILES
                .iter()
                .map(|&p| (p, interpolate(&sorted, p)))
                .collect(),
        }
    }

    /// Interpolated size at percentile `p`, if it is one of [`PERCENTILES`].
    pub fn percentile(&self, p: u8) -> Option<f64> {
        self.percentiles
            .iter()
            .find(|(q, _)| *q == p)
            .map(|&(_, v)| v)
    }
}

fn interpolate(sorted: &[usize], p: u8) -> f64 {
    let rank = f64::from(p) / 100.0 * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let frac = rank - lo as f64;
    sorted[lo] as f64 + (sorted[hi] as f64 - sorted[lo] as f64) * frac
}
