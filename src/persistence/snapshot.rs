//! The persisted schema of a trained IVF index.

use super::error::{PersistenceError, PersistenceResult};
use crate::ivf::ClusterStats;
use serde::{Deserialize, Serialize};

/// Point-in-time copy of an IVF index's centroids and partition.
///
/// Independent of the live dataset: it stores point ids, not vectors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IvfSnapshot {
    /// Number of clusters; must equal both list lengths.
    pub cluster_count: usize,
    /// One centroid vector per cluster.
    pub centroids: Vec<Vec<f32>>,
    /// Member point ids per cluster.
    pub clusters: Vec<Vec<u32>>,
}

impl IvfSnapshot {
    /// Check the structural invariants that do not need the dataset.
    ///
    /// - `cluster_count > 0`
    /// - `centroids.len() == clusters.len() == cluster_count`
    /// - every centroid has the same, non-zero dimension
    pub fn validate(&self) -> PersistenceResult<()> {
        if self.cluster_count == 0 {
            return Err(PersistenceError::Format(
                "cluster_count must be greater than 0".to_string(),
            ));
        }
        if self.centroids.len() != self.cluster_count || self.clusters.len() != self.cluster_count
        {
            return Err(PersistenceError::Format(format!(
                "cluster_count is {} but found {} centroids and {} clusters",
                self.cluster_count,
                self.centroids.len(),
                self.clusters.len()
            )));
        }
        let dimension = self.dimension();
        if dimension == 0 {
            return Err(PersistenceError::Format(
                "centroids have zero dimension".to_string(),
            ));
        }
        if let Some((i, c)) = self
            .centroids
            .iter()
            .enumerate()
            .find(|(_, c)| c.len() != dimension)
        {
            return Err(PersistenceError::Format(format!(
                "centroid {i} has {} dimensions, expected {dimension}",
                c.len()
            )));
        }
        Ok(())
    }

    /// Centroid dimensionality (0 when there are no centroids).
    pub fn dimension(&self) -> usize {
        self.centroids.first().map_or(0, Vec::len)
    }

    /// Total number of ids across all clusters.
    pub fn point_count(&self) -> usize {
        self.clusters.iter().map(Vec::len).sum()
    }

    /// Cluster size distribution.
    pub fn cluster_stats(&self) -> ClusterStats {
        let sizes: Vec<usize> = self.clusters.iter().map(Vec::len).collect();
        ClusterStats::from_sizes(&sizes)
    }

    pub(crate) fn approx_size_bytes(&self) -> usize {
        self.cluster_count * self.dimension() * std::mem::size_of::<f32>()
            + self.point_count() * std::mem::size_of::<u32>()
    }
}
