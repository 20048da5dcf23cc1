//! IVF-Flat: inverted file index over uncompressed vectors.
//!
//! Partition the dataset into `cluster_count` Voronoi cells around learned
//! centroids; at query time scan only the cells whose centroids rank best.
//!
//! ```text
//!           Query
//!             |
//!     rank centroids (exact)
//!             |
//!     +-------+-------+
//!     |               |
//!   Cell A          Cell B      (probe until min_probe_count and k are met)
//!   |__|__|         |__|__|
//!   v  v  v         v  v  v
//!  [vectors]       [vectors]    (exact distances inside probed cells)
//! ```
//!
//! ## Build
//!
//! Lloyd iterations with a fixed budget: sample `cluster_count` distinct points
//! as initial centroids, then `iter_count` times assign every point to its
//! nearest centroid and move each centroid to the mean of its members. A cell
//! that ends up empty is reseeded with a random point from the full dataset.
//! Sampling and reseeding share one RNG seeded from [`IvfParams::seed`], so
//! builds are reproducible.
//!
//! ## Query
//!
//! Probing every cluster degenerates to an exact scan and returns exactly what
//! [`crate::ExactIndex`] returns. Fewer probes trade recall for speed.
//!
//! ## Usage
//!
//! ```rust
//! use ivfflat::{Dataset, DistanceMetric, IvfFlatIndex, IvfParams, NearestNeighbors};
//!
//! # fn main() -> ivfflat::Result<()> {
//! let points = Dataset::from_vectors((0..100).map(|i| [(i % 10) as f32, (i / 10) as f32]))?;
//! let params = IvfParams::default()
//!     .with_cluster_count(8)
//!     .with_iter_count(5)
//!     .with_min_probe_count(2);
//! let index = IvfFlatIndex::build_with_measure(points, params, DistanceMetric::L2)?;
//!
//! let hits = index.nearest(&[4.2, 4.9], 5)?;
//! assert_eq!(hits.len(), 5);
//! # Ok(())
//! # }
//! ```
//!
//! ## Trade-offs
//!
//! | Parameter | ↑ Effect |
//! |-----------|----------|
//! | `min_probe_count` | Better recall, slower search |
//! | `cluster_count` | Smaller cells, slower training |
//! | `iter_count` | Better centroids, slower training |

mod build;
mod params;
mod persist;
mod search;
mod stats;

pub use build::BuildStats;
pub use params::IvfParams;
pub use stats::ClusterStats;

use crate::dataset::Dataset;
use crate::distance::DistanceMetric;
use crate::exact::ExactIndex;

/// IVF-Flat index.
///
/// Owns its dataset, the centroids (through `centroid_index`), and the cluster
/// partition. Queries take `&self`; there is no way to mutate a built index, so
/// rebuilding means building a new value and swapping it in.
#[derive(Debug, Clone)]
pub struct IvfFlatIndex<D = DistanceMetric> {
    dataset: Dataset,
    params: IvfParams,
    measure: D,
    // Exact index over the current centroids; replaced wholesale whenever they change.
    centroid_index: ExactIndex<D>,
    clusters: Vec<Vec<u32>>,
}

impl<D> IvfFlatIndex<D> {
    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn params(&self) -> &IvfParams {
        &self.params
    }

    pub fn measure(&self) -> &D {
        &self.measure
    }

    /// Centroids as a dataset; row `i` belongs to cluster `i`.
    pub fn centroids(&self) -> &Dataset {
        self.centroid_index.dataset()
    }

    /// Member ids per cluster.
    pub fn clusters(&self) -> &[Vec<u32>] {
        &self.clusters
    }

    pub fn cluster_count(&self) -> usize {
        self.clusters.len()
    }

    /// Cluster size distribution.
    pub fn cluster_stats(&self) -> ClusterStats {
        let sizes: Vec<usize> = self.clusters.iter().map(Vec::len).collect();
        ClusterStats::from_sizes(&sizes)
    }

    /// Approximate heap footprint: vectors, centroids, and posting lists.
    pub fn size_bytes(&self) -> usize {
        (self.dataset.as_flat().len() + self.centroids().as_flat().len())
            * std::mem::size_of::<f32>()
            + self.dataset.len() * std::mem::size_of::<u32>()
    }

    /// Give the dataset back, e.g. to build a replacement index from it.
    pub fn into_dataset(self) -> Dataset {
        self.dataset
    }
}
