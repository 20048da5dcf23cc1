//! ivfflat: exact and inverted-file nearest neighbor search.
//!
//! Two index types over fixed-dimensionality `f32` vectors:
//!
//! - [`ExactIndex`]: linear scan, exact, no build step
//! - [`IvfFlatIndex`]: k-means partitioning plus cluster probing (IVF-Flat)
//!
//! Both implement [`NearestNeighbors`] and answer nearest *and* farthest
//! queries under any [`Distance`], including plain closures.
//!
//! ```rust
//! use ivfflat::{Dataset, DistanceMetric, ExactIndex, IvfFlatIndex, IvfParams, NearestNeighbors};
//!
//! # fn main() -> ivfflat::Result<()> {
//! let vectors: Vec<[f32; 3]> = (0..500)
//!     .map(|i| [(i % 7) as f32, (i % 11) as f32, (i % 13) as f32])
//!     .collect();
//!
//! let exact = ExactIndex::with_measure(Dataset::from_vectors(&vectors)?, DistanceMetric::L2);
//! let params = IvfParams::default().with_cluster_count(16).with_iter_count(8);
//! let ivf = IvfFlatIndex::build_with_measure(Dataset::from_vectors(&vectors)?, params, DistanceMetric::L2)?;
//!
//! let truth = exact.nearest(&[3.0, 3.0, 3.0], 10)?;
//! let approx = ivf.nearest(&[3.0, 3.0, 3.0], 10)?;
//! let recall = ivfflat::eval::result_recall(&truth, &approx);
//! assert!((0.0..=1.0).contains(&recall));
//! # Ok(())
//! # }
//! ```
//!
//! # Critical Nuances
//!
//! ## Ties
//!
//! Equal distances are ordered by ascending point id, in both directions, for
//! both indexes. Exact search is therefore fully deterministic, and an IVF query
//! that probes every cluster returns exactly the exact-search result.
//!
//! ## Persisted state does not include vectors
//!
//! An [`IvfSnapshot`] stores centroids and point ids only. Loading one requires
//! the original [`Dataset`]; shape mismatches are caught, content mismatches
//! are not.
//!
//! ## When Exact Search Beats Approximate
//!
//! - Small datasets (< 10K vectors): a linear scan is already fast
//! - Very high recall requirements: the probe count needed approaches
//!   `cluster_count`, at which point IVF is a slower exact scan

pub mod ann;
pub mod dataset;
pub mod distance;
pub mod error;
pub mod eval;
pub mod exact;
pub mod ivf;
pub mod kernels;
pub mod observer;
pub mod persistence;

// Re-exports
pub use ann::{Direction, NearestNeighbors, SearchResult};
pub use dataset::Dataset;
pub use distance::{Distance, DistanceMetric};
pub use error::{Result, RetrieveError};
pub use exact::ExactIndex;
pub use ivf::{BuildStats, ClusterStats, IvfFlatIndex, IvfParams};
pub use observer::{IterationReport, LogObserver, NoopObserver, ProbeReport, ProgressObserver};
pub use persistence::{IvfSnapshot, PersistenceError};
