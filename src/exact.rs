//! Exhaustive (brute-force) search.
//!
//! Computes the measure between the query and every stored point, then keeps
//! the best `k`. Exact by construction, so it doubles as ground truth for the
//! IVF index and as its centroid lookup.
//!
//! ```rust
//! use ivfflat::{Dataset, DistanceMetric, ExactIndex, NearestNeighbors};
//!
//! # fn main() -> ivfflat::Result<()> {
//! let points = Dataset::from_vectors([[0.0f32, 0.0], [1.0, 0.0], [5.0, 5.0]])?;
//! let index = ExactIndex::with_measure(points, DistanceMetric::L2);
//! let hits = index.nearest(&[0.9, 0.1], 2)?;
//! assert_eq!(hits.ids(), vec![1, 0]);
//! # Ok(())
//! # }
//! ```

use crate::ann::{Direction, NearestNeighbors, SearchResult};
use crate::dataset::Dataset;
use crate::distance::{Distance, DistanceMetric};
use crate::error::{Result, RetrieveError};
use std::time::Instant;

/// Linear-scan index over a fixed point set.
#[derive(Debug, Clone)]
pub struct ExactIndex<D = DistanceMetric> {
    dataset: Dataset,
    measure: D,
}

impl ExactIndex<DistanceMetric> {
    /// Index `dataset` under the default metric (cosine).
    pub fn new(dataset: Dataset) -> Self {
        Self::with_measure(dataset, DistanceMetric::default())
    }
}

impl<D> ExactIndex<D> {
    /// Index `dataset` under `measure`.
    pub fn with_measure(dataset: Dataset, measure: D) -> Self {
        Self { dataset, measure }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn measure(&self) -> &D {
        &self.measure
    }

    /// Give back the owned parts.
    pub fn into_parts(self) -> (Dataset, D) {
        (self.dataset, self.measure)
    }
}

impl<D: Distance> ExactIndex<D> {
    /// Best `k` points for `query` in `direction`. `k` is clamped to the dataset size.
    pub fn search(&self, query: &[f32], k: usize, direction: Direction) -> Result<SearchResult> {
        let start = Instant::now();
        let items = self.rank(query, k, direction)?;
        Ok(SearchResult {
            items,
            elapsed: start.elapsed(),
        })
    }

    /// Id of the single nearest point. Ties go to the lowest id.
    pub fn nearest_id(&self, query: &[f32]) -> Result<u32> {
        self.check_query(query)?;
        let mut best: Option<(u32, f32)> = None;
        for (id, v) in self.dataset.iter() {
            let cand = (id, self.measure.distance(query, v));
            match best {
                Some(b) if Direction::Nearest.compare(&cand, &b).is_ge() => {}
                _ => best = Some(cand),
            }
        }
        best.map(|(id, _)| id).ok_or(RetrieveError::EmptyDataset)
    }

    pub(crate) fn rank(&self, query: &[f32], k: usize, direction: Direction) -> Result<Vec<(u32, f32)>> {
        self.check_query(query)?;
        let candidates: Vec<(u32, f32)> = self
            .dataset
            .iter()
            .map(|(id, v)| (id, self.measure.distance(query, v)))
            .collect();
        Ok(direction.top_k(candidates, k))
    }

    fn check_query(&self, query: &[f32]) -> Result<()> {
        if self.dataset.is_empty() {
            return Err(RetrieveError::EmptyDataset);
        }
        self.dataset.check_dimension(query)
    }
}

impl<D: Distance> NearestNeighbors for ExactIndex<D> {
    fn nearest(&self, query: &[f32], k: usize) -> Result<SearchResult> {
        self.search(query, k, Direction::Nearest)
    }

    fn farthest(&self, query: &[f32], k: usize) -> Result<SearchResult> {
        self.search(query, k, Direction::Farthest)
    }

    fn len(&self) -> usize {
        self.dataset.len()
    }

    fn dimension(&self) -> usize {
        self.dataset.dimension()
    }

    fn name(&self) -> &'static str {
        "exact"
    }
}
