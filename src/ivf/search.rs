//! Probe-based IVF query.

use super::IvfFlatIndex;
use crate::ann::{Direction, NearestNeighbors, SearchResult};
use crate::distance::Distance;
use crate::error::{Result, RetrieveError};
use crate::observer::{NoopObserver, ProbeReport, ProgressObserver};
use std::collections::HashSet;
use std::time::Instant;

impl<D: Distance> IvfFlatIndex<D> {
    /// Approximate top-`k` for `query` in `direction`.
    ///
    /// Clusters are visited in centroid order for `direction`. Probing stops once
    /// at least `min_probe_count` clusters were scanned *and* at least `k`
    /// candidates were collected, or when every cluster has been scanned,
    /// whichever comes first. Running out of clusters is not an error; the
    /// result just holds what was found.
    pub fn search(
        &self,
        query: &[f32],
        k: usize,
        min_probe_count: usize,
        direction: Direction,
    ) -> Result<SearchResult> {
        self.search_observed(query, k, min_probe_count, direction, NoopObserver)
    }

    /// [`IvfFlatIndex::search`], reporting every probed cluster to `observer`.
    pub fn search_observed<O: ProgressObserver>(
        &self,
        query: &[f32],
        k: usize,
        min_probe_count: usize,
        direction: Direction,
        mut observer: O,
    ) -> Result<SearchResult> {
        let start = Instant::now();
        if self.dataset.is_empty() {
            return Err(RetrieveError::EmptyDataset);
        }
        self.dataset.check_dimension(query)?;

        let ranked = self
            .centroid_index
            .rank(query, self.clusters.len(), direction)?;

        let mut seen = HashSet::new();
        let mut candidates: Vec<(u32, f32)> = Vec::new();
        let mut probed = 0;

        for &(cluster, _) in &ranked {
            if probed >= min_probe_count && candidates.len() >= k {
                break;
            }
            for &id in &self.clusters[cluster as usize] {
                if !seen.insert(id) {
                    continue;
                }
                let vector = self.dataset.row(id as usize);
                candidates.push((id, self.measure.distance(query, vector)));
            }
            probed += 1;
            observer.on_probe(&ProbeReport {
                cluster,
                probed,
                candidates: candidates.len(),
            });
        }

        let items = direction.top_k(candidates, k);
        Ok(SearchResult {
            items,
            elapsed: start.elapsed(),
        })
    }
}

impl<D: Distance> NearestNeighbors for IvfFlatIndex<D> {
    /// Uses `params.min_probe_count`.
    fn nearest(&self, query: &[f32], k: usize) -> Result<SearchResult> {
        self.search(query, k, self.params.min_probe_count, Direction::Nearest)
    }

    /// Uses `params.min_probe_count`.
    fn farthest(&self, query: &[f32], k: usize) -> Result<SearchResult> {
        self.search(query, k, self.params.min_probe_count, Direction::Farthest)
    }

    fn len(&self) -> usize {
        self.dataset.len()
    }

    fn dimension(&self) -> usize {
        self.dataset.dimension()
    }

    fn name(&self) -> &'static str {
        "ivf-flat"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Dataset;
    use crate::distance::DistanceMetric;
    use crate::exact::ExactIndex;
    use crate::ivf::IvfParams;

    fn blobs() -> Dataset {
        // Four tight blobs around the corners of a square.
        let corners = [[0.0f32, 0.0], [20.0, 0.0], [0.0, 20.0], [20.0, 20.0]];
        Dataset::from_vectors((0..40).map(|i| {
            let c = corners[i % 4];
            [c[0] + (i / 4) as f32 * 0.1, c[1] - (i / 4) as f32 * 0.05]
        }))
        .unwrap()
    }

    fn index() -> IvfFlatIndex {
        let params = IvfParams::default()
            .with_cluster_count(4)
            .with_iter_count(5)
            .with_seed(3);
        IvfFlatIndex::build_with_measure(blobs(), params, DistanceMetric::L2).unwrap()
    }

    #[derive(Default)]
    struct Probes(Vec<ProbeReport>);

    impl ProgressObserver for Probes {
        fn on_probe(&mut self, report: &ProbeReport) {
            self.0.push(report.clone());
        }
    }

    #[test]
    fn full_probe_equals_exact() {
        let ivf = index();
        let exact = ExactIndex::with_measure(blobs(), DistanceMetric::L2);
        for q in [[1.0f32, 1.0], [19.0, 3.0], [10.0, 10.0]] {
            for direction in [Direction::Nearest, Direction::Farthest] {
                let approx = ivf.search(&q, 7, 4, direction).unwrap();
                let truth = exact.search(&q, 7, direction).unwrap();
                assert_eq!(approx.items, truth.items);
            }
        }
    }

    #[test]
    fn probing_stops_once_both_conditions_hold() {
        let ivf = index();
        let mut probes = Probes::default();
        let res = ivf
            .search_observed(&[0.0, 0.0], 3, 1, Direction::Nearest, &mut probes)
            .unwrap();
        assert_eq!(res.len(), 3);

        let ranked = ExactIndex::with_measure(ivf.centroids().clone(), DistanceMetric::L2)
            .nearest(&[0.0, 0.0], 4)
            .unwrap()
            .ids();
        let (mut expected, mut pooled) = (0, 0);
        for cluster in ranked {
            if expected >= 1 && pooled >= 3 {
                break;
            }
            pooled += ivf.clusters()[cluster as usize].len();
            expected += 1;
        }
        assert_eq!(probes.0.len(), expected);
        assert_eq!(probes.0.last().unwrap().candidates, pooled);
    }

    #[test]
    fn exhausting_clusters_returns_best_effort() {
        let ivf = index();
        let mut probes = Probes::default();
        let res = ivf
            .search_observed(&[5.0, 5.0], 500, 100, Direction::Nearest, &mut probes)
            .unwrap();
        assert_eq!(res.len(), 40);
        assert_eq!(probes.0.len(), 4);
    }

    #[test]
    fn zero_min_probe_still_fills_k() {
        let res = index().search(&[20.0, 20.0], 12, 0, Direction::Nearest).unwrap();
        assert_eq!(res.len(), 12);
    }

    #[test]
    fn query_dimension_is_checked() {
        assert!(matches!(
            index().nearest(&[1.0], 1),
            Err(RetrieveError::DimensionMismatch {
                expected: 2,
                actual: 1
            })
        ));
    }
}
