//! IVF training: seeded initialization followed by a fixed number of
//! assignment/update rounds.

use super::{IvfFlatIndex, IvfParams};
use crate::dataset::Dataset;
use crate::distance::{Distance, DistanceMetric};
use crate::error::{Result, RetrieveError};
use crate::exact::ExactIndex;
use crate::kernels;
use crate::observer::{IterationReport, NoopObserver, ProgressObserver};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::{Duration, Instant};

/// Number of assignment progress callbacks per iteration.
const ASSIGNMENT_REPORTS: usize = 100;

/// What a build did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuildStats {
    /// Iterations that ran to completion.
    pub iterations_completed: usize,
    /// Total empty-cluster reseeds over all iterations.
    pub empty_reseeds: usize,
    /// The observer stopped the build before `iter_count` was reached.
    pub cancelled: bool,
    /// Wall-clock build time.
    pub elapsed: Duration,
}

impl IvfFlatIndex<DistanceMetric> {
    /// Build with the default metric (cosine).
    pub fn build(dataset: Dataset, params: IvfParams) -> Result<Self> {
        Self::build_with_measure(dataset, params, DistanceMetric::default())
    }
}

impl<D: Distance + Clone> IvfFlatIndex<D> {
    /// Build with an explicit distance measure.
    pub fn build_with_measure(dataset: Dataset, params: IvfParams, measure: D) -> Result<Self> {
        Self::build_observed(dataset, params, measure, NoopObserver).map(|(index, _)| index)
    }

    /// Build, reporting progress to `observer`, which may also cancel between
    /// iterations.
    pub fn build_observed<O: ProgressObserver>(
        dataset: Dataset,
        params: IvfParams,
        measure: D,
        observer: O,
    ) -> Result<(Self, BuildStats)> {
        check_build_inputs(&dataset, &params)?;
        let mut rng = StdRng::seed_from_u64(params.seed);
        let initial: Vec<usize> =
            rand::seq::index::sample(&mut rng, dataset.len(), params.cluster_count).into_vec();
        Self::train(dataset, params, measure, &initial, rng, observer)
    }

    /// Build from caller-chosen initial centroids instead of a random sample.
    ///
    /// `initial` must hold `cluster_count` distinct point ids. The seed still
    /// drives empty-cluster reseeding.
    pub fn build_from_initial<O: ProgressObserver>(
        dataset: Dataset,
        params: IvfParams,
        measure: D,
        initial: &[u32],
        observer: O,
    ) -> Result<(Self, BuildStats)> {
        check_build_inputs(&dataset, &params)?;
        if initial.len() != params.cluster_count {
            return Err(RetrieveError::invalid(format!(
                "expected {} initial centroids, got {}",
                params.cluster_count,
                initial.len()
            )));
        }
        let mut seen = vec![false; dataset.len()];
        for &id in initial {
            let slot = seen.get_mut(id as usize).ok_or_else(|| {
                RetrieveError::invalid(format!("initial centroid id {id} out of range"))
            })?;
            if std::mem::replace(slot, true) {
                return Err(RetrieveError::invalid(format!(
                    "initial centroid id {id} given twice"
                )));
            }
        }
        let initial: Vec<usize> = initial.iter().map(|&id| id as usize).collect();
        let rng = StdRng::seed_from_u64(params.seed);
        Self::train(dataset, params, measure, &initial, rng, observer)
    }

    fn train<O: ProgressObserver>(
        dataset: Dataset,
        params: IvfParams,
        measure: D,
        initial: &[usize],
        mut rng: StdRng,
        mut observer: O,
    ) -> Result<(Self, BuildStats)> {
        let started = Instant::now();
        let dimension = dataset.dimension();
        let mut flat = Vec::with_capacity(initial.len() * dimension);
        for &idx in initial {
            flat.extend_from_slice(dataset.row(idx));
        }
        let centroids = Dataset::from_flat(flat, dimension)?;

        let mut index = Self {
            clusters: vec![Vec::new(); params.cluster_count],
            centroid_index: ExactIndex::with_measure(centroids, measure.clone()),
            dataset,
            params,
            measure,
        };
        let mut stats = BuildStats::default();

        log::debug!(
            "building IVF index: {} points, {} clusters, {} iterations",
            index.dataset.len(),
            index.params.cluster_count,
            index.params.iter_count
        );

        if index.params.iter_count == 0 {
            // No refinement, but every point still gets a cluster.
            index.assign(&mut observer)?;
        }

        for iteration in 0..index.params.iter_count {
            let iteration_start = Instant::now();
            index.assign(&mut observer)?;
            let largest_cluster = index.clusters.iter().map(Vec::len).max().unwrap_or(0);
            let empty_clusters = index.update_centroids(&mut rng)?;

            stats.iterations_completed += 1;
            stats.empty_reseeds += empty_clusters;

            if let Some(path) = index.params.checkpoint_path.clone() {
                index.save_to_path(&path)?;
                log::debug!("checkpointed iteration {} to {}", iteration + 1, path.display());
            }

            let report = IterationReport {
                iteration,
                iter_count: index.params.iter_count,
                empty_clusters,
                largest_cluster,
                elapsed: iteration_start.elapsed(),
            };
            log::debug!(
                "iteration {}/{}: {} empty clusters, largest {}",
                iteration + 1,
                report.iter_count,
                empty_clusters,
                largest_cluster
            );
            if observer.on_iteration(&report).is_break() {
                log::debug!("build cancelled after iteration {}", iteration + 1);
                stats.cancelled = true;
                break;
            }
        }

        stats.elapsed = started.elapsed();
        Ok((index, stats))
    }

    /// Rebuild the partition from scratch against the current centroids.
    fn assign<O: ProgressObserver>(&mut self, observer: &mut O) -> Result<()> {
        let total = self.dataset.len();
        let step = (total / ASSIGNMENT_REPORTS).max(1);
        let mut clusters = vec![Vec::new(); self.params.cluster_count];
        for (id, vector) in self.dataset.iter() {
            let cluster = self.centroid_index.nearest_id(vector)?;
            clusters[cluster as usize].push(id);
            let assigned = id as usize + 1;
            if assigned % step == 0 || assigned == total {
                observer.on_assignment_progress(assigned, total);
            }
        }
        self.clusters = clusters;
        Ok(())
    }

    /// Move every centroid to the mean of its members and rebuild the centroid
    /// index. Returns how many empty clusters were reseeded.
    ///
    /// Empty clusters take a uniformly drawn point from the full dataset.
    fn update_centroids(&mut self, rng: &mut StdRng) -> Result<usize> {
        let dimension = self.dataset.dimension();
        let mut flat = Vec::with_capacity(self.params.cluster_count * dimension);
        let mut sum = vec![0.0f64; dimension];
        let mut empty = 0;

        for (cluster, members) in self.clusters.iter().enumerate() {
            if members.is_empty() {
                let pick = rng.random_range(0..self.dataset.len());
                log::trace!("cluster {cluster} is empty, reseeding from point {pick}");
                flat.extend_from_slice(self.dataset.row(pick));
                empty += 1;
                continue;
            }
            sum.fill(0.0);
            for &id in members {
                kernels::add_assign(&mut sum, self.dataset.row(id as usize));
            }
            let count = members.len() as f64;
            flat.extend(sum.iter().map(|s| (s / count) as f32));
        }

        let centroids = Dataset::from_flat(flat, dimension)?;
        self.centroid_index = ExactIndex::with_measure(centroids, self.measure.clone());
        Ok(empty)
    }
}

fn check_build_inputs(dataset: &Dataset, params: &IvfParams) -> Result<()> {
    params.validate()?;
    if dataset.is_empty() {
        return Err(RetrieveError::EmptyDataset);
    }
    if params.cluster_count > dataset.len() {
        return Err(RetrieveError::invalid(format!(
            "cluster_count ({}) exceeds dataset size ({})",
            params.cluster_count,
            dataset.len()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::StopAfter;
    use std::collections::HashSet;

    fn scenario() -> Dataset {
        Dataset::from_vectors([
            [0.0f32, 0.0],
            [0.0, 1.0],
            [10.0, 10.0],
            [10.0, 11.0],
            [5.0, 5.0],
            [5.0, 6.0],
        ])
        .unwrap()
    }

    fn grid(n: usize) -> Dataset {
        Dataset::from_vectors((0..n).map(|i| [(i % 17) as f32, (i / 17) as f32 * 1.5])).unwrap()
    }

    fn assert_partition<D>(index: &IvfFlatIndex<D>) {
        let mut seen = HashSet::new();
        for cluster in index.clusters() {
            for &id in cluster {
                assert!(seen.insert(id), "id {id} appears twice");
            }
        }
        assert_eq!(seen.len(), index.dataset().len());
        assert_eq!(index.centroids().len(), index.params().cluster_count);
    }

    #[test]
    fn one_iteration_from_points_0_and_2() {
        let params = IvfParams::default().with_cluster_count(2).with_iter_count(1);
        let (index, stats) = IvfFlatIndex::build_from_initial(
            scenario(),
            params,
            DistanceMetric::L2,
            &[0, 2],
            NoopObserver,
        )
        .unwrap();

        assert_eq!(stats.iterations_completed, 1);
        assert_eq!(stats.empty_reseeds, 0);
        // (5,5) is equidistant from (0,0) and (10,10) and goes to the lower id.
        assert_eq!(index.clusters()[0], vec![0, 1, 4]);
        assert_eq!(index.clusters()[1], vec![2, 3, 5]);

        let c0 = index.centroids().get(0).unwrap();
        let c1 = index.centroids().get(1).unwrap();
        assert!((c0[0] - 5.0 / 3.0).abs() < 1e-5 && (c0[1] - 2.0).abs() < 1e-5);
        assert!((c1[0] - 25.0 / 3.0).abs() < 1e-5 && (c1[1] - 9.0).abs() < 1e-5);
    }

    #[test]
    fn same_seed_same_index() {
        let params = IvfParams::default()
            .with_cluster_count(6)
            .with_iter_count(4)
            .with_seed(99);
        let a = IvfFlatIndex::build_with_measure(grid(150), params.clone(), DistanceMetric::L2)
            .unwrap();
        let b = IvfFlatIndex::build_with_measure(grid(150), params, DistanceMetric::L2).unwrap();
        assert_eq!(a.centroids(), b.centroids());
        assert_eq!(a.clusters(), b.clusters());
    }

    #[test]
    fn every_point_in_exactly_one_cluster() {
        for iter_count in [0, 1, 3] {
            let params = IvfParams::default()
                .with_cluster_count(9)
                .with_iter_count(iter_count);
            let index = IvfFlatIndex::build(grid(120), params).unwrap();
            assert_partition(&index);
        }
    }

    #[test]
    fn duplicate_points_force_empty_cluster_reseeds() {
        // Only two distinct vectors, four clusters: two cells must come up empty.
        let ds = Dataset::from_vectors((0..8).map(|i| [(i % 2) as f32, 0.0])).unwrap();
        let params = IvfParams::default().with_cluster_count(4).with_iter_count(3);
        let (index, stats) =
            IvfFlatIndex::build_observed(ds, params, DistanceMetric::L2, NoopObserver).unwrap();
        assert!(stats.empty_reseeds > 0);
        assert_partition(&index);
    }

    #[test]
    fn large_cluster_mean_is_exact() {
        let ds = Dataset::from_flat(vec![0.1f32; 1_000_000], 1).unwrap();
        let params = IvfParams::default().with_cluster_count(1).with_iter_count(1);
        let index = IvfFlatIndex::build_with_measure(ds, params, DistanceMetric::L2).unwrap();
        assert_eq!(index.centroids().get(0).unwrap(), &[0.1f32]);
    }

    #[test]
    fn observer_can_cancel() {
        let params = IvfParams::default().with_cluster_count(4).with_iter_count(10);
        let (index, stats) =
            IvfFlatIndex::build_observed(grid(60), params, DistanceMetric::L2, StopAfter(2))
                .unwrap();
        assert!(stats.cancelled);
        assert_eq!(stats.iterations_completed, 2);
        assert_partition(&index);
    }

    #[test]
    fn invalid_inputs() {
        let too_many = IvfParams::default().with_cluster_count(7);
        assert!(matches!(
            IvfFlatIndex::build(scenario(), too_many),
            Err(RetrieveError::InvalidParameter(_))
        ));
        let params = IvfParams::default().with_cluster_count(1);
        assert!(matches!(
            IvfFlatIndex::build(Dataset::new(2).unwrap(), params.clone()),
            Err(RetrieveError::EmptyDataset)
        ));
        let bad: [&[u32]; 3] = [&[0, 0], &[0, 6], &[1]];
        for initial in bad {
            let res = IvfFlatIndex::build_from_initial(
                scenario(),
                params.clone().with_cluster_count(2),
                DistanceMetric::L2,
                initial,
                NoopObserver,
            );
            assert!(matches!(res, Err(RetrieveError::InvalidParameter(_))));
        }
    }
}
