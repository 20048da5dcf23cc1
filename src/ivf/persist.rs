//! Snapshot export and re-attachment.

use super::{IvfFlatIndex, IvfParams};
use crate::dataset::Dataset;
use crate::distance::{Distance, DistanceMetric};
use crate::error::Result;
use crate::exact::ExactIndex;
use crate::persistence::format::{self, Encoding};
use crate::persistence::{fs, IvfSnapshot, PersistenceError};
use std::path::Path;

impl<D> IvfFlatIndex<D> {
    /// Copy out centroids and clusters.
    pub fn snapshot(&self) -> IvfSnapshot {
        IvfSnapshot {
            cluster_count: self.clusters.len(),
            centroids: self.centroids().to_vectors(),
            clusters: self.clusters.clone(),
        }
    }

    pub fn to_json(&self) -> Result<Vec<u8>> {
        Ok(format::encode_json(&self.snapshot())?)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(format::encode_binary(&self.snapshot())?)
    }

    /// Atomically write a snapshot; `.json` paths get JSON, others binary.
    pub fn save_to_path(&self, path: impl AsRef<Path>) -> Result<()> {
        Ok(fs::save_snapshot(path.as_ref(), &self.snapshot())?)
    }
}

impl IvfFlatIndex<DistanceMetric> {
    /// [`IvfFlatIndex::from_snapshot`] with the default metric.
    pub fn load(path: impl AsRef<Path>, dataset: Dataset, params: IvfParams) -> Result<Self> {
        Self::load_with_measure(path, dataset, params, DistanceMetric::default())
    }
}

impl<D: Distance + Clone> IvfFlatIndex<D> {
    /// Re-attach a snapshot to the dataset it was built from.
    ///
    /// The snapshot's `cluster_count` wins over `params.cluster_count`. Checks that
    /// the centroids match the dataset dimension and that the clusters partition
    /// exactly the dataset's ids; anything else is a format error. A dataset with
    /// the right shape but different contents cannot be detected and gives
    /// meaningless results.
    pub fn from_snapshot(
        snapshot: IvfSnapshot,
        dataset: Dataset,
        mut params: IvfParams,
        measure: D,
    ) -> Result<Self> {
        snapshot.validate()?;
        check_against_dataset(&snapshot, &dataset)?;

        if params.cluster_count != snapshot.cluster_count {
            log::warn!(
                "params say {} clusters but snapshot has {}; using the snapshot",
                params.cluster_count,
                snapshot.cluster_count
            );
            params.cluster_count = snapshot.cluster_count;
        }

        let IvfSnapshot {
            centroids,
            clusters,
            ..
        } = snapshot;
        let centroids = Dataset::from_vectors(&centroids)?;

        Ok(Self {
            centroid_index: ExactIndex::with_measure(centroids, measure.clone()),
            dataset,
            params,
            measure,
            clusters,
        })
    }

    pub fn from_json(bytes: &[u8], dataset: Dataset, params: IvfParams, measure: D) -> Result<Self> {
        let snapshot = Encoding::Json.decode(bytes)?;
        Self::from_snapshot(snapshot, dataset, params, measure)
    }

    pub fn from_bytes(bytes: &[u8], dataset: Dataset, params: IvfParams, measure: D) -> Result<Self> {
        let snapshot = Encoding::Binary.decode(bytes)?;
        Self::from_snapshot(snapshot, dataset, params, measure)
    }

    /// Load a snapshot written by [`IvfFlatIndex::save_to_path`] (or a build
    /// checkpoint).
    pub fn load_with_measure(
        path: impl AsRef<Path>,
        dataset: Dataset,
        params: IvfParams,
        measure: D,
    ) -> Result<Self> {
        let snapshot = fs::load_snapshot(path.as_ref())?;
        Self::from_snapshot(snapshot, dataset, params, measure)
    }
}

fn check_against_dataset(snapshot: &IvfSnapshot, dataset: &Dataset) -> Result<()> {
    if snapshot.dimension() != dataset.dimension() {
        return Err(PersistenceError::Format(format!(
            "snapshot centroids have {} dimensions, dataset has {}",
            snapshot.dimension(),
            dataset.dimension()
        ))
        .into());
    }
    let mut seen = vec![false; dataset.len()];
    for &id in snapshot.clusters.iter().flatten() {
        match seen.get_mut(id as usize) {
            None => {
                return Err(PersistenceError::Format(format!(
                    "point id {id} out of range for a dataset of {} points",
                    dataset.len()
                ))
                .into())
            }
            Some(slot) if *slot => {
                return Err(
                    PersistenceError::Format(format!("point id {id} is in two clusters")).into(),
                )
            }
            Some(slot) => *slot = true,
        }
    }
    if let Some(missing) = seen.iter().position(|s| !s) {
        return Err(PersistenceError::Format(format!(
            "point id {missing} is not in any cluster"
        ))
        .into());
    }
    Ok(())
}
