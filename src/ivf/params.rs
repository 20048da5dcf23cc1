//! Build and query configuration for [`super::IvfFlatIndex`].

use crate::error::{Result, RetrieveError};
use crate::persistence::PersistenceError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// IVF-Flat parameters.
///
/// Deserializes with defaults for missing fields, so a config file only needs
/// the values it changes:
///
/// ```rust
/// use ivfflat::IvfParams;
///
/// let params = IvfParams::from_json_str(r#"{ "cluster_count": 64, "seed": 7 }"#).unwrap();
/// assert_eq!(params.cluster_count, 64);
/// assert_eq!(params.iter_count, IvfParams::default().iter_count);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IvfParams {
    /// Number of clusters (inverted lists). Fixed for the index lifetime.
    pub cluster_count: usize,

    /// Assignment/update rounds. Always run in full; there is no convergence check.
    pub iter_count: usize,

    /// Seed for initial centroid sampling and empty-cluster reseeding.
    pub seed: u64,

    /// Minimum clusters probed by `nearest`/`farthest`.
    pub min_probe_count: usize,

    /// When set, a snapshot is written here after every build iteration.
    pub checkpoint_path: Option<PathBuf>,
}

impl Default for IvfParams {
    fn default() -> Self {
        Self {
            cluster_count: 1000,
            iter_count: 50,
            seed: 1_234_567_890,
            min_probe_count: 3,
            checkpoint_path: None,
        }
    }
}

impl IvfParams {
    #[must_use]
    pub fn with_cluster_count(mut self, cluster_count: usize) -> Self {
        self.cluster_count = cluster_count;
        self
    }

    #[must_use]
    pub fn with_iter_count(mut self, iter_count: usize) -> Self {
        self.iter_count = iter_count;
        self
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    #[must_use]
    pub fn with_min_probe_count(mut self, min_probe_count: usize) -> Self {
        self.min_probe_count = min_probe_count;
        self
    }

    #[must_use]
    pub fn with_checkpoint_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.checkpoint_path = Some(path.into());
        self
    }

    /// Reject configurations no build could honor.
    pub fn validate(&self) -> Result<()> {
        if self.cluster_count == 0 {
            return Err(RetrieveError::invalid("cluster_count must be greater than 0"));
        }
        if u32::try_from(self.cluster_count).is_err() {
            return Err(RetrieveError::invalid("cluster_count must fit in u32"));
        }
        Ok(())
    }

    /// Parse and validate a JSON config.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let params: Self = serde_json::from_str(json)
            .map_err(|e| RetrieveError::invalid(format!("malformed IVF config: {e}")))?;
        params.validate()?;
        Ok(params)
    }

    /// Read, parse, and validate a JSON config file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(PersistenceError::from)?;
        Self::from_json_str(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let params = IvfParams::default();
        assert!(params.validate().is_ok());
        assert_eq!(params.min_probe_count, 3);
        assert!(params.checkpoint_path.is_none());
    }

    #[test]
    fn zero_clusters_rejected() {
        let err = IvfParams::default().with_cluster_count(0).validate();
        assert!(matches!(err, Err(RetrieveError::InvalidParameter(_))));
        assert!(IvfParams::from_json_str(r#"{"cluster_count": 0}"#).is_err());
    }

    #[test]
    fn negative_values_do_not_parse() {
        assert!(IvfParams::from_json_str(r#"{"iter_count": -1}"#).is_err());
    }

    #[test]
    fn config_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ivf.json");
        let params = IvfParams::default()
            .with_cluster_count(16)
            .with_iter_count(4)
            .with_checkpoint_path("ckpt.ivf");
        std::fs::write(&path, serde_json::to_string(&params).unwrap()).unwrap();
        assert_eq!(IvfParams::from_json_file(&path).unwrap(), params);
    }
}
