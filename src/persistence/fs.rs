//! Filesystem access for snapshots.
//!
//! Writes go to a sibling temp file that is synced and then renamed over the
//! target, so readers see either the old or the new snapshot, never a torn one.

use super::error::PersistenceResult;
use super::format::Encoding;
use super::snapshot::IvfSnapshot;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Atomically replace `path` with `data`.
pub fn atomic_write(path: &Path, data: &[u8]) -> PersistenceResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let tmp = temp_path(path);
    let result = (|| {
        let mut file = File::create(&tmp)?;
        file.write_all(data)?;
        file.sync_all()?;
        fs::rename(&tmp, path)
    })();
    if result.is_err() {
        let _ = fs::remove_file(&tmp);
    }
    Ok(result?)
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Write `snapshot` to `path`, encoding chosen by extension.
pub fn save_snapshot(path: &Path, snapshot: &IvfSnapshot) -> PersistenceResult<()> {
    let bytes = Encoding::for_path(path).encode(snapshot)?;
    atomic_write(path, &bytes)
}

/// Read and validate a snapshot from `path`, encoding chosen by extension.
pub fn load_snapshot(path: &Path) -> PersistenceResult<IvfSnapshot> {
    let bytes = fs::read(path)?;
    Encoding::for_path(path).decode(&bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::PersistenceError;

    fn sample() -> IvfSnapshot {
        IvfSnapshot {
            cluster_count: 1,
            centroids: vec![vec![1.0, 2.0, 3.0]],
            clusters: vec![vec![0, 1, 2]],
        }
    }

    #[test]
    fn save_then_load_both_encodings() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["index.json", "index.ivf"] {
            let path = dir.path().join(name);
            save_snapshot(&path, &sample()).unwrap();
            assert_eq!(load_snapshot(&path).unwrap(), sample());
            assert!(!temp_path(&path).exists());
        }
    }

    #[test]
    fn overwrite_replaces_previous_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/ckpt.json");
        save_snapshot(&path, &sample()).unwrap();
        let mut next = sample();
        next.centroids[0] = vec![9.0, 9.0, 9.0];
        save_snapshot(&path, &next).unwrap();
        assert_eq!(load_snapshot(&path).unwrap(), next);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_snapshot(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, PersistenceError::Io(_)));
    }
}
