//! On-disk encodings for [`IvfSnapshot`].
//!
//! # Binary layout
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │ Magic (4B): "IVFF"                      │
//! │ Version (4B, little-endian u32)         │
//! ├─────────────────────────────────────────┤
//! │ postcard(IvfSnapshot)                   │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # JSON layout
//!
//! ```text
//! { "cluster_count": 2, "centroids": [[..], [..]], "clusters": [[0, 1], [2]] }
//! ```
//!
//! Both decoders validate the snapshot before returning it.

use super::error::{PersistenceError, PersistenceResult};
use super::snapshot::IvfSnapshot;
use std::path::Path;

/// Magic bytes for binary snapshots.
pub const SNAPSHOT_MAGIC: [u8; 4] = *b"IVFF";

/// Current binary format version.
pub const FORMAT_VERSION: u32 = 1;

const HEADER_LEN: usize = SNAPSHOT_MAGIC.len() + std::mem::size_of::<u32>();

/// Snapshot encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Json,
    Binary,
}

impl Encoding {
    /// `.json` files are JSON, everything else binary.
    pub fn for_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Encoding::Json,
            _ => Encoding::Binary,
        }
    }

    pub fn encode(self, snapshot: &IvfSnapshot) -> PersistenceResult<Vec<u8>> {
        match self {
            Encoding::Json => encode_json(snapshot),
            Encoding::Binary => encode_binary(snapshot),
        }
    }

    pub fn decode(self, bytes: &[u8]) -> PersistenceResult<IvfSnapshot> {
        match self {
            Encoding::Json => decode_json(bytes),
            Encoding::Binary => decode_binary(bytes),
        }
    }
}

pub fn encode_json(snapshot: &IvfSnapshot) -> PersistenceResult<Vec<u8>> {
    serde_json::to_vec(snapshot).map_err(|e| PersistenceError::Serialization(e.to_string()))
}

pub fn decode_json(bytes: &[u8]) -> PersistenceResult<IvfSnapshot> {
    let snapshot: IvfSnapshot = serde_json::from_slice(bytes)?;
    snapshot.validate()?;
    Ok(snapshot)
}

pub fn encode_binary(snapshot: &IvfSnapshot) -> PersistenceResult<Vec<u8>> {
    let mut out = Vec::with_capacity(HEADER_LEN + snapshot.approx_size_bytes());
    out.extend_from_slice(&SNAPSHOT_MAGIC);
    out.extend_from_slice(&FORMAT_VERSION.to_le_bytes());
    let body = postcard::to_allocvec(snapshot)
        .map_err(|e| PersistenceError::Serialization(format!("postcard error: {e}")))?;
    out.extend_from_slice(&body);
    Ok(out)
}

pub fn decode_binary(bytes: &[u8]) -> PersistenceResult<IvfSnapshot> {
    if bytes.len() < HEADER_LEN {
        return Err(PersistenceError::Format(format!(
            "snapshot too short: {} bytes",
            bytes.len()
        )));
    }
    let (header, body) = bytes.split_at(HEADER_LEN);
    if header[..4] != SNAPSHOT_MAGIC {
        return Err(PersistenceError::Format(
            "invalid magic bytes (not an IVF snapshot)".to_string(),
        ));
    }
    let version = u32::from_le_bytes([header[4], header[5], header[6], header[7]]);
    if version != FORMAT_VERSION {
        return Err(PersistenceError::UnsupportedVersion {
            found: version,
            supported: FORMAT_VERSION,
        });
    }
    let snapshot: IvfSnapshot = postcard::from_bytes(body)?;
    snapshot.validate()?;
    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> IvfSnapshot {
        IvfSnapshot {
            cluster_count: 2,
            centroids: vec![vec![0.5, 1.0], vec![10.0, 10.5]],
            clusters: vec![vec![0, 1], vec![2, 3]],
        }
    }

    #[test]
    fn json_uses_the_documented_field_names() {
        let bytes = encode_json(&sample()).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["cluster_count"], 2);
        assert_eq!(value["clusters"][1][0], 2);
        assert_eq!(decode_json(&bytes).unwrap(), sample());
    }

    #[test]
    fn binary_has_header() {
        let bytes = encode_binary(&sample()).unwrap();
        assert_eq!(&bytes[..4], b"IVFF");
        assert_eq!(decode_binary(&bytes).unwrap(), sample());
    }

    #[test]
    fn binary_rejects_bad_magic_and_version() {
        let mut bytes = encode_binary(&sample()).unwrap();
        bytes[4] = 9;
        assert!(matches!(
            decode_binary(&bytes),
            Err(PersistenceError::UnsupportedVersion { found: 9, .. })
        ));
        bytes[0] = b'X';
        assert!(matches!(
            decode_binary(&bytes),
            Err(PersistenceError::Format(_))
        ));
        assert!(decode_binary(b"IV").is_err());
    }

    #[test]
    fn truncated_body_fails() {
        let bytes = encode_binary(&sample()).unwrap();
        assert!(decode_binary(&bytes[..bytes.len() - 3]).is_err());
    }

    #[test]
    fn encoding_from_extension() {
        assert_eq!(Encoding::for_path(Path::new("a/index.JSON")), Encoding::Json);
        assert_eq!(Encoding::for_path(Path::new("index.ivf")), Encoding::Binary);
        assert_eq!(Encoding::for_path(Path::new("index")), Encoding::Binary);
    }
}
