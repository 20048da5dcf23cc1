//! Saving and restoring IVF index state.
//!
//! Only the trained state is persisted: centroids and the cluster partition.
//! Point vectors are never written; whoever loads a snapshot must supply the
//! same dataset the index was built from.
//!
//! Two encodings share one schema ([`IvfSnapshot`]):
//!
//! - JSON, human-readable and easy to inspect from other tools
//! - binary, `postcard` behind a magic/version header (see [`format`])
//!
//! Writes to disk replace the target atomically (see [`fs`]), so a crash
//! mid-checkpoint leaves the previous checkpoint intact.

pub mod error;
pub mod format;
pub mod fs;
pub mod snapshot;

pub use error::{PersistenceError, PersistenceResult};
pub use format::Encoding;
pub use snapshot::IvfSnapshot;
