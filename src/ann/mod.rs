//! Shared query vocabulary for the exact and IVF indexes.
//!
//! - [`Direction`]: nearest-first or farthest-first ordering
//! - [`SearchResult`]: ranked `(id, distance)` pairs plus elapsed query time
//! - [`NearestNeighbors`]: the uniform query surface both indexes implement

pub mod traits;

pub use traits::{Direction, NearestNeighbors, SearchResult};
