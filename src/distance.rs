//! Distance measures for dense vectors.
//!
//! Every search in this crate is parameterized by a [`Distance`]. The built-in
//! [`DistanceMetric`] covers the usual cases; any `Fn(&[f32], &[f32]) -> f32`
//! closure also works, so callers can plug in their own measure.
//!
//! ## Contract
//!
//! Indexes assume a measure returns a non-negative value that is minimal
//! (normally zero) for identical inputs, and that both arguments have the same
//! length. Indexes check lengths before calling the measure, so implementations
//! do not need to.

use crate::kernels;
use serde::{Deserialize, Serialize};

/// Pluggable dissimilarity between two vectors of equal length.
pub trait Distance {
    /// Distance between `a` and `b`.
    fn distance(&self, a: &[f32], b: &[f32]) -> f32;
}

impl<F> Distance for F
where
    F: Fn(&[f32], &[f32]) -> f32,
{
    #[inline]
    fn distance(&self, a: &[f32], b: &[f32]) -> f32 {
        self(a, b)
    }
}

/// Built-in distance metrics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceMetric {
    /// Euclidean (L2) distance.
    L2,
    /// Squared Euclidean distance. Same ordering as `L2`, one `sqrt` cheaper.
    SquaredL2,
    /// Cosine distance $1 - \cos(a,b)$, in `[0,2]`.
    #[default]
    Cosine,
    /// Angular distance $\arccos(\cos(a,b)) / \pi$, in `[0,1]`.
    Angular,
}

impl Distance for DistanceMetric {
    #[inline]
    fn distance(&self, a: &[f32], b: &[f32]) -> f32 {
        match self {
            DistanceMetric::L2 => l2_distance(a, b),
            DistanceMetric::SquaredL2 => kernels::l2_distance_squared(a, b),
            DistanceMetric::Cosine => cosine_distance(a, b),
            DistanceMetric::Angular => angular_distance(a, b),
        }
    }
}

/// L2 (Euclidean) distance.
#[inline]
#[must_use]
pub fn l2_distance(a: &[f32], b: &[f32]) -> f32 {
    kernels::l2_distance(a, b)
}

/// Cosine distance $1 - \cos(a,b)$.
///
/// Computes norms, so inputs need not be normalized. A zero vector has
/// similarity `0` with everything, i.e. distance `1`.
#[inline]
#[must_use]
pub fn cosine_distance(a: &[f32], b: &[f32]) -> f32 {
    1.0 - kernels::cosine(a, b).clamp(-1.0, 1.0)
}

/// Angular distance $\arccos(\cos(a,b)) / \pi$.
#[inline]
#[must_use]
pub fn angular_distance(a: &[f32], b: &[f32]) -> f32 {
    let cos_sim = kernels::cosine(a, b).clamp(-1.0, 1.0);
    cos_sim.acos() / std::f32::consts::PI
}
