//! Unified traits for both index implementations.

use crate::error::Result;
use std::cmp::Ordering;
use std::time::Duration;

/// Which end of the distance ordering a query asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    /// Ascending distance.
    #[default]
    Nearest,
    /// Descending distance.
    Farthest,
}

impl Direction {
    /// Total order on `(id, distance)` pairs for this direction.
    ///
    /// Distances compare with `f32::total_cmp`; equal distances fall back to
    /// ascending id in both directions, so results never depend on sort stability.
    #[inline]
    pub fn compare(self, a: &(u32, f32), b: &(u32, f32)) -> Ordering {
        let by_distance = match self {
            Direction::Nearest => a.1.total_cmp(&b.1),
            Direction::Farthest => b.1.total_cmp(&a.1),
        };
        by_distance.then_with(|| a.0.cmp(&b.0))
    }

    /// Keep the best `k` candidates and return them ordered by [`Direction::compare`].
    ///
    /// Partial selection first (O(n)), then a sort of the surviving prefix.
    pub fn top_k(self, mut candidates: Vec<(u32, f32)>, k: usize) -> Vec<(u32, f32)> {
        let k = k.min(candidates.len());
        if k == 0 {
            return Vec::new();
        }
        if k < candidates.len() {
            candidates.select_nth_unstable_by(k - 1, |a, b| self.compare(a, b));
            candidates.truncate(k);
        }
        candidates.sort_unstable_by(|a, b| self.compare(a, b));
        candidates
    }
}

/// Ranked results of one query.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    /// `(point id, distance)` in result order.
    pub items: Vec<(u32, f32)>,
    /// Wall-clock time spent answering the query.
    pub elapsed: Duration,
}

impl SearchResult {
    /// Result ids in order.
    pub fn ids(&self) -> Vec<u32> {
        self.items.iter().map(|&(id, _)| id).collect()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Query surface shared by [`crate::ExactIndex`] and [`crate::IvfFlatIndex`].
pub trait NearestNeighbors {
    /// The `k` points closest to `query`, ascending by distance.
    fn nearest(&self, query: &[f32], k: usize) -> Result<SearchResult>;

    /// The `k` points farthest from `query`, descending by distance.
    fn farthest(&self, query: &[f32], k: usize) -> Result<SearchResult>;

    /// Number of indexed points.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Vector dimension.
    fn dimension(&self) -> usize;

    /// Short algorithm name, for logs and reports.
    fn name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ties_break_by_id_in_both_directions() {
        let pool = vec![(7, 1.0), (3, 1.0), (5, 0.5), (1, 1.0)];
        let near = Direction::Nearest.top_k(pool.clone(), 4);
        assert_eq!(near, vec![(5, 0.5), (1, 1.0), (3, 1.0), (7, 1.0)]);
        let far = Direction::Farthest.top_k(pool, 3);
        assert_eq!(far, vec![(1, 1.0), (3, 1.0), (7, 1.0)]);
    }

    #[test]
    fn top_k_clamps_and_handles_zero() {
        let pool = vec![(0, 2.0), (1, 1.0)];
        assert_eq!(Direction::Nearest.top_k(pool.clone(), 10).len(), 2);
        assert!(Direction::Nearest.top_k(pool, 0).is_empty());
    }

    #[test]
    fn partial_selection_matches_full_sort() {
        let pool: Vec<(u32, f32)> = (0..200u32)
            .map(|i| (i, ((i * 37) % 23) as f32))
            .collect();
        let mut full = pool.clone();
        full.sort_by(|a, b| Direction::Farthest.compare(a, b));
        full.truncate(17);
        assert_eq!(Direction::Farthest.top_k(pool, 17), full);
    }
}
