//! Recall of approximate results against exact ground truth.
//!
//! The usual way to pick `min_probe_count`: run the same queries through
//! [`crate::ExactIndex`] and [`crate::IvfFlatIndex`] and compare id sets.

use crate::ann::SearchResult;
use std::collections::HashSet;

/// Compute recall@k: fraction of true k-nearest neighbors that were retrieved.
///
/// recall@k = |retrieved ∩ ground_truth| / k
///
/// Only the first `k` entries of each list are considered. Returns a value in
/// `[0.0, 1.0]`; `0.0` when `k == 0` or the ground truth is empty.
pub fn recall_at_k(ground_truth: &[u32], retrieved: &[u32], k: usize) -> f32 {
    if k == 0 || ground_truth.is_empty() {
        return 0.0;
    }

    let gt_set: HashSet<u32> = ground_truth.iter().take(k).copied().collect();
    let hits = retrieved
        .iter()
        .take(k)
        .collect::<HashSet<_>>()
        .into_iter()
        .filter(|id| gt_set.contains(*id))
        .count();
    hits as f32 / k.min(ground_truth.len()) as f32
}

/// recall@k between two search results, `k` being the ground truth length.
pub fn result_recall(ground_truth: &SearchResult, retrieved: &SearchResult) -> f32 {
    let k = ground_truth.len();
    recall_at_k(&ground_truth.ids(), &retrieved.ids(), k)
}

/// Compute mean recall across multiple queries.
pub fn mean_recall(ground_truths: &[Vec<u32>], retrievals: &[Vec<u32>], k: usize) -> f32 {
    if ground_truths.is_empty() {
        return 0.0;
    }

    let total: f32 = ground_truths
        .iter()
        .zip(retrievals.iter())
        .map(|(gt, ret)| recall_at_k(gt, ret, k))
        .sum();

    total / ground_truths.len() as f32
}
