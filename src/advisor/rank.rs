use crate::recommendation::{Recommendation, RecommendationKind};
use hashbrown::HashSet;

/// Deterministic ranking:
/// - Descending priority
/// - Ties keep input order (stable sort)
#[inline]
pub fn rank(recs: &mut [Recommendation]) {
    recs.sort_by(|a, b| b.priority.total_cmp(&a.priority));
}

/// Merge candidate batches in order, drop later duplicates, then rank.
///
/// Duplicates share (kind, card_id, battlefield_index, ability_index).
pub fn merge_and_rank(batches: Vec<Vec<Recommendation>>) -> Vec<Recommendation> {
    let cap = batches.iter().map(Vec::len).sum();
    let mut seen: HashSet<(RecommendationKind, String, Option<usize>, Option<usize>)> =
        HashSet::with_capacity(cap);
    let mut merged = Vec::with_capacity(cap);
    for rec in batches.into_iter().flatten() {
        let (kind, card_id, bf, ab) = rec.dedup_key();
        if seen.insert((kind, card_id.to_string(), bf, ab)) {
            merged.push(rec);
        }
    }
    rank(&mut merged);
    merged
}
