//! Best-fit selection over a normalized candidate list.

use crate::engine::types::{Offering, Resolution};

/// First candidate whose capacity dominates the requirement on both axes.
///
/// The list is sorted by the family comparator, so the first feasible entry
/// is the cheapest by that ordering. This is a proxy for minimum price, not
/// a guarantee: within a cell, price usually tracks the sort key, but where
/// it does not the match is merely first-adequate.
pub fn resolve(required_cores: u32, required_memory_gb: f64, candidates: &[Offering]) -> Resolution {
    candidates
        .iter()
        .find(|offering| {
            offering.memory_gb as f64 >= required_memory_gb && offering.vcpu >= required_cores
        })
        .cloned()
        .map(Resolution::Matched)
        .unwrap_or(Resolution::Unmatched)
}
