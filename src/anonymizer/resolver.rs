// Copyright 2025
// SPDX-License-Identifier: Apache-2.0
//
// Overlap resolution over candidate detections

use tracing::trace;

use super::detector::Detection;

/// Keeps a sorted set of pairwise-disjoint accepted detections
///
/// Candidates are offered in priority order. A candidate already covered by
/// an accepted span is rejected, a candidate covering accepted spans replaces
/// them, and on partial overlap the strictly longer span wins.
#[derive(Debug, Default)]
pub struct OverlapResolver {
    accepted: Vec<Detection>,
}

impl OverlapResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Offer a candidate; returns `true` if it was accepted
    pub fn offer(&mut self, candidate: Detection) -> bool {
        // Accepted spans are disjoint and sorted, so the ones touching
        // [start, end) form a contiguous run
        let lo = self
            .accepted
            .partition_point(|d| d.end <= candidate.start);
        let hi = self
            .accepted
            .partition_point(|d| d.start < candidate.end);

        for existing in &self.accepted[lo..hi.max(lo)] {
            let contains_candidate =
                existing.start <= candidate.start && existing.end >= candidate.end;
            if contains_candidate {
                trace!(
                    pattern_type = %candidate.pattern_type,
                    start = candidate.start,
                    end = candidate.end,
                    "rejected: contained in accepted span"
                );
                return false;
            }

            let contained_by_candidate =
                candidate.start <= existing.start && candidate.end >= existing.end;
            if !contained_by_candidate && candidate.len() <= existing.len() {
                trace!(
                    pattern_type = %candidate.pattern_type,
                    start = candidate.start,
                    end = candidate.end,
                    "rejected: partial overlap with longer or equal span"
                );
                return false;
            }
        }

        trace!(
            pattern_type = %candidate.pattern_type,
            start = candidate.start,
            end = candidate.end,
            replaced = hi.saturating_sub(lo),
            "accepted"
        );
        self.accepted
            .splice(lo..hi.max(lo), std::iter::once(candidate));
        true
    }

    pub fn len(&self) -> usize {
        self.accepted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accepted.is_empty()
    }

    /// Accepted detections sorted by start offset
    pub fn finish(self) -> Vec<Detection> {
        self.accepted
    }
}

/// Resolve candidates given in offer order
pub fn resolve(candidates: impl IntoIterator<Item = Detection>) -> Vec<Detection> {
    let mut resolver = OverlapResolver::new();
    for candidate in candidates {
        resolver.offer(candidate);
    }
    resolver.finish()
}
