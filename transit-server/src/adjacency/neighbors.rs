//! The adjacency engine: neighbors of a stop along each line.
//!
//! Pure computation over already-expanded trips. Matching is by station,
//! not by stop id: the target may be the platform for the other
//! direction than the one the line's trip happens to visit.

use crate::domain::{AdjacencyResult, Stop};

/// The stops immediately before and after `target` on one trip.
///
/// Returns `[previous, next]` for an interior stop, one stop at either
/// terminus, and nothing when the trip has a single stop or never
/// visits the target's station. Only the first visit counts.
pub fn neighbors_on_line(target: &Stop, stops: &[Stop]) -> Vec<Stop> {
    let Some(idx) = stops.iter().position(|s| s.same_station(target)) else {
        return Vec::new();
    };

    let mut neighbors = Vec::with_capacity(2);
    if idx > 0 {
        neighbors.push(stops[idx - 1].clone());
    }
    if let Some(next) = stops.get(idx + 1) {
        neighbors.push(next.clone());
    }
    neighbors
}

/// Compute one result per line, in the given line order.
pub fn compute_adjacency(target: &Stop, lines: &[(String, Vec<Stop>)]) -> Vec<AdjacencyResult> {
    lines
        .iter()
        .map(|(line_name, stops)| AdjacencyResult {
            line_name: line_name.clone(),
            neighbors: neighbors_on_line(target, stops),
        })
        .collect()
}
