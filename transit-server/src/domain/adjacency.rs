//! Per-line adjacency results.

use serde::Serialize;

use super::Stop;

/// The stops immediately around a target stop on one line.
///
/// `neighbors` holds zero, one or two stops, always ordered
/// (previous, next) in the line's direction of travel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdjacencyResult {
    pub line_name: String,
    pub neighbors: Vec<Stop>,
}

impl AdjacencyResult {
    /// A result for a line on which the target was not found.
    pub fn empty(line_name: impl Into<String>) -> Self {
        Self {
            line_name: line_name.into(),
            neighbors: Vec::new(),
        }
    }

    /// Neighbor names, mostly for logs and assertions.
    pub fn neighbor_names(&self) -> Vec<&str> {
        self.neighbors.iter().map(|s| s.name.as_str()).collect()
    }
}
