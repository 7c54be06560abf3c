//! Line resolution: one canonical route pattern per line.

use std::collections::HashSet;

use tracing::debug;

use crate::domain::{RoutePattern, Stop};
use crate::mbta::TransitGateway;

use super::error::AdjacencyError;

/// Find the canonical route pattern of every line serving `stop`'s station.
///
/// Patterns are looked up by parent station, which aggregates the
/// directional platforms. Lines come back in the order their first
/// canonical pattern appears upstream.
pub async fn resolve_canonical_patterns<G: TransitGateway>(
    gateway: &G,
    stop: &Stop,
) -> Result<Vec<RoutePattern>, AdjacencyError> {
    let station = &stop.parent_station;
    debug!(stop = %stop.id, %station, "fetching route patterns");

    let patterns = gateway.fetch_route_patterns(station).await?;
    let total = patterns.len();
    let canonical = canonical_per_line(patterns);

    debug!(
        %station,
        total,
        lines = ?canonical.iter().map(|p| p.line_name.as_str()).collect::<Vec<_>>(),
        "resolved canonical patterns"
    );

    Ok(canonical)
}

/// Keep canonical patterns, one per line name.
///
/// Ties between canonical patterns of the same line (typically one per
/// direction) go to the first in input order.
pub fn canonical_per_line(patterns: Vec<RoutePattern>) -> Vec<RoutePattern> {
    let mut seen = HashSet::new();
    patterns
        .into_iter()
        .filter(RoutePattern::is_canonical)
        .filter(|p| seen.insert(p.line_name.clone()))
        .collect()
}
