//! Trip expansion: the ordered stops of a route pattern's trip.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::domain::{RoutePattern, Stop, StopId};
use crate::mbta::TransitGateway;

use super::error::AdjacencyError;

/// Fetch the stops `pattern`'s representative trip visits, in travel order.
///
/// Makes two upstream calls whatever the trip length: one for the stop
/// ids, one batched lookup for the stops themselves.
pub async fn expand_trip<G: TransitGateway>(
    gateway: &G,
    pattern: &RoutePattern,
) -> Result<Vec<Stop>, AdjacencyError> {
    let trip = &pattern.representative_trip_id;
    debug!(%trip, line = %pattern.line_name, "fetching trip stops");

    let ids = gateway.fetch_trip_stop_ids(trip).await?;
    let unique = unique_ids(&ids);
    let stops = gateway.fetch_stops_by_ids(&unique).await?;

    let ordered = order_by_trip(trip, &ids, stops)?;
    debug!(%trip, stops = ordered.len(), "expanded trip");
    Ok(ordered)
}

/// Ids with repeats removed, first occurrence kept.
fn unique_ids(ids: &[StopId]) -> Vec<StopId> {
    let mut seen = HashSet::new();
    ids.iter().filter(|id| seen.insert(*id)).cloned().collect()
}

/// Arrange batch lookup results in the trip's order.
///
/// The batch response order is unrelated to travel order. Every trip id
/// must resolve; a missing one means upstream disagrees with itself.
pub fn order_by_trip(
    trip: &str,
    ids: &[StopId],
    stops: Vec<Stop>,
) -> Result<Vec<Stop>, AdjacencyError> {
    let by_id: HashMap<StopId, Stop> = stops.into_iter().map(|s| (s.id.clone(), s)).collect();

    ids.iter()
        .map(|id| {
            by_id.get(id).cloned().ok_or_else(|| {
                AdjacencyError::malformed(format!(
                    "trip {trip} visits stop {id}, which the stop lookup did not return"
                ))
            })
        })
        .collect()
}
