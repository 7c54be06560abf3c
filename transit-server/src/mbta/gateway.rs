//! The upstream gateway seam.

use crate::domain::{RoutePattern, Stop, StopId};

use super::error::MbtaError;

/// Read-only queries against the upstream transit API.
///
/// Implementations flatten the API's documents into domain shapes and do
/// nothing else. This abstraction lets the registry and the adjacency
/// pipeline run against mock data in tests.
#[allow(async_fn_in_trait)]
pub trait TransitGateway {
    /// All light rail and heavy rail stops.
    async fn fetch_all_rail_stops(&self) -> Result<Vec<Stop>, MbtaError>;

    /// Route patterns serving a station, in response order.
    async fn fetch_route_patterns(&self, station: &StopId) -> Result<Vec<RoutePattern>, MbtaError>;

    /// Display names of the routes serving a station.
    async fn fetch_routes_for_station(&self, station: &StopId) -> Result<Vec<String>, MbtaError>;

    /// Stop ids a trip visits, in travel order.
    async fn fetch_trip_stop_ids(&self, trip_id: &str) -> Result<Vec<StopId>, MbtaError>;

    /// Stops for a batch of ids, in one upstream call. Order is unspecified.
    async fn fetch_stops_by_ids(&self, ids: &[StopId]) -> Result<Vec<Stop>, MbtaError>;
}
