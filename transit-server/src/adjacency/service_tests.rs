//! End-to-end tests for adjacency queries against a mock Red/Green Line network.

use std::sync::Arc;
use std::time::Duration;

use super::*;
use crate::cache::{CacheConfig, CachedGateway};
use crate::domain::{AdjacencyResult, RoutePattern, Stop, StopId};
use crate::mbta::{MockCall, MockGateway};
use crate::registry::StopRegistry;

fn id(s: &str) -> StopId {
    StopId::parse(s).unwrap()
}

fn platform(stop: &str, station: &str, name: &str) -> Stop {
    Stop {
        id: id(stop),
        name: name.to_string(),
        description: Some(format!("{name} - platform {stop}")),
        line: None,
        latitude: 42.36,
        longitude: -71.1,
        parent_station: id(station),
    }
}

/// (platform, station, name) for the northbound Red Line, Ashmont branch trunk.
const RED_NORTHBOUND: &[(&str, &str, &str)] = &[
    ("70077", "place-dwnxg", "Downtown Crossing"),
    ("70075", "place-pktrm", "Park Street"),
    ("70073", "place-chmnl", "Charles/MGH"),
    ("70059", "place-knncl", "Kendall/MIT"),
    ("70061", "place-cntsq", "Central"),
    ("70063", "place-harsq", "Harvard"),
    ("70065", "place-portr", "Porter"),
    ("70067", "place-davis", "Davis"),
    ("Alewife-01", "place-alfcl", "Alewife"),
];

/// Southbound platforms: same stations, different stop ids.
const RED_SOUTHBOUND: &[(&str, &str, &str)] = &[
    ("Alewife-02", "place-alfcl", "Alewife"),
    ("70068", "place-davis", "Davis"),
    ("70066", "place-portr", "Porter"),
    ("70064", "place-harsq", "Harvard"),
    ("70062", "place-cntsq", "Central"),
    ("70060", "place-knncl", "Kendall/MIT"),
    ("70074", "place-chmnl", "Charles/MGH"),
    ("70076", "place-pktrm", "Park Street"),
    ("70078", "place-dwnxg", "Downtown Crossing"),
];

const GREEN_E_WESTBOUND: &[(&str, &str, &str)] = &[
    ("70202", "place-gover", "Government Center"),
    ("70196", "place-pktrm", "Park Street"),
    ("70159", "place-boyls", "Boylston"),
];

const RED_NORTH_TRIP: &str = "canonical-Red-C1-1";
const RED_SOUTH_TRIP: &str = "canonical-Red-C1-0";
const GREEN_E_TRIP: &str = "canonical-Green-E-C1-0";

fn stops(rows: &[(&str, &str, &str)]) -> Vec<Stop> {
    rows.iter()
        .map(|(stop, station, name)| platform(stop, station, name))
        .collect()
}

fn ids(rows: &[(&str, &str, &str)]) -> Vec<StopId> {
    rows.iter().map(|(stop, _, _)| id(stop)).collect()
}

fn stations(rows: &[(&str, &str, &str)]) -> Vec<StopId> {
    rows.iter().map(|(_, station, _)| id(station)).collect()
}

/// Patterns every Red Line station reports, northbound canonical first.
fn red_patterns() -> Vec<RoutePattern> {
    vec![
        RoutePattern::new("67134281", "Red"),
        RoutePattern::new(RED_NORTH_TRIP, "Red"),
        RoutePattern::new(RED_SOUTH_TRIP, "Red"),
    ]
}

fn network() -> MockGateway {
    let mut gateway = MockGateway::new()
        .with_stops(stops(RED_NORTHBOUND))
        .with_stops(stops(RED_SOUTHBOUND))
        .with_stops(stops(GREEN_E_WESTBOUND))
        .with_trip(RED_NORTH_TRIP, ids(RED_NORTHBOUND))
        .with_trip(RED_SOUTH_TRIP, ids(RED_SOUTHBOUND))
        .with_trip(GREEN_E_TRIP, ids(GREEN_E_WESTBOUND));

    for station in stations(RED_NORTHBOUND) {
        for pattern in red_patterns() {
            gateway = gateway.with_pattern(&station, pattern);
        }
        gateway = gateway.with_route(&station, "Red Line");
    }

    let park = id("place-pktrm");
    gateway
        .with_pattern(&park, RoutePattern::new(GREEN_E_TRIP, "Green-E"))
        .with_pattern(&park, RoutePattern::new("canonical-Green-E-C1-1", "Green-E"))
        .with_route(&park, "Green Line E")
        .with_pattern(&id("place-gover"), RoutePattern::new(GREEN_E_TRIP, "Green-E"))
}

async fn adjacent(
    gateway: &Arc<MockGateway>,
    stop: &str,
) -> Result<Vec<AdjacencyResult>, AdjacencyError> {
    let registry = StopRegistry::new(gateway.clone());
    let config = AdjacencyConfig::default();
    let service = AdjacencyService::new(gateway.as_ref(), &registry, &config);
    service.compute_adjacent_stops(&id(stop)).await
}

#[tokio::test]
async fn central_sits_between_kendall_and_harvard() {
    let gateway = Arc::new(network());

    let results = adjacent(&gateway, "70061").await.unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].line_name, "Red");
    assert_eq!(results[0].neighbor_names(), vec!["Kendall/MIT", "Harvard"]);
    assert_eq!(results[0].neighbors[0].id.as_str(), "70059");
    assert_eq!(results[0].neighbors[1].id.as_str(), "70063");
}

#[tokio::test]
async fn alewife_terminus_has_one_neighbor() {
    let gateway = Arc::new(network());

    let results = adjacent(&gateway, "Alewife-01").await.unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].neighbor_names(), vec!["Davis"]);
}

#[tokio::test]
async fn other_direction_platform_matches_by_station() {
    let gateway = Arc::new(network());

    // 70062 is the southbound Central platform; the chosen trip runs northbound.
    let results = adjacent(&gateway, "70062").await.unwrap();

    assert_eq!(results[0].neighbor_names(), vec!["Kendall/MIT", "Harvard"]);
}

#[tokio::test]
async fn duplicate_canonical_patterns_yield_one_result_per_line() {
    let gateway = Arc::new(network());

    let results = adjacent(&gateway, "70063").await.unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].neighbor_names(), vec!["Central", "Porter"]);
    // Only the first canonical Red pattern is expanded.
    assert_eq!(gateway.call_count(MockCall::TripStopIds), 1);
    assert_eq!(gateway.call_count(MockCall::StopsByIds), 1);
}

#[tokio::test]
async fn transfer_station_reports_lines_in_upstream_order() {
    let gateway = Arc::new(network());

    let results = adjacent(&gateway, "70075").await.unwrap();

    let lines: Vec<_> = results.iter().map(|r| r.line_name.as_str()).collect();
    assert_eq!(lines, vec!["Red", "Green-E"]);
    assert_eq!(results[0].neighbor_names(), vec!["Downtown Crossing", "Charles/MGH"]);
    assert_eq!(results[1].neighbor_names(), vec!["Government Center", "Boylston"]);
    assert_eq!(gateway.call_count(MockCall::RoutePatterns), 1);
    assert_eq!(gateway.call_count(MockCall::TripStopIds), 2);
}

#[tokio::test]
async fn unknown_stop_makes_no_line_calls() {
    let gateway = Arc::new(network());

    let err = adjacent(&gateway, "99999").await.unwrap_err();

    assert!(matches!(err, AdjacencyError::StopNotFound(ref s) if s.as_str() == "99999"));
    assert_eq!(gateway.call_count(MockCall::AllStops), 1);
    assert_eq!(gateway.call_count(MockCall::RoutePatterns), 0);
    assert_eq!(gateway.call_count(MockCall::TripStopIds), 0);
}

#[tokio::test]
async fn one_failing_line_fails_the_whole_query() {
    let gateway = Arc::new(network());
    gateway.fail_trip(GREEN_E_TRIP);

    let err = adjacent(&gateway, "70075").await.unwrap_err();

    assert!(matches!(err, AdjacencyError::UpstreamUnavailable(_)));
}

#[tokio::test]
async fn one_failing_line_fails_the_query_in_small_batches() {
    let gateway = Arc::new(network());
    gateway.fail_trip(GREEN_E_TRIP);

    let registry = StopRegistry::new(gateway.clone());
    let config = AdjacencyConfig::new(1);
    let service = AdjacencyService::new(gateway.as_ref(), &registry, &config);

    let err = service.compute_adjacent_stops(&id("70075")).await.unwrap_err();
    assert!(matches!(err, AdjacencyError::UpstreamUnavailable(_)));
}

async fn peak_trip_fetches_at_park_street(batch_size: usize) -> usize {
    let gateway = Arc::new(network().with_trip_fetch_delay(Duration::from_millis(30)));
    let registry = StopRegistry::new(gateway.clone());
    let config = AdjacencyConfig::new(batch_size);
    let service = AdjacencyService::new(gateway.as_ref(), &registry, &config);

    let results = service.compute_adjacent_stops(&id("70075")).await.unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(gateway.call_count(MockCall::TripStopIds), 2);
    gateway.peak_concurrent_trip_fetches()
}

#[tokio::test]
async fn lines_expand_concurrently_within_a_batch() {
    assert_eq!(peak_trip_fetches_at_park_street(2).await, 2);
    assert_eq!(peak_trip_fetches_at_park_street(8).await, 2);
}

#[tokio::test]
async fn batch_size_one_expands_lines_one_at_a_time() {
    assert_eq!(peak_trip_fetches_at_park_street(1).await, 1);
}

#[tokio::test]
async fn route_pattern_failure_propagates() {
    let gateway = Arc::new(network());
    gateway.fail_station(&id("place-cntsq"));

    let err = adjacent(&gateway, "70061").await.unwrap_err();

    assert!(matches!(err, AdjacencyError::UpstreamUnavailable(_)));
    assert_eq!(gateway.call_count(MockCall::TripStopIds), 0);
}

#[tokio::test]
async fn registry_failure_is_upstream_unavailable() {
    let gateway = Arc::new(network());
    gateway.fail_all_stops(1);

    let err = adjacent(&gateway, "70061").await.unwrap_err();

    assert!(matches!(err, AdjacencyError::UpstreamUnavailable(_)));
    assert_eq!(gateway.call_count(MockCall::RoutePatterns), 0);
}

#[tokio::test]
async fn trip_stop_missing_from_lookup_is_malformed() {
    let gateway = Arc::new(
        network().with_trip(RED_NORTH_TRIP, vec![id("70059"), id("70061"), id("70099")]),
    );

    let err = adjacent(&gateway, "70061").await.unwrap_err();

    assert!(matches!(err, AdjacencyError::MalformedUpstreamData { .. }));
}

#[tokio::test]
async fn station_without_canonical_patterns_has_no_lines() {
    let lonely = platform("70500", "place-lonely", "Lonely");
    let gateway = Arc::new(
        network()
            .with_stops([lonely])
            .with_pattern(&id("place-lonely"), RoutePattern::new("67134281", "Red")),
    );

    let results = adjacent(&gateway, "70500").await.unwrap();
    assert!(results.is_empty());
}

#[tokio::test]
async fn line_missing_target_yields_empty_neighbors() {
    // Green-E pattern reported at Central, but its trip never visits Central.
    let gateway = Arc::new(
        network().with_pattern(&id("place-cntsq"), RoutePattern::new(GREEN_E_TRIP, "Green-E")),
    );

    let results = adjacent(&gateway, "70061").await.unwrap();

    assert_eq!(results.len(), 2);
    assert_eq!(results[1], AdjacencyResult::empty("Green-E"));
}

#[tokio::test]
async fn lines_through_stop_uses_parent_station() {
    let gateway = Arc::new(network());
    let registry = StopRegistry::new(gateway.clone());
    let config = AdjacencyConfig::default();
    let service = AdjacencyService::new(gateway.as_ref(), &registry, &config);

    let lines = service.lines_through_stop(&id("70076")).await.unwrap();
    assert_eq!(lines, vec!["Red Line", "Green Line E"]);

    let err = service.lines_through_stop(&id("nowhere")).await.unwrap_err();
    assert!(matches!(err, AdjacencyError::StopNotFound(_)));
    assert_eq!(gateway.call_count(MockCall::Routes), 1);
}

#[tokio::test]
async fn repeated_queries_reuse_registry_and_cache() {
    let gateway = Arc::new(CachedGateway::new(network(), &CacheConfig::default()));
    let registry = StopRegistry::new(gateway.clone());
    let config = AdjacencyConfig::default();
    let service = AdjacencyService::new(gateway.as_ref(), &registry, &config);

    let first = service.compute_adjacent_stops(&id("70061")).await.unwrap();
    let second = service.compute_adjacent_stops(&id("70061")).await.unwrap();

    assert_eq!(first, second);
    let inner = gateway.inner();
    assert_eq!(inner.call_count(MockCall::AllStops), 1);
    assert_eq!(inner.call_count(MockCall::RoutePatterns), 1);
    assert_eq!(inner.call_count(MockCall::TripStopIds), 1);
    assert_eq!(inner.call_count(MockCall::StopsByIds), 2);
}

#[tokio::test]
async fn resolved_stop_skips_registry() {
    let gateway = Arc::new(network());
    let registry = StopRegistry::new(gateway.clone());
    let config = AdjacencyConfig::default();
    let service = AdjacencyService::new(gateway.as_ref(), &registry, &config);

    let target = platform("70061", "place-cntsq", "Central");
    let results = service.adjacent_to(&target).await.unwrap();

    assert_eq!(results[0].neighbor_names(), vec!["Kendall/MIT", "Harvard"]);
    assert_eq!(gateway.call_count(MockCall::AllStops), 0);
}
