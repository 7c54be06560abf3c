//! In-memory gateway for testing without API access.
//!
//! Serves a fixed network as if it were live API responses, counts
//! every call by kind, and can be told to fail specific queries.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::domain::{RoutePattern, Stop, StopId};

use super::error::MbtaError;
use super::gateway::TransitGateway;

/// Kinds of gateway call, for call counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MockCall {
    AllStops,
    RoutePatterns,
    Routes,
    TripStopIds,
    StopsByIds,
}

/// Mock gateway backed by in-memory data.
#[derive(Default)]
pub struct MockGateway {
    stops: Vec<Stop>,
    patterns: HashMap<StopId, Vec<RoutePattern>>,
    routes: HashMap<StopId, Vec<String>>,
    trips: HashMap<String, Vec<StopId>>,
    stop_fetch_delay: Option<Duration>,
    trip_fetch_delay: Option<Duration>,
    trips_in_flight: AtomicUsize,
    peak_trips_in_flight: AtomicUsize,
    calls: Mutex<HashMap<MockCall, usize>>,
    all_stops_failures: Mutex<usize>,
    failing_trips: Mutex<HashSet<String>>,
    failing_stations: Mutex<HashSet<StopId>>,
}

impl MockGateway {
    /// Create an empty mock network.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add stops to the network.
    pub fn with_stops(mut self, stops: impl IntoIterator<Item = Stop>) -> Self {
        self.stops.extend(stops);
        self
    }

    /// Add a route pattern serving a station. Patterns keep insertion order.
    pub fn with_pattern(mut self, station: &StopId, pattern: RoutePattern) -> Self {
        self.patterns
            .entry(station.clone())
            .or_default()
            .push(pattern);
        self
    }

    /// Add a route display name for a station.
    pub fn with_route(mut self, station: &StopId, long_name: impl Into<String>) -> Self {
        self.routes
            .entry(station.clone())
            .or_default()
            .push(long_name.into());
        self
    }

    /// Set the ordered stop ids of a trip.
    pub fn with_trip(mut self, trip_id: impl Into<String>, stops: Vec<StopId>) -> Self {
        self.trips.insert(trip_id.into(), stops);
        self
    }

    /// Delay the all-stops fetch, to widen race windows in tests.
    pub fn with_stop_fetch_delay(mut self, delay: Duration) -> Self {
        self.stop_fetch_delay = Some(delay);
        self
    }

    /// Delay every trip stop-id fetch, so concurrent fetches overlap.
    pub fn with_trip_fetch_delay(mut self, delay: Duration) -> Self {
        self.trip_fetch_delay = Some(delay);
        self
    }

    /// Most trip stop-id fetches that were in flight at the same time.
    pub fn peak_concurrent_trip_fetches(&self) -> usize {
        self.peak_trips_in_flight.load(Ordering::SeqCst)
    }

    /// Make the next `times` all-stops fetches fail.
    pub fn fail_all_stops(&self, times: usize) {
        *lock(&self.all_stops_failures) = times;
    }

    /// Make every stop-id fetch for this trip fail.
    pub fn fail_trip(&self, trip_id: impl Into<String>) {
        lock(&self.failing_trips).insert(trip_id.into());
    }

    /// Make every route-pattern fetch for this station fail.
    pub fn fail_station(&self, station: &StopId) {
        lock(&self.failing_stations).insert(station.clone());
    }

    /// Number of calls of one kind so far.
    pub fn call_count(&self, call: MockCall) -> usize {
        lock(&self.calls).get(&call).copied().unwrap_or(0)
    }

    /// Number of calls of all kinds so far.
    pub fn total_calls(&self) -> usize {
        lock(&self.calls).values().sum()
    }

    fn record(&self, call: MockCall) {
        *lock(&self.calls).entry(call).or_default() += 1;
    }
}

/// Lock a mutex, recovering from poisoning (a panicking test thread).
fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

fn unavailable(what: String) -> MbtaError {
    MbtaError::Api {
        status: 503,
        message: format!("mock failure: {what}"),
    }
}

impl TransitGateway for MockGateway {
    async fn fetch_all_rail_stops(&self) -> Result<Vec<Stop>, MbtaError> {
        self.record(MockCall::AllStops);

        if let Some(delay) = self.stop_fetch_delay {
            tokio::time::sleep(delay).await;
        }

        {
            let mut failures = lock(&self.all_stops_failures);
            if *failures > 0 {
                *failures -= 1;
                return Err(unavailable("all stops".to_string()));
            }
        }

        Ok(self.stops.clone())
    }

    async fn fetch_route_patterns(&self, station: &StopId) -> Result<Vec<RoutePattern>, MbtaError> {
        self.record(MockCall::RoutePatterns);

        if lock(&self.failing_stations).contains(station) {
            return Err(unavailable(format!("route patterns for {station}")));
        }

        Ok(self.patterns.get(station).cloned().unwrap_or_default())
    }

    async fn fetch_routes_for_station(&self, station: &StopId) -> Result<Vec<String>, MbtaError> {
        self.record(MockCall::Routes);

        if lock(&self.failing_stations).contains(station) {
            return Err(unavailable(format!("routes for {station}")));
        }

        Ok(self.routes.get(station).cloned().unwrap_or_default())
    }

    async fn fetch_trip_stop_ids(&self, trip_id: &str) -> Result<Vec<StopId>, MbtaError> {
        self.record(MockCall::TripStopIds);

        let in_flight = self.trips_in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_trips_in_flight.fetch_max(in_flight, Ordering::SeqCst);
        if let Some(delay) = self.trip_fetch_delay {
            tokio::time::sleep(delay).await;
        }
        self.trips_in_flight.fetch_sub(1, Ordering::SeqCst);

        if lock(&self.failing_trips).contains(trip_id) {
            return Err(unavailable(format!("trip {trip_id}")));
        }

        self.trips.get(trip_id).cloned().ok_or_else(|| MbtaError::Api {
            status: 404,
            message: format!("no mock trip {trip_id}"),
        })
    }

    /// Returns matches sorted by id: the real API does not echo the filter order.
    async fn fetch_stops_by_ids(&self, ids: &[StopId]) -> Result<Vec<Stop>, MbtaError> {
        self.record(MockCall::StopsByIds);

        let wanted: HashSet<&StopId> = ids.iter().collect();
        let mut found: Vec<Stop> = self
            .stops
            .iter()
            .filter(|s| wanted.contains(&s.id))
            .cloned()
            .collect();
        found.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(found)
    }
}
